#![allow(dead_code)]

use sim_core::runner::{run_next_event_with_hook, run_until_empty_with_hook};
use sim_core::Simulation;

/// `(timestamp, event kind)` of every processed event, in processing order.
pub type Trace = Vec<(u64, &'static str)>;

/// Drain the simulation's queue and return the processed events.
pub fn run_traced(simulation: &mut Simulation) -> Trace {
    let mut trace = Trace::new();
    run_until_empty_with_hook(simulation.world_mut(), usize::MAX, |_, event| {
        trace.push((event.timestamp, event.kind.name()));
    })
    .expect("simulation should run to completion");
    trace
}

/// Process events until (and including) the first one at or after `timestamp`.
pub fn run_through(simulation: &mut Simulation, timestamp: u64) -> Trace {
    let mut trace = Trace::new();
    loop {
        let mut last = None;
        let processed = run_next_event_with_hook(simulation.world_mut(), |_, event| {
            last = Some((event.timestamp, event.kind.name()));
        })
        .expect("event should apply");
        if !processed {
            return trace;
        }
        if let Some(entry) = last {
            trace.push(entry);
            if entry.0 >= timestamp {
                return trace;
            }
        }
    }
}
