//! Event processing metrics: how many events of each kind a run applied and how fast.

use std::collections::BTreeMap;
use std::time::Instant;

use bevy_ecs::prelude::Resource;

use crate::clock::EventKind;

/// Event processing rate metrics. Insert as a resource to have the runner
/// record every applied event.
#[derive(Debug, Default, Resource)]
pub struct EventMetrics {
    /// Total events processed.
    pub events_processed: u64,
    /// Start time for rate calculation.
    pub start_time: Option<Instant>,
    /// Events per event kind name.
    pub events_by_kind: BTreeMap<&'static str, u64>,
}

impl EventMetrics {
    /// Record an event being processed.
    pub fn record_event(&mut self, kind: &EventKind) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
        self.events_processed += 1;
        *self.events_by_kind.entry(kind.name()).or_insert(0) += 1;
    }

    pub fn count(&self, kind_name: &str) -> u64 {
        self.events_by_kind.get(kind_name).copied().unwrap_or(0)
    }

    /// Get current event processing rate (events per second).
    pub fn events_per_second(&self) -> f64 {
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                self.events_processed as f64 / elapsed
            } else {
                0.0
            }
        } else {
            0.0
        }
    }

    /// Print summary statistics.
    pub fn print_summary(&self) {
        println!("\n=== Event Processing Summary ===");
        println!("Total events processed: {}", self.events_processed);
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed();
            println!("Total time: {:.2}s", elapsed.as_secs_f64());
            println!("Events per second: {:.0}", self.events_per_second());
        }

        println!("\nEvents by kind:");
        let mut entries: Vec<_> = self.events_by_kind.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        for (kind, count) in entries {
            println!("  {:30} : {}", kind, count);
        }
    }
}
