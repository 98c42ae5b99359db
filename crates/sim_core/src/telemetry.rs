//! Telemetry / KPIs: the monitor that observes every state transition.
//!
//! Event transitions call [Monitor::notify] synchronously; the runner calls
//! [Monitor::report] once when the queue drains. The core never inspects how
//! a monitor aggregates.

use std::collections::{BTreeMap, HashMap};

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::spatial::Location;

/// Statistic name to value.
pub type Report = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Rider,
    Driver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Request,
    Cancel,
    Pickup,
    Dropoff,
}

pub trait Monitor: Send + Sync {
    fn notify(
        &mut self,
        timestamp: u64,
        category: Category,
        action: Action,
        id: &str,
        location: Location,
    );

    fn report(&self) -> Report;
}

/// Resource wrapper for the monitor trait object.
#[derive(Resource)]
pub struct MonitorResource(pub Box<dyn Monitor>);

impl MonitorResource {
    pub fn new(monitor: Box<dyn Monitor>) -> Self {
        Self(monitor)
    }
}

impl Default for MonitorResource {
    fn default() -> Self {
        Self::new(Box::new(ActivityMonitor::default()))
    }
}

impl std::ops::Deref for MonitorResource {
    type Target = dyn Monitor;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for MonitorResource {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

/// One recorded transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub timestamp: u64,
    pub action: Action,
    pub location: Location,
}

/// Default monitor: keeps every activity per category and identifier.
///
/// Report keys:
/// - `rider_wait_time`: mean time from request to the rider's next recorded
///   activity (pickup or cancellation), over riders that have one.
/// - `driver_total_distance`: mean distance per driver across all recorded
///   locations.
/// - `driver_ride_distance`: mean distance per driver on segments that end in
///   a dropoff.
/// - `riders_total`, `riders_satisfied`, `riders_cancelled`, `drivers_total`.
#[derive(Debug, Default)]
pub struct ActivityMonitor {
    activities: HashMap<Category, BTreeMap<String, Vec<Activity>>>,
}

impl ActivityMonitor {
    pub fn activities(&self, category: Category, id: &str) -> &[Activity] {
        self.activities
            .get(&category)
            .and_then(|by_id| by_id.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn population(&self, category: Category) -> impl Iterator<Item = &Vec<Activity>> {
        self.activities
            .get(&category)
            .into_iter()
            .flat_map(|by_id| by_id.values())
    }

    fn count_with(&self, category: Category, action: Action) -> usize {
        self.population(category)
            .filter(|activities| activities.iter().any(|a| a.action == action))
            .count()
    }

    fn average_wait_time(&self) -> f64 {
        let waits: Vec<u64> = self
            .population(Category::Rider)
            .filter(|activities| activities.len() >= 2)
            .map(|activities| activities[1].timestamp.saturating_sub(activities[0].timestamp))
            .collect();
        mean(waits.iter().map(|wait| *wait as f64).sum(), waits.len())
    }

    fn average_total_distance(&self) -> f64 {
        let drivers = self.population(Category::Driver).count();
        let total: f64 = self
            .population(Category::Driver)
            .map(|activities| {
                activities
                    .windows(2)
                    .map(|pair| leg_distance(pair[0].location, pair[1].location))
                    .sum::<f64>()
            })
            .sum();
        mean(total, drivers)
    }

    fn average_ride_distance(&self) -> f64 {
        let drivers = self.population(Category::Driver).count();
        let total: f64 = self
            .population(Category::Driver)
            .map(|activities| {
                activities
                    .windows(2)
                    .filter(|pair| pair[1].action == Action::Dropoff)
                    .map(|pair| leg_distance(pair[0].location, pair[1].location))
                    .sum::<f64>()
            })
            .sum();
        mean(total, drivers)
    }
}

fn leg_distance(from: Location, to: Location) -> f64 {
    from.manhattan_distance(to).unwrap_or(u64::MAX) as f64
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

impl Monitor for ActivityMonitor {
    fn notify(
        &mut self,
        timestamp: u64,
        category: Category,
        action: Action,
        id: &str,
        location: Location,
    ) {
        self.activities
            .entry(category)
            .or_default()
            .entry(id.to_string())
            .or_default()
            .push(Activity {
                timestamp,
                action,
                location,
            });
    }

    fn report(&self) -> Report {
        let mut report = Report::new();
        report.insert("rider_wait_time".to_string(), self.average_wait_time());
        report.insert(
            "driver_total_distance".to_string(),
            self.average_total_distance(),
        );
        report.insert(
            "driver_ride_distance".to_string(),
            self.average_ride_distance(),
        );
        report.insert(
            "riders_total".to_string(),
            self.population(Category::Rider).count() as f64,
        );
        report.insert(
            "riders_satisfied".to_string(),
            self.count_with(Category::Rider, Action::Dropoff) as f64,
        );
        report.insert(
            "riders_cancelled".to_string(),
            self.count_with(Category::Rider, Action::Cancel) as f64,
        );
        report.insert(
            "drivers_total".to_string(),
            self.population(Category::Driver).count() as f64,
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_monitor_reports_zeroes() {
        let report = ActivityMonitor::default().report();
        assert_eq!(report["rider_wait_time"], 0.0);
        assert_eq!(report["driver_total_distance"], 0.0);
        assert_eq!(report["driver_ride_distance"], 0.0);
        assert_eq!(report["riders_total"], 0.0);
    }

    #[test]
    fn report_averages_wait_and_distances() {
        let mut monitor = ActivityMonitor::default();
        let origin = Location::new(10, 0);
        let destination = Location::new(20, 0);

        monitor.notify(0, Category::Driver, Action::Request, "D1", Location::new(0, 0));
        monitor.notify(1, Category::Rider, Action::Request, "R1", origin);
        monitor.notify(2, Category::Driver, Action::Pickup, "D1", origin);
        monitor.notify(2, Category::Rider, Action::Pickup, "R1", origin);
        monitor.notify(3, Category::Driver, Action::Dropoff, "D1", destination);
        monitor.notify(3, Category::Rider, Action::Dropoff, "R1", destination);
        monitor.notify(3, Category::Driver, Action::Request, "D1", destination);

        monitor.notify(4, Category::Rider, Action::Request, "R2", origin);
        monitor.notify(9, Category::Rider, Action::Cancel, "R2", origin);

        let report = monitor.report();
        // R1 waited 1, R2 waited 5.
        assert_eq!(report["rider_wait_time"], 3.0);
        assert_eq!(report["driver_total_distance"], 20.0);
        assert_eq!(report["driver_ride_distance"], 10.0);
        assert_eq!(report["riders_total"], 2.0);
        assert_eq!(report["riders_satisfied"], 1.0);
        assert_eq!(report["riders_cancelled"], 1.0);
        assert_eq!(report["drivers_total"], 1.0);

        assert_eq!(monitor.activities(Category::Rider, "R2").len(), 2);
        assert!(monitor.activities(Category::Driver, "nobody").is_empty());
    }

    #[test]
    fn rider_without_second_activity_is_excluded_from_wait_time() {
        let mut monitor = ActivityMonitor::default();
        monitor.notify(0, Category::Rider, Action::Request, "R1", Location::new(0, 0));
        monitor.notify(2, Category::Rider, Action::Request, "R2", Location::new(0, 0));
        monitor.notify(6, Category::Rider, Action::Pickup, "R2", Location::new(0, 0));
        assert_eq!(monitor.report()["rider_wait_time"], 4.0);
    }
}
