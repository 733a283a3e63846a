//! Test fixtures for cluster-curator.
//!
//! Provides:
//! - Real Montreal locations
//! - A builder that assembles a preview payload and loads it as a plan

#![allow(dead_code)]

pub mod montreal_locations;

pub use montreal_locations::*;

use std::collections::HashMap;

use chrono::NaiveTime;
use cluster_curator::payload::{
    PreviewPayload, RawCluster, RawEmployee, RawGroup, RawSite, RawVehicle,
};
use cluster_curator::plan::{Plan, Recurrence, TimeWindow};

/// Meters per degree of latitude on the mean-radius sphere.
pub const METERS_PER_DEGREE_LAT: f64 = 111_194.93;

/// A point `meters` north of `origin`.
pub fn north_of(origin: (f64, f64), meters: f64) -> (f64, f64) {
    (origin.0 + meters / METERS_PER_DEGREE_LAT, origin.1)
}

pub fn employee(id: &str, first_name: &str, last_name: &str) -> RawEmployee {
    RawEmployee {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        matricule: None,
        email: None,
        lat: None,
        lng: None,
        city: None,
        service: None,
        department: None,
        active: None,
    }
}

pub fn employee_at(id: &str, location: (f64, f64)) -> RawEmployee {
    RawEmployee {
        lat: Some(location.0),
        lng: Some(location.1),
        ..employee(id, id, "Test")
    }
}

pub fn cluster_at(location: (f64, f64), order: i32, employee_ids: &[&str]) -> RawCluster {
    RawCluster {
        lat: location.0,
        lng: location.1,
        order,
        max_radius_meters: 500.0,
        valid: true,
        vehicle_index: None,
        employee_ids: employee_ids.iter().map(|id| id.to_string()).collect(),
        flexible_return: false,
    }
}

/// Builder for preview payloads with a single head-office site.
pub struct PlanBuilder {
    payload: PreviewPayload,
}

impl PlanBuilder {
    pub fn new() -> Self {
        let mut site_by_id = HashMap::new();
        site_by_id.insert(
            "hq".to_string(),
            RawSite {
                name: HEAD_OFFICE.name.to_string(),
                lat: HEAD_OFFICE.lat,
                lng: HEAD_OFFICE.lng,
            },
        );
        Self {
            payload: PreviewPayload {
                groups: Vec::new(),
                clusters_by_group: HashMap::new(),
                employees_by_group: HashMap::new(),
                vehicles_available: Vec::new(),
                site_by_id,
            },
        }
    }

    /// Adds a weekday morning group.
    pub fn group(mut self, id: &str) -> Self {
        self.payload.groups.push(RawGroup {
            id: id.to_string(),
            name: format!("Group {}", id),
            recurrence: Recurrence::Weekly {
                weekdays: (1..=5).collect(),
            },
            time_window: TimeWindow {
                start: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            },
            site_id: "hq".to_string(),
        });
        self
    }

    pub fn cluster(mut self, group_id: &str, cluster: RawCluster) -> Self {
        self.payload
            .clusters_by_group
            .entry(group_id.to_string())
            .or_default()
            .push(cluster);
        self
    }

    pub fn employee(mut self, group_id: &str, employee: RawEmployee) -> Self {
        self.payload
            .employees_by_group
            .entry(group_id.to_string())
            .or_default()
            .push(employee);
        self
    }

    pub fn vehicle(mut self, id: &str, capacity: u32) -> Self {
        self.payload.vehicles_available.push(RawVehicle {
            id: id.to_string(),
            plate: format!("QC-{}", id.to_uppercase()),
            capacity,
        });
        self
    }

    pub fn payload(self) -> PreviewPayload {
        self.payload
    }

    pub fn build(self) -> Plan {
        self.payload.into_plan().expect("fixture payload should be valid")
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}
