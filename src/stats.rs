//! Per-group summaries shown alongside the preview.
//!
//! Route length only counts forward stops: flexible-return stops are left
//! out of both the path and the forward stop count.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::EditError;
use crate::haversine::path_length_meters;
use crate::ordering::forward_clusters;
use crate::plan::{EmployeeId, GroupId, Plan, VehicleId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleLoad {
    pub vehicle_id: VehicleId,
    pub assigned: usize,
    /// `None` when the vehicle is not in the plan's vehicle list.
    pub capacity: Option<u32>,
}

impl VehicleLoad {
    pub fn is_over_capacity(&self) -> bool {
        match self.capacity {
            Some(capacity) => self.assigned > capacity as usize,
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub stop_count: usize,
    pub forward_stop_count: usize,
    pub assigned_employees: usize,
    pub eligible_employees: usize,
    pub unassigned_employees: Vec<EmployeeId>,
    /// Forward stops in visit order, then the destination site.
    pub route_length_meters: f64,
    /// Sorted by vehicle id.
    pub vehicle_loads: Vec<VehicleLoad>,
}

pub fn summarize_group(plan: &Plan, group_id: &GroupId) -> Result<GroupSummary, EditError> {
    let clusters = plan.clusters(group_id)?;
    let forward = forward_clusters(plan, group_id)?;

    let mut path: Vec<(f64, f64)> = forward.iter().map(|(_, cluster)| cluster.location()).collect();
    if let Some(site) = plan.site_for(group_id) {
        if !path.is_empty() {
            path.push((site.lat, site.lng));
        }
    }

    let mut loads: BTreeMap<&VehicleId, usize> = BTreeMap::new();
    for cluster in clusters {
        if let Some(vehicle_id) = cluster.vehicle() {
            *loads.entry(vehicle_id).or_default() += cluster.employees().len();
        }
    }
    let vehicle_loads = loads
        .into_iter()
        .map(|(vehicle_id, assigned)| VehicleLoad {
            vehicle_id: vehicle_id.clone(),
            assigned,
            capacity: plan.vehicle(vehicle_id).map(|vehicle| vehicle.capacity),
        })
        .collect();

    let unassigned_employees = plan
        .unassigned_employees(group_id)?
        .into_iter()
        .map(|employee| employee.id.clone())
        .collect();

    Ok(GroupSummary {
        group_id: group_id.clone(),
        stop_count: clusters.len(),
        forward_stop_count: forward.len(),
        assigned_employees: clusters.iter().map(|cluster| cluster.employees().len()).sum(),
        eligible_employees: plan.employees(group_id)?.len(),
        unassigned_employees,
        route_length_meters: path_length_meters(&path),
        vehicle_loads,
    })
}

/// One summary per group, in display order.
pub fn summarize_plan(plan: &Plan) -> Result<Vec<GroupSummary>, EditError> {
    plan.groups()
        .par_iter()
        .map(|group| summarize_group(plan, &group.id))
        .collect()
}
