//! Wire shape of a clustering preview and its validation into a [`Plan`].
//!
//! The upstream result arrives as loosely-typed JSON. Parsing is strict about
//! structure (serde) and [`PreviewPayload::into_plan`] is strict about cross
//! references, so a malformed preview fails at load time with a message
//! naming the offending entry.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PayloadError;
use crate::plan::{
    Cluster, Employee, EmployeeId, Group, GroupId, Plan, Recurrence, Site, SiteId, TimeWindow,
    Vehicle, VehicleId,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPayload {
    pub groups: Vec<RawGroup>,
    #[serde(default)]
    pub clusters_by_group: HashMap<String, Vec<RawCluster>>,
    #[serde(default)]
    pub employees_by_group: HashMap<String, Vec<RawEmployee>>,
    #[serde(default)]
    pub vehicles_available: Vec<RawVehicle>,
    #[serde(default)]
    pub site_by_id: HashMap<String, RawSite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    pub id: String,
    pub name: String,
    pub recurrence: Recurrence,
    pub time_window: TimeWindow,
    pub site_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCluster {
    pub lat: f64,
    pub lng: f64,
    pub order: i32,
    #[serde(default)]
    pub max_radius_meters: f64,
    #[serde(default = "default_valid")]
    pub valid: bool,
    #[serde(default)]
    pub vehicle_index: Option<usize>,
    #[serde(default)]
    pub employee_ids: Vec<String>,
    #[serde(default)]
    pub flexible_return: bool,
}

fn default_valid() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmployee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub matricule: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVehicle {
    pub id: String,
    pub plate: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSite {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl PreviewPayload {
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates cross references and builds the in-memory plan.
    pub fn into_plan(self) -> Result<Plan, PayloadError> {
        let vehicles: Vec<Vehicle> = self
            .vehicles_available
            .into_iter()
            .map(|raw| Vehicle {
                id: VehicleId(raw.id),
                plate: raw.plate,
                capacity: raw.capacity,
            })
            .collect();
        let mut seen_vehicles = BTreeSet::new();
        for vehicle in &vehicles {
            if !seen_vehicles.insert(&vehicle.id) {
                return Err(invalid(format!("duplicate vehicle id {}", vehicle.id)));
            }
        }

        let mut site_by_id = HashMap::with_capacity(self.site_by_id.len());
        for (id, raw) in self.site_by_id {
            if !raw.lat.is_finite() || !raw.lng.is_finite() {
                return Err(invalid(format!("site {} has a non-finite coordinate", id)));
            }
            let site_id = SiteId(id);
            site_by_id.insert(
                site_id.clone(),
                Site {
                    id: site_id,
                    name: raw.name,
                    lat: raw.lat,
                    lng: raw.lng,
                },
            );
        }

        let mut groups = Vec::with_capacity(self.groups.len());
        for raw in self.groups {
            let group = parse_group(raw, &site_by_id)?;
            if groups.iter().any(|existing: &Group| existing.id == group.id) {
                return Err(invalid(format!("duplicate group id {}", group.id)));
            }
            groups.push(group);
        }

        let mut clusters_by_group = HashMap::with_capacity(groups.len());
        for (group_key, raw_clusters) in self.clusters_by_group {
            let group_id = known_group(&groups, group_key, "clustersByGroup")?;
            let clusters = raw_clusters
                .into_iter()
                .enumerate()
                .map(|(index, raw)| parse_cluster(raw, &vehicles, &group_id, index))
                .collect::<Result<Vec<_>, _>>()?;
            clusters_by_group.insert(group_id, clusters);
        }

        let mut employees_by_group = HashMap::with_capacity(groups.len());
        for (group_key, raw_employees) in self.employees_by_group {
            let group_id = known_group(&groups, group_key, "employeesByGroup")?;
            let mut seen = BTreeSet::new();
            let mut pool = Vec::with_capacity(raw_employees.len());
            for raw in raw_employees {
                if !seen.insert(raw.id.clone()) {
                    return Err(invalid(format!(
                        "duplicate employee id {} in group {}",
                        raw.id, group_id
                    )));
                }
                pool.push(parse_employee(raw));
            }
            employees_by_group.insert(group_id, pool);
        }

        for group in &groups {
            clusters_by_group.entry(group.id.clone()).or_default();
            employees_by_group.entry(group.id.clone()).or_default();
        }

        let mut plan =
            Plan::from_parts(groups, clusters_by_group, employees_by_group, vehicles, site_by_id);

        // an employee rides with its first holder only
        for (employee_id, cluster_ref) in plan.resolve_conflicts() {
            warn!(
                employee = %employee_id,
                group = %cluster_ref.group_id,
                cluster = cluster_ref.cluster_index,
                "preview shares employee with an earlier cluster; removed from this one"
            );
        }

        info!(
            groups = plan.groups().len(),
            clusters = plan.cluster_count(),
            vehicles = plan.vehicles().len(),
            "loaded clustering preview"
        );

        Ok(plan)
    }
}

impl Plan {
    /// Parses and validates a preview JSON document.
    pub fn from_json(json: &str) -> Result<Plan, PayloadError> {
        PreviewPayload::from_json(json)?.into_plan()
    }

    pub fn from_payload(payload: PreviewPayload) -> Result<Plan, PayloadError> {
        payload.into_plan()
    }
}

fn invalid(message: String) -> PayloadError {
    PayloadError::Invalid(message)
}

fn known_group(groups: &[Group], key: String, field: &str) -> Result<GroupId, PayloadError> {
    let group_id = GroupId(key);
    if groups.iter().any(|group| group.id == group_id) {
        Ok(group_id)
    } else {
        Err(invalid(format!("{} references unknown group {}", field, group_id)))
    }
}

fn parse_group(raw: RawGroup, sites: &HashMap<SiteId, Site>) -> Result<Group, PayloadError> {
    raw.recurrence
        .validate()
        .map_err(|reason| invalid(format!("group {}: {}", raw.id, reason)))?;

    let site_id = SiteId(raw.site_id);
    if !sites.contains_key(&site_id) {
        return Err(invalid(format!("group {} references unknown site {}", raw.id, site_id)));
    }

    Ok(Group {
        id: GroupId(raw.id),
        name: raw.name,
        recurrence: raw.recurrence,
        time_window: raw.time_window,
        site_id,
    })
}

fn parse_cluster(
    raw: RawCluster,
    vehicles: &[Vehicle],
    group_id: &GroupId,
    index: usize,
) -> Result<Cluster, PayloadError> {
    if !raw.lat.is_finite() || !raw.lng.is_finite() {
        return Err(invalid(format!(
            "cluster {} of group {} has a non-finite coordinate",
            index, group_id
        )));
    }
    if !raw.max_radius_meters.is_finite() || raw.max_radius_meters < 0.0 {
        return Err(invalid(format!(
            "cluster {} of group {} has an invalid max radius",
            index, group_id
        )));
    }

    let mut cluster = Cluster::new(raw.lat, raw.lng, raw.order)
        .with_max_radius(raw.max_radius_meters)
        .with_validity(raw.valid)
        .with_employees(raw.employee_ids);

    if let Some(vehicle_index) = raw.vehicle_index {
        let vehicle = vehicles.get(vehicle_index).ok_or_else(|| {
            invalid(format!(
                "cluster {} of group {} references vehicle index {} of {}",
                index,
                group_id,
                vehicle_index,
                vehicles.len()
            ))
        })?;
        cluster = cluster.with_vehicle(vehicle.id.as_str());
    }
    if raw.flexible_return {
        cluster = cluster.as_flexible_return();
    }

    Ok(cluster)
}

fn parse_employee(raw: RawEmployee) -> Employee {
    let location = match (raw.lat, raw.lng) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };

    Employee {
        id: EmployeeId(raw.id),
        first_name: raw.first_name,
        last_name: raw.last_name,
        matricule: raw.matricule,
        email: raw.email,
        location,
        city: raw.city,
        service: raw.service,
        department: raw.department,
        active: raw.active,
    }
}
