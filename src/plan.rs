//! In-memory plan model for one clustering preview.
//!
//! A [`Plan`] is built once from a validated [`crate::payload::PreviewPayload`]
//! and afterwards only changes through the edit operations in
//! [`crate::commit`] and [`crate::ordering`]. Cluster count is fixed for the
//! life of the plan.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::traits::Candidate;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Transport group identifier.
    GroupId
);
string_id!(
    /// Employee identifier.
    EmployeeId
);
string_id!(
    /// Stable vehicle identifier.
    VehicleId
);
string_id!(
    /// Destination site identifier.
    SiteId
);

/// Address of one cluster: its group and its position in that group's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterRef {
    pub group_id: GroupId,
    pub cluster_index: usize,
}

impl ClusterRef {
    pub fn new(group_id: impl Into<GroupId>, cluster_index: usize) -> Self {
        Self {
            group_id: group_id.into(),
            cluster_index,
        }
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&GroupId> for GroupId {
    fn from(value: &GroupId) -> Self {
        value.clone()
    }
}

/// How often a group's transport runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Recurrence {
    Single { date: NaiveDate },
    /// ISO weekday numbers, Monday = 1 .. Sunday = 7.
    Weekly { weekdays: BTreeSet<u8> },
    /// Day-of-month numbers, 1 ..= 31.
    Monthly { days: BTreeSet<u8> },
}

impl Recurrence {
    /// Checks that the descriptor's contents match its kind.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Recurrence::Single { .. } => Ok(()),
            Recurrence::Weekly { weekdays } => {
                if weekdays.is_empty() {
                    return Err("weekly recurrence needs at least one weekday".to_string());
                }
                match weekdays.iter().find(|day| !(1..=7).contains(*day)) {
                    Some(day) => Err(format!("weekday {} outside 1..=7", day)),
                    None => Ok(()),
                }
            }
            Recurrence::Monthly { days } => {
                if days.is_empty() {
                    return Err("monthly recurrence needs at least one day".to_string());
                }
                match days.iter().find(|day| !(1..=31).contains(*day)) {
                    Some(day) => Err(format!("day of month {} outside 1..=31", day)),
                    None => Ok(()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub recurrence: Recurrence,
    pub time_window: TimeWindow,
    pub site_id: SiteId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate: String,
    pub capacity: u32,
}

/// An employee eligible for pickup. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub matricule: Option<String>,
    pub email: Option<String>,
    pub location: Option<(f64, f64)>,
    pub city: Option<String>,
    pub service: Option<String>,
    pub department: Option<String>,
    /// `None` means the source did not say; treated as active.
    pub active: Option<bool>,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: EmployeeId(id.into()),
            first_name: first_name.into(),
            last_name: last_name.into(),
            matricule: None,
            email: None,
            location: None,
            city: None,
            service: None,
            department: None,
            active: None,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some((lat, lng));
        self
    }

    pub fn matricule(mut self, matricule: impl Into<String>) -> Self {
        self.matricule = Some(matricule.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

impl Candidate for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> Option<(f64, f64)> {
        self.location
    }
}

/// A pickup stop within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    lat: f64,
    lng: f64,
    order: i32,
    max_radius_meters: f64,
    valid: bool,
    vehicle: Option<VehicleId>,
    employees: BTreeSet<EmployeeId>,
    flexible_return: bool,
}

impl Cluster {
    pub fn new(lat: f64, lng: f64, order: i32) -> Self {
        Self {
            lat,
            lng,
            order,
            max_radius_meters: 0.0,
            valid: true,
            vehicle: None,
            employees: BTreeSet::new(),
            flexible_return: false,
        }
    }

    pub fn with_max_radius(mut self, meters: f64) -> Self {
        self.max_radius_meters = meters;
        self
    }

    pub fn with_validity(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn with_vehicle(mut self, vehicle: impl Into<String>) -> Self {
        self.vehicle = Some(VehicleId(vehicle.into()));
        self
    }

    pub fn with_employees<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.employees = ids.into_iter().map(|id| EmployeeId(id.into())).collect();
        self
    }

    pub fn as_flexible_return(mut self) -> Self {
        self.flexible_return = true;
        self
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn max_radius_meters(&self) -> f64 {
        self.max_radius_meters
    }

    /// Upstream validity verdict; opaque to the engine.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn vehicle(&self) -> Option<&VehicleId> {
        self.vehicle.as_ref()
    }

    pub fn employees(&self) -> &BTreeSet<EmployeeId> {
        &self.employees
    }

    pub fn is_flexible_return(&self) -> bool {
        self.flexible_return
    }

    pub(crate) fn set_location(&mut self, lat: f64, lng: f64) {
        self.lat = lat;
        self.lng = lng;
    }

    pub(crate) fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    pub(crate) fn employees_mut(&mut self) -> &mut BTreeSet<EmployeeId> {
        &mut self.employees
    }
}

/// The root aggregate for one planning preview.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    groups: Vec<Group>,
    clusters_by_group: HashMap<GroupId, Vec<Cluster>>,
    employees_by_group: HashMap<GroupId, Vec<Employee>>,
    vehicles: Vec<Vehicle>,
    site_by_id: HashMap<SiteId, Site>,
}

impl Plan {
    /// Assembles a plan from already-validated parts.
    ///
    /// Callers outside the crate go through [`crate::payload`], which checks
    /// the cross references before calling this.
    pub(crate) fn from_parts(
        groups: Vec<Group>,
        clusters_by_group: HashMap<GroupId, Vec<Cluster>>,
        employees_by_group: HashMap<GroupId, Vec<Employee>>,
        vehicles: Vec<Vehicle>,
        site_by_id: HashMap<SiteId, Site>,
    ) -> Self {
        Self {
            groups,
            clusters_by_group,
            employees_by_group,
            vehicles,
            site_by_id,
        }
    }

    /// Groups in display order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, group_id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| &group.id == group_id)
    }

    /// Clusters of a group in stored sequence order.
    pub fn clusters(&self, group_id: &GroupId) -> Result<&[Cluster], EditError> {
        self.clusters_by_group
            .get(group_id)
            .map(Vec::as_slice)
            .ok_or_else(|| EditError::GroupNotFound(group_id.clone()))
    }

    pub fn cluster(&self, group_id: &GroupId, cluster_index: usize) -> Result<&Cluster, EditError> {
        self.clusters(group_id)?
            .get(cluster_index)
            .ok_or_else(|| EditError::NotFound {
                group_id: group_id.clone(),
                cluster_index,
            })
    }

    pub(crate) fn cluster_mut(
        &mut self,
        group_id: &GroupId,
        cluster_index: usize,
    ) -> Result<&mut Cluster, EditError> {
        let clusters = self
            .clusters_by_group
            .get_mut(group_id)
            .ok_or_else(|| EditError::GroupNotFound(group_id.clone()))?;
        clusters.get_mut(cluster_index).ok_or_else(|| EditError::NotFound {
            group_id: group_id.clone(),
            cluster_index,
        })
    }

    pub fn cluster_at(&self, cluster_ref: &ClusterRef) -> Result<&Cluster, EditError> {
        self.cluster(&cluster_ref.group_id, cluster_ref.cluster_index)
    }

    /// Employee pool eligible for a group.
    pub fn employees(&self, group_id: &GroupId) -> Result<&[Employee], EditError> {
        self.employees_by_group
            .get(group_id)
            .map(Vec::as_slice)
            .ok_or_else(|| EditError::GroupNotFound(group_id.clone()))
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle_id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| &vehicle.id == vehicle_id)
    }

    /// Position of a vehicle in the upstream vehicle list.
    ///
    /// Only for talking to collaborators that still address vehicles by index.
    pub fn vehicle_index(&self, vehicle_id: &VehicleId) -> Option<usize> {
        self.vehicles.iter().position(|vehicle| &vehicle.id == vehicle_id)
    }

    pub fn site(&self, site_id: &SiteId) -> Option<&Site> {
        self.site_by_id.get(site_id)
    }

    /// Destination site of a group.
    pub fn site_for(&self, group_id: &GroupId) -> Option<&Site> {
        self.group(group_id).and_then(|group| self.site(&group.site_id))
    }

    /// Every cluster address, groups in display order then by index.
    pub fn cluster_refs(&self) -> Vec<ClusterRef> {
        self.groups
            .iter()
            .flat_map(|group| {
                let count = self
                    .clusters_by_group
                    .get(&group.id)
                    .map(Vec::len)
                    .unwrap_or(0);
                (0..count).map(move |index| ClusterRef::new(&group.id, index))
            })
            .collect()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters_by_group.values().map(Vec::len).sum()
    }

    /// First cluster (in [`Plan::cluster_refs`] order) holding the employee.
    pub fn cluster_of(&self, employee_id: &EmployeeId) -> Option<ClusterRef> {
        self.cluster_refs().into_iter().find(|cluster_ref| {
            self.cluster_at(cluster_ref)
                .map(|cluster| cluster.employees().contains(employee_id))
                .unwrap_or(false)
        })
    }

    /// Employees currently held by more than one cluster.
    ///
    /// Empty whenever the uniqueness invariant holds.
    pub fn conflicts(&self) -> BTreeMap<EmployeeId, Vec<ClusterRef>> {
        let mut holders: BTreeMap<EmployeeId, Vec<ClusterRef>> = BTreeMap::new();
        for cluster_ref in self.cluster_refs() {
            if let Ok(cluster) = self.cluster_at(&cluster_ref) {
                for employee_id in cluster.employees() {
                    holders
                        .entry(employee_id.clone())
                        .or_default()
                        .push(cluster_ref.clone());
                }
            }
        }
        holders.retain(|_, refs| refs.len() > 1);
        holders
    }

    /// Leaves every shared employee with its first holder (in
    /// [`Plan::cluster_refs`] order) and removes it from the others.
    ///
    /// Returns each removed assignment.
    pub fn resolve_conflicts(&mut self) -> Vec<(EmployeeId, ClusterRef)> {
        let mut retracted = Vec::new();
        for (employee_id, holders) in self.conflicts() {
            for cluster_ref in holders.into_iter().skip(1) {
                let group_id = &cluster_ref.group_id;
                if let Ok(cluster) = self.cluster_mut(group_id, cluster_ref.cluster_index) {
                    cluster.employees_mut().remove(&employee_id);
                    retracted.push((employee_id.clone(), cluster_ref));
                }
            }
        }
        retracted
    }

    /// Employees of the group's pool not held by any of the group's clusters.
    pub fn unassigned_employees(&self, group_id: &GroupId) -> Result<Vec<&Employee>, EditError> {
        let clusters = self.clusters(group_id)?;
        let pool = self.employees(group_id)?;
        Ok(pool
            .iter()
            .filter(|employee| {
                !clusters
                    .iter()
                    .any(|cluster| cluster.employees().contains(&employee.id))
            })
            .collect())
    }
}
