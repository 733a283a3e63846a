//! Interactive editing of one cluster's employees.
//!
//! An [`EditingSession`] holds everything the operator has set up while
//! editing a stop: the filter inputs, the last spatial query, and the
//! working selection. Nothing reaches the plan until [`EditingSession::commit`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::commit;
use crate::error::EditError;
use crate::filter::{FilterState, filter_candidates};
use crate::plan::{ClusterRef, Employee, EmployeeId, Plan};
use crate::polygon::Polygon;
use crate::spatial::{SelectionMode, apply_mode, by_polygon};

/// Defaults applied when a session is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Radius offered for a radius query before the operator changes it.
    pub default_radius_meters: f64,
    /// K offered for a nearest-K query before the operator changes it.
    pub default_top_k: usize,
    /// Whether inactive employees are hidden initially.
    pub active_only: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_radius_meters: 500.0,
            default_top_k: 10,
            active_only: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditingSession {
    target: ClusterRef,
    pub filter: FilterState,
    defaults: SessionOptions,
    mode: SelectionMode,
    selected: BTreeSet<EmployeeId>,
}

impl EditingSession {
    /// Opens a session on an existing cluster, starting from its current employees.
    pub fn open(
        plan: &Plan,
        target: ClusterRef,
        options: &SessionOptions,
    ) -> Result<Self, EditError> {
        let selected = plan.cluster_at(&target)?.employees().clone();
        Ok(Self {
            target,
            filter: FilterState {
                active_only: options.active_only,
                ..FilterState::default()
            },
            defaults: options.clone(),
            mode: SelectionMode::None,
            selected,
        })
    }

    pub fn target(&self) -> &ClusterRef {
        &self.target
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected(&self) -> &BTreeSet<EmployeeId> {
        &self.selected
    }

    /// Radius of the remembered query, or the default offered for a new one.
    pub fn radius_meters(&self) -> f64 {
        match self.mode {
            SelectionMode::Radius { meters } => meters,
            _ => self.defaults.default_radius_meters,
        }
    }

    /// K of the remembered query, or the default offered for a new one.
    pub fn top_k(&self) -> usize {
        match self.mode {
            SelectionMode::TopK { k } => k,
            _ => self.defaults.default_top_k,
        }
    }

    /// The group's pool narrowed by the current filter, in pool order.
    pub fn candidates<'p>(&self, plan: &'p Plan) -> Result<Vec<&'p Employee>, EditError> {
        let pool = plan.employees(&self.target.group_id)?;
        Ok(filter_candidates(pool, &self.filter))
    }

    /// Selects every employee of the group within `meters` of the stop.
    pub fn select_by_radius(
        &mut self,
        plan: &Plan,
        meters: f64,
    ) -> Result<&BTreeSet<EmployeeId>, EditError> {
        self.run_on_pool(plan, SelectionMode::Radius { meters })
    }

    /// Selects the `k` employees of the group nearest the stop.
    pub fn select_top_k(
        &mut self,
        plan: &Plan,
        k: usize,
    ) -> Result<&BTreeSet<EmployeeId>, EditError> {
        self.run_on_pool(plan, SelectionMode::TopK { k })
    }

    /// Adds the current candidates inside `polygon` to the selection.
    ///
    /// The remembered mode is left as it was.
    pub fn select_by_polygon(
        &mut self,
        plan: &Plan,
        polygon: &Polygon,
    ) -> Result<&BTreeSet<EmployeeId>, EditError> {
        let candidates = self.candidates(plan)?;
        self.selected.extend(by_polygon(&candidates, polygon.vertices()));
        Ok(&self.selected)
    }

    /// Re-runs the remembered mode over the filtered candidates and makes the
    /// result the selection. With no mode, every candidate is selected.
    pub fn apply_filtered_selection(
        &mut self,
        plan: &Plan,
    ) -> Result<&BTreeSet<EmployeeId>, EditError> {
        let (lat, lng) = plan.cluster_at(&self.target)?.location();
        let candidates = self.candidates(plan)?;
        self.selected = apply_mode(&candidates, lat, lng, self.mode).into_iter().collect();
        debug!(
            cluster = ?self.target,
            mode = ?self.mode,
            selected = self.selected.len(),
            "applied filtered selection"
        );
        Ok(&self.selected)
    }

    /// Adds or removes one employee. Returns whether it is now selected.
    pub fn toggle(&mut self, employee_id: EmployeeId) -> bool {
        if self.selected.remove(&employee_id) {
            false
        } else {
            self.selected.insert(employee_id);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Writes the selection into the plan. See [`crate::commit::commit`].
    pub fn commit(&self, plan: &mut Plan) -> Result<Vec<ClusterRef>, EditError> {
        commit(
            plan,
            &self.target.group_id,
            self.target.cluster_index,
            self.selected.iter().cloned(),
        )
    }

    fn run_on_pool(
        &mut self,
        plan: &Plan,
        mode: SelectionMode,
    ) -> Result<&BTreeSet<EmployeeId>, EditError> {
        let (lat, lng) = plan.cluster_at(&self.target)?.location();
        let pool = plan.employees(&self.target.group_id)?;
        self.selected = apply_mode(pool, lat, lng, mode).into_iter().collect();
        self.mode = mode;
        debug!(
            cluster = ?self.target,
            mode = ?mode,
            selected = self.selected.len(),
            "spatial selection"
        );
        Ok(&self.selected)
    }
}
