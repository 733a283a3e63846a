//! Faceted and free-text filtering of a group's employee pool.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::plan::Employee;

/// Categorical constraints. `None` or an empty string means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub city: Option<String>,
    pub service: Option<String>,
    pub department: Option<String>,
}

/// Filter inputs of one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_text: String,
    pub facets: Facets,
    pub active_only: bool,
}

impl FilterState {
    /// True when the filter lets every employee through.
    pub fn is_unconstrained(&self) -> bool {
        self.search_text.trim().is_empty()
            && constraint(&self.facets.city).is_none()
            && constraint(&self.facets.service).is_none()
            && constraint(&self.facets.department).is_none()
            && !self.active_only
    }
}

/// Distinct facet values present in a pool, sorted, for populating choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetValues {
    pub cities: Vec<String>,
    pub services: Vec<String>,
    pub departments: Vec<String>,
}

/// Employees of `pool` satisfying `state`, in pool order.
pub fn filter_candidates<'a>(pool: &'a [Employee], state: &FilterState) -> Vec<&'a Employee> {
    let needle = state.search_text.trim().to_lowercase();

    pool.iter()
        .filter(|employee| !state.active_only || employee.is_active())
        .filter(|employee| facet_matches(&state.facets.city, &employee.city))
        .filter(|employee| facet_matches(&state.facets.service, &employee.service))
        .filter(|employee| facet_matches(&state.facets.department, &employee.department))
        .filter(|employee| needle.is_empty() || text_matches(employee, &needle))
        .collect()
}

pub fn facet_values(pool: &[Employee]) -> FacetValues {
    fn distinct<'a>(values: impl Iterator<Item = &'a Option<String>>) -> Vec<String> {
        values
            .filter_map(|value| constraint(value))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    FacetValues {
        cities: distinct(pool.iter().map(|employee| &employee.city)),
        services: distinct(pool.iter().map(|employee| &employee.service)),
        departments: distinct(pool.iter().map(|employee| &employee.department)),
    }
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn facet_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match constraint(wanted) {
        Some(wanted) => actual.as_deref() == Some(wanted),
        None => true,
    }
}

/// Case-insensitive substring match on name, surname, matricule and email.
/// `needle` is already lowercased.
fn text_matches(employee: &Employee, needle: &str) -> bool {
    let fields = [
        Some(employee.first_name.as_str()),
        Some(employee.last_name.as_str()),
        employee.matricule.as_deref(),
        employee.email.as_deref(),
    ];

    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}
