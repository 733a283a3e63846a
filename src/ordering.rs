//! Visit-order and position edits on single clusters.
//!
//! Visit order is a free sortable value, not a dense rank: setting one
//! cluster's order never renumbers its siblings.

use tracing::debug;

use crate::error::EditError;
use crate::plan::{Cluster, GroupId, Plan};
use crate::traits::EditListener;

pub fn set_order(
    plan: &mut Plan,
    group_id: &GroupId,
    cluster_index: usize,
    new_order: i32,
) -> Result<(), EditError> {
    let cluster = plan.cluster_mut(group_id, cluster_index)?;
    cluster.set_order(new_order);
    debug!(group = %group_id, cluster = cluster_index, order = new_order, "set visit order");
    Ok(())
}

/// Moves a cluster's marker. Rejects coordinates that are not finite or lie
/// outside the valid latitude/longitude range.
pub fn set_coordinate(
    plan: &mut Plan,
    group_id: &GroupId,
    cluster_index: usize,
    lat: f64,
    lng: f64,
) -> Result<(), EditError> {
    plan.cluster(group_id, cluster_index)?;
    if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
        return Err(EditError::InvalidArgument(format!(
            "coordinate ({}, {}) is not a valid position",
            lat, lng
        )));
    }

    let cluster = plan.cluster_mut(group_id, cluster_index)?;
    cluster.set_location(lat, lng);
    debug!(group = %group_id, cluster = cluster_index, lat, lng, "moved cluster");
    Ok(())
}

/// [`set_order`], then `on_set_order`.
///
/// The outer result is the edit; the inner one is the listener's, passed
/// through untouched.
pub fn set_order_and_notify<L: EditListener>(
    plan: &mut Plan,
    group_id: &GroupId,
    cluster_index: usize,
    new_order: i32,
    listener: &mut L,
) -> Result<Result<(), L::Error>, EditError> {
    set_order(plan, group_id, cluster_index, new_order)?;
    Ok(listener.on_set_order(group_id, cluster_index, new_order))
}

/// [`set_coordinate`], then `on_move_marker`.
pub fn set_coordinate_and_notify<L: EditListener>(
    plan: &mut Plan,
    group_id: &GroupId,
    cluster_index: usize,
    lat: f64,
    lng: f64,
    listener: &mut L,
) -> Result<Result<(), L::Error>, EditError> {
    set_coordinate(plan, group_id, cluster_index, lat, lng)?;
    Ok(listener.on_move_marker(group_id, cluster_index, lat, lng))
}

/// A group's clusters with their indices, sorted by visit order.
///
/// Equal orders keep index order.
pub fn ordered_clusters<'a>(
    plan: &'a Plan,
    group_id: &GroupId,
) -> Result<Vec<(usize, &'a Cluster)>, EditError> {
    let mut clusters: Vec<(usize, &Cluster)> =
        plan.clusters(group_id)?.iter().enumerate().collect();
    clusters.sort_by_key(|(_, cluster)| cluster.order());
    Ok(clusters)
}

/// [`ordered_clusters`] without flexible-return stops: the forward route.
pub fn forward_clusters<'a>(
    plan: &'a Plan,
    group_id: &GroupId,
) -> Result<Vec<(usize, &'a Cluster)>, EditError> {
    let mut clusters = ordered_clusters(plan, group_id)?;
    clusters.retain(|(_, cluster)| !cluster.is_flexible_return());
    Ok(clusters)
}
