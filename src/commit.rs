//! Employee-to-cluster assignment with plan-wide uniqueness.
//!
//! After every successful [`commit`] no employee id is held by more than one
//! cluster among those the edit touched: the chosen ids live only in the
//! target cluster.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::EditError;
use crate::plan::{ClusterRef, EmployeeId, GroupId, Plan};
use crate::traits::EditListener;

/// Replaces the target cluster's employees with `chosen` and retracts those
/// employees from every other cluster of the plan.
///
/// Returns the clusters whose employee set actually changed, in plan order
/// with the target last. Nothing is mutated when the target does not exist.
pub fn commit<I>(
    plan: &mut Plan,
    group_id: &GroupId,
    cluster_index: usize,
    chosen: I,
) -> Result<Vec<ClusterRef>, EditError>
where
    I: IntoIterator<Item = EmployeeId>,
{
    plan.cluster(group_id, cluster_index)?;

    let chosen: BTreeSet<EmployeeId> = chosen.into_iter().collect();
    let target = ClusterRef::new(group_id, cluster_index);
    let mut changed = Vec::new();

    for cluster_ref in plan.cluster_refs() {
        if cluster_ref == target {
            continue;
        }
        let cluster = plan.cluster_mut(&cluster_ref.group_id, cluster_ref.cluster_index)?;
        let before = cluster.employees().len();
        cluster.employees_mut().retain(|id| !chosen.contains(id));
        if cluster.employees().len() != before {
            changed.push(cluster_ref);
        }
    }

    let cluster = plan.cluster_mut(group_id, cluster_index)?;
    if *cluster.employees() != chosen {
        *cluster.employees_mut() = chosen;
        changed.push(target);
    }

    debug!(
        group = %group_id,
        cluster = cluster_index,
        changed = changed.len(),
        "committed employee assignment"
    );

    Ok(changed)
}

/// Sends `on_edit_employees` for each changed cluster, in the given order.
///
/// Every reference is resolved before the first callback, so a change list
/// from another plan fails with an [`EditError`] and notifies nobody. The
/// inner result is the listener's: the first listener error stops publication
/// and is returned unchanged. The plan has already been updated by then.
pub fn publish_employee_edits<L: EditListener>(
    plan: &Plan,
    changes: &[ClusterRef],
    listener: &mut L,
) -> Result<Result<(), L::Error>, EditError> {
    let mut batches = Vec::with_capacity(changes.len());
    for cluster_ref in changes {
        let employee_ids: Vec<EmployeeId> =
            plan.cluster_at(cluster_ref)?.employees().iter().cloned().collect();
        batches.push((cluster_ref, employee_ids));
    }

    for (cluster_ref, employee_ids) in batches {
        let index = cluster_ref.cluster_index;
        if let Err(err) = listener.on_edit_employees(&cluster_ref.group_id, index, &employee_ids) {
            return Ok(Err(err));
        }
    }
    Ok(Ok(()))
}
