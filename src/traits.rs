//! Seams between the curation engine and its collaborators.
//!
//! The engine itself is synchronous and in-memory. Anything that performs I/O
//! (fetching a preview, persisting an edit, re-rendering a map) sits behind
//! one of these traits and is called after the in-memory edit has completed.

use std::hash::Hash;

use crate::error::PayloadError;
use crate::payload::PreviewPayload;
use crate::plan::{EmployeeId, GroupId};

/// Unique identifier for selectable entities.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// Something that can be picked by a spatial selection.
pub trait Candidate {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Location (lat, lng). `None` when the position is unknown.
    fn location(&self) -> Option<(f64, f64)>;
}

impl<T: Candidate + ?Sized> Candidate for &T {
    type Id = T::Id;

    fn id(&self) -> &Self::Id {
        (**self).id()
    }

    fn location(&self) -> Option<(f64, f64)> {
        (**self).location()
    }
}

/// Receives committed edits, one call per changed cluster.
///
/// Errors are surfaced to the caller unmodified.
pub trait EditListener {
    type Error;

    fn on_move_marker(
        &mut self,
        group_id: &GroupId,
        cluster_index: usize,
        lat: f64,
        lng: f64,
    ) -> Result<(), Self::Error>;

    fn on_set_order(
        &mut self,
        group_id: &GroupId,
        cluster_index: usize,
        new_order: i32,
    ) -> Result<(), Self::Error>;

    fn on_edit_employees(
        &mut self,
        group_id: &GroupId,
        cluster_index: usize,
        employee_ids: &[EmployeeId],
    ) -> Result<(), Self::Error>;
}

/// Provides the raw result of an upstream clustering run.
pub trait PreviewSource {
    fn load_preview(&self) -> Result<PreviewPayload, PayloadError>;
}
