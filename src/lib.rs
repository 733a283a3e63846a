//! cluster-curator
//!
//! In-memory curation of a route-clustering preview: spatial and faceted
//! candidate search around a stop, and edits that keep every employee in at
//! most one stop across the whole plan.

pub mod traits;
pub mod error;
pub mod plan;
pub mod payload;
pub mod haversine;
pub mod polygon;
pub mod filter;
pub mod spatial;
pub mod commit;
pub mod ordering;
pub mod session;
pub mod stats;
pub mod preview;

pub use error::{EditError, PayloadError};
pub use plan::{Cluster, ClusterRef, Employee, EmployeeId, Group, GroupId, Plan, VehicleId};
