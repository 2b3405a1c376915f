//! Data models for workflow processes and their steps.
//!
//! Three shapes of the same aggregate exist:
//!
//! 1. [`WorkflowProcess`]: what the backend returns. Steps
//!    ([`FetchedSubprocess`]) carry a nested `department` object.
//! 2. [`WorkflowPayload`]: what is sent on create/update. Steps
//!    ([`Subprocess`]) carry a flat `departmentId`.
//! 3. [`crate::editor::WorkflowEditor`]: the in-memory editing state, which
//!    tracks steps by a stable key instead of by number.
//!
//! All wire types serialize with camelCase field names. Display
//! implementations live in [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use stepwise_core::models::{FetchedSubprocess, Department, Subprocess};
//!
//! let fetched = FetchedSubprocess {
//!     name: "Quality check".to_string(),
//!     department: Some(Department { id: 4, name: "QA".to_string() }),
//!     step: 1,
//!     ..Default::default()
//! };
//! let flat = Subprocess::from(fetched);
//! assert_eq!(flat.department_id, Some(4));
//! ```

pub mod department;
pub mod filters;
pub mod output_type;
pub mod same_assign;
pub mod step;
pub mod summary;
pub mod workflow;


pub use department::{Department, DepartmentRef, FieldTag, Page};
pub use filters::WorkflowFilter;
pub use output_type::OutputType;
pub use same_assign::SameAssign;
pub use step::{FetchedSubprocess, Subprocess};
pub use summary::WorkflowSummary;
pub use workflow::{WorkflowPayload, WorkflowProcess};
