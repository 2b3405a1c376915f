//! Display formatting and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds newtype wrappers for collections, operation results and
//! the editing session, so the same data can be presented differently
//! depending on context.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers        │    │   Markdown      │
//! │ (WorkflowProcess│───▶│ (Summaries,     │───▶│    Output       │
//! │  Subprocess)    │    │  DraftView, ..) │    │  (Terminal)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: WorkflowSummaries, Departments, FieldTags
//! - [`results`]: CreateResult, UpdateResult, DeleteResult
//! - [`draft`]: DraftView of a [`crate::editor::WorkflowEditor`]
//! - [`status`]: OperationStatus
//! - [`datetime`]: LocalDateTime
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use stepwise_core::display::{OperationStatus, UpdateResult};
//! use stepwise_core::models::{OutputType, WorkflowProcess};
//!
//! let process = WorkflowProcess {
//!     id: 3,
//!     name: "Order approval".to_string(),
//!     description: "Approves incoming orders".to_string(),
//!     output_type: OutputType::Product,
//!     subprocesses: vec![],
//!     same_assigns: vec![],
//!     version: 2,
//!     created_at: None,
//!     updated_at: None,
//! };
//!
//! let output = format!("{}", UpdateResult::new(process));
//! assert!(output.contains("now version 2"));
//!
//! println!("{}", OperationStatus::success("Draft saved"));
//! ```

pub mod collections;
pub mod datetime;
pub mod draft;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Departments, FieldTags, WorkflowSummaries};
pub use datetime::LocalDateTime;
pub use draft::DraftView;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::{OperationStatus, StatusKind};
