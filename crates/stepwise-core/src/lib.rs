//! Core library for Stepwise, a workflow process definition toolkit.
//!
//! A workflow process is an ordered list of approval steps ("subprocesses"),
//! each optionally owned by a department, plus same-assignment groups that
//! say which steps of one department go to the same person. This crate
//! holds the editing model, validation, persistence and display for them.
//!
//! # Layers
//!
//! - [`editor`]: in-memory editing with stable step identities, contiguous
//!   renumbering and identity-based same-assignment groups
//! - [`validation`]: field-addressable errors and warnings for payloads
//! - [`client`]: async access to a backend, either the local SQLite store
//!   ([`db`]) or a REST API
//! - [`models`]: wire and domain types; [`display`]: markdown formatting
//!
//! # Quick Start
//!
//! ```rust
//! use stepwise_core::{
//!     params::{AssignSame, RemoveStep, StepInput},
//!     OutputType, WorkflowEditor,
//! };
//!
//! let mut editor = WorkflowEditor::new("Order approval", "Approves orders", OutputType::Product);
//! for name in ["Receive", "Check", "Quote"] {
//!     editor.add_step(StepInput {
//!         name: name.to_string(),
//!         description: format!("{name} the order"),
//!         estimated_number_of_days: 2,
//!         number_of_days_before_deadline: 1,
//!         role_of_the_person_in_charge: "Clerk".to_string(),
//!         department_id: Some(1),
//!         ..Default::default()
//!     })?;
//! }
//! editor.assign_same(&AssignSame { department_id: 1, steps: [1, 3].into_iter().collect() })?;
//!
//! // The group follows its steps, not their positions
//! editor.remove_step(&RemoveStep { index: 0 })?;
//! let payload = editor.to_payload()?;
//! assert_eq!(payload.same_assigns[0].steps.iter().copied().collect::<Vec<_>>(), vec![2]);
//! # Ok::<(), stepwise_core::WorkflowError>(())
//! ```

pub mod client;
pub mod db;
pub mod display;
pub mod editor;
pub mod error;
pub mod models;
pub mod params;
pub mod validation;

// Re-export commonly used types
pub use client::{ClientBuilder, Submission, WorkflowClient};
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, Departments, DraftView, FieldTags, OperationStatus, UpdateResult,
    WorkflowSummaries,
};
pub use editor::{StepKey, WorkflowEditor};
pub use error::{Result, WorkflowError};
pub use models::{
    Department, FetchedSubprocess, OutputType, SameAssign, Subprocess, WorkflowPayload,
    WorkflowProcess, WorkflowSummary,
};
pub use validation::{FieldError, ValidationErrors, ValidationReport, Warning};
