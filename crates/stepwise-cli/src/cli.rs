//! Command-line argument definitions using clap.
//!
//! Each command has a clap wrapper that converts into the interface-agnostic
//! parameter type of `stepwise_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → WorkflowEditor / WorkflowClient
//! ```
//!
//! Help text, aliases and value parsing stay here; the core types carry no
//! clap derives. Commands that edit a draft take `--draft`, the JSON file
//! holding the serialized editor between invocations.

use std::{collections::BTreeSet, path::PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use stepwise_core::{params::*, OutputType};

/// Default draft file, relative to the working directory
pub const DEFAULT_DRAFT: &str = "stepwise-draft.json";

/// Location of the draft file shared by the editing commands
#[derive(Args)]
pub struct DraftArgs {
    /// Draft file holding the workflow being edited
    #[arg(long, env = "STEPWISE_DRAFT", default_value = DEFAULT_DRAFT)]
    pub draft: PathBuf,
}

/// Output type of a workflow process as accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputTypeArg {
    /// A finished product
    Product,
    /// An accessory
    Accessory,
    /// A material (sent as INGREDIENT)
    Material,
}

impl From<OutputTypeArg> for OutputType {
    fn from(val: OutputTypeArg) -> Self {
        match val {
            OutputTypeArg::Product => OutputType::Product,
            OutputTypeArg::Accessory => OutputType::Accessory,
            OutputTypeArg::Material => OutputType::Material,
        }
    }
}

// ============================================================================
// Workflow commands
// ============================================================================

/// Start a new draft
#[derive(Args)]
pub struct NewWorkflowArgs {
    /// Name of the workflow process
    pub name: String,
    #[arg(short, long, help = "What the workflow process is for")]
    pub description: String,
    #[arg(short, long, value_enum, help = "What the workflow produces")]
    pub output_type: OutputTypeArg,
    #[command(flatten)]
    pub draft: DraftArgs,
    /// Replace an existing draft file
    #[arg(long)]
    pub force: bool,
}

impl From<&NewWorkflowArgs> for CreateWorkflow {
    fn from(val: &NewWorkflowArgs) -> Self {
        CreateWorkflow {
            name: val.name.clone(),
            description: val.description.clone(),
            output_type: val.output_type.into(),
        }
    }
}

/// Load a stored workflow process into a draft
#[derive(Args)]
pub struct PullWorkflowArgs {
    #[arg(help = "Unique identifier of the workflow process to edit")]
    pub id: u64,
    #[command(flatten)]
    pub draft: DraftArgs,
    /// Replace an existing draft file
    #[arg(long)]
    pub force: bool,
}

impl From<&PullWorkflowArgs> for Id {
    fn from(val: &PullWorkflowArgs) -> Self {
        Id { id: val.id }
    }
}

/// List stored workflow processes
#[derive(Args)]
pub struct ListWorkflowsArgs {
    #[arg(short, long, value_enum, help = "Only workflows with this output type")]
    pub output_type: Option<OutputTypeArg>,
    #[arg(long, help = "Only workflows whose name contains this text")]
    pub name: Option<String>,
    #[arg(long, help = "Maximum number of workflows to fetch")]
    pub limit: Option<u32>,
}

impl From<ListWorkflowsArgs> for ListWorkflows {
    fn from(val: ListWorkflowsArgs) -> Self {
        ListWorkflows {
            output_type: val
                .output_type
                .map(|t| OutputType::from(t).label().to_string()),
            name: val.name,
            limit: val.limit,
        }
    }
}

/// Show a stored workflow process
#[derive(Args)]
pub struct ShowWorkflowArgs {
    #[arg(help = "Unique identifier of the workflow process to show")]
    pub id: u64,
}

impl From<ShowWorkflowArgs> for Id {
    fn from(val: ShowWorkflowArgs) -> Self {
        Id { id: val.id }
    }
}

/// Delete a stored workflow process permanently
#[derive(Args)]
pub struct DeleteWorkflowArgs {
    #[arg(help = "Unique identifier of the workflow process to delete")]
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeleteWorkflowArgs> for DeleteWorkflow {
    fn from(val: DeleteWorkflowArgs) -> Self {
        DeleteWorkflow {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// Start a new draft
    #[command(alias = "n")]
    New(NewWorkflowArgs),
    /// Load a stored workflow process into a draft
    #[command(alias = "p")]
    Pull(PullWorkflowArgs),
    /// Show the draft being edited
    #[command(name = "show-draft", alias = "sd")]
    ShowDraft(DraftArgs),
    /// Validate the draft and send it to the backend
    Submit(DraftArgs),
    /// List stored workflow processes
    #[command(aliases = ["l", "ls"])]
    List(ListWorkflowsArgs),
    /// Show a stored workflow process
    #[command(alias = "s")]
    Show(ShowWorkflowArgs),
    /// Delete a stored workflow process permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteWorkflowArgs),
}

// ============================================================================
// Step commands
// ============================================================================

/// Append a step to the draft
#[derive(Args)]
pub struct AddStepArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    /// Name of the step
    pub name: String,
    #[arg(short, long, help = "What happens in this step")]
    pub description: String,
    #[arg(long, help = "Estimated number of days the step takes")]
    pub days: u32,
    #[arg(long, help = "Days before the deadline the person in charge is notified")]
    pub notice: u32,
    #[arg(short, long, help = "Role of the person in charge")]
    pub role: String,
    #[arg(long, help = "ID of the department owning the step")]
    pub department: Option<u64>,
    #[arg(long, help = "The step cannot be skipped")]
    pub required: bool,
    #[arg(long, help = "The step incurs a cost")]
    pub with_cost: bool,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Field tags checked in this step as comma-separated list"
    )]
    pub check_fields: Option<Vec<String>>,
    #[arg(long, help = "Show the material request in this step")]
    pub show_material: bool,
}

impl From<AddStepArgs> for StepInput {
    fn from(val: AddStepArgs) -> Self {
        StepInput {
            name: val.name,
            description: val.description,
            estimated_number_of_days: val.days,
            number_of_days_before_deadline: val.notice,
            role_of_the_person_in_charge: val.role,
            department_id: val.department,
            is_required: val.required,
            is_step_with_cost: val.with_cost,
            check_fields: val.check_fields.map(|tags| tags.into_iter().collect()),
            is_show_request_material: val.show_material.then_some(true),
        }
    }
}

/// Change fields of a step in the draft
///
/// Only the given fields change. Moving a step to another department takes
/// it out of its old same-assignment group.
#[derive(Args)]
pub struct EditStepArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    #[arg(help = "0-based index of the step (step number minus one)")]
    pub index: usize,
    #[arg(short, long, help = "Updated name")]
    pub name: Option<String>,
    #[arg(short, long, help = "Updated description")]
    pub description: Option<String>,
    #[arg(long, help = "Updated estimated number of days")]
    pub days: Option<u32>,
    #[arg(long, help = "Updated notice days before the deadline")]
    pub notice: Option<u32>,
    #[arg(short, long, help = "Updated role of the person in charge")]
    pub role: Option<String>,
    #[arg(long, conflicts_with = "no_department", help = "ID of the new department")]
    pub department: Option<u64>,
    #[arg(long, help = "Leave the step without a department")]
    pub no_department: bool,
    #[arg(long, help = "Whether the step is required (true/false)")]
    pub required: Option<bool>,
    #[arg(long, help = "Whether the step incurs a cost (true/false)")]
    pub with_cost: Option<bool>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Replacement field tags as comma-separated list"
    )]
    pub check_fields: Option<Vec<String>>,
    #[arg(long, help = "Whether to show the material request (true/false)")]
    pub show_material: Option<bool>,
}

impl From<EditStepArgs> for UpdateStep {
    fn from(val: EditStepArgs) -> Self {
        UpdateStep {
            index: val.index,
            name: val.name,
            description: val.description,
            estimated_number_of_days: val.days,
            number_of_days_before_deadline: val.notice,
            role_of_the_person_in_charge: val.role,
            department_id: val.department,
            clear_department: val.no_department,
            is_required: val.required,
            is_step_with_cost: val.with_cost,
            check_fields: val
                .check_fields
                .map(|tags| tags.into_iter().collect::<BTreeSet<_>>()),
            is_show_request_material: val.show_material,
        }
    }
}

/// Remove a step from the draft
#[derive(Args)]
pub struct RemoveStepArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    #[arg(help = "0-based index of the step to remove")]
    pub index: usize,
}

impl From<&RemoveStepArgs> for RemoveStep {
    fn from(val: &RemoveStepArgs) -> Self {
        RemoveStep { index: val.index }
    }
}

/// Move a step to another position in the draft
#[derive(Args)]
pub struct MoveStepArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    #[arg(help = "0-based index of the step to move")]
    pub from: usize,
    #[arg(help = "0-based index the step ends up at")]
    pub to: usize,
}

impl From<&MoveStepArgs> for MoveStep {
    fn from(val: &MoveStepArgs) -> Self {
        MoveStep {
            from: val.from,
            to: val.to,
        }
    }
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Append a step to the draft
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// Change fields of a step in the draft
    #[command(alias = "e")]
    Edit(EditStepArgs),
    /// Remove a step from the draft
    #[command(aliases = ["r", "rm"])]
    Remove(RemoveStepArgs),
    /// Move a step to another position in the draft
    #[command(alias = "mv")]
    Move(MoveStepArgs),
}

// ============================================================================
// Group commands
// ============================================================================

/// Save the same-assignment group of a department
///
/// The given steps are handled by the same person. They must all be steps
/// of that department; an existing group for it is replaced.
#[derive(Args)]
pub struct SetGroupArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    #[arg(help = "ID of the department")]
    pub department: u64,
    #[arg(required = true, num_args = 1.., help = "Current step numbers (1-based)")]
    pub steps: Vec<u32>,
}

impl From<&SetGroupArgs> for AssignSame {
    fn from(val: &SetGroupArgs) -> Self {
        AssignSame {
            department_id: val.department,
            steps: val.steps.iter().copied().collect(),
        }
    }
}

/// Delete the same-assignment group of a department
#[derive(Args)]
pub struct RemoveGroupArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    #[arg(help = "ID of the department")]
    pub department: u64,
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Save the same-assignment group of a department
    #[command(alias = "s")]
    Set(SetGroupArgs),
    /// Delete the same-assignment group of a department
    #[command(aliases = ["r", "rm"])]
    Remove(RemoveGroupArgs),
    /// Departments with more than one step in the draft
    #[command(alias = "c")]
    Candidates(DraftArgs),
}

// ============================================================================
// Reference data commands
// ============================================================================

/// List departments
#[derive(Args)]
pub struct ListDepartmentsArgs {
    #[arg(long, help = "Maximum number of departments to fetch")]
    pub limit: Option<u32>,
}

impl From<ListDepartmentsArgs> for ListDepartments {
    fn from(val: ListDepartmentsArgs) -> Self {
        ListDepartments { limit: val.limit }
    }
}

/// Add a department
#[derive(Args)]
pub struct AddDepartmentArgs {
    /// Name of the department
    pub name: String,
}

impl From<AddDepartmentArgs> for CreateDepartment {
    fn from(val: AddDepartmentArgs) -> Self {
        CreateDepartment { name: val.name }
    }
}

#[derive(Subcommand)]
pub enum DepartmentCommands {
    /// List departments
    #[command(aliases = ["l", "ls"])]
    List(ListDepartmentsArgs),
    /// Add a department
    #[command(alias = "a")]
    Add(AddDepartmentArgs),
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// List the field tags a step can check
    #[command(aliases = ["l", "ls"])]
    List,
}
