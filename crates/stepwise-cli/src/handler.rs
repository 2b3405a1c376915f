//! Command handlers: load the draft, run the core operation, save the draft
//! and render the outcome.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use stepwise_core::{
    display::{CreateResult, DeleteResult, Departments, DraftView, OperationStatus, UpdateResult},
    params::{CreateWorkflow, Id, ListDepartments, ListWorkflows, UpdateStep},
    Submission, WorkflowClient, WorkflowEditor, WorkflowError,
};

use crate::{
    cli::{DepartmentCommands, GroupCommands, StepCommands, TagCommands, WorkflowCommands},
    renderer::TerminalRenderer,
};

/// Reads a draft file written by [`save_draft`].
pub fn load_draft(path: &Path) -> Result<WorkflowEditor> {
    let json = fs::read_to_string(path)
        .map_err(|source| WorkflowError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
        .with_context(|| {
            format!(
                "Failed to read draft {}; start one with 'workflow new' or 'workflow pull'",
                path.display()
            )
        })?;
    WorkflowEditor::from_json(&json)
        .with_context(|| format!("Failed to parse draft {}", path.display()))
}

/// Writes the editor to a draft file, keys included.
pub fn save_draft(path: &Path, editor: &WorkflowEditor) -> Result<()> {
    let json = editor.to_json().context("Failed to serialize draft")?;
    fs::write(path, json)
        .map_err(|source| WorkflowError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
        .with_context(|| format!("Failed to write draft {}", path.display()))?;
    debug!("Saved draft with {} steps to {}", editor.len(), path.display());
    Ok(())
}

fn ensure_replaceable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Draft {} already exists; submit it first or pass --force to replace it",
            path.display()
        );
    }
    Ok(())
}

/// Runs one command against a client and renders the result.
pub struct CommandHandler {
    client: WorkflowClient,
    renderer: TerminalRenderer,
}

impl CommandHandler {
    pub fn new(client: WorkflowClient, renderer: TerminalRenderer) -> Self {
        Self { client, renderer }
    }

    pub async fn handle_workflow_command(&self, command: WorkflowCommands) -> Result<()> {
        match command {
            WorkflowCommands::New(args) => {
                let path = &args.draft.draft;
                ensure_replaceable(path, args.force)?;
                let editor = WorkflowEditor::from(CreateWorkflow::from(&args));
                save_draft(path, &editor)?;
                self.render_status(&OperationStatus::success(format!(
                    "Started draft '{}' in {}",
                    editor.name(),
                    path.display()
                )))
            }
            WorkflowCommands::Pull(args) => {
                let path = &args.draft.draft;
                ensure_replaceable(path, args.force)?;
                let editor = self
                    .client
                    .open_editor(&Id::from(&args))
                    .await
                    .context("Failed to load workflow process")?;
                save_draft(path, &editor)?;
                self.render_status(&OperationStatus::success(format!(
                    "Pulled workflow process {} (version {}) into {}",
                    args.id,
                    editor.version().unwrap_or_default(),
                    path.display()
                )))?;
                self.show_draft(&editor).await
            }
            WorkflowCommands::ShowDraft(args) => {
                let editor = load_draft(&args.draft)?;
                self.show_draft(&editor).await
            }
            WorkflowCommands::Submit(args) => self.submit(&args.draft).await,
            WorkflowCommands::List(args) => self.list_workflows(&args.into()).await,
            WorkflowCommands::Show(args) => {
                let params = Id::from(args);
                let process = self
                    .client
                    .get_workflow(&params)
                    .await
                    .context("Failed to get workflow process")?
                    .ok_or(WorkflowError::WorkflowNotFound { id: params.id })?;
                self.renderer.render(&process.to_string())
            }
            WorkflowCommands::Delete(args) => {
                let deleted = self
                    .client
                    .delete_workflow(&args.into())
                    .await
                    .context("Failed to delete workflow process")?;
                self.renderer.render(&DeleteResult::new(deleted).to_string())
            }
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Add(args) => {
                let path = args.draft.draft.clone();
                let mut editor = load_draft(&path)?;
                let name = args.name.clone();
                let key = editor.add_step(args.into()).context("Failed to add step")?;
                save_draft(&path, &editor)?;
                let number = editor.number_of(key).unwrap_or_default();
                self.render_status(&OperationStatus::success(format!(
                    "Added step {number} ({name})"
                )))?;
                self.render_warnings(&editor)
            }
            StepCommands::Edit(args) => {
                let path = args.draft.draft.clone();
                let mut editor = load_draft(&path)?;
                let update = UpdateStep::from(args);
                if update.is_empty() {
                    bail!("Nothing to change; pass at least one field to update");
                }
                let number = editor
                    .update_step(&update)
                    .context("Failed to edit step")?
                    .step;
                save_draft(&path, &editor)?;
                self.render_status(&OperationStatus::success(format!("Updated step {number}")))?;
                self.render_warnings(&editor)
            }
            StepCommands::Remove(args) => {
                let path = &args.draft.draft;
                let mut editor = load_draft(path)?;
                let removed = editor
                    .remove_step(&(&args).into())
                    .context("Failed to remove step")?;
                save_draft(path, &editor)?;
                self.render_status(&OperationStatus::success(format!(
                    "Removed step '{}'; {} steps left",
                    removed.record.name,
                    editor.len()
                )))
            }
            StepCommands::Move(args) => {
                let path = &args.draft.draft;
                let mut editor = load_draft(path)?;
                editor
                    .move_step_with(&(&args).into())
                    .context("Failed to move step")?;
                save_draft(path, &editor)?;
                self.render_status(&OperationStatus::success(format!(
                    "Moved step from position {} to {}",
                    args.from + 1,
                    args.to + 1
                )))?;
                self.show_draft(&editor).await
            }
        }
    }

    pub async fn handle_group_command(&self, command: GroupCommands) -> Result<()> {
        match command {
            GroupCommands::Set(args) => {
                let path = &args.draft.draft;
                let mut editor = load_draft(path)?;
                editor
                    .assign_same(&(&args).into())
                    .context("Failed to save same-assignment group")?;
                save_draft(path, &editor)?;
                self.render_status(&OperationStatus::success(format!(
                    "Steps {} of department {} now share an assignee",
                    join_numbers(&args.steps),
                    args.department
                )))
            }
            GroupCommands::Remove(args) => {
                let path = &args.draft.draft;
                let mut editor = load_draft(path)?;
                editor
                    .remove_group(args.department)
                    .context("Failed to remove same-assignment group")?;
                save_draft(path, &editor)?;
                self.render_status(&OperationStatus::success(format!(
                    "Removed same-assignment group of department {}",
                    args.department
                )))
            }
            GroupCommands::Candidates(args) => {
                let editor = load_draft(&args.draft)?;
                let departments = self.departments_for_display().await;
                let candidates = editor.grouping_candidates();
                if candidates.is_empty() {
                    return self
                        .renderer
                        .render("No department has more than one step.\n");
                }

                let mut output = String::from("# Same-Assignment Candidates\n\n");
                for candidate in candidates {
                    let label = departments
                        .as_ref()
                        .and_then(|d| d.name_of(candidate.department_id))
                        .map_or_else(
                            || format!("Department {}", candidate.department_id),
                            |name| format!("{name} (ID {})", candidate.department_id),
                        );
                    let grouped = editor
                        .group_for(candidate.department_id)
                        .map_or("", |_| " (grouped)");
                    output.push_str(&format!(
                        "- {label}: steps {}{grouped}\n",
                        join_numbers(&candidate.steps)
                    ));
                }
                self.renderer.render(&output)
            }
        }
    }

    pub async fn handle_department_command(&self, command: DepartmentCommands) -> Result<()> {
        match command {
            DepartmentCommands::List(args) => {
                let departments = self
                    .client
                    .list_departments(&args.into())
                    .await
                    .context("Failed to list departments")?;
                self.renderer
                    .render(&format!("# Departments\n\n{departments}"))
            }
            DepartmentCommands::Add(args) => {
                let department = self
                    .client
                    .add_department(&args.into())
                    .await
                    .context("Failed to add department")?;
                self.renderer
                    .render(&CreateResult::new(department).to_string())
            }
        }
    }

    pub fn handle_tag_command(&self, command: TagCommands) -> Result<()> {
        match command {
            TagCommands::List => {
                let tags = self.client.field_tags();
                self.renderer.render(&format!("# Field Tags\n\n{tags}"))
            }
        }
    }

    /// Lists stored workflow processes as summaries.
    pub async fn list_workflows(&self, params: &ListWorkflows) -> Result<()> {
        let summaries = self
            .client
            .list_workflows_summary(params)
            .await
            .context("Failed to list workflow processes")?;
        self.renderer
            .render(&format!("# Workflow Processes\n\n{summaries}"))
    }

    async fn submit(&self, path: &Path) -> Result<()> {
        let editor = load_draft(path)?;
        let submission = match self.client.submit(&editor).await {
            Ok(submission) => submission,
            Err(e) => {
                let hint = if e.is_local() {
                    "fix the draft and submit again"
                } else {
                    "the draft is unchanged and can be submitted again"
                };
                return Err(e).context(format!("Draft {} was not submitted; {hint}", path.display()));
            }
        };

        // The draft now tracks the persisted process and its new version
        let process = submission.process().clone();
        save_draft(path, &WorkflowEditor::from_process(process))?;

        let output = match submission {
            Submission::Created(process) => CreateResult::new(process).to_string(),
            Submission::Updated(process) => UpdateResult::new(process).to_string(),
        };
        self.renderer.render(&output)
    }

    async fn show_draft(&self, editor: &WorkflowEditor) -> Result<()> {
        let departments = self.departments_for_display().await;
        let view = match &departments {
            Some(departments) => DraftView::new(editor).with_departments(departments),
            None => DraftView::new(editor),
        };
        self.renderer.render(&view.to_string())
    }

    /// Department names are a nicety; the draft is shown without them when
    /// the backend cannot list departments.
    async fn departments_for_display(&self) -> Option<Departments> {
        match self
            .client
            .list_departments(&ListDepartments::default())
            .await
        {
            Ok(departments) => Some(departments),
            Err(e) => {
                warn!("Showing draft without department names: {e}");
                None
            }
        }
    }

    fn render_warnings(&self, editor: &WorkflowEditor) -> Result<()> {
        for warning in editor.warnings() {
            self.render_status(&OperationStatus::warning(warning.to_string()))?;
        }
        Ok(())
    }

    fn render_status(&self, status: &OperationStatus) -> Result<()> {
        self.renderer.render(&status.to_string())
    }
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
