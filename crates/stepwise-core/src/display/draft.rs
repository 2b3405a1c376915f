//! Display of an editing session.

use std::fmt;

use super::{
    collections::Departments,
    models::{step_list, write_group, StepBody},
};
use crate::{editor::WorkflowEditor, models::FieldTag};

/// Markdown view of a [`WorkflowEditor`], with department names resolved
/// when a department list is available.
pub struct DraftView<'a> {
    pub editor: &'a WorkflowEditor,
    pub departments: Option<&'a Departments>,
}

impl<'a> DraftView<'a> {
    pub fn new(editor: &'a WorkflowEditor) -> Self {
        Self {
            editor,
            departments: None,
        }
    }

    pub fn with_departments(mut self, departments: &'a Departments) -> Self {
        self.departments = Some(departments);
        self
    }

    fn department_name(&self, id: u64) -> Option<&'a str> {
        self.departments
            .and_then(|departments| departments.name_of(id))
    }

    fn department_label(&self, id: Option<u64>) -> String {
        match id {
            Some(id) => match self.department_name(id) {
                Some(name) => format!("{name} (ID {id})"),
                None => format!("ID {id}"),
            },
            None => "unassigned".to_string(),
        }
    }
}

impl fmt::Display for DraftView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let editor = self.editor;
        writeln!(f, "# Draft: {}", editor.name())?;
        writeln!(f)?;
        match (editor.id(), editor.version()) {
            (Some(id), Some(version)) => {
                writeln!(f, "- Workflow: ID {id}, based on version {version}")?
            }
            (Some(id), None) => writeln!(f, "- Workflow: ID {id}")?,
            _ => writeln!(f, "- Workflow: new")?,
        }
        writeln!(f, "- Output: {}", editor.output_type())?;
        writeln!(f)?;
        writeln!(f, "{}", editor.description())?;

        if editor.is_empty() {
            writeln!(f, "\nNo steps yet.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in editor.steps() {
                let record = &step.record;
                let mut flags = Vec::new();
                if record.is_required {
                    flags.push("required");
                }
                if record.is_step_with_cost {
                    flags.push("with cost");
                }
                if editor.is_grouped(step.key) {
                    flags.push("same assignee");
                }
                let flags = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", flags.join(", "))
                };
                writeln!(f, "### {}. {}{flags} `{}`", record.step, record.name, step.key)?;
                writeln!(f)?;

                let body = StepBody {
                    description: &record.description,
                    department: self.department_label(record.department_id),
                    role: &record.role_of_the_person_in_charge,
                    estimated_number_of_days: record.estimated_number_of_days,
                    number_of_days_before_deadline: record.number_of_days_before_deadline,
                    check_fields: record.check_fields.as_ref().map(|tags| {
                        tags.iter()
                            .map(|tag| FieldTag::find(tag).map_or(tag.as_str(), |t| t.label))
                            .collect()
                    }),
                    is_show_request_material: record.is_show_request_material,
                };
                write!(f, "{body}")?;
            }
        }

        let groups = editor.same_assigns();
        if !groups.is_empty() {
            writeln!(f, "## Same Assignee")?;
            writeln!(f)?;
            for group in &groups {
                write_group(f, group, self.department_name(group.department_id))?;
            }
            writeln!(f)?;
        }

        let candidates: Vec<_> = editor
            .grouping_candidates()
            .into_iter()
            .filter(|candidate| editor.group_for(candidate.department_id).is_none())
            .collect();
        if !candidates.is_empty() {
            writeln!(f, "## Could Share an Assignee")?;
            writeln!(f)?;
            for candidate in candidates {
                writeln!(
                    f,
                    "- {}: steps {}",
                    self.department_label(Some(candidate.department_id)),
                    step_list(candidate.steps)
                )?;
            }
            writeln!(f)?;
        }

        let warnings = editor.warnings();
        if !warnings.is_empty() {
            writeln!(f, "## Warnings")?;
            writeln!(f)?;
            for warning in warnings {
                writeln!(f, "- {warning}")?;
            }
        }

        Ok(())
    }
}
