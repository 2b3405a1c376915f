//! Display implementations for domain models.
//!
//! All output is markdown, rendered by the CLI's terminal renderer.

use std::{collections::BTreeMap, fmt};

use super::datetime::LocalDateTime;
use crate::models::{
    Department, FetchedSubprocess, FieldTag, SameAssign, Subprocess, WorkflowProcess,
    WorkflowSummary,
};

/// Comma-separated step numbers.
pub(crate) fn step_list(steps: impl IntoIterator<Item = u32>) -> String {
    steps
        .into_iter()
        .map(|step| step.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flags shown next to a step title.
fn step_flags(is_required: bool, is_step_with_cost: bool) -> String {
    let flags: Vec<&str> = [(is_required, "required"), (is_step_with_cost, "with cost")]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect();
    if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    }
}

/// Fields shared by both step shapes.
pub(crate) struct StepBody<'a> {
    pub description: &'a str,
    pub department: String,
    pub role: &'a str,
    pub estimated_number_of_days: u32,
    pub number_of_days_before_deadline: u32,
    pub check_fields: Option<Vec<&'a str>>,
    pub is_show_request_material: Option<bool>,
}

impl fmt::Display for StepBody<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        writeln!(f, "- Department: {}", self.department)?;
        writeln!(f, "- Person in charge: {}", self.role)?;
        writeln!(
            f,
            "- Duration: {} days, notice {} days before deadline",
            self.estimated_number_of_days, self.number_of_days_before_deadline
        )?;
        if let Some(tags) = &self.check_fields {
            if !tags.is_empty() {
                writeln!(f, "- Check fields: {}", tags.join(", "))?;
            }
        }
        if self.is_show_request_material == Some(true) {
            writeln!(f, "- Shows material request")?;
        }
        writeln!(f)
    }
}

/// Catalog label of a tag, or the raw value when it is not in the catalog.
fn tag_label(value: &str) -> &str {
    FieldTag::find(value).map_or(value, |tag| tag.label)
}

impl fmt::Display for Subprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {}{}",
            self.step,
            self.name,
            step_flags(self.is_required, self.is_step_with_cost)
        )?;
        writeln!(f)?;
        let body = StepBody {
            description: &self.description,
            department: self
                .department_id
                .map_or_else(|| "unassigned".to_string(), |id| format!("ID {id}")),
            role: &self.role_of_the_person_in_charge,
            estimated_number_of_days: self.estimated_number_of_days,
            number_of_days_before_deadline: self.number_of_days_before_deadline,
            check_fields: self
                .check_fields
                .as_ref()
                .map(|tags| tags.iter().map(|tag| tag_label(tag)).collect()),
            is_show_request_material: self.is_show_request_material,
        };
        write!(f, "{body}")
    }
}

impl fmt::Display for FetchedSubprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {}{}",
            self.step,
            self.name,
            step_flags(self.is_required, self.is_step_with_cost)
        )?;
        writeln!(f)?;
        let department = match (self.department_name(), self.resolved_department_id()) {
            (Some(name), Some(id)) => format!("{name} (ID {id})"),
            (_, Some(id)) => format!("ID {id}"),
            _ => "unassigned".to_string(),
        };
        let body = StepBody {
            description: &self.description,
            department,
            role: &self.role_of_the_person_in_charge,
            estimated_number_of_days: self.estimated_number_of_days,
            number_of_days_before_deadline: self.number_of_days_before_deadline,
            check_fields: self
                .check_fields
                .as_ref()
                .map(|tags| tags.iter().map(|tag| tag_label(tag)).collect()),
            is_show_request_material: self.is_show_request_material,
        };
        write!(f, "{body}")
    }
}

impl fmt::Display for WorkflowProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        writeln!(f, "- Output: {}", self.output_type)?;
        writeln!(f, "- Version: {}", self.version)?;
        if let Some(created_at) = &self.created_at {
            writeln!(f, "- Created: {}", LocalDateTime(created_at))?;
        }
        if let Some(updated_at) = &self.updated_at {
            writeln!(f, "- Updated: {}", LocalDateTime(updated_at))?;
        }

        writeln!(f)?;
        writeln!(f, "{}", self.description)?;

        if self.subprocesses.is_empty() {
            writeln!(f, "\nNo steps in this workflow.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            let mut steps: Vec<&FetchedSubprocess> = self.subprocesses.iter().collect();
            steps.sort_by_key(|step| step.step);
            for step in steps {
                write!(f, "{step}")?;
            }
        }

        if !self.same_assigns.is_empty() {
            let names: BTreeMap<u64, &str> = self
                .subprocesses
                .iter()
                .filter_map(|step| step.department.as_ref())
                .map(|department| (department.id, department.name.as_str()))
                .collect();
            writeln!(f, "## Same Assignee")?;
            writeln!(f)?;
            for group in &self.same_assigns {
                write_group(f, group, names.get(&group.department_id).copied())?;
            }
        }

        Ok(())
    }
}

/// One same-assignment line.
pub(crate) fn write_group(
    f: &mut fmt::Formatter<'_>,
    group: &SameAssign,
    department_name: Option<&str>,
) -> fmt::Result {
    match department_name {
        Some(name) => writeln!(
            f,
            "- {name} (ID {}): steps {}",
            group.department_id,
            step_list(group.steps.iter().copied())
        ),
        None => writeln!(
            f,
            "- Department {}: steps {}",
            group.department_id,
            step_list(group.steps.iter().copied())
        ),
    }
}

impl fmt::Display for WorkflowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Output**: {}", self.output_type)?;
        writeln!(
            f,
            "- **Steps**: {} ({} required, {} with cost)",
            self.total_steps, self.required_steps, self.cost_steps
        )?;
        writeln!(f, "- **Departments**: {}", self.departments)?;
        writeln!(f, "- **Version**: {}", self.version)?;
        if let Some(updated_at) = &self.updated_at {
            writeln!(f, "- **Updated**: {}", LocalDateTime(updated_at))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID {})", self.name, self.id)
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.value, self.label)
    }
}
