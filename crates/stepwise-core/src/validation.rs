//! Field and aggregate validation for workflow payloads.
//!
//! Errors are addressed by field path (`name`, `subprocesses[2].description`,
//! `sameAssigns[0].steps`) so a caller can attach them to the matching input.
//! Steps without a department are not errors: they are reported as
//! [`Warning`]s and the payload stays submittable.

use std::{collections::BTreeSet, fmt, ops::RangeInclusive};

use serde::Serialize;

use crate::{
    error::{Result, WorkflowError},
    models::{Subprocess, WorkflowPayload},
};

/// Allowed length, in characters, of names and descriptions.
pub const TEXT_LENGTH: RangeInclusive<usize> = 3..=100;

/// Allowed range for day counts.
pub const DAY_RANGE: RangeInclusive<u32> = 1..=365;

/// Maximum length of the role label.
pub const ROLE_MAX_LENGTH: usize = 100;

/// A validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors reported for exactly this field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |error| error.field == field)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.push(FieldError::new(field, reason));
    }

    /// Turn the collected errors into a result.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// A non-blocking finding surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// The step with this number has no department
    MissingDepartment { step: u32, name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingDepartment { step, name } => {
                write!(f, "Step {step} ({name}) has no department")
            }
        }
    }
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<Warning>,
}

pub(crate) fn check_text(errors: &mut ValidationErrors, field: &str, value: &str) {
    let length = value.trim().chars().count();
    if !TEXT_LENGTH.contains(&length) {
        errors.push(
            field,
            format!(
                "must be between {} and {} characters",
                TEXT_LENGTH.start(),
                TEXT_LENGTH.end()
            ),
        );
    }
}

pub(crate) fn check_days(errors: &mut ValidationErrors, field: &str, value: u32) {
    if !DAY_RANGE.contains(&value) {
        errors.push(
            field,
            format!(
                "must be between {} and {} days",
                DAY_RANGE.start(),
                DAY_RANGE.end()
            ),
        );
    }
}

impl Subprocess {
    /// Collect field errors for this step, prefixing field names with
    /// `prefix` (empty for a standalone step).
    pub(crate) fn check_fields_into(&self, prefix: &str, errors: &mut ValidationErrors) {
        let field = |name: &str| format!("{prefix}{name}");

        check_text(errors, &field("name"), &self.name);
        check_text(errors, &field("description"), &self.description);
        check_days(
            errors,
            &field("estimatedNumberOfDays"),
            self.estimated_number_of_days,
        );
        check_days(
            errors,
            &field("numberOfDaysBeforeDeadline"),
            self.number_of_days_before_deadline,
        );

        let role = self.role_of_the_person_in_charge.trim();
        if role.is_empty() {
            errors.push(field("roleOfThePersonInCharge"), "must not be empty");
        } else if role.chars().count() > ROLE_MAX_LENGTH {
            errors.push(
                field("roleOfThePersonInCharge"),
                format!("must be at most {ROLE_MAX_LENGTH} characters"),
            );
        }

        if let Some(tags) = &self.check_fields {
            if tags.iter().any(|tag| tag.trim().is_empty()) {
                errors.push(field("checkFields"), "must not contain empty tags");
            }
        }
    }

    /// Validate the fields of a single step.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::default();
        self.check_fields_into("", &mut errors);
        errors.into_result()
    }
}

impl WorkflowPayload {
    /// Validate the whole aggregate as it would be submitted.
    ///
    /// Checks names, every step's fields, contiguous step numbering, the
    /// minimum of one step, and same-assignment consistency. Returns the
    /// non-blocking warnings on success.
    pub fn validate(&self) -> Result<ValidationReport> {
        let mut errors = ValidationErrors::default();

        check_text(&mut errors, "name", &self.name);
        check_text(&mut errors, "description", &self.description);

        if self.subprocesses.is_empty() {
            errors.push("subprocesses", "must contain at least one step");
        }

        for (index, step) in self.subprocesses.iter().enumerate() {
            let prefix = format!("subprocesses[{index}].");
            step.check_fields_into(&prefix, &mut errors);
            let expected = index as u32 + 1;
            if step.step != expected {
                errors.push(
                    format!("{prefix}step"),
                    format!("is {} but must be {expected} to match its position", step.step),
                );
            }
        }

        let mut grouped_departments = BTreeSet::new();
        for (index, group) in self.same_assigns.iter().enumerate() {
            let field = format!("sameAssigns[{index}].steps");
            if !grouped_departments.insert(group.department_id) {
                errors.push(
                    format!("sameAssigns[{index}].departmentId"),
                    format!("department {} is grouped more than once", group.department_id),
                );
            }
            if group.steps.is_empty() {
                errors.push(field.clone(), "must reference at least one step");
            }
            for number in &group.steps {
                match self.subprocesses.iter().find(|step| step.step == *number) {
                    None => errors.push(field.clone(), format!("step {number} does not exist")),
                    Some(step) if step.department_id != Some(group.department_id) => errors.push(
                        field.clone(),
                        format!(
                            "step {number} does not belong to department {}",
                            group.department_id
                        ),
                    ),
                    Some(_) => {}
                }
            }
        }

        errors.into_result()?;

        let warnings = self
            .subprocesses
            .iter()
            .filter(|step| step.department_id.is_none())
            .map(|step| Warning::MissingDepartment {
                step: step.step,
                name: step.name.clone(),
            })
            .collect();

        Ok(ValidationReport { warnings })
    }
}
