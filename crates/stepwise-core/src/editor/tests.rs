//! Tests for the editor module.

use std::collections::BTreeSet;

use super::*;
use crate::{
    error::WorkflowError,
    models::{Department, FetchedSubprocess},
    params::{AssignSame, MoveStep, RemoveStep, StepInput, UpdateStep},
};

fn input(name: &str, department_id: Option<u64>) -> StepInput {
    StepInput {
        name: name.to_string(),
        description: format!("{name} description"),
        estimated_number_of_days: 5,
        number_of_days_before_deadline: 2,
        role_of_the_person_in_charge: "Approver".to_string(),
        department_id,
        ..Default::default()
    }
}

fn editor_with(names: &[&str], department_id: Option<u64>) -> (WorkflowEditor, Vec<StepKey>) {
    let mut editor = WorkflowEditor::new("Quote approval", "Approves customer quotes", OutputType::Product);
    let keys = names
        .iter()
        .map(|name| editor.add_step(input(name, department_id)).expect("Failed to add step"))
        .collect();
    (editor, keys)
}

fn names(editor: &WorkflowEditor) -> Vec<String> {
    editor.steps().iter().map(|s| s.record.name.clone()).collect()
}

fn assert_contiguous(editor: &WorkflowEditor) {
    for (index, step) in editor.steps().iter().enumerate() {
        assert_eq!(step.record.step, index as u32 + 1, "step {index} misnumbered");
    }
}

fn numbers(steps: &[u32]) -> BTreeSet<u32> {
    steps.iter().copied().collect()
}

#[test]
fn test_add_step_appends_with_last_number() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], Some(1));
    let key = editor.add_step(input("Quote", None)).unwrap();

    assert_eq!(editor.len(), 3);
    assert_eq!(editor.index_of(key), Some(2));
    assert_eq!(editor.steps()[2].record.step, 3);
    assert_eq!(editor.steps()[2].record.id, None);
    assert_eq!(names(&editor), vec!["Intake", "Review", "Quote"]);
}

#[test]
fn test_add_step_does_not_touch_groups() {
    let (mut editor, keys) = editor_with(&["Intake", "Review"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2]),
        })
        .unwrap();
    editor.add_step(input("Quote", Some(1))).unwrap();

    let group = editor.group_for(1).unwrap();
    assert_eq!(group.members, keys.into_iter().collect());
}

#[test]
fn test_add_invalid_step_is_rejected_without_change() {
    let (mut editor, _) = editor_with(&["Intake"], None);
    let mut bad = input("Review", None);
    bad.estimated_number_of_days = 0;

    match editor.add_step(bad).unwrap_err() {
        WorkflowError::Validation(errors) => {
            assert_eq!(errors.for_field("estimatedNumberOfDays").count(), 1);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
    assert_eq!(editor.len(), 1);
}

#[test]
fn test_remove_step_preserves_relative_order() {
    let (mut editor, _) = editor_with(&["Intake", "Review", "Quote", "Pack"], None);
    let removed = editor.remove_step(&RemoveStep { index: 1 }).unwrap();

    assert_eq!(removed.record.name, "Review");
    assert_eq!(names(&editor), vec!["Intake", "Quote", "Pack"]);
    assert_contiguous(&editor);
}

#[test]
fn test_remove_step_out_of_range() {
    let (mut editor, _) = editor_with(&["Intake"], None);
    match editor.remove_step(&RemoveStep { index: 1 }).unwrap_err() {
        WorkflowError::InvalidInput { field, reason } => {
            assert_eq!(field, "index");
            assert!(reason.contains("out of range"));
        }
        other => panic!("Expected InvalidInput error, got {other:?}"),
    }
}

#[test]
fn test_remove_grouped_step_drops_it_from_group() {
    let (mut editor, keys) = editor_with(&["Intake", "Review", "Quote"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[2, 3]),
        })
        .unwrap();

    editor.remove_step(&RemoveStep { index: 1 }).unwrap();

    let group = editor.group_for(1).unwrap();
    assert_eq!(group.members, [keys[2]].into_iter().collect());
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(1, [2])]);
}

#[test]
fn test_remove_last_member_drops_group() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[2]),
        })
        .unwrap();

    editor.remove_step(&RemoveStep { index: 1 }).unwrap();
    assert!(editor.groups().is_empty());
}

#[test]
fn test_move_step_forward_and_back() {
    let (mut editor, _) = editor_with(&["Intake", "Review", "Quote", "Pack", "Ship"], None);

    editor.move_step(0, 3).unwrap();
    assert_eq!(names(&editor), vec!["Review", "Quote", "Pack", "Intake", "Ship"]);
    assert_contiguous(&editor);

    editor.move_step_with(&MoveStep { from: 4, to: 1 }).unwrap();
    assert_eq!(names(&editor), vec!["Review", "Ship", "Quote", "Pack", "Intake"]);
    assert_contiguous(&editor);
}

#[test]
fn test_move_step_same_index_is_noop() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], None);
    let before = editor.clone();
    editor.move_step(1, 1).unwrap();
    assert_eq!(editor, before);
}

#[test]
fn test_move_step_out_of_range() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], None);
    match editor.move_step(0, 2).unwrap_err() {
        WorkflowError::InvalidInput { field, .. } => assert_eq!(field, "to"),
        other => panic!("Expected InvalidInput error, got {other:?}"),
    }
    assert_eq!(names(&editor), vec!["Intake", "Review"]);
}

#[test]
fn test_group_follows_steps_across_move() {
    let (mut editor, keys) = editor_with(&["Intake", "Review", "Quote"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2]),
        })
        .unwrap();

    editor.move_step(2, 0).unwrap();

    assert_eq!(names(&editor), vec!["Quote", "Intake", "Review"]);
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(1, [2, 3])]);
    assert_eq!(
        editor.group_for(1).unwrap().members,
        [keys[0], keys[1]].into_iter().collect()
    );
}

#[test]
fn test_end_to_end_scenario() {
    let (mut editor, keys) = editor_with(&["Intake", "Review", "Quote"], Some(1));
    let (a, c) = (keys[0], keys[2]);
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 3]),
        })
        .unwrap();

    editor.remove_step(&RemoveStep { index: 1 }).unwrap();
    assert_eq!(names(&editor), vec!["Intake", "Quote"]);
    assert_contiguous(&editor);

    let e = editor.add_step(input("Ship", Some(1))).unwrap();
    assert_eq!(names(&editor), vec!["Intake", "Quote", "Ship"]);
    assert_eq!(editor.number_of(e), Some(3));

    editor.move_step(2, 0).unwrap();
    assert_eq!(names(&editor), vec!["Ship", "Intake", "Quote"]);
    assert_contiguous(&editor);

    assert_eq!(editor.number_of(a), Some(2));
    assert_eq!(editor.number_of(c), Some(3));
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(1, [2, 3])]);

    let payload = editor.to_payload().unwrap();
    assert_eq!(payload.same_assigns, vec![SameAssign::new(1, [2, 3])]);
    assert_eq!(payload.subprocesses[1].name, "Intake");
    assert_eq!(payload.subprocesses[2].name, "Quote");
}

#[test]
fn test_renumbering_invariant_over_operation_sequence() {
    let (mut editor, _) = editor_with(&["Seed 0", "Seed 1", "Seed 2"], Some(1));
    let mut seed: u64 = 0x5eed;
    let mut next = |bound: usize| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize % bound.max(1)
    };

    for round in 0..200 {
        match next(3) {
            0 => {
                editor.add_step(input(&format!("Added {round}"), Some(1))).unwrap();
            }
            1 if editor.len() > 1 => {
                let index = next(editor.len());
                editor.remove_step(&RemoveStep { index }).unwrap();
            }
            _ if !editor.is_empty() => {
                let before = names(&editor);
                let from = next(editor.len());
                let to = next(editor.len());
                editor.move_step(from, to).unwrap();

                let mut expected = before.clone();
                let moved = expected.remove(from);
                let mut others = names(&editor);
                others.remove(to);
                assert_eq!(others, expected);
                assert_eq!(names(&editor)[to], moved);
            }
            _ => {}
        }
        assert_contiguous(&editor);
    }
}

#[test]
fn test_assign_same_replaces_existing_group() {
    let (mut editor, keys) = editor_with(&["Intake", "Review", "Quote"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2]),
        })
        .unwrap();
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[3]),
        })
        .unwrap();

    assert_eq!(editor.groups().len(), 1);
    assert_eq!(editor.group_for(1).unwrap().members, [keys[2]].into_iter().collect());
}

#[test]
fn test_assign_same_rejects_invalid_selection() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], Some(1));
    editor.add_step(input("Quote", Some(2))).unwrap();

    let cases = [
        (numbers(&[]), "select at least one step"),
        (numbers(&[1, 4]), "step 4 does not exist"),
        (numbers(&[0]), "step 0 does not exist"),
        (numbers(&[1, 3]), "step 3 is not assigned to this department"),
    ];
    for (steps, expected) in cases {
        match editor
            .assign_same(&AssignSame {
                department_id: 1,
                steps,
            })
            .unwrap_err()
        {
            WorkflowError::Grouping {
                department_id,
                reason,
            } => {
                assert_eq!(department_id, 1);
                assert_eq!(reason, expected);
            }
            other => panic!("Expected grouping error, got {other:?}"),
        }
    }
    assert!(editor.groups().is_empty());
}

#[test]
fn test_assign_same_rejects_department_without_steps() {
    let (mut editor, _) = editor_with(&["Intake"], Some(1));
    let result = editor.assign_same(&AssignSame {
        department_id: 9,
        steps: numbers(&[1]),
    });
    assert!(matches!(result, Err(WorkflowError::Grouping { department_id: 9, .. })));
}

#[test]
fn test_remove_group() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2]),
        })
        .unwrap();

    let removed = editor.remove_group(1).unwrap();
    assert_eq!(removed.department_id, 1);
    assert!(editor.groups().is_empty());
    assert_eq!(editor.len(), 2);

    assert!(matches!(
        editor.remove_group(1),
        Err(WorkflowError::GroupNotFound { department_id: 1 })
    ));
}

#[test]
fn test_department_change_leaves_group() {
    let (mut editor, keys) = editor_with(&["Intake", "Review", "Quote"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2, 3]),
        })
        .unwrap();

    editor
        .update_step(&UpdateStep {
            index: 1,
            department_id: Some(2),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(
        editor.group_for(1).unwrap().members,
        [keys[0], keys[2]].into_iter().collect()
    );
    assert!(editor.to_payload().is_ok());
}

#[test]
fn test_update_step_keeps_group_when_department_unchanged() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2]),
        })
        .unwrap();

    let updated = editor
        .update_step(&UpdateStep {
            index: 0,
            name: Some("Renamed".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.step, 1);
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(1, [1, 2])]);
}

#[test]
fn test_update_step_rejects_invalid_result() {
    let (mut editor, _) = editor_with(&["Intake"], None);
    let result = editor.update_step(&UpdateStep {
        index: 0,
        name: Some("x".to_string()),
        ..Default::default()
    });
    assert!(matches!(result, Err(WorkflowError::Validation(_))));
    assert_eq!(editor.steps()[0].record.name, "Intake");
}

#[test]
fn test_grouping_candidates_and_warnings() {
    let mut editor = WorkflowEditor::new("Quote approval", "Approves customer quotes", OutputType::Accessory);
    editor.add_step(input("Intake", Some(2))).unwrap();
    editor.add_step(input("Review", None)).unwrap();
    editor.add_step(input("Quote", Some(1))).unwrap();
    editor.add_step(input("Pack", Some(2))).unwrap();

    assert_eq!(
        editor.grouping_candidates(),
        vec![DepartmentSteps {
            department_id: 2,
            steps: vec![1, 4]
        }]
    );
    assert_eq!(editor.steps_in_department(1).len(), 1);

    let warnings = editor.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].to_string(), "Step 2 (Review) has no department");

    let report = editor.validate().unwrap();
    assert_eq!(report.warnings, warnings);
}

#[test]
fn test_empty_editor_fails_validation() {
    let editor = WorkflowEditor::new("Quote approval", "Approves customer quotes", OutputType::Product);
    match editor.to_payload().unwrap_err() {
        WorkflowError::Validation(errors) => {
            assert_eq!(errors.for_field("subprocesses").count(), 1);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

fn fetched_process() -> WorkflowProcess {
    let step = |id: u64, number: u32, department: Option<Department>| FetchedSubprocess {
        id: Some(id),
        name: format!("Fetched {number}"),
        description: "Fetched step".to_string(),
        estimated_number_of_days: 4,
        number_of_days_before_deadline: 1,
        role_of_the_person_in_charge: "Manager".to_string(),
        department,
        department_id: None,
        is_required: number == 1,
        is_step_with_cost: false,
        check_fields: Some(["quantity".to_string()].into_iter().collect()),
        is_show_request_material: Some(true),
        step: number,
    };
    let sales = || {
        Some(Department {
            id: 7,
            name: "Sales".to_string(),
        })
    };

    WorkflowProcess {
        id: 42,
        name: "Fetched workflow".to_string(),
        description: "Loaded from the backend".to_string(),
        output_type: OutputType::Material,
        // Deliberately out of order
        subprocesses: vec![step(12, 2, None), step(11, 1, sales()), step(13, 3, sales())],
        same_assigns: vec![SameAssign::new(7, [1, 3])],
        version: 5,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_hydrate_flattens_and_orders() {
    let editor = WorkflowEditor::from_process(fetched_process());

    assert_eq!(editor.id(), Some(42));
    assert_eq!(editor.version(), Some(5));
    assert_eq!(names(&editor), vec!["Fetched 1", "Fetched 2", "Fetched 3"]);
    assert_eq!(editor.steps()[0].record.department_id, Some(7));
    assert_eq!(editor.steps()[1].record.department_id, None);
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(7, [1, 3])]);
}

#[test]
fn test_resave_without_changes_is_identical() {
    let process = fetched_process();
    let expected = process.to_payload();
    let payload = WorkflowEditor::from_process(process).to_payload().unwrap();
    assert_eq!(payload, expected);
}

#[test]
fn test_hydrate_drops_dangling_group_numbers() {
    let mut process = fetched_process();
    process.same_assigns = vec![SameAssign::new(7, [1, 9]), SameAssign::new(8, [9])];

    let editor = WorkflowEditor::from_process(process);
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(7, [1])]);
}

#[test]
fn test_hydrate_drops_members_of_other_departments() {
    let mut process = fetched_process();
    // Step 2 has no department, so it cannot share department 7's assignee
    process.same_assigns = vec![SameAssign::new(7, [1, 2, 3])];

    let editor = WorkflowEditor::from_process(process);
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(7, [1, 3])]);

    let payload = editor.to_payload().unwrap();
    assert_eq!(payload.same_assigns, vec![SameAssign::new(7, [1, 3])]);
}

#[test]
fn test_hydrate_merges_groups_of_one_department() {
    let mut process = fetched_process();
    process.same_assigns = vec![SameAssign::new(7, [1]), SameAssign::new(7, [3])];

    let editor = WorkflowEditor::from_process(process);
    assert_eq!(editor.same_assigns(), vec![SameAssign::new(7, [1, 3])]);
    assert!(editor.to_payload().is_ok());
}

#[test]
fn test_json_round_trip_keeps_keys() {
    let (mut editor, keys) = editor_with(&["Intake", "Review"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[2]),
        })
        .unwrap();

    let restored = WorkflowEditor::from_json(&editor.to_json().unwrap()).unwrap();
    assert_eq!(restored, editor);
    assert_eq!(restored.index_of(keys[1]), Some(1));
}

#[test]
fn test_from_json_repairs_hand_edits() {
    let (mut editor, _) = editor_with(&["Intake", "Review"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2]),
        })
        .unwrap();

    let mut value: serde_json::Value = serde_json::from_str(&editor.to_json().unwrap()).unwrap();
    value["steps"][0]["record"]["step"] = serde_json::json!(7);
    value["steps"][1]["record"]["departmentId"] = serde_json::json!(2);

    let restored = WorkflowEditor::from_json(&value.to_string()).unwrap();
    assert_eq!(restored.steps()[0].record.step, 1);
    assert_eq!(restored.same_assigns(), vec![SameAssign::new(1, [1])]);
}

#[test]
fn test_from_json_merges_duplicate_groups() {
    let (mut editor, _) = editor_with(&["Intake", "Review", "Quote"], Some(1));
    editor
        .assign_same(&AssignSame {
            department_id: 1,
            steps: numbers(&[1, 2]),
        })
        .unwrap();

    let mut value: serde_json::Value = serde_json::from_str(&editor.to_json().unwrap()).unwrap();
    let third = value["steps"][2]["key"].clone();
    let groups = value["groups"].as_array_mut().unwrap();
    groups.push(serde_json::json!({ "departmentId": 1, "members": [third] }));

    let restored = WorkflowEditor::from_json(&value.to_string()).unwrap();
    assert_eq!(restored.same_assigns(), vec![SameAssign::new(1, [1, 2, 3])]);

    let payload = restored.to_payload().unwrap();
    assert_eq!(payload.same_assigns.len(), 1);
}

#[test]
fn test_step_key_display_is_short() {
    let key = StepKey::new();
    assert_eq!(key.to_string().len(), 8);
}
