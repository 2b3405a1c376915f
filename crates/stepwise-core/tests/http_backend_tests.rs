mod common;

use common::{canned_server, editor_with};
use serde_json::{json, Value};
use stepwise_core::{
    params::{AssignSame, DeleteWorkflow, Id, ListDepartments, ListWorkflows, MoveStep},
    ClientBuilder, Submission, WorkflowClient, WorkflowError,
};

async fn remote_client(url: &str) -> WorkflowClient {
    ClientBuilder::new()
        .with_api_url(Some(url.to_string()))
        .build()
        .await
        .expect("Failed to create client")
}

fn fetched_process(id: u64, version: u32, output_type: &str) -> Value {
    json!({
        "id": id,
        "name": "Resin intake",
        "description": "Receives resin batches",
        "outputType": output_type,
        "version": version,
        "subprocesses": [
            {
                "id": 31,
                "name": "Weigh batch",
                "description": "Weigh and label",
                "estimatedNumberOfDays": 1,
                "numberOfDaysBeforeDeadline": 1,
                "roleOfThePersonInCharge": "Lab tech",
                "department": { "id": 3, "name": "Laboratory" },
                "isRequired": true,
                "isStepWithCost": false,
                "step": 1
            },
            {
                "id": 32,
                "name": "Store batch",
                "description": "Move to storage",
                "estimatedNumberOfDays": 2,
                "numberOfDaysBeforeDeadline": 1,
                "roleOfThePersonInCharge": "Warehouse",
                "department": null,
                "isRequired": false,
                "isStepWithCost": true,
                "step": 2
            },
            {
                "id": 33,
                "name": "Test batch",
                "description": "Run purity tests",
                "estimatedNumberOfDays": 3,
                "numberOfDaysBeforeDeadline": 2,
                "roleOfThePersonInCharge": "Lab tech",
                "department": { "id": 3, "name": "Laboratory" },
                "isRequired": true,
                "isStepWithCost": true,
                "checkFields": ["sampleCode"],
                "step": 3
            }
        ],
        "sameAssigns": [{ "departmentId": 3, "steps": [1, 3] }]
    })
}

#[tokio::test]
async fn test_remote_create_sends_wire_payload() {
    let created = fetched_process(8, 1, "INGREDIENT");
    let (url, server) = canned_server(vec![(201, created.to_string())]).await;
    let client = remote_client(&url).await;

    let mut editor = editor_with(&["Weigh batch", "Store batch", "Test batch"], Some(3));
    editor
        .assign_same(&AssignSame {
            department_id: 3,
            steps: [1, 3].into_iter().collect(),
        })
        .unwrap();

    let submission = client.submit(&editor).await.expect("Submit failed");
    assert!(matches!(submission, Submission::Created(ref p) if p.id == 8 && p.version == 1));

    let requests = server.await.unwrap();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/workflowProcesses");

    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(body["outputType"], "INGREDIENT");
    assert_eq!(body["subprocesses"][2]["step"], 3);
    assert_eq!(body["subprocesses"][0]["departmentId"], 3);
    assert_eq!(body["sameAssigns"], json!([{ "departmentId": 3, "steps": [1, 3] }]));
}

#[tokio::test]
async fn test_remote_update_after_hydrate() {
    let (url, server) = canned_server(vec![
        (200, fetched_process(8, 2, "INGREDIENT").to_string()),
        (200, fetched_process(8, 3, "INGREDIENT").to_string()),
    ])
    .await;
    let client = remote_client(&url).await;

    let mut editor = client.open_editor(&Id { id: 8 }).await.unwrap();
    assert_eq!(editor.version(), Some(2));
    editor.move_step_with(&MoveStep { from: 2, to: 0 }).unwrap();

    let submission = client.submit(&editor).await.unwrap();
    assert!(matches!(submission, Submission::Updated(ref p) if p.version == 3));

    let requests = server.await.unwrap();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/workflowProcesses/8");
    assert_eq!(requests[1].method, "PUT");
    assert_eq!(requests[1].path, "/api/workflowProcesses/8");

    let body: Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(body["id"], 8);
    assert_eq!(body["subprocesses"][0]["name"], "Test batch");
    assert_eq!(body["subprocesses"][0]["id"], 33);
    assert_eq!(body["subprocesses"][0]["step"], 1);
    assert_eq!(body["subprocesses"][0]["departmentId"], 3);
    assert!(body["subprocesses"][0].get("department").is_none());
    // "Weigh batch" and "Test batch" are now steps 2 and 1
    assert_eq!(body["sameAssigns"], json!([{ "departmentId": 3, "steps": [1, 2] }]));
}

#[tokio::test]
async fn test_resave_unchanged_process_is_identical() {
    let fetched = fetched_process(8, 2, "ACCESSORY");
    let (url, server) = canned_server(vec![
        (200, fetched.to_string()),
        (200, fetched.to_string()),
    ])
    .await;
    let client = remote_client(&url).await;

    let editor = client.open_editor(&Id { id: 8 }).await.unwrap();
    client.submit(&editor).await.unwrap();

    let requests = server.await.unwrap();
    let sent: Value = serde_json::from_str(&requests[1].body).unwrap();
    let process: stepwise_core::WorkflowProcess = serde_json::from_value(fetched).unwrap();
    assert_eq!(sent, serde_json::to_value(process.to_payload()).unwrap());
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let (url, server) = canned_server(vec![(
        400,
        json!({ "statusCode": 400, "message": ["name must be unique", "steps are locked"] }).to_string(),
    )])
    .await;
    let client = remote_client(&url).await;

    let editor = editor_with(&["Weigh batch"], None);
    let before = editor.clone();

    match client.submit(&editor).await.unwrap_err() {
        WorkflowError::Backend { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "name must be unique, steps are locked");
        }
        other => panic!("Expected backend error, got {other:?}"),
    }
    assert_eq!(editor, before);
    server.await.unwrap();
}

#[tokio::test]
async fn test_invalid_editor_never_reaches_backend() {
    // No responses queued: any request would hang the server task
    let (url, server) = canned_server(vec![]).await;
    let client = remote_client(&url).await;

    let editor = editor_with(&[], None);
    let error = client.submit(&editor).await.unwrap_err();
    assert!(matches!(error, WorkflowError::Validation(_)));
    assert!(server.await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_missing_workflow() {
    let (url, _server) = canned_server(vec![(
        404,
        json!({ "message": "Workflow process not found" }).to_string(),
    )])
    .await;
    let client = remote_client(&url).await;

    assert!(matches!(
        client.open_editor(&Id { id: 77 }).await,
        Err(WorkflowError::WorkflowNotFound { id: 77 })
    ));
}

#[tokio::test]
async fn test_remote_listing_and_filters() {
    let listing = json!([
        fetched_process(1, 1, "PRODUCT"),
        fetched_process(2, 4, "INGREDIENT"),
        fetched_process(3, 2, "INGREDIENT"),
    ]);
    let (url, server) = canned_server(vec![(200, listing.to_string())]).await;
    let client = remote_client(&url).await;

    let summaries = client
        .list_workflows_summary(&ListWorkflows {
            output_type: Some("material".to_string()),
            name: None,
            limit: Some(1),
        })
        .await
        .unwrap();
    // The limit counts matching processes, not the page before filtering
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, 2);
    assert_eq!(summaries[0].departments, 1);

    let requests = server.await.unwrap();
    assert_eq!(requests[0].path, "/api/workflowProcesses");
}

#[tokio::test]
async fn test_remote_listing_without_filters_pages() {
    let listing = json!([fetched_process(1, 1, "PRODUCT")]);
    let (url, server) = canned_server(vec![(200, listing.to_string())]).await;
    let client = remote_client(&url).await;

    let summaries = client
        .list_workflows_summary(&ListWorkflows {
            limit: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);

    let requests = server.await.unwrap();
    assert_eq!(requests[0].path, "/api/workflowProcesses?limit=5");
}

#[tokio::test]
async fn test_remote_departments_page() {
    let page = json!({ "data": [{ "id": 3, "name": "Laboratory" }], "total": 14 });
    let (url, server) = canned_server(vec![(200, page.to_string())]).await;
    let client = remote_client(&url).await;

    let departments = client
        .list_departments(&ListDepartments { limit: Some(1) })
        .await
        .unwrap();
    assert_eq!(departments.len(), 1);
    assert_eq!(departments.name_of(3), Some("Laboratory"));
    assert_eq!(server.await.unwrap()[0].path, "/api/departments?limit=1");
}

#[tokio::test]
async fn test_remote_delete() {
    let (url, server) = canned_server(vec![
        (200, fetched_process(8, 2, "PRODUCT").to_string()),
        (200, String::new()),
    ])
    .await;
    let client = remote_client(&url).await;

    let deleted = client
        .delete_workflow(&DeleteWorkflow {
            id: 8,
            confirmed: true,
        })
        .await
        .unwrap();
    assert_eq!(deleted.name, "Resin intake");

    let requests = server.await.unwrap();
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(requests[1].path, "/api/workflowProcesses/8");
}

#[tokio::test]
async fn test_unreachable_backend_is_not_local() {
    let client = remote_client("http://127.0.0.1:9").await;
    let editor = editor_with(&["Weigh batch"], None);

    let error = client.submit(&editor).await.unwrap_err();
    assert!(matches!(error, WorkflowError::Http { .. }));
    assert!(!error.is_local());
}
