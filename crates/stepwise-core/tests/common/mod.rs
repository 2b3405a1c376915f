use stepwise_core::{ClientBuilder, OutputType, WorkflowClient, WorkflowEditor, params::StepInput};
use tempfile::TempDir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

/// Helper function to create a client over a temporary local store
pub async fn create_test_client() -> (TempDir, WorkflowClient) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let client = ClientBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create client");
    (temp_dir, client)
}

/// A step input with valid defaults
pub fn step(name: &str, department_id: Option<u64>) -> StepInput {
    StepInput {
        name: name.to_string(),
        description: format!("{name} the request"),
        estimated_number_of_days: 2,
        number_of_days_before_deadline: 1,
        role_of_the_person_in_charge: "Coordinator".to_string(),
        department_id,
        ..Default::default()
    }
}

/// An editor with the given steps, all in one department
pub fn editor_with(names: &[&str], department_id: Option<u64>) -> WorkflowEditor {
    let mut editor = WorkflowEditor::new("Order approval", "Approves orders", OutputType::Material);
    for name in names {
        editor
            .add_step(step(name, department_id))
            .expect("Failed to add step");
    }
    editor
}

/// A request as seen by the canned server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Serves the given `(status, body)` responses in order, one connection
/// each, and returns the base URL plus the recorded requests.
pub async fn canned_server(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let address = listener.local_addr().expect("Failed to read address");

    let handle = tokio::spawn(async move {
        let mut recorded = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.expect("Failed to accept");
            recorded.push(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("Failed to write response");
            socket.shutdown().await.ok();
        }
        recorded
    });

    (format!("http://{address}/api"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Recorded {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = socket.read(&mut chunk).await.expect("Failed to read");
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(position) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break position + 4;
        }
        if read == 0 {
            break buffer.len();
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let read = socket.read(&mut chunk).await.expect("Failed to read body");
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    Recorded {
        method: request_line.next().unwrap_or_default().to_string(),
        path: request_line.next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buffer[header_end..]).to_string(),
    }
}
