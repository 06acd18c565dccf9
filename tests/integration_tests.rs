// tests/integration_tests.rs
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use roster_upload::config::{AppConfig, Endpoint};
use roster_upload::controller::{FormController, FormSource, SubmitEvent, Submission};
use roster_upload::form::RosterForm;
use roster_upload::preset::Format;
use roster_upload::response::{Outcome, ResponseMode};
use roster_upload::snapshot::FormSnapshot;
use roster_upload::terminal::TerminalView;
use roster_upload::transport::HttpTransport;
use roster_upload::ui::{DiagnosticSink, FormView, OutputRegion, ProgressIndicator};

async fn echo(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(format!("{}\n{}", content_type, String::from_utf8_lossy(&body)))
}

async fn formatted() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "info": "Army name: Test\nTotal cost: 1000 pts",
        "debug": "parsed 1 force\nfound 3 units"
    }))
}

async fn rejected() -> HttpResponse {
    HttpResponse::BadRequest().body("File is not provided.")
}

async fn crashed() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "info": "division by zero" }))
}

async fn healthy() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "info": "ok" }))
}

/// Starts a stand-in formatter on an ephemeral port and returns its base URL.
fn spawn_formatter() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route("/api/formatter", web::post().to(echo))
            .route("/api/formatter/formatter.py", web::post().to(echo))
            .route("/api/json/formatter", web::post().to(formatted))
            .route("/api/rejected", web::post().to(rejected))
            .route("/api/crashed", web::post().to(crashed))
            .route("/api/healthcheck", web::get().to(healthy))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind test server");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    format!("http://{}", addr)
}

/// Accepts one connection, reads the request, answers with `response`
/// verbatim and hangs up. Lets a test send a body shorter than its
/// `Content-Length`.
async fn spawn_raw_formatter(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    actix_rt::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
    });

    format!("http://{}", addr)
}

async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

#[derive(Default)]
struct Recorder {
    notifications: Mutex<Vec<String>>,
    diagnostics: Mutex<Vec<String>>,
    output: Mutex<String>,
}

impl ProgressIndicator for Recorder {
    fn set_visible(&self, _visible: bool) {}

    fn notify(&self, message: &str) {
        self.notifications.lock().unwrap().push(message.to_string());
    }
}

impl DiagnosticSink for Recorder {
    fn log(&self, line: &str) {
        self.diagnostics.lock().unwrap().push(line.to_string());
    }

    fn error(&self, message: &str) {
        self.diagnostics.lock().unwrap().push(message.to_string());
    }
}

impl OutputRegion for Recorder {
    fn set_text(&self, text: &str) {
        *self.output.lock().unwrap() = text.to_string();
    }

    fn text(&self) -> String {
        self.output.lock().unwrap().clone()
    }
}

fn config(base: &str, endpoint: &str, mode: ResponseMode) -> AppConfig {
    AppConfig {
        api_base: base.to_string(),
        endpoint: endpoint.parse().unwrap(),
        response_mode: mode,
        chunk_size: 8,
    }
}

fn controller_for(config: AppConfig) -> (FormController, Arc<TerminalView>, Arc<Recorder>) {
    let terminal = Arc::new(TerminalView::new(true));
    let recorder = Arc::new(Recorder::default());
    let view = FormView {
        controls: vec![terminal.clone()],
        label: terminal.clone(),
        progress: recorder.clone(),
        output: recorder.clone(),
        diagnostics: recorder.clone(),
    };
    let mode = config.response_mode;
    let transport = Arc::new(HttpTransport::new(reqwest::Client::new(), config));
    (FormController::new(transport, view, mode), terminal, recorder)
}

struct Fields(FormSnapshot);

impl FormSource for Fields {
    fn snapshot(&self) -> roster_upload::errors::Result<FormSnapshot> {
        Ok(self.0.clone())
    }
}

fn write_roster(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, "<roster name=\"Integration\"><forces/></roster>").unwrap();
    (dir, path)
}

#[actix_rt::test]
async fn test_text_mode_posts_multipart_and_renders_body() {
    let base = spawn_formatter();
    let (controller, terminal, recorder) =
        controller_for(config(&base, "current", ResponseMode::Text));

    let form = Fields(FormSnapshot::new().with_text("a", "1").with_text("b", "2"));
    let result = controller.submit(&mut SubmitEvent::submit(&form)).await;

    assert!(matches!(result, Submission::Completed(Outcome::Success(_))));
    let output = recorder.text();
    assert!(output.starts_with("multipart/form-data; boundary="));
    assert!(output.contains("name=\"a\"\r\n\r\n1"));
    assert!(output.contains("name=\"b\"\r\n\r\n2"));
    assert!(terminal.is_enabled());
    assert!(!controller.is_pending());
}

#[actix_rt::test]
async fn test_roster_form_sends_file_and_checked_options() {
    let base = spawn_formatter();
    let (controller, _, recorder) = controller_for(config(&base, "legacy", ResponseMode::Text));

    let (_dir, roster) = write_roster("army.ros");
    let mut form = RosterForm::new(roster);
    form.select_format(Format::Wtc);

    let result = controller.submit(&mut SubmitEvent::submit(&form)).await;
    assert!(matches!(result, Submission::Completed(Outcome::Success(_))));

    let output = recorder.text();
    assert!(output.contains("name=\"roster\"; filename=\"army.ros\""));
    assert!(output.contains("<roster name=\"Integration\"><forces/></roster>"));
    assert!(output.contains("name=\"format\"\r\n\r\nwtc"));
    assert!(output.contains("name=\"show_model_count\"\r\n\r\non"));
    assert!(!output.contains("name=\"remove_costs\""));
}

#[actix_rt::test]
async fn test_json_mode_renders_info_and_logs_debug() {
    let base = spawn_formatter();
    let (controller, terminal, recorder) =
        controller_for(config(&base, "/api/json/formatter", ResponseMode::Json));

    let form = Fields(FormSnapshot::new().with_text("format", "default"));
    controller.submit(&mut SubmitEvent::submit(&form)).await;

    assert_eq!(recorder.text(), "Army name: Test\nTotal cost: 1000 pts");
    assert_eq!(
        *recorder.diagnostics.lock().unwrap(),
        vec!["parsed 1 force".to_string(), "found 3 units".to_string()]
    );
    assert!(terminal.is_enabled());
}

#[actix_rt::test]
async fn test_progress_reports_upload_and_download_totals() {
    let base = spawn_formatter();
    let (controller, _, recorder) =
        controller_for(config(&base, "/api/json/formatter", ResponseMode::Json));

    let snapshot = FormSnapshot::new().with_text("format", "rus");
    let upload_total = snapshot.encode().len();
    let form = Fields(snapshot);
    controller.submit(&mut SubmitEvent::submit(&form)).await;

    let notifications = recorder.notifications.lock().unwrap().clone();
    assert!(notifications
        .iter()
        .any(|m| m == &format!("Sent {} of {} bytes", upload_total, upload_total)));
    assert!(notifications
        .iter()
        .any(|m| m.starts_with("Received ") && m.contains(" of ")));
}

#[actix_rt::test]
async fn test_status_error_shows_error_body() {
    let base = spawn_formatter();
    let (controller, terminal, recorder) =
        controller_for(config(&base, "/api/rejected", ResponseMode::Text));

    let form = Fields(FormSnapshot::new());
    let result = controller.submit(&mut SubmitEvent::submit(&form)).await;

    assert_eq!(
        result,
        Submission::Completed(Outcome::Failure {
            status: Some(400),
            message: "File is not provided.".to_string(),
        })
    );
    assert_eq!(recorder.text(), "File is not provided.");
    assert!(terminal.is_enabled());
}

#[actix_rt::test]
async fn test_json_error_body_uses_info() {
    let base = spawn_formatter();
    let (controller, _, recorder) =
        controller_for(config(&base, "/api/crashed", ResponseMode::Json));

    let form = Fields(FormSnapshot::new());
    controller.submit(&mut SubmitEvent::submit(&form)).await;
    assert_eq!(recorder.text(), "division by zero");
}

#[actix_rt::test]
async fn test_truncated_error_body_keeps_received_bytes() {
    let base = spawn_raw_formatter(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial msg",
    )
    .await;
    let (controller, terminal, recorder) =
        controller_for(config(&base, "current", ResponseMode::Text));

    let form = Fields(FormSnapshot::new().with_text("a", "1"));
    let result = controller.submit(&mut SubmitEvent::submit(&form)).await;

    assert_eq!(
        result,
        Submission::Completed(Outcome::Failure {
            status: Some(500),
            message: "partial msg".to_string(),
        })
    );
    assert_eq!(recorder.text(), "partial msg");
    assert!(terminal.is_enabled());
    assert!(!controller.is_pending());
}

#[actix_rt::test]
async fn test_truncated_success_body_reports_status() {
    let base =
        spawn_raw_formatter("HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nArmy name").await;
    let (controller, terminal, recorder) =
        controller_for(config(&base, "current", ResponseMode::Text));

    let form = Fields(FormSnapshot::new().with_text("a", "1"));
    let result = controller.submit(&mut SubmitEvent::submit(&form)).await;

    match result {
        Submission::Completed(Outcome::Failure { status, message }) => {
            assert_eq!(status, Some(200));
            assert!(message.starts_with("Could not read response body"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(recorder.text().starts_with("Could not read response body"));
    assert!(terminal.is_enabled());
    assert!(!controller.is_pending());
}

#[actix_rt::test]
async fn test_unreachable_server_is_a_transport_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let (controller, terminal, recorder) = controller_for(config(
        &format!("http://127.0.0.1:{}", port),
        "current",
        ResponseMode::Text,
    ));

    let form = Fields(FormSnapshot::new().with_text("a", "1"));
    let result = controller.submit(&mut SubmitEvent::submit(&form)).await;

    assert!(matches!(
        result,
        Submission::Completed(Outcome::Failure { status: None, .. })
    ));
    assert!(recorder.text().starts_with("Request failed"));
    assert!(terminal.is_enabled());
    assert!(!controller.is_pending());
}

#[actix_rt::test]
async fn test_health_check() {
    let base = spawn_formatter();
    let transport = HttpTransport::new(
        reqwest::Client::new(),
        config(&base, "current", ResponseMode::Json),
    );
    assert_eq!(transport.health_check().await.unwrap(), "ok");
}

#[test]
fn test_endpoint_paths() {
    assert_eq!(Endpoint::Current.path(), "/api/formatter");
    assert_eq!(Endpoint::Legacy.path(), "/api/formatter/formatter.py");
}
