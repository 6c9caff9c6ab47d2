use crate::ActionsWorld;
use axum::{
    Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use jabref_actions::config::Settings;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Canned behaviour of the stub issues endpoint.
#[derive(Debug)]
pub struct MockGitHubState {
    response: Mutex<(u16, String)>,
    hits: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl Default for MockGitHubState {
    fn default() -> Self {
        MockGitHubState {
            response: Mutex::new((500, String::new())),
            hits: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }
}

async fn issues_endpoint(
    State(state): State<Arc<MockGitHubState>>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().expect("lock last query") = query;
    let (status, body) = state.response.lock().expect("lock response").clone();
    (
        StatusCode::from_u16(status).expect("valid status code"),
        [("content-type", "application/json; charset=utf-8")],
        body,
    )
}

async fn ensure_github(world: &mut ActionsWorld) -> SocketAddr {
    if let Some(addr) = world.github_addr {
        return addr;
    }
    let app = Router::new()
        .route("/repos/{owner}/{repo}/issues", get(issues_endpoint))
        .with_state(world.github_state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub GitHub");
    let addr = listener.local_addr().expect("stub GitHub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub GitHub server");
    });
    world.github_addr = Some(addr);
    addr
}

async fn settings_for(world: &mut ActionsWorld) -> Settings {
    let addr = ensure_github(world).await;
    Settings {
        api_base_url: format!("http://{addr}"),
        ..Settings::default()
    }
}

fn docstring(step: &Step) -> String {
    step.docstring
        .as_ref()
        .expect("Expected docstring")
        .trim()
        .to_string()
}

fn output(world: &ActionsWorld) -> String {
    String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8")
}

#[given(regex = r"^GitHub returns status (\d+) with issues:$")]
async fn given_github_returns_issues(world: &mut ActionsWorld, status: u16, step: &Step) {
    *world.github_state.response.lock().unwrap() = (status, docstring(step));
    ensure_github(world).await;
}

#[given(regex = r#"^GitHub returns status (\d+) with body "(.*)"$"#)]
async fn given_github_returns_body(world: &mut ActionsWorld, status: u16, body: String) {
    *world.github_state.response.lock().unwrap() = (status, body);
    ensure_github(world).await;
}

#[given("GitHub has no open issues")]
async fn given_github_has_no_issues(world: &mut ActionsWorld) {
    *world.github_state.response.lock().unwrap() = (200, "[]".to_string());
    ensure_github(world).await;
}

#[given("GitHub is unreachable")]
async fn given_github_is_unreachable(world: &mut ActionsWorld) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind placeholder");
    let addr = listener.local_addr().expect("placeholder address");
    drop(listener);
    world.github_addr = Some(addr);
}

#[when(regex = r"^I run `jabref-actions (.*)`$")]
async fn when_run_command(world: &mut ActionsWorld, command_line: String) {
    let settings = settings_for(world).await;
    let args: Vec<String> = std::iter::once("jabref-actions".to_string())
        .chain(command_line.split_whitespace().map(str::to_string))
        .collect();

    let mut buffer: Vec<u8> = Vec::new();
    let writer_option: Option<&mut dyn std::io::Write> = Some(&mut buffer);
    let result = jabref_actions::run::run(args, writer_option, Some(settings)).await;

    world.captured_output = buffer;
    world.run_result = Some(result);
}

#[then("the reply should be:")]
async fn then_reply_should_be(world: &mut ActionsWorld, step: &Step) {
    let expected = docstring(step);
    let actual = output(world);
    assert_eq!(
        actual.trim_end(),
        expected,
        "Expected reply:\n---\n{}\n---\nbut got:\n---\n{}\n---",
        expected,
        actual.trim_end()
    );
    assert!(
        world.run_result.as_ref().is_some_and(|r| r.is_ok()),
        "Command failed: {:?}",
        world.run_result
    );
}

#[then(regex = r#"^the reply should be "(.*)"$"#)]
async fn then_reply_should_be_line(world: &mut ActionsWorld, expected: String) {
    let actual = output(world);
    assert_eq!(actual.trim_end(), expected);
    assert!(
        world.run_result.as_ref().is_some_and(|r| r.is_ok()),
        "Command failed: {:?}",
        world.run_result
    );
}

#[then(regex = r"^every listed issue should read `- <title>: <url>`$")]
async fn then_every_listed_issue_is_formatted(world: &mut ActionsWorld) {
    let re = regex::Regex::new(r"^- .+: \S+$").unwrap();
    let actual = output(world);
    let listed: Vec<&str> = actual.lines().skip(1).collect();
    assert!(!listed.is_empty(), "No issues listed in:\n{}", actual);
    for line in listed {
        assert!(re.is_match(line), "Unexpected issue line '{}'", line);
    }
}

#[then(regex = r#"^the command should fail with "(.*)"$"#)]
async fn then_command_should_fail(world: &mut ActionsWorld, expected: String) {
    match &world.run_result {
        Some(Err(err)) => assert_eq!(err.to_string(), expected),
        other => panic!("Command should have failed, got {:?}", other),
    }
}

#[then(regex = r"^GitHub should have been called (\d+) times?$")]
async fn then_github_called(world: &mut ActionsWorld, expected: usize) {
    assert_eq!(world.github_state.hits.load(Ordering::SeqCst), expected);
}

#[then(regex = r#"^the issues request should ask for "(.*)"$"#)]
async fn then_issues_request_query(world: &mut ActionsWorld, expected: String) {
    let query = world.github_state.last_query.lock().unwrap().clone();
    assert_eq!(query.as_deref(), Some(expected.as_str()));
}

async fn ensure_webhook(world: &mut ActionsWorld) -> SocketAddr {
    if let Some(addr) = world.webhook_addr {
        return addr;
    }
    let settings = settings_for(world).await;
    let registry = Arc::new(jabref_actions::run::build_registry(&settings).expect("registry"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind action server");
    let addr = listener.local_addr().expect("action server address");
    tokio::spawn(async move {
        jabref_actions::server::serve(listener, registry)
            .await
            .expect("action server");
    });
    world.webhook_addr = Some(addr);
    addr
}

async fn record_response(world: &mut ActionsWorld, response: reqwest::Response) {
    world.webhook_status = Some(response.status().as_u16());
    // rejections from the JSON extractor come back as plain text
    world.webhook_body = response.json().await.ok();
}

#[when(regex = r#"^the framework posts the raw body `(.*)` to the webhook$"#)]
async fn when_framework_posts_raw(world: &mut ActionsWorld, body: String) {
    let addr = ensure_webhook(world).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/webhook"))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("webhook request should succeed");
    record_response(world, response).await;
}

#[when("the framework calls the webhook with:")]
async fn when_framework_calls_webhook(world: &mut ActionsWorld, step: &Step) {
    let addr = ensure_webhook(world).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/webhook"))
        .header("Content-Type", "application/json")
        .body(docstring(step))
        .send()
        .await
        .expect("webhook request should succeed");
    record_response(world, response).await;
}

#[when(regex = r"^the framework requests `GET (.*)`$")]
async fn when_framework_gets(world: &mut ActionsWorld, path: String) {
    let addr = ensure_webhook(world).await;
    let response = reqwest::get(format!("http://{addr}{path}"))
        .await
        .expect("GET request should succeed");
    record_response(world, response).await;
}

#[then(regex = r"^the webhook status should be (\d+)$")]
async fn then_webhook_status(world: &mut ActionsWorld, expected: u16) {
    assert_eq!(world.webhook_status, Some(expected));
}

#[then("the webhook should reject the call with a client error")]
async fn then_webhook_client_error(world: &mut ActionsWorld) {
    let status = world.webhook_status.expect("no webhook call recorded");
    assert!(
        (400..500).contains(&status),
        "Expected a 4xx status, got {status}"
    );
}

#[then("the webhook body should be:")]
async fn then_webhook_body(world: &mut ActionsWorld, step: &Step) {
    let expected: serde_json::Value =
        serde_json::from_str(&docstring(step)).expect("Expected JSON docstring");
    assert_eq!(world.webhook_body.as_ref(), Some(&expected));
}
