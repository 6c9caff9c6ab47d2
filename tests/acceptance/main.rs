use cucumber::World;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Default, World)]
pub struct ActionsWorld {
    pub github_addr: Option<SocketAddr>,
    pub github_state: Arc<steps::MockGitHubState>,
    pub captured_output: Vec<u8>,
    pub run_result: Option<Result<(), anyhow::Error>>,
    pub webhook_addr: Option<SocketAddr>,
    pub webhook_status: Option<u16>,
    pub webhook_body: Option<serde_json::Value>,
}

#[tokio::main]
async fn main() {
    ActionsWorld::run("features").await;
}

mod steps;
