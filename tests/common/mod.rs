#![allow(dead_code)]

use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

/// Variables the relay reads; cleared so the developer's shell or .env cannot leak in
const RELAY_ENV: [&str; 9] = [
    "APP_ENV",
    "PORT",
    "MEDIA_RELAY_PORT",
    "MEDIA_RELAY_BIND",
    "MEDIA_ACCOUNTS",
    "MEDIA_DEFAULT_TENANT_ID",
    "MEDIA_DEFAULT_API_KEY",
    "MEDIA_DEFAULT_API_SECRET",
    "MEDIA_API_BASE_URL",
];

fn relay_command(port: u16, vars: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_media-relay"));
    for key in RELAY_ENV {
        cmd.env_remove(key);
    }
    cmd.env("MEDIA_RELAY_BIND", "127.0.0.1")
        .env("MEDIA_RELAY_PORT", port.to_string())
        .envs(vars.iter().copied())
        .current_dir(std::env::temp_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

/// Run the relay with the given configuration and expect it to exit on its own
pub async fn run_until_exit(vars: &[(&str, &str)], timeout: Duration) -> Result<ExitStatus> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let mut child = relay_command(port, vars)
        .spawn()
        .context("failed to spawn server binary")?;

    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let _ = child.kill();
    let _ = child.wait();
    anyhow::bail!("relay was still running after {:?}", timeout)
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Spawn the relay binary on a free port with the given configuration
    pub async fn start(vars: &[(&str, &str)]) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = relay_command(port, vars)
            .spawn()
            .context("failed to spawn server binary")?;
        let server = Self { port, base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
