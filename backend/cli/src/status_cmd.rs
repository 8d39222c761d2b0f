//! CLI Status Command
//!
//! Queries a running server's health endpoint.

use anyhow::Result;

use crate::terminal_output::{note_error, note_success};

pub async fn run(host: &str, port: u16) -> Result<()> {
    let url = format!("http://{host}:{port}/api/health");
    let client = reqwest::Client::new();
    match client.get(&url).send().await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            note_success(&format!("Asmodeus is running on port {port}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => note_error(&format!("Asmodeus is not running on port {port}")),
    }
    Ok(())
}
