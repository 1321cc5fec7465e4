//! `speechlet invoke` — Execute one event read from a file or stdin.

use tokio::io::AsyncReadExt;

use super::{load_skill, print_outcome};

pub async fn run(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let raw = if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| format!("Failed to read {source}: {e}"))?
    };

    let event: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| format!("Event is not valid JSON: {e}"))?;

    let (_config, skill) = load_skill()?;
    print_outcome(skill.execute_json(event).await)
}
