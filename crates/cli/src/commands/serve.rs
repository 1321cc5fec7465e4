//! `speechlet serve` — Start the HTTP gateway.

use super::load_skill;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, skill) = load_skill()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🎙️  Speechlet Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Identity check: {}",
        config.application_id().unwrap_or("disabled")
    );

    speechlet_gateway::start(config, skill).await?;

    Ok(())
}
