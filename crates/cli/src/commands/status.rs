//! `speechlet status` — Show configuration.

use speechlet_config::SkillConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SkillConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🎙️  Speechlet Status");
    println!("===================");
    println!("  Config dir:      {}", SkillConfig::config_dir().display());
    println!(
        "  Application id:  {}",
        config.application_id().unwrap_or("(identity check disabled)")
    );
    println!("  Gateway:         {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "  Compute:         {}",
        config.compute.endpoint.as_deref().unwrap_or("canned results")
    );
    println!("  Compute timeout: {}s", config.compute.timeout_secs);
    println!("  Log level:       {}", config.logging.level);

    let skill = speechlet_nutrunner::skill(&config)?;
    println!("  Intents:         {}", skill.dispatcher().intents().names().join(", "));

    if SkillConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `speechlet init` first");
    }

    Ok(())
}
