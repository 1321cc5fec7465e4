//! `speechlet init` — Write a default config file.

use speechlet_config::SkillConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = SkillConfig::config_dir();
    let config_path = SkillConfig::config_path();

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.");
    } else {
        std::fs::write(&config_path, SkillConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set application_id in {}", config_path.display());
        println!("   2. Set [compute] endpoint to reach the nutrunner functions");
        println!("   3. Run: speechlet simulate launch");
    }

    Ok(())
}
