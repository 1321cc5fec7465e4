//! `speechlet doctor` — Diagnose configuration.

use speechlet_config::SkillConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Speechlet Doctor — Configuration Diagnostics");
    println!("==============================================\n");

    let mut issues = 0;

    let config_path = SkillConfig::config_path();
    if config_path.exists() {
        match SkillConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");

                if config.application_id().is_some() {
                    println!("  ✅ Application id configured");
                } else {
                    println!("  ⚠️  No application_id — any caller will be accepted");
                    issues += 1;
                }

                match &config.compute.endpoint {
                    Some(endpoint) => println!("  ✅ Compute endpoint: {endpoint}"),
                    None => {
                        println!("  ⚠️  No compute endpoint — handlers use canned results");
                        issues += 1;
                    }
                }

                match speechlet_nutrunner::skill(&config) {
                    Ok(skill) => println!(
                        "  ✅ Skill assembled with {} intents",
                        skill.dispatcher().intents().len()
                    ),
                    Err(e) => {
                        println!("  ❌ Skill assembly failed: {e}");
                        issues += 1;
                    }
                }
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No config file — run `speechlet init`");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
