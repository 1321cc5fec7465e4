pub mod doctor;
pub mod init;
pub mod invoke;
pub mod serve;
pub mod simulate;
pub mod status;

use speechlet_config::SkillConfig;
use speechlet_dispatch::{Outcome, Skill};

/// Load configuration and assemble the training skill.
pub fn load_skill() -> Result<(SkillConfig, Skill), Box<dyn std::error::Error>> {
    let config = SkillConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let skill = speechlet_nutrunner::skill(&config)?;
    Ok((config, skill))
}

/// Print an outcome as JSON. Failures become the command's error.
pub fn print_outcome(outcome: Outcome) -> Result<(), Box<dyn std::error::Error>> {
    match outcome? {
        Some(envelope) => println!("{}", serde_json::to_string_pretty(&envelope)?),
        None => println!("(session ended, no response)"),
    }
    Ok(())
}
