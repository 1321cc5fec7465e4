//! Nut-tightening training skill for Speechlet.
//!
//! Guides a trainee through a tightening exercise on a Nexo nutrunner:
//! greeting, player registration, nut selection, program loading, and
//! status reports. Hardware access goes through a [`ComputeInvoker`].
//!
//! Use [`skill`] to get a ready-to-run [`Skill`] from configuration.

pub mod hooks;
pub mod intents;
pub mod invoker;
pub mod state;

use speechlet_config::{ComputeFunctions, SkillConfig};
use speechlet_core::error::InvokeError;
use speechlet_core::handler::IntentHandlerTable;
use speechlet_core::invoker::ComputeInvoker;
use speechlet_dispatch::{Skill, SkillDefinition};
use std::sync::Arc;

pub use hooks::TrainingHooks;
pub use invoker::{HttpInvoker, StaticInvoker};
pub use state::TrainingSession;

use intents::{
    FixedAsk, FixedTell, HelloHandler, LoadProgramHandler, ReportHandler, SelectNutHandler,
    battery_speech, evaluation_speech, program_speech,
};

/// Build the intent handler table for the training skill.
pub fn intent_table(
    invoker: Arc<dyn ComputeInvoker>,
    functions: &ComputeFunctions,
) -> IntentHandlerTable {
    IntentHandlerTable::builder()
        .handler(
            "Reset",
            FixedTell("Okay I resetted the Bosch Nexo nutrunner for you. Try again now!"),
        )
        .handler(
            "Hello",
            HelloHandler {
                invoker: invoker.clone(),
                function: functions.new_tightening_process.clone(),
            },
        )
        .handler(
            "SelectNut",
            SelectNutHandler {
                invoker: invoker.clone(),
                function: functions.update_program.clone(),
            },
        )
        .handler(
            "LoadProgram",
            LoadProgramHandler {
                invoker: invoker.clone(),
                function: functions.update_program.clone(),
            },
        )
        .handler("GetBattery", report(&invoker, &functions.battery_status, battery_speech))
        .handler("WhichProgram", report(&invoker, &functions.program_number, program_speech))
        .handler("GetLastJob", report(&invoker, &functions.evaluate_tightening, evaluation_speech))
        .handler("GetSummary", report(&invoker, &functions.evaluate_tightening, evaluation_speech))
        .handler(
            "AMAZON.HelpIntent",
            FixedAsk {
                speech: "Ask me to restart",
                reprompt: "Ask me to restart",
            },
        )
        .handler(
            "AMAZON.CancelIntent",
            FixedTell(
                "Okay your tightening training has been cancelled. Come back soon and try again.",
            ),
        )
        .handler(
            "AMAZON.RepeatIntent",
            FixedTell("Upsi somethign went wrong. Why don't you try again."),
        )
        .handler(
            "AMAZON.StartOverIntent",
            FixedTell("Okay let's try again my son"),
        )
        .handler(
            "AMAZON.StopIntent",
            FixedTell("Training session has ended. Come back tomorrow."),
        )
        .build()
}

fn report(
    invoker: &Arc<dyn ComputeInvoker>,
    function: &str,
    render: fn(&serde_json::Value) -> String,
) -> ReportHandler {
    ReportHandler {
        invoker: invoker.clone(),
        function: function.to_string(),
        render,
    }
}

/// The full skill definition: configured identity, hooks, and intents.
pub fn definition(config: &SkillConfig, invoker: Arc<dyn ComputeInvoker>) -> SkillDefinition {
    let mut definition = SkillDefinition::new(
        Arc::new(TrainingHooks),
        intent_table(invoker, &config.compute.functions),
    );
    if let Some(id) = config.application_id() {
        definition = definition.with_application_id(id);
    }
    definition
}

/// Assemble the training skill, choosing the compute invoker from configuration.
pub fn skill(config: &SkillConfig) -> Result<Skill, InvokeError> {
    let invoker = invoker::build_from_config(&config.compute)?;
    Ok(Skill::new(definition(config, invoker)))
}
