//! Event dispatch and skill assembly for Speechlet.
//!
//! - **Dispatcher** routes a request envelope to a lifecycle hook or an
//!   intent handler and waits for the single response
//! - **Skill** wraps the dispatcher behind one `execute` entry point with
//!   the identity check and the failure boundary

pub mod dispatcher;
pub mod skill;

pub use dispatcher::{Dispatcher, SkillDefinition};
pub use skill::{Outcome, Skill};
