//! Typed view over the training skill's session attributes.
//!
//! Cross-turn identity lives in `attributes.userId` and nowhere else.

use speechlet_core::session::SessionAttributes;

pub const PLAYER_KEY: &str = "userId";
pub const NUT_NUMBER_KEY: &str = "nut_number";

/// Validated accessors for the attributes the training skill carries.
pub struct TrainingSession<'a> {
    attributes: &'a SessionAttributes,
}

impl<'a> TrainingSession<'a> {
    pub fn new(attributes: &'a SessionAttributes) -> Self {
        Self { attributes }
    }

    /// The registered player, if any. Only a non-blank string counts.
    pub fn player(&self) -> Option<String> {
        self.attributes
            .get_value(PLAYER_KEY)?
            .as_str()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Register the player. Returns `false` (and stores nothing) for a blank name.
    pub fn set_player(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.attributes.insert(PLAYER_KEY, name);
        true
    }

    /// The nut the player is currently fastening. Accepts a JSON number or
    /// a numeric string.
    pub fn nut_number(&self) -> Option<u32> {
        self.attributes
            .get(NUT_NUMBER_KEY)
            .and_then(|n| n.trim().parse().ok())
    }

    pub fn set_nut_number(&self, nut: u32) {
        self.attributes.insert(NUT_NUMBER_KEY, nut.to_string());
    }
}
