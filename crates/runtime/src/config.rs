//! Engine-wide tunables shared across the dispatcher and workers.

use std::time::Duration;

use interact_core::{DisplayFormat, DurationMs, PermissionNode};

/// How an actor confirms a priced interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfirmMode {
    /// A repeat interaction with the modifier held confirms; the explicit
    /// confirm signal also qualifies.
    #[default]
    ModifierClick,
    /// Only the explicit confirm signal qualifies; a repeat interaction
    /// merely re-prompts.
    Command,
}

/// Engine configuration shared across the dispatcher and workers.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Applied when a profile does not set its own cooldown. Zero disables.
    pub default_cooldown: DurationMs,
    /// Window within which a pending confirmation stays valid.
    pub confirm_ttl: DurationMs,
    pub confirm_mode: ConfirmMode,
    /// Format used when rendering remaining cooldowns for actors.
    pub display_format: DisplayFormat,
    /// Actors holding this node skip the cooldown gate entirely.
    pub bypass_permission: Option<PermissionNode>,
    /// Interval between background cooldown flushes to the repository.
    pub flush_interval: Duration,
    /// Interval between background expiry sweeps.
    pub sweep_interval: Duration,
}

impl EngineConfig {
    pub const DEFAULT_CONFIRM_TTL: DurationMs = 15_000;

    pub fn with_default_cooldown(mut self, cooldown: DurationMs) -> Self {
        self.default_cooldown = cooldown;
        self
    }

    pub fn with_confirm_ttl(mut self, ttl: DurationMs) -> Self {
        self.confirm_ttl = ttl;
        self
    }

    pub fn with_confirm_mode(mut self, mode: ConfirmMode) -> Self {
        self.confirm_mode = mode;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_cooldown: 0,
            confirm_ttl: Self::DEFAULT_CONFIRM_TTL,
            confirm_mode: ConfirmMode::default(),
            display_format: DisplayFormat::default(),
            bypass_permission: Some("interact.cooldown.bypass".to_owned()),
            flush_interval: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(30),
        }
    }
}
