//! Triggerable actions and the click context that selects them.

use crate::types::{ActorId, PermissionNode};

/// Which mouse button triggered the interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClickKind {
    Left,
    Right,
}

impl ClickKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Which of a profile's two action lists a click triggers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCategory {
    #[default]
    Command,
    Permission,
}

/// How a [`Action::PermissionChange`] mutates the target node.
///
/// `Toggle` flips the current state: grant if absent, revoke if present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PermissionMode {
    Grant,
    Revoke,
    Toggle,
}

/// A single configured action inside an entity's ordered sequence.
///
/// Command templates may contain `%p%` / `%player%` placeholders which are
/// expanded to the interacting actor's identifier before execution (see
/// [`expand_template`]).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Run a command template on the server console.
    ConsoleCommand { template: String },
    /// Run a command template as the interacting actor.
    ActorCommand { template: String },
    /// Grant, revoke, or toggle a permission node on the actor.
    PermissionChange {
        node: PermissionNode,
        mode: PermissionMode,
    },
    /// Move the actor to another server.
    ServerSwitch { target: String },
    /// Send a chat message to the actor.
    ChatMessage { text: String },
    /// Play a sound cue for the actor.
    SoundCue { id: String },
}

impl Action {
    /// Short tag used in logs and per-action failure reports.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConsoleCommand { .. } => "console",
            Self::ActorCommand { .. } => "player",
            Self::PermissionChange { .. } => "permission",
            Self::ServerSwitch { .. } => "server",
            Self::ChatMessage { .. } => "message",
            Self::SoundCue { .. } => "sound",
        }
    }
}

/// Expands actor placeholders in a command or message template.
///
/// Both `%player%` and the shorthand `%p%` are replaced. The longer token is
/// handled first so its `%p` prefix is never clipped by the shorthand pass.
pub fn expand_template(template: &str, actor: &ActorId) -> String {
    template
        .replace("%player%", actor.as_str())
        .replace("%p%", actor.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_both_placeholder_forms() {
        let actor = ActorId::new("Steve");
        assert_eq!(
            expand_template("give %p% diamond 1", &actor),
            "give Steve diamond 1"
        );
        assert_eq!(
            expand_template("tell %player% hello %p%", &actor),
            "tell Steve hello Steve"
        );
    }

    #[test]
    fn template_without_placeholders_is_untouched() {
        let actor = ActorId::new("Alex");
        assert_eq!(expand_template("broadcast hi", &actor), "broadcast hi");
    }

    #[test]
    fn action_kind_tags_are_stable() {
        let action = Action::PermissionChange {
            node: "shop.vip".into(),
            mode: PermissionMode::Toggle,
        };
        assert_eq!(action.kind(), "permission");
        assert_eq!(
            Action::ConsoleCommand {
                template: "say hi".into()
            }
            .kind(),
            "console"
        );
    }
}
