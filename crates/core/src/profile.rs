//! Per-entity action configuration and the copy-on-write profile store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::action::{Action, ActionCategory, ClickKind};
use crate::types::{DurationMs, EntityId, PermissionNode};

/// The two action lists configured for one click kind, plus which of them
/// the click resolves to.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClickActions {
    /// Category this click triggers. A click always resolves to exactly one
    /// of the two lists.
    pub category: ActionCategory,
    pub commands: Vec<Action>,
    pub permissions: Vec<Action>,
}

impl ClickActions {
    /// The list selected by the configured category.
    pub fn actions(&self) -> &[Action] {
        match self.category {
            ActionCategory::Command => &self.commands,
            ActionCategory::Permission => &self.permissions,
        }
    }
}

/// Everything configured for one interactive entity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionProfile {
    pub left: ClickActions,
    pub right: ClickActions,
    /// Cooldown between successful triggers. `None` means the engine-wide
    /// default applies; zero disables the cooldown entirely.
    pub cooldown: Option<DurationMs>,
    /// Price charged per trigger; zero means unpriced.
    pub price: f64,
    /// Node the actor must hold to trigger at all.
    pub required_permission: Option<PermissionNode>,
}

impl ActionProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&self, kind: ClickKind) -> &ClickActions {
        match kind {
            ClickKind::Left => &self.left,
            ClickKind::Right => &self.right,
        }
    }

    /// Resolves a click to its configured category and ordered action list.
    pub fn resolve(&self, kind: ClickKind) -> (ActionCategory, &[Action]) {
        let click = self.click(kind);
        (click.category, click.actions())
    }

    pub fn with_actions(
        mut self,
        kind: ClickKind,
        category: ActionCategory,
        actions: Vec<Action>,
    ) -> Self {
        let click = match kind {
            ClickKind::Left => &mut self.left,
            ClickKind::Right => &mut self.right,
        };
        click.category = category;
        match category {
            ActionCategory::Command => click.commands = actions,
            ActionCategory::Permission => click.permissions = actions,
        }
        self
    }

    pub fn with_cooldown(mut self, cooldown: DurationMs) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_required_permission(mut self, node: impl Into<PermissionNode>) -> Self {
        self.required_permission = Some(node.into());
        self
    }
}

/// One published snapshot of the whole store.
pub type ProfileSnapshot = HashMap<EntityId, Arc<ActionProfile>>;

/// Concurrently readable entity → profile mapping.
///
/// Writers build a fresh snapshot and publish it by swapping the shared
/// pointer; in-flight dispatches keep whatever snapshot (or single profile)
/// they already resolved, so a `replace`/`reload` never exposes a
/// half-updated profile to a concurrent reader.
#[derive(Debug, Default)]
pub struct ProfileStore {
    snapshot: RwLock<Arc<ProfileSnapshot>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one entity's profile from the current snapshot.
    pub fn get(&self, entity: EntityId) -> Option<Arc<ActionProfile>> {
        self.current().get(&entity).cloned()
    }

    /// The current full snapshot pointer.
    pub fn current(&self) -> Arc<ProfileSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Publishes a snapshot with `entity` bound to `profile`.
    pub fn replace(&self, entity: EntityId, profile: ActionProfile) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let mut next: ProfileSnapshot = guard.as_ref().clone();
        next.insert(entity, Arc::new(profile));
        *guard = Arc::new(next);
    }

    /// Publishes a snapshot without `entity`. Returns whether it was bound.
    pub fn remove(&self, entity: EntityId) -> bool {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.contains_key(&entity) {
            return false;
        }
        let mut next: ProfileSnapshot = guard.as_ref().clone();
        next.remove(&entity);
        *guard = Arc::new(next);
        true
    }

    /// Replaces the entire store with a new snapshot in one publish.
    pub fn reload(&self, profiles: HashMap<EntityId, ActionProfile>) {
        let next: ProfileSnapshot = profiles
            .into_iter()
            .map(|(entity, profile)| (entity, Arc::new(profile)))
            .collect();
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(next);
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn say(text: &str) -> Action {
        Action::ConsoleCommand {
            template: format!("say {text}"),
        }
    }

    #[test]
    fn resolve_follows_configured_category() {
        let profile = ActionProfile::new()
            .with_actions(ClickKind::Right, ActionCategory::Command, vec![say("hi")])
            .with_actions(
                ClickKind::Left,
                ActionCategory::Permission,
                vec![Action::PermissionChange {
                    node: "shop.vip".into(),
                    mode: crate::action::PermissionMode::Grant,
                }],
            );

        let (category, actions) = profile.resolve(ClickKind::Right);
        assert_eq!(category, ActionCategory::Command);
        assert_eq!(actions.len(), 1);

        let (category, actions) = profile.resolve(ClickKind::Left);
        assert_eq!(category, ActionCategory::Permission);
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn replace_is_visible_to_subsequent_reads() {
        let store = ProfileStore::new();
        let entity = EntityId(3);
        assert!(store.get(entity).is_none());

        store.replace(entity, ActionProfile::new().with_price(50.0));
        assert_eq!(store.get(entity).unwrap().price, 50.0);

        assert!(store.remove(entity));
        assert!(!store.remove(entity));
        assert!(store.get(entity).is_none());
    }

    #[test]
    fn readers_keep_their_snapshot_across_reload() {
        let store = ProfileStore::new();
        let entity = EntityId(1);
        store.replace(
            entity,
            ActionProfile::new().with_actions(
                ClickKind::Right,
                ActionCategory::Command,
                vec![say("old")],
            ),
        );

        let held = store.get(entity).expect("profile bound");
        let held_snapshot = store.current();

        store.reload(HashMap::from([(
            entity,
            ActionProfile::new().with_actions(
                ClickKind::Right,
                ActionCategory::Command,
                vec![say("new"), say("newer")],
            ),
        )]));

        // The in-flight reader still sees the old action list, never a mix.
        assert_eq!(held.resolve(ClickKind::Right).1.len(), 1);
        assert_eq!(
            held_snapshot.get(&entity).unwrap().resolve(ClickKind::Right).1.len(),
            1
        );

        // Fresh reads observe the new snapshot.
        assert_eq!(store.get(entity).unwrap().resolve(ClickKind::Right).1.len(), 2);
    }
}
