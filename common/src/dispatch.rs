//! Event registry
//!
//! Maps (event kind, element) pairs to the action they trigger. The
//! registry is plain data: the browser binding walks [`EventRegistry::bindings`]
//! to attach real listeners, and tests or the CLI feed [`Event`]s straight
//! into [`crate::Page::handle`].

use crate::surface::{Surface, EXPORT_BUTTON_ID, MODE_TOGGLE_ID};
use crate::variant::PageConfig;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// Document finished loading
    Load,
    /// Checkbox state changed
    Change,
    Click,
}

/// Element an event fires on
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Document,
    /// Category checkbox, by value
    Checkbox(String),
    ModeToggle,
    /// Engagement toggle, by time position
    EngageToggle(u64),
    ExportTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateVisibility,
    ToggleMode,
    ToggleEngagement,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: Target,
}

impl Event {
    pub fn new(kind: EventKind, target: Target) -> Self {
        Self { kind, target }
    }

    pub fn load() -> Self {
        Self::new(EventKind::Load, Target::Document)
    }

    pub fn checkbox_change(key: impl Into<String>) -> Self {
        Self::new(EventKind::Change, Target::Checkbox(key.into()))
    }

    pub fn click(target: Target) -> Self {
        Self::new(EventKind::Click, target)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    handlers: BTreeMap<(EventKind, Target), Action>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action, returning the one it replaced
    pub fn register(&mut self, kind: EventKind, target: Target, action: Action) -> Option<Action> {
        self.handlers.insert((kind, target), action)
    }

    pub fn lookup(&self, event: &Event) -> Option<Action> {
        self.handlers
            .get(&(event.kind, event.target.clone()))
            .copied()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (EventKind, &Target, Action)> + '_ {
        self.handlers
            .iter()
            .map(|((kind, target), action)| (*kind, target, *action))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registry for every control present on `surface`
    pub fn for_surface<S: Surface + ?Sized>(surface: &S, config: &PageConfig) -> Self {
        let mut registry = Self::new();
        registry.register(EventKind::Load, Target::Document, Action::UpdateVisibility);

        for toggle in surface.toggles() {
            registry.register(
                EventKind::Change,
                Target::Checkbox(toggle.category_key),
                Action::UpdateVisibility,
            );
        }

        if config.has_catalog_mode() {
            if surface.has_element(MODE_TOGGLE_ID) {
                registry.register(EventKind::Click, Target::ModeToggle, Action::ToggleMode);
            }
            for time_position in surface.engage_toggles() {
                registry.register(
                    EventKind::Click,
                    Target::EngageToggle(time_position),
                    Action::ToggleEngagement,
                );
            }
            if surface.has_element(EXPORT_BUTTON_ID) {
                registry.register(EventKind::Click, Target::ExportTrigger, Action::Export);
            }
        }

        registry
    }
}
