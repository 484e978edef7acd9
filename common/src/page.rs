//! Page context
//!
//! Owns the surface, the current [`Mode`] and the event registry. Every
//! handler runs to completion inside [`Page::handle`].

use crate::collector::{self, ExportOutcome};
use crate::dispatch::{Action, Event, EventRegistry, Target};
use crate::error::Result;
use crate::filter::{self, VisibilitySummary};
use crate::mode::{self, Mode};
use crate::surface::Surface;
use crate::timestamp;
use crate::variant::PageConfig;

/// What a handled event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Visibility(VisibilitySummary),
    ModeChanged(Mode),
    EngagementToggled { time_position: u64, engaged: bool },
    Exported(ExportOutcome),
    /// No handler, or the control is inactive in the current mode
    Ignored,
}

type Clock = Box<dyn Fn() -> String>;

pub struct Page<S: Surface> {
    surface: S,
    config: PageConfig,
    mode: Mode,
    registry: EventRegistry,
    clock: Clock,
}

impl<S: Surface> Page<S> {
    pub fn new(surface: S, config: PageConfig) -> Self {
        Self {
            surface,
            config,
            mode: Mode::default(),
            registry: EventRegistry::new(),
            clock: Box::new(timestamp::export_timestamp_now),
        }
    }

    /// Replaces the source of export timestamps
    pub fn with_clock(mut self, clock: impl Fn() -> String + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Filters once, registers handlers and enters view mode
    pub fn initialize(&mut self) -> VisibilitySummary {
        let summary = filter::update_visibility(&mut self.surface);
        self.registry = EventRegistry::for_surface(&self.surface, &self.config);
        self.mode = Mode::View;
        if self.config.has_catalog_mode() {
            mode::apply_mode(&mut self.surface, self.mode);
        }
        tracing::debug!(handlers = self.registry.len(), "page initialized");
        summary
    }

    /// Runs the handler registered for `event`.
    ///
    /// Errors are shown to the user through the surface before being
    /// returned. Page state is left as it was.
    pub fn handle(&mut self, event: &Event) -> Result<Outcome> {
        let Some(action) = self.registry.lookup(event) else {
            tracing::debug!(?event, "no handler registered");
            return Ok(Outcome::Ignored);
        };

        let result = self.run(action, &event.target);
        if let Err(err) = &result {
            tracing::warn!(?action, error = %err, "handler failed");
            let message = match action {
                Action::Export => format!("Export failed: {}", err),
                _ => err.to_string(),
            };
            self.surface.notify(&message);
        }
        result
    }

    fn run(&mut self, action: Action, target: &Target) -> Result<Outcome> {
        match action {
            Action::UpdateVisibility => Ok(Outcome::Visibility(filter::update_visibility(
                &mut self.surface,
            ))),
            Action::ToggleMode => {
                self.mode = self.mode.toggled();
                mode::apply_mode(&mut self.surface, self.mode);
                Ok(Outcome::ModeChanged(self.mode))
            }
            Action::ToggleEngagement => {
                let &Target::EngageToggle(time_position) = target else {
                    return Ok(Outcome::Ignored);
                };
                self.surface.toggle_engaged(time_position);
                let engaged = self
                    .surface
                    .rows()
                    .iter()
                    .any(|r| r.time_position == Some(time_position) && r.engaged);
                Ok(Outcome::EngagementToggled {
                    time_position,
                    engaged,
                })
            }
            Action::Export => {
                let Some(variant) = self.config.export else {
                    return Ok(Outcome::Ignored);
                };
                if !self.mode.is_catalog() {
                    tracing::debug!("export trigger inactive in view mode");
                    return Ok(Outcome::Ignored);
                }
                let export_date = (self.clock)();
                collector::export(&mut self.surface, variant, export_date).map(Outcome::Exported)
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
