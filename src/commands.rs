//! Saved-page commands
//!
//! Drives a loaded page through the same event handling the browser uses:
//! checkbox changes, the mode switch, engagement toggles and the export
//! trigger. The CLI stands in for the page controls, so both controls are
//! always present on the surface it drives.

use crate::error::{CataidError, Result};
use crate::page_loader::{self, LoadedPage};
use cataid_common::surface::{DeliveredFile, EXPORT_BUTTON_ID, MODE_TOGGLE_ID};
use cataid_common::{
    collector, DisplayState, Event, ExportOutcome, ExportVariant, MemorySurface, Mode, Outcome,
    Page, PageField, Target,
};
use std::path::Path;

/// Display state of one row after inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub scene_type: String,
    pub label: String,
    pub time_position: Option<u64>,
    pub engaged: bool,
    pub display: DisplayState,
}

#[derive(Debug, Clone)]
pub struct InspectReport {
    pub mode: Mode,
    pub rows: Vec<RowReport>,
}

impl InspectReport {
    pub fn shown(&self) -> usize {
        self.rows.iter().filter(|r| r.display.is_shown()).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    pub show: Vec<String>,
    pub hide: Vec<String>,
    pub catalog: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub engage: Vec<u64>,
    pub variant: Option<ExportVariant>,
    pub cataloger: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub outcome: ExportOutcome,
    pub file: DeliveredFile,
}

fn start_page(loaded: LoadedPage) -> Page<MemorySurface> {
    let LoadedPage { config, mut surface } = loaded;
    if config.has_catalog_mode() {
        surface.elements.insert(MODE_TOGGLE_ID.to_string());
        surface.elements.insert(EXPORT_BUTTON_ID.to_string());
    }
    let mut page = Page::new(surface, config);
    page.initialize();
    page
}

fn set_checkbox(page: &mut Page<MemorySurface>, key: &str, checked: bool) -> Result<()> {
    if !page.surface_mut().set_checked(key, checked) {
        return Err(CataidError::UnknownCheckbox(key.to_string()));
    }
    page.handle(&Event::checkbox_change(key))?;
    Ok(())
}

fn enter_catalog_mode(page: &mut Page<MemorySurface>) -> Result<()> {
    if page.mode() != Mode::Catalog {
        page.handle(&Event::click(Target::ModeToggle))?;
    }
    Ok(())
}

pub fn inspect_page(path: &Path, options: &InspectOptions) -> Result<InspectReport> {
    let mut page = start_page(page_loader::load_page(path, None)?);

    for key in &options.show {
        set_checkbox(&mut page, key, true)?;
    }
    for key in &options.hide {
        set_checkbox(&mut page, key, false)?;
    }
    if options.catalog {
        if !page.config().has_catalog_mode() {
            return Err(CataidError::ExportUnavailable(path.display().to_string()));
        }
        enter_catalog_mode(&mut page)?;
    }

    let surface = page.surface();
    let rows = surface
        .rows
        .iter()
        .map(|r| RowReport {
            scene_type: r.row.scene_type.clone(),
            label: r.row.label.clone(),
            time_position: r.row.time_position,
            engaged: r.row.engaged,
            display: r.display.unwrap_or(DisplayState::Hidden),
        })
        .collect();

    Ok(InspectReport {
        mode: page.mode(),
        rows,
    })
}

pub fn export_page(
    path: &Path,
    options: &ExportOptions,
    default_cataloger: Option<String>,
) -> Result<ExportReport> {
    let mut loaded = page_loader::load_page(path, options.variant)?;
    if !loaded.config.has_catalog_mode() {
        return Err(CataidError::ExportUnavailable(path.display().to_string()));
    }

    if collector::page_text(&loaded.surface, PageField::Cataloger).is_none() {
        if let Some(name) = options.cataloger.clone().or(default_cataloger) {
            loaded.surface.page_fields.insert(PageField::Cataloger, name);
        }
    }

    let mut page = start_page(loaded);
    enter_catalog_mode(&mut page)?;

    for &time_position in &options.engage {
        match page.handle(&Event::click(Target::EngageToggle(time_position)))? {
            Outcome::EngagementToggled { engaged, .. } => {
                tracing::debug!(time_position, engaged, "engagement toggled");
            }
            _ => return Err(CataidError::UnknownTimePosition(time_position)),
        }
    }

    let outcome = match page.handle(&Event::click(Target::ExportTrigger))? {
        Outcome::Exported(outcome) => outcome,
        _ => return Err(CataidError::ExportUnavailable(path.display().to_string())),
    };

    let file = page
        .into_surface()
        .delivered
        .pop()
        .ok_or_else(|| CataidError::ExportUnavailable(outcome.file_name.clone()))?;

    Ok(ExportReport { outcome, file })
}
