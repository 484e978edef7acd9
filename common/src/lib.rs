//! Cataid Common Library
//!
//! Engine behind the visaid/cataid review pages: scene filtering, the
//! view/catalog mode switch and the catalog edit export. Shared by the
//! browser binding (WASM) and the CLI.

pub mod types;
pub mod error;
pub mod surface;
pub mod filter;
pub mod mode;
pub mod timestamp;
pub mod variant;
pub mod collector;
pub mod dispatch;
pub mod page;
pub mod catout;
pub mod export;

pub use types::{
    BasicItem, CatalogItem, DisplayState, EditRecord, ExportBundle, FilterToggle, Row,
    SceneToggles, SUBSAMPLE_SENTINEL, SUBSAMPLE_TOGGLE,
};
pub use error::{Error, Result};
pub use surface::{FragmentKind, MemoryRow, MemorySurface, PageField, Surface};
pub use filter::{is_visible, update_visibility, VisibilitySummary};
pub use mode::{apply_mode, Mode};
pub use timestamp::{export_timestamp, export_timestamp_now, truncate_iso_timestamp};
pub use variant::{ExportVariant, PageConfig};
pub use collector::{collect_bundle, export, ExportOutcome};
pub use dispatch::{Action, Event, EventKind, EventRegistry, Target};
pub use page::{Outcome, Page};
pub use catout::{parse_catout, parse_editor_text, tablify_bundle, CatoutRow};
