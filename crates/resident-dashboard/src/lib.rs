//! `resident_dashboard` - today's meals, events and photos for a community display
//!
//! The base record is a JSON document served from a path or URL. Admin edits
//! are kept as a whole-record override in a local key-value store and merged
//! over the base at load time. Pure selectors decide what a surface shows at
//! a given moment.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod record;
pub mod render;
pub mod selector;
pub mod storage;
pub mod surface;

pub use config::Config;
pub use error::{Error, Result};
pub use loader::{merge, source_for, BaseSource, FileSource, HttpSource, Loader};
pub use logging::init_logging;
pub use record::{DashboardRecord, Event, MealPlan, Photo, RecordOverride};
pub use selector::{DashboardView, MealBands};
pub use storage::{OverrideStore, OVERRIDE_KEY};
pub use surface::{run_surface, Surface, SurfaceHandle, SurfaceOptions};
