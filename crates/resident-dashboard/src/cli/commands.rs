//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::editor::{EventDraft, EventPatch, PhotoPatch};
use crate::surface::Surface;

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Surface layout to render
    #[arg(short, long, value_enum, default_value = "slideshow")]
    pub surface: SurfaceArg,

    /// Render as of this local time ("YYYY-MM-DD HH:MM") instead of now
    #[arg(long, value_name = "WHEN")]
    pub at: Option<String>,

    /// Output the view as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Watch command arguments.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Surface layout to run
    #[arg(short, long, value_enum, default_value = "slideshow")]
    pub surface: SurfaceArg,

    /// Stop after this many clock ticks
    #[arg(long)]
    pub ticks: Option<u64>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Admin editing commands. Every edit is saved on this device only.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Set one or more of today's meals
    Meals {
        /// Breakfast menu line
        #[arg(long)]
        breakfast: Option<String>,

        /// Lunch menu line
        #[arg(long)]
        lunch: Option<String>,

        /// Dinner menu line
        #[arg(long)]
        dinner: Option<String>,
    },

    /// Manage events
    #[command(subcommand)]
    Event(EventCommand),

    /// Manage slideshow photos
    #[command(subcommand)]
    Photo(PhotoCommand),

    /// Discard local edits and return to the base data
    Reset,

    /// Write the merged record as formatted JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = crate::export::DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
}

/// Event editing commands.
#[derive(Debug, Subcommand)]
pub enum EventCommand {
    /// List events in date and time order
    List,

    /// Add an event
    Add(EventFields),

    /// Update an event
    Update {
        /// Event id
        id: String,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Remove an event
    Remove {
        /// Event id
        id: String,
    },
}

/// Event fields shared by `add` and `update`.
#[derive(Debug, Args, Default)]
pub struct EventFields {
    /// Date as YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    /// Time as HH:MM (24-hour)
    #[arg(long)]
    pub time: Option<String>,

    /// Title
    #[arg(long)]
    pub title: Option<String>,

    /// Location
    #[arg(long)]
    pub location: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,
}

impl From<EventFields> for EventDraft {
    fn from(fields: EventFields) -> Self {
        Self {
            date: fields.date,
            time: fields.time,
            title: fields.title,
            location: fields.location,
            description: fields.description,
        }
    }
}

impl From<EventFields> for EventPatch {
    fn from(fields: EventFields) -> Self {
        Self {
            date: fields.date,
            time: fields.time,
            title: fields.title,
            location: fields.location,
            description: fields.description,
        }
    }
}

/// Photo editing commands. Photos are numbered from 1 as shown by `list`.
#[derive(Debug, Subcommand)]
pub enum PhotoCommand {
    /// List photos
    List,

    /// Append a photo
    Add {
        /// Image URL or path
        url: String,

        /// Alternative text
        #[arg(long, default_value = "")]
        alt: String,
    },

    /// Update a photo
    Update {
        /// Photo number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,

        /// New image URL or path
        #[arg(long)]
        url: Option<String>,

        /// New alternative text
        #[arg(long)]
        alt: Option<String>,
    },

    /// Remove a photo
    Remove {
        /// Photo number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,
    },
}

impl PhotoCommand {
    /// Build the patch for an `update` command.
    #[must_use]
    pub fn patch(url: Option<String>, alt: Option<String>) -> PhotoPatch {
        PhotoPatch { url, alt }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Surface argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceArg {
    /// Photo frame with clock and one info line
    Frame,
    /// Large photo above the board
    Hero,
    /// Board with a small slideshow
    Slideshow,
}

impl From<SurfaceArg> for Surface {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Frame => Self::Frame,
            SurfaceArg::Hero => Self::Hero,
            SurfaceArg::Slideshow => Self::Slideshow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_arg_conversion() {
        assert_eq!(Surface::from(SurfaceArg::Frame), Surface::Frame);
        assert_eq!(Surface::from(SurfaceArg::Hero), Surface::Hero);
        assert_eq!(Surface::from(SurfaceArg::Slideshow), Surface::Slideshow);
    }

    #[test]
    fn test_event_fields_into_draft() {
        let fields = EventFields {
            title: Some("Bingo".to_string()),
            time: Some("14:00".to_string()),
            ..EventFields::default()
        };
        let draft = EventDraft::from(fields);
        assert_eq!(draft.title.as_deref(), Some("Bingo"));
        assert_eq!(draft.time.as_deref(), Some("14:00"));
        assert!(draft.date.is_none());
        assert!(draft.location.is_none());
    }

    #[test]
    fn test_event_fields_into_patch() {
        let fields = EventFields {
            location: Some("Library".to_string()),
            ..EventFields::default()
        };
        let patch = EventPatch::from(fields);
        assert_eq!(patch.location.as_deref(), Some("Library"));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_photo_patch() {
        let patch = PhotoCommand::patch(None, Some("Garden".to_string()));
        assert!(patch.url.is_none());
        assert_eq!(patch.alt.as_deref(), Some("Garden"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
