//! Tour Map Library - GPX loading and map document rendering
//!
//! This library turns directories of GPX files into a single interactive map document.
//! Each directory is loaded into its own toggleable overlay group, each file gets one color
//! from a repeating palette, and the finished map is written as a self-contained HTML page.
//!
//! # Architecture
//!
//! - **[`TrackFile`]**: Parsed GPX data reduced to tracks, segments and points
//! - **[`Palette`]**: Fixed color list with an explicit per-directory [`PaletteCycle`]
//! - **[`load_tracks`]**: Directory scan that draws every parsed file into an [`OverlayGroup`]
//! - **[`MapDocument`]**: Builder for tile layers and overlay groups, sealed into a [`SealedMap`]
//! - **[`SealedMap::save`]**: Serializes the sealed map to HTML

mod config;
mod loader;
mod map;
mod palette;
mod track;
pub mod html;

// Public API exports
pub use config::MapConfig;
pub use loader::{FileOutcome, LoadSummary, TRACK_FILE_EXTENSION, load_tracks};
pub use map::{
    LayerControl, LineStyle, MapDocument, OverlayGroup, Polyline, SealedMap, TileLayer,
    TileProvider,
};
pub use palette::{Color, Palette, PaletteCycle};
pub use track::{ColoredTrack, GeoPoint, Track, TrackFile, TrackSegment};

use std::path::PathBuf;

/// Errors for a single track file. These are recovered by the loader.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("Invalid track point: {0}")]
    InvalidPoint(String),
}

/// Errors that end a run
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Cannot list track directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Palette must contain at least one color")]
    EmptyPalette,

    #[error("Map has no tile layers")]
    NoTileLayers,

    #[error("Duplicate layer name: {0}")]
    DuplicateLayerName(String),

    #[error("Cannot write map document {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Map serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
