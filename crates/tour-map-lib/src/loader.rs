//! Directory loader - draws every GPX file of a directory into one overlay group

use crate::{Color, ColoredTrack, MapError, OverlayGroup, Palette, Result, TrackError, TrackFile};
use std::path::{Path, PathBuf};

/// Suffix of the files picked up by [`load_tracks`]
pub const TRACK_FILE_EXTENSION: &str = ".gpx";

/// What happened to a single track file
#[derive(Debug)]
pub enum FileOutcome {
    /// Parsed and drawn
    Loaded {
        path: PathBuf,
        color: Color,
        polylines: usize,
        points: usize,
        length_meters: f64,
    },
    /// Skipped after an I/O or parse error
    Failed { path: PathBuf, error: TrackError },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Loaded { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Per-file outcomes of one directory load, in processing order
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl LoadSummary {
    pub fn loaded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.loaded_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &TrackError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed { path, error } => Some((path.as_path(), error)),
            FileOutcome::Loaded { .. } => None,
        })
    }

    pub fn polyline_count(&self) -> usize {
        self.loaded_stats().map(|(polylines, _, _)| polylines).sum()
    }

    pub fn point_count(&self) -> usize {
        self.loaded_stats().map(|(_, points, _)| points).sum()
    }

    pub fn length_meters(&self) -> f64 {
        self.loaded_stats().map(|(_, _, length)| length).sum()
    }

    fn loaded_stats(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Loaded {
                polylines,
                points,
                length_meters,
                ..
            } => Some((*polylines, *points, *length_meters)),
            FileOutcome::Failed { .. } => None,
        })
    }
}

/// List the track files of `directory`, sorted by file name
fn track_file_names(directory: &Path) -> Result<Vec<String>> {
    let read_dir_error = |source: std::io::Error| MapError::ReadDir {
        path: directory.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        match entry.file_name().into_string() {
            Ok(name) if name.ends_with(TRACK_FILE_EXTENSION) => names.push(name),
            Ok(name) => tracing::debug!("Ignoring non-track entry {name}"),
            Err(name) => tracing::debug!("Ignoring entry with non UTF-8 name {name:?}"),
        }
    }
    names.sort();
    Ok(names)
}

/// Load every track file of `directory` into `group`.
///
/// Files are processed in file name order. Each successfully parsed file takes the next
/// color of a fresh palette cycle; a file that fails to open or parse is logged, recorded
/// in the summary and does not consume a color. Only a directory that cannot be listed is
/// an error.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn load_tracks(
    directory: &Path,
    group: &mut OverlayGroup,
    palette: &Palette,
) -> Result<LoadSummary> {
    let mut cycle = palette.cycle();
    let mut summary = LoadSummary::default();

    for name in track_file_names(directory)? {
        let path = directory.join(&name);
        let file = match TrackFile::read(&path) {
            Ok(file) => file,
            Err(error) => {
                tracing::warn!("Error processing file {name}: {error}");
                summary.outcomes.push(FileOutcome::Failed { path, error });
                continue;
            }
        };

        let color = cycle.next_color();
        let points = file.total_points();
        let mut polylines = 0;
        let mut length_meters = 0.0;
        for polyline in ColoredTrack::new(name.as_str(), file, color).into_polylines() {
            length_meters += polyline.length_meters();
            polylines += 1;
            group.add_polyline(polyline);
        }

        tracing::debug!("Loaded {name}: {polylines} lines, {points} points, color {color}");
        summary.outcomes.push(FileOutcome::Loaded {
            path,
            color,
            polylines,
            points,
            length_meters,
        });
    }

    Ok(summary)
}
