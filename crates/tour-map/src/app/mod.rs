pub(crate) mod settings;

use std::path::{Path, PathBuf};
use tour_map_lib::{LoadSummary, MapConfig, MapDocument, MapError, Palette, load_tracks};

/// Overlay group for `MapConfig::tours_dir`
pub const FINISHED_TOURS: &str = "Finished Tours";

/// Overlay group for `MapConfig::planned_tours_dir`
pub const PLANNED_TOURS: &str = "Planned Tours";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("{failures} track files failed to load (limit {max_failures})")]
    TooManyFailures {
        failures: usize,
        max_failures: usize,
    },
}

/// Result of a successful run
#[derive(Debug)]
pub struct RunReport {
    pub output: PathBuf,
    pub finished: LoadSummary,
    pub planned: LoadSummary,
}

/// Build the map from both tour directories and write it to `config.output`.
///
/// `max_failures` aborts the run once more track files than that failed to load.
pub fn run(config: &MapConfig, max_failures: Option<usize>) -> Result<RunReport, AppError> {
    let palette = Palette::default();

    let mut map = MapDocument::new(config.center, config.zoom);
    map.add_all_tile_layers();

    let finished = load_directory(&mut map, &config.tours_dir, FINISHED_TOURS, &palette)?;
    check_failures(finished.failed_count(), max_failures)?;
    let planned = load_directory(&mut map, &config.planned_tours_dir, PLANNED_TOURS, &palette)?;
    check_failures(finished.failed_count() + planned.failed_count(), max_failures)?;

    let sealed = map.finalize()?;
    sealed.save(&config.output)?;

    Ok(RunReport {
        output: config.output.clone(),
        finished,
        planned,
    })
}

fn load_directory(
    map: &mut MapDocument,
    dir: &Path,
    name: &str,
    palette: &Palette,
) -> Result<LoadSummary, AppError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("load_directory");
    let summary = load_tracks(dir, map.add_overlay_group(name, true), palette)?;
    log_summary(name, dir, &summary);
    Ok(summary)
}

fn check_failures(failures: usize, max_failures: Option<usize>) -> Result<(), AppError> {
    match max_failures {
        Some(max_failures) if failures > max_failures => Err(AppError::TooManyFailures {
            failures,
            max_failures,
        }),
        _ => Ok(()),
    }
}

fn log_summary(name: &str, dir: &Path, summary: &LoadSummary) {
    tracing::info!(
        "{name}: {} files from {} drawn as {} lines ({} points, {:.1} km)",
        summary.loaded_count(),
        dir.display(),
        summary.polyline_count(),
        summary.point_count(),
        summary.length_meters() / 1000.0
    );
    if summary.failed_count() > 0 {
        tracing::warn!("{name}: skipped {} files", summary.failed_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failures() {
        assert!(check_failures(3, None).is_ok());
        assert!(check_failures(2, Some(2)).is_ok());
        assert!(matches!(
            check_failures(3, Some(2)),
            Err(AppError::TooManyFailures {
                failures: 3,
                max_failures: 2
            })
        ));
    }
}
