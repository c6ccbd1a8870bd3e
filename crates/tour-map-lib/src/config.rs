//! Fixed run configuration

use crate::GeoPoint;
use std::path::PathBuf;

/// Configuration for one map rendering run
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Directory with finished tours
    pub tours_dir: PathBuf,
    /// Directory with planned tours
    pub planned_tours_dir: PathBuf,
    /// Output HTML document
    pub output: PathBuf,
    /// Initial map center
    pub center: GeoPoint,
    /// Initial zoom level
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tours_dir: PathBuf::from("./tours"),
            planned_tours_dir: PathBuf::from("./planned_tours"),
            output: PathBuf::from("map.html"),
            center: GeoPoint::new(51.0, 10.0),
            zoom: 12,
        }
    }
}
