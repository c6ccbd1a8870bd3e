use clap::Parser;
use std::path::PathBuf;
use tour_map_lib::{GeoPoint, MapConfig};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Tour Map - Render finished and planned GPX tours into a single interactive HTML map
pub struct Settings {
    /// Directory with finished tours
    #[clap(long, value_name = "DIR", default_value = "./tours")]
    pub tours_dir: PathBuf,

    /// Directory with planned tours
    #[clap(long, value_name = "DIR", default_value = "./planned_tours")]
    pub planned_tours_dir: PathBuf,

    /// Output HTML file, overwritten on every run
    #[clap(short, long, value_name = "FILE", default_value = "map.html")]
    pub output: PathBuf,

    /// Latitude of the initial map center
    #[clap(long, default_value = "51.0", allow_negative_numbers = true)]
    pub center_lat: f64,

    /// Longitude of the initial map center
    #[clap(long, default_value = "10.0", allow_negative_numbers = true)]
    pub center_lon: f64,

    /// Initial zoom level
    #[clap(short, long, default_value = "12")]
    pub zoom: u8,

    /// Abort once more than this many track files failed to load
    #[clap(long, value_name = "N")]
    pub max_failures: Option<usize>,
}

impl Settings {
    /// Parse the command line, exiting with usage information on invalid arguments
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            tours_dir: self.tours_dir.clone(),
            planned_tours_dir: self.planned_tours_dir.clone(),
            output: self.output.clone(),
            center: GeoPoint::new(self.center_lat, self.center_lon),
            zoom: self.zoom,
        }
    }
}
