//! Map document builder
//!
//! A [`MapDocument`] is built up with tile layers and overlay groups, then sealed by
//! [`MapDocument::finalize`]. Only the resulting [`SealedMap`] can be saved, so the layer
//! control is always attached before the document is written.

use crate::{Color, GeoPoint, MapError, Result, html};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Stroke weight of a track line in pixels
pub const TRACK_LINE_WEIGHT: f64 = 2.5;

/// Opacity of a track line
pub const TRACK_LINE_OPACITY: f64 = 1.0;

/// Available base map tile providers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileProvider {
    OpenStreetMap,
    StamenTerrain,
    StamenToner,
    StamenWatercolor,
    CartoDbPositron,
    CartoDbDarkMatter,
}

impl TileProvider {
    pub fn url(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::StamenTerrain => {
                "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}{r}.png"
            }
            Self::StamenToner => "https://tiles.stadiamaps.com/tiles/stamen_toner/{z}/{x}/{y}{r}.png",
            Self::StamenWatercolor => {
                "https://tiles.stadiamaps.com/tiles/stamen_watercolor/{z}/{x}/{y}.jpg"
            }
            Self::CartoDbPositron => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            Self::CartoDbDarkMatter => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
            Self::StamenTerrain | Self::StamenToner | Self::StamenWatercolor => {
                "&copy; <a href=\"https://stadiamaps.com/\">Stadia Maps</a> &copy; <a href=\"https://stamen.com/\">Stamen Design</a> &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
            Self::CartoDbPositron | Self::CartoDbDarkMatter => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
            }
        }
    }

    pub fn subdomains(&self) -> &'static str {
        match self {
            Self::CartoDbPositron | Self::CartoDbDarkMatter => "abcd",
            _ => "abc",
        }
    }

    pub fn max_zoom(&self) -> u8 {
        match self {
            Self::StamenWatercolor => 16,
            Self::OpenStreetMap => 19,
            _ => 20,
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::OpenStreetMap,
            Self::StamenTerrain,
            Self::StamenToner,
            Self::StamenWatercolor,
            Self::CartoDbPositron,
            Self::CartoDbDarkMatter,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::StamenTerrain => "Stamen Terrain",
            Self::StamenToner => "Stamen Toner",
            Self::StamenWatercolor => "Stamen Watercolor",
            Self::CartoDbPositron => "CartoDB Positron",
            Self::CartoDbDarkMatter => "CartoDB Dark Matter",
        }
    }
}

/// One selectable base layer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub url: &'static str,
    pub attribution: &'static str,
    pub subdomains: &'static str,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn new(provider: TileProvider, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: provider.url(),
            attribution: provider.attribution(),
            subdomains: provider.subdomains(),
            max_zoom: provider.max_zoom(),
        }
    }
}

/// Line appearance
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: Color,
    pub weight: f64,
    pub opacity: f64,
}

impl LineStyle {
    /// Style shared by all track lines, only the color varies
    pub fn track(color: Color) -> Self {
        Self {
            color,
            weight: TRACK_LINE_WEIGHT,
            opacity: TRACK_LINE_OPACITY,
        }
    }
}

/// A connected line through ordered points
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polyline {
    pub points: Vec<GeoPoint>,
    pub style: LineStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>, style: LineStyle) -> Self {
        Self {
            points,
            style,
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Length of the line in meters
    pub fn length_meters(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].haversine_distance(&pair[1]))
            .sum()
    }
}

/// Named, toggleable container of polylines
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlayGroup {
    pub name: String,
    pub show: bool,
    pub polylines: Vec<Polyline>,
}

impl OverlayGroup {
    pub fn new(name: impl Into<String>, show: bool) -> Self {
        Self {
            name: name.into(),
            show,
            polylines: Vec::new(),
        }
    }

    pub fn add_polyline(&mut self, polyline: Polyline) {
        self.polylines.push(polyline);
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }
}

/// Layer switcher listing every tile layer and overlay group
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayerControl {
    pub position: &'static str,
    pub collapsed: bool,
}

impl Default for LayerControl {
    fn default() -> Self {
        Self {
            position: "topright",
            collapsed: true,
        }
    }
}

/// A map under construction
#[derive(Debug)]
pub struct MapDocument {
    center: GeoPoint,
    zoom: u8,
    tile_layers: Vec<TileLayer>,
    overlays: Vec<OverlayGroup>,
}

impl MapDocument {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            tile_layers: Vec::new(),
            overlays: Vec::new(),
        }
    }

    /// Register a base layer. The first registered layer is shown when the page opens.
    pub fn add_tile_layer(&mut self, provider: TileProvider, name: impl Into<String>) -> &mut Self {
        self.tile_layers.push(TileLayer::new(provider, name));
        self
    }

    /// Register every known provider under its own name
    pub fn add_all_tile_layers(&mut self) -> &mut Self {
        for provider in TileProvider::all() {
            self.add_tile_layer(*provider, provider.name());
        }
        self
    }

    /// Create an empty overlay group and return it for loading
    pub fn add_overlay_group(&mut self, name: impl Into<String>, show: bool) -> &mut OverlayGroup {
        self.overlays.push(OverlayGroup::new(name, show));
        let last = self.overlays.len() - 1;
        &mut self.overlays[last]
    }

    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    pub fn overlays(&self) -> &[OverlayGroup] {
        &self.overlays
    }

    /// Attach the layer control and seal the document
    pub fn finalize(self) -> Result<SealedMap> {
        if self.tile_layers.is_empty() {
            return Err(MapError::NoTileLayers);
        }

        let mut names = HashSet::new();
        let layer_names = self
            .tile_layers
            .iter()
            .map(|layer| &layer.name)
            .chain(self.overlays.iter().map(|group| &group.name));
        for name in layer_names {
            if !names.insert(name) {
                return Err(MapError::DuplicateLayerName(name.clone()));
            }
        }

        Ok(SealedMap {
            center: self.center,
            zoom: self.zoom,
            tile_layers: self.tile_layers,
            overlays: self.overlays,
            control: LayerControl::default(),
        })
    }
}

/// A finished map, ready to be written
#[derive(Debug, Serialize)]
pub struct SealedMap {
    center: GeoPoint,
    zoom: u8,
    tile_layers: Vec<TileLayer>,
    overlays: Vec<OverlayGroup>,
    control: LayerControl,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SealedMap {
    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    pub fn overlays(&self) -> &[OverlayGroup] {
        &self.overlays
    }

    pub fn overlay(&self, name: &str) -> Option<&OverlayGroup> {
        self.overlays.iter().find(|group| group.name == name)
    }

    pub fn control(&self) -> &LayerControl {
        &self.control
    }

    /// Render the map as a standalone HTML page
    pub fn to_html(&self) -> Result<String> {
        html::render(self)
    }

    /// Write the HTML page to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let document = self.to_html()?;
        std::fs::write(path, document).map_err(|source| MapError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
