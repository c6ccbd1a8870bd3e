//! Track parsing module
//!
//! GPX files are reduced to the part the map needs: tracks, their segments and the
//! latitude/longitude of each point. Elevation, time and waypoint metadata are dropped.

use crate::map::{LineStyle, Polyline};
use crate::{Color, TrackError};
use gpx::errors::GpxError;
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

/// Earth's radius in meters
const EARTH_RADIUS_M: f64 = 6371000.0;

/// A geographic position in degrees. Values are not range checked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in meters (Haversine formula)
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

/// GPX and geo store points as (x = lon, y = lat)
impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// Leaflet expects `[lat, lon]` pairs
impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.lat, self.lon).serialize(serializer)
    }
}

/// Ordered points in recording order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackSegment {
    pub points: Vec<GeoPoint>,
}

impl TrackSegment {
    /// A line needs at least two points
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

impl From<&gpx::TrackSegment> for TrackSegment {
    fn from(segment: &gpx::TrackSegment) -> Self {
        Self {
            points: segment
                .points
                .iter()
                .map(|waypoint| GeoPoint::from(waypoint.point()))
                .collect(),
        }
    }
}

/// One recorded track
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub segments: Vec<TrackSegment>,
}

impl From<&gpx::Track> for Track {
    fn from(track: &gpx::Track) -> Self {
        Self {
            name: track.name.clone(),
            segments: track.segments.iter().map(TrackSegment::from).collect(),
        }
    }
}

/// All tracks parsed from one GPX file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackFile {
    pub tracks: Vec<Track>,
}

impl TrackFile {
    /// Open and parse a GPX file. The file handle is closed before this returns.
    pub fn read(path: &Path) -> Result<Self, TrackError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse GPX from any reader.
    ///
    /// The `gpx` parser rejects coordinates outside [-90, 90] / [-180, 180]. Such files are
    /// read again with [`Self::from_xml_lenient`] so their points reach the map unchanged.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, TrackError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        match gpx::read(text.as_bytes()) {
            Ok(gpx) => Ok(Self::from(&gpx)),
            Err(error @ GpxError::LonLatOutOfBoundsError(..)) => {
                tracing::debug!("Reading track points without range checks: {error}");
                Self::from_xml_lenient(text.as_bytes())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Collect `trk/trkseg/trkpt` coordinates without validating their range
    pub fn from_xml_lenient<R: Read>(reader: R) -> Result<Self, TrackError> {
        let mut tracks: Vec<Track> = Vec::new();
        let mut open_elements: Vec<String> = Vec::new();

        for event in EventReader::new(reader) {
            match event? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    let parent = open_elements.last().map(String::as_str);
                    match (parent, name.local_name.as_str()) {
                        (Some("gpx"), "trk") => tracks.push(Track::default()),
                        (Some("trk"), "trkseg") => {
                            if let Some(track) = tracks.last_mut() {
                                track.segments.push(TrackSegment::default());
                            }
                        }
                        (Some("trkseg"), "trkpt") => {
                            let point = GeoPoint::new(
                                coordinate(&attributes, "lat")?,
                                coordinate(&attributes, "lon")?,
                            );
                            if let Some(segment) =
                                tracks.last_mut().and_then(|track| track.segments.last_mut())
                            {
                                segment.points.push(point);
                            }
                        }
                        _ => {}
                    }
                    open_elements.push(name.local_name);
                }
                XmlEvent::EndElement { .. } => {
                    open_elements.pop();
                }
                XmlEvent::Characters(text)
                    if matches!(open_elements.as_slice(), [.., trk, name] if trk == "trk" && name == "name") =>
                {
                    if let Some(track) = tracks.last_mut() {
                        track.name = Some(text);
                    }
                }
                _ => {}
            }
        }

        Ok(Self { tracks })
    }

    /// Iterate over every segment of every track, in file order
    pub fn segments(&self) -> impl Iterator<Item = &TrackSegment> {
        self.tracks.iter().flat_map(|track| track.segments.iter())
    }

    /// Total number of points across all tracks and segments
    pub fn total_points(&self) -> usize {
        self.segments().map(|segment| segment.points.len()).sum()
    }
}

/// Read a numeric `trkpt` attribute
fn coordinate(attributes: &[OwnedAttribute], attribute: &str) -> Result<f64, TrackError> {
    let value = attributes
        .iter()
        .find(|attr| attr.name.local_name == attribute)
        .map(|attr| attr.value.as_str())
        .ok_or_else(|| TrackError::InvalidPoint(format!("missing `{attribute}` attribute")))?;
    value
        .trim()
        .parse()
        .map_err(|_| TrackError::InvalidPoint(format!("invalid `{attribute}` value `{value}`")))
}

impl From<&gpx::Gpx> for TrackFile {
    fn from(gpx: &gpx::Gpx) -> Self {
        Self {
            tracks: gpx.tracks.iter().map(Track::from).collect(),
        }
    }
}

/// A parsed file together with the color assigned when it was loaded
#[derive(Clone, Debug)]
pub struct ColoredTrack {
    /// File name, used as the line tooltip
    pub label: String,
    pub file: TrackFile,
    pub color: Color,
}

impl ColoredTrack {
    pub fn new(label: impl Into<String>, file: TrackFile, color: Color) -> Self {
        Self {
            label: label.into(),
            file,
            color,
        }
    }

    /// One polyline per segment with at least two points, all in this file's color.
    /// The tooltip names the file, followed by the track name when the file has one.
    pub fn into_polylines(self) -> impl Iterator<Item = Polyline> {
        let style = LineStyle::track(self.color);
        let label = self.label;
        self.file.tracks.into_iter().flat_map(move |track| {
            let tooltip = match &track.name {
                Some(name) => format!("{label} - {name}"),
                None => label.clone(),
            };
            track
                .segments
                .into_iter()
                .filter(TrackSegment::is_drawable)
                .map(move |segment| {
                    Polyline::new(segment.points, style).with_tooltip(tooltip.clone())
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_waypoint(lat: f64, lon: f64) -> gpx::Waypoint {
        gpx::Waypoint::new(geo::Point::new(lon, lat))
    }

    fn create_test_segment(count: usize) -> TrackSegment {
        TrackSegment {
            points: (0..count)
                .map(|i| GeoPoint::new(51.5074 + i as f64 * 0.001, -0.1278))
                .collect(),
        }
    }

    fn create_test_gpx_xml(segments: &[usize]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="tests" xmlns="http://www.topografix.com/GPX/1/1"><trk><name>Test</name>"#,
        );
        for &count in segments {
            xml.push_str("<trkseg>");
            for i in 0..count {
                xml.push_str(&format!(
                    r#"<trkpt lat="{}" lon="{}"><ele>100</ele></trkpt>"#,
                    51.0 + i as f64 * 0.01,
                    10.0 + i as f64 * 0.01
                ));
            }
            xml.push_str("</trkseg>");
        }
        xml.push_str("</trk></gpx>");
        xml
    }

    #[test]
    fn test_geo_point_from_waypoint() {
        let waypoint = create_test_waypoint(51.5, -0.12);
        let point = GeoPoint::from(waypoint.point());
        assert_eq!(point, GeoPoint::new(51.5, -0.12));
    }

    #[test]
    fn test_geo_point_serializes_as_lat_lon_pair() {
        let json = serde_json::to_string(&GeoPoint::new(51.0, 10.5)).unwrap();
        assert_eq!(json, "[51.0,10.5]");
    }

    #[test]
    fn test_out_of_range_points_pass_through() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Offworld</name>
    <trkseg>
      <trkpt lat="95.0" lon="10.0"><ele>5</ele></trkpt>
      <trkpt lat="51.0" lon="200.0"></trkpt>
    </trkseg>
    <trkseg></trkseg>
  </trk>
</gpx>"#;
        let file = TrackFile::from_reader(xml.as_bytes()).unwrap();

        assert_eq!(file.tracks.len(), 1);
        assert_eq!(file.tracks[0].name.as_deref(), Some("Offworld"));
        assert_eq!(file.tracks[0].segments.len(), 2);
        assert_eq!(
            file.tracks[0].segments[0].points,
            vec![GeoPoint::new(95.0, 10.0), GeoPoint::new(51.0, 200.0)]
        );
    }

    #[test]
    fn test_lenient_read_rejects_bad_coordinates() {
        let xml = r#"<gpx version="1.1"><trk><trkseg><trkpt lat="95.0"></trkpt></trkseg></trk></gpx>"#;
        assert!(matches!(
            TrackFile::from_xml_lenient(xml.as_bytes()),
            Err(TrackError::InvalidPoint(_))
        ));

        let xml = r#"<gpx version="1.1"><trk><trkseg><trkpt lat="north" lon="1"/></trkseg></trk></gpx>"#;
        assert!(matches!(
            TrackFile::from_xml_lenient(xml.as_bytes()),
            Err(TrackError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_lenient_read_rejects_malformed_xml() {
        let result = TrackFile::from_xml_lenient("<gpx><trk><trkseg".as_bytes());
        assert!(matches!(result, Err(TrackError::Xml(_))));
    }

    #[test]
    fn test_haversine_distance() {
        let a = GeoPoint::new(51.5074, -0.1278);
        let b = GeoPoint::new(51.5084, -0.1278);
        // 0.001 degrees of latitude is roughly 111 m
        let distance = a.haversine_distance(&b);
        assert!(distance > 100.0);
        assert!(distance < 125.0);
        assert_eq!(a.haversine_distance(&a), 0.0);
    }

    #[test]
    fn test_parse_gpx_from_reader() {
        let xml = create_test_gpx_xml(&[5, 0]);
        let file = TrackFile::from_reader(xml.as_bytes()).unwrap();

        assert_eq!(file.tracks.len(), 1);
        assert_eq!(file.tracks[0].name.as_deref(), Some("Test"));
        assert_eq!(file.tracks[0].segments.len(), 2);
        assert_eq!(file.total_points(), 5);
        assert_eq!(file.tracks[0].segments[0].points[0], GeoPoint::new(51.0, 10.0));
    }

    #[test]
    fn test_parse_invalid_xml_fails() {
        let result = TrackFile::from_reader("<gpx><trk>".as_bytes());
        assert!(matches!(result, Err(TrackError::GpxParse(_))));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let result = TrackFile::read(Path::new("/nonexistent/track.gpx"));
        assert!(matches!(result, Err(TrackError::Io(_))));
    }

    #[test]
    fn test_polylines_skip_short_segments() {
        let file = TrackFile {
            tracks: vec![Track {
                name: None,
                segments: vec![
                    create_test_segment(5),
                    create_test_segment(0),
                    create_test_segment(1),
                    create_test_segment(2),
                ],
            }],
        };
        let polylines: Vec<Polyline> = ColoredTrack::new("a.gpx", file, Color::Red)
            .into_polylines()
            .collect();

        assert_eq!(polylines.len(), 2);
        assert_eq!(polylines[0].points.len(), 5);
        assert_eq!(polylines[1].points.len(), 2);
        for polyline in &polylines {
            assert_eq!(polyline.style.color, Color::Red);
            assert_eq!(polyline.style.weight, 2.5);
            assert_eq!(polyline.style.opacity, 1.0);
            assert_eq!(polyline.tooltip.as_deref(), Some("a.gpx"));
        }
    }

    #[test]
    fn test_polylines_span_all_tracks() {
        let file = TrackFile {
            tracks: vec![
                Track {
                    name: Some("Morning loop".to_string()),
                    segments: vec![create_test_segment(3)],
                },
                Track {
                    name: None,
                    segments: vec![create_test_segment(3)],
                },
            ],
        };
        let tooltips: Vec<Option<String>> = ColoredTrack::new("b.gpx", file, Color::Blue)
            .into_polylines()
            .map(|polyline| polyline.tooltip)
            .collect();
        assert_eq!(
            tooltips,
            vec![
                Some("b.gpx - Morning loop".to_string()),
                Some("b.gpx".to_string())
            ]
        );
    }
}
