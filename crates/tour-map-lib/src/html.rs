//! HTML document writer
//!
//! The sealed map is embedded as JSON in a Leaflet page. A small script builds the tile
//! layers, the overlay groups with their polylines, and the layer control from that data,
//! so the page needs nothing but the Leaflet CDN at view time.

use crate::{Result, SealedMap};

/// Placeholder replaced by the serialized map
const MAP_DATA_PLACEHOLDER: &str = "__MAP_DATA__";

pub(crate) const MAP_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Tour Map</title>
  <link
    rel="stylesheet"
    href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
    integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY="
    crossorigin=""
  />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { height: 100%; width: 100%; }
  </style>
</head>
<body>
  <div id="map"></div>

  <script
    src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
    integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo="
    crossorigin=""
  ></script>

  <script>
    const mapData = __MAP_DATA__;

    const map = L.map('map', { center: mapData.center, zoom: mapData.zoom });

    const baseLayers = {};
    mapData.tile_layers.forEach((layer, index) => {
      const tiles = L.tileLayer(layer.url, {
        attribution: layer.attribution,
        subdomains: layer.subdomains,
        maxZoom: layer.max_zoom,
      });
      if (index === 0) {
        tiles.addTo(map);
      }
      baseLayers[layer.name] = tiles;
    });

    const overlays = {};
    mapData.overlays.forEach((group) => {
      const featureGroup = L.featureGroup();
      group.polylines.forEach((line) => {
        const polyline = L.polyline(line.points, line.style);
        if (line.tooltip) {
          polyline.bindTooltip(line.tooltip);
        }
        polyline.addTo(featureGroup);
      });
      if (group.show) {
        featureGroup.addTo(map);
      }
      overlays[group.name] = featureGroup;
    });

    L.control
      .layers(baseLayers, overlays, {
        position: mapData.control.position,
        collapsed: mapData.control.collapsed,
      })
      .addTo(map);
  </script>
</body>
</html>
"#;

/// Render a sealed map as a standalone HTML page
pub fn render(map: &SealedMap) -> Result<String> {
    #[cfg(feature = "profiling")]
    profiling::scope!("html::render");

    let data = script_safe_json(&serde_json::to_string(map)?);
    Ok(MAP_HTML.replacen(MAP_DATA_PLACEHOLDER, &data, 1))
}

/// Keep JSON from closing the surrounding `<script>` element
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, GeoPoint, LineStyle, MapDocument, Polyline};

    fn create_test_map() -> SealedMap {
        let mut map = MapDocument::new(GeoPoint::new(51.0, 10.0), 12);
        map.add_all_tile_layers();
        map.add_overlay_group("Finished Tours", true).add_polyline(
            Polyline::new(
                vec![GeoPoint::new(51.0, 10.0), GeoPoint::new(51.5, 10.5)],
                LineStyle::track(Color::Green),
            )
            .with_tooltip("</script><b>x</b>.gpx"),
        );
        map.add_overlay_group("Planned Tours", true);
        map.finalize().unwrap()
    }

    fn extract_map_data(html: &str) -> serde_json::Value {
        let start = html.find("const mapData = ").unwrap() + "const mapData = ".len();
        let end = start + html[start..].find(";\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_render_embeds_map_data() {
        let html = render(&create_test_map()).unwrap();
        assert!(!html.contains(MAP_DATA_PLACEHOLDER));

        let data = extract_map_data(&html);
        assert_eq!(data["center"], serde_json::json!([51.0, 10.0]));
        assert_eq!(data["zoom"], 12);
        assert_eq!(data["tile_layers"].as_array().unwrap().len(), 6);
        assert_eq!(data["overlays"][0]["name"], "Finished Tours");
        assert_eq!(data["overlays"][1]["name"], "Planned Tours");
        assert_eq!(data["overlays"][0]["polylines"][0]["style"]["color"], "green");
        assert_eq!(data["control"]["collapsed"], true);
    }

    #[test]
    fn test_render_escapes_script_terminators() {
        let html = render(&create_test_map()).unwrap();
        assert_eq!(html.matches("</script>").count(), 2);

        let data = extract_map_data(&html);
        assert_eq!(
            data["overlays"][0]["polylines"][0]["tooltip"],
            "</script><b>x</b>.gpx"
        );
    }

    #[test]
    fn test_render_includes_layer_control() {
        let html = render(&create_test_map()).unwrap();
        assert!(html.contains("L.control"));
        assert!(html.contains(".layers(baseLayers, overlays"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render(&create_test_map()).unwrap();
        let second = render(&create_test_map()).unwrap();
        assert_eq!(first, second);
    }
}
