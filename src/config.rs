//! Dashboard configuration
//!
//! One JSON document drives the whole scene. Every field is optional; the
//! defaults reproduce the stock globe look. Colors are hex strings
//! (`"#20a4f3"`); a bad value logs a warning and falls back instead of
//! failing the load.

use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Which dashboard variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapMode {
    #[default]
    Globe,
    Flat,
}

/// Root options document, available as a resource for the whole app.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    pub mode: MapMode,
    /// Projection preset name for the flat-map variant.
    pub map_name: String,
    /// GeoJSON file for the flat-map variant's regions.
    pub map_data: String,
    pub camera: CameraOptions,
    pub light: LightOptions,
    pub sunshine: SunshineOptions,
    pub grid_helper: GridHelperOptions,
    pub axes_helper: AxesHelperOptions,
    pub earth: EarthOptions,
    pub cloud: CloudOptions,
    pub aperture: ApertureOptions,
    pub starrysky: StarfieldOptions,
    pub borders: Vec<BorderLayerOptions>,
    pub area: AreaOptions,
    pub label: LabelOptions,
    pub hover: HoverOptions,
    pub beam: BeamOptions,
    pub flight: FlightOptions,
    pub map_position: [f32; 3],
    /// Overlays spawned at startup; the host replaces them at runtime
    /// through the command channel.
    pub overlays: OverlayData,
}

impl DashboardOptions {
    /// Load options from a JSON file. A missing file is not an error: the
    /// dashboard runs with pure defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let options: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(options)
    }

    /// Globe radius in world units. The document value (default 10) maps to
    /// world units at a tenth, so the stock globe has radius 1.
    pub fn globe_radius(&self) -> f32 {
        self.earth.radius * 0.1
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [10.0, 10.0, 10.0],
            min_distance: 5.0,
            max_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LightOptions {
    pub directional_light: DirectionalLightOptions,
    pub ambient_light: AmbientLightOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectionalLightOptions {
    pub color: String,
    pub intensity: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub helper: HelperOptions,
}

impl Default for DirectionalLightOptions {
    fn default() -> Self {
        Self {
            color: "#ffffff".into(),
            intensity: 1.0,
            x: 30.0,
            y: 20.0,
            z: 50.0,
            helper: HelperOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AmbientLightOptions {
    pub color: String,
    pub intensity: f32,
}

impl Default for AmbientLightOptions {
    fn default() -> Self {
        Self {
            color: "#ffffff".into(),
            intensity: 0.6,
        }
    }
}

/// Lens-flare style glow sprite riding the key light.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SunshineOptions {
    pub show: bool,
    pub color: String,
    pub opacity: f32,
    pub size: f32,
}

impl Default for SunshineOptions {
    fn default() -> Self {
        Self {
            show: false,
            color: "#ffffee".into(),
            opacity: 0.6,
            size: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HelperOptions {
    pub show: bool,
    pub size: f32,
    pub color: String,
}

impl Default for HelperOptions {
    fn default() -> Self {
        Self {
            show: false,
            size: 5.0,
            color: "#ff00ff".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridHelperOptions {
    pub show: bool,
    pub width: f32,
    pub divisions: u32,
    pub color: String,
    pub opacity: f32,
}

impl Default for GridHelperOptions {
    fn default() -> Self {
        Self {
            show: false,
            width: 500.0,
            divisions: 500,
            color: "#ffffff".into(),
            opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesHelperOptions {
    pub show: bool,
    pub size: f32,
}

impl Default for AxesHelperOptions {
    fn default() -> Self {
        Self {
            show: false,
            size: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EarthOptions {
    pub radius: f32,
    pub subdivision: u32,
    pub texture: String,
    pub texture_show: bool,
    pub color: String,
    pub wireframe: bool,
    pub opacity: f32,
    /// Ambient spin, in 1e-4 radians per frame.
    pub speed: f32,
}

impl Default for EarthOptions {
    fn default() -> Self {
        Self {
            radius: 10.0,
            subdivision: 64,
            texture: String::new(),
            texture_show: false,
            color: "#0a2d5c".into(),
            wireframe: false,
            opacity: 1.0,
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloudOptions {
    pub show: bool,
    pub texture: String,
    pub opacity: f32,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            show: false,
            texture: String::new(),
            opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApertureOptions {
    pub show: bool,
    pub color: String,
    pub opacity: f32,
}

impl Default for ApertureOptions {
    fn default() -> Self {
        Self {
            show: false,
            color: "#4c99e6".into(),
            opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarfieldOptions {
    pub show: bool,
    pub number: u32,
}

impl Default for StarfieldOptions {
    fn default() -> Self {
        Self {
            show: true,
            number: 500,
        }
    }
}

/// One GeoJSON border layer: `key` names the overlay group, `file` the
/// document to load.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BorderLayerOptions {
    pub key: String,
    pub file: String,
    pub show: bool,
    pub color: String,
    pub line_width: f32,
    pub opacity: f32,
}

impl Default for BorderLayerOptions {
    fn default() -> Self {
        Self {
            key: String::new(),
            file: String::new(),
            show: true,
            color: "#fe6d9d".into(),
            line_width: 1.5,
            opacity: 1.0,
        }
    }
}

/// Flat-map extruded region plates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AreaOptions {
    pub color: String,
    pub opacity: f32,
    pub depth: f32,
}

impl Default for AreaOptions {
    fn default() -> Self {
        Self {
            color: "#007cff".into(),
            opacity: 0.8,
            depth: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelOptions {
    pub show: bool,
    pub color: String,
    pub opacity: f32,
    pub font_size: f32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            show: true,
            color: "#ffffff".into(),
            opacity: 0.7,
            font_size: 14.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HoverOptions {
    pub enabled: bool,
    pub area_color: String,
    pub area_opacity: f32,
    pub label_color: String,
    pub label_opacity: f32,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            area_color: "#ff0000".into(),
            area_opacity: 0.5,
            label_color: "#ffffff".into(),
            label_opacity: 1.0,
        }
    }
}

/// Beam-marker styling. `speed` is the pulse step per frame for the whole
/// overlay type.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BeamOptions {
    pub radius: f32,
    pub base_height: f32,
    pub speed: f32,
    pub color: String,
    pub opacity: f32,
}

impl Default for BeamOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            base_height: 0.2,
            speed: 0.007,
            color: "#ff4040".into(),
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightOptions {
    pub line: FlightLineOptions,
    pub scatter_start: ScatterOptions,
    pub scatter_end: ScatterOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlightLineOptions {
    pub width: f32,
    pub color: String,
    pub opacity: f32,
    /// Optional texture scrolled along the flat variant's tubes.
    pub texture: String,
    /// Texture scroll per frame on the flat variant's tubes.
    pub speed: f32,
    /// Tube segment count on the flat variant.
    pub twisty: u32,
}

impl Default for FlightLineOptions {
    fn default() -> Self {
        Self {
            width: 1.5,
            color: "#ffd341".into(),
            opacity: 1.0,
            texture: String::new(),
            speed: 0.01,
            twisty: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScatterOptions {
    pub size: f32,
    pub color: String,
    pub opacity: f32,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            size: 1.0,
            color: "#ffd341".into(),
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OverlayData {
    pub beams: Vec<NamedBeamOverlay>,
    pub flights: Vec<NamedFlightOverlay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedBeamOverlay {
    pub name: String,
    pub data: Vec<crate::geodata::BeamPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedFlightOverlay {
    pub name: String,
    pub data: Vec<crate::geodata::FlightLine>,
}

/// Parse a `#rrggbb` / `#rrggbbaa` hex color, falling back on bad input.
pub fn parse_color(text: &str, fallback: Color) -> Color {
    match Srgba::hex(text) {
        Ok(srgba) => srgba.into(),
        Err(err) => {
            warn!("bad color {text:?} ({err}), using fallback");
            fallback
        }
    }
}

/// Same as [`parse_color`] but with an explicit alpha applied.
pub fn parse_color_with_alpha(text: &str, alpha: f32, fallback: Color) -> Color {
    parse_color(text, fallback).with_alpha(alpha.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_a_globe() {
        let options = DashboardOptions::default();
        assert_eq!(options.mode, MapMode::Globe);
        assert!((options.globe_radius() - 1.0).abs() < 1e-6);
        assert!((options.beam.speed - 0.007).abs() < 1e-6);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let options: DashboardOptions = serde_json::from_str(
            r##"{ "mode": "flat", "map_name": "china", "earth": { "radius": 20.0 } }"##,
        )
        .unwrap();
        assert_eq!(options.mode, MapMode::Flat);
        assert_eq!(options.map_name, "china");
        assert!((options.earth.radius - 20.0).abs() < 1e-6);
        // Untouched sections keep their defaults.
        assert!((options.cloud.opacity - 0.4).abs() < 1e-6);
        assert!(options.starrysky.show);
    }

    #[test]
    fn test_sunshine_hidden_by_default() {
        let options = DashboardOptions::default();
        assert!(!options.sunshine.show);

        let options: DashboardOptions = serde_json::from_str(
            r##"{ "sunshine": { "show": true, "size": 8.0 } }"##,
        )
        .unwrap();
        assert!(options.sunshine.show);
        assert!((options.sunshine.size - 8.0).abs() < 1e-6);
        // Untouched flare fields keep their defaults.
        assert!((options.sunshine.opacity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_parse_color_fallback() {
        let fallback = Color::srgb(1.0, 0.0, 0.0);
        assert_eq!(parse_color("not-a-color", fallback), fallback);
        let parsed = parse_color("#00ff00", fallback);
        assert_ne!(parsed, fallback);
    }

    #[test]
    fn test_overlay_data_parses() {
        let options: DashboardOptions = serde_json::from_str(
            r##"{
                "overlays": {
                    "beams": [
                        { "name": "cities", "data": [ { "value": [116.4, 39.9, 1.0] } ] }
                    ],
                    "flights": [
                        { "name": "routes", "data": [ { "coords": [[116.4, 39.9], [-74.0, 40.7]] } ] }
                    ]
                }
            }"##,
        )
        .unwrap();
        assert_eq!(options.overlays.beams.len(), 1);
        assert_eq!(options.overlays.flights[0].data[0].coords.len(), 2);
    }
}
