//! Geographic coordinate projection
//!
//! Two independent conversions share this module:
//! - spherical: (lon, lat) degrees to a point on the globe surface
//! - planar: (lon, lat) degrees through a centered Mercator projection
//!   for the flat-map variant
//!
//! The spherical angle convention is load-bearing: it keeps lon=0, lat=0 on
//! the +X axis so equirectangular earth textures line up with the border
//! polylines. Do not swap it for the textbook formula.

use anyhow::{Context, anyhow};
use bevy::prelude::*;
use std::f32::consts::PI;

/// Named Mercator presets for the flat-map variant.
///
/// (map name, center longitude, center latitude, projection scale)
pub const MAP_PRESETS: &[(&str, f32, f32, f32)] = &[
    ("world", 0.0, 0.0, 25.0),
    ("china", 104.0, 37.5, 60.0),
    ("usa", -98.5, 39.8, 55.0),
    ("europe", 10.0, 51.0, 70.0),
    ("guangdong", 113.3, 22.9, 300.0),
    ("sichuan", 102.8, 30.6, 250.0),
];

/// Convert longitude/latitude in degrees to a point on a sphere of radius
/// `base_radius + offset`.
///
/// Angle convention (matches the globe texture's UV mapping):
/// theta = (90 + lon) * PI / 180 is the azimuth, phi = (90 - lat) * PI / 180
/// is the polar angle measured from +Y. With that convention lon=0, lat=0
/// lands on +X and lon=180 on -X.
pub fn lglt2xyz(lon_deg: f32, lat_deg: f32, offset: f32, base_radius: f32) -> Vec3 {
    let theta = (90.0 + lon_deg) * (PI / 180.0);
    let phi = (90.0 - lat_deg) * (PI / 180.0);
    let r = base_radius + offset;
    Vec3::new(
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
        r * phi.sin() * theta.cos(),
    )
}

/// Centered Mercator projector for the flat-map variant.
///
/// Built once per map from a named preset; `project` is then a pure
/// function of the input coordinates.
#[derive(Debug, Clone, Copy)]
pub struct MapProjector {
    center_lon_rad: f32,
    center_lat_rad: f32,
    scale: f32,
}

impl MapProjector {
    /// Look up a named preset. Unknown names are an error so a typo in the
    /// config fails loudly instead of projecting everything to nonsense.
    pub fn for_map(name: &str) -> anyhow::Result<Self> {
        let (_, lon, lat, scale) = MAP_PRESETS
            .iter()
            .find(|(preset, ..)| *preset == name)
            .ok_or_else(|| anyhow!("no projection preset for map {name:?}"))
            .with_context(|| {
                let known: Vec<&str> = MAP_PRESETS.iter().map(|(n, ..)| *n).collect();
                format!("known maps: {known:?}")
            })?;
        Ok(Self::new(*lon, *lat, *scale))
    }

    pub fn new(center_lon_deg: f32, center_lat_deg: f32, scale: f32) -> Self {
        Self {
            center_lon_rad: center_lon_deg.to_radians(),
            center_lat_rad: center_lat_deg.to_radians(),
            scale,
        }
    }

    /// Project (lon, lat) degrees to planar coordinates.
    ///
    /// The returned vector is `(y, x, 0)`, not `(x, y, 0)`. The whole
    /// flat-map layout is built on the swapped pair; do not "fix" it.
    pub fn project(&self, lon_deg: f32, lat_deg: f32) -> Vec3 {
        let x = self.scale * (lon_deg.to_radians() - self.center_lon_rad);
        // Screen convention: y grows downward, so north of center is negative.
        let y = self.scale * (mercator_y(self.center_lat_rad) - mercator_y(lat_deg.to_radians()));
        Vec3::new(y, x, 0.0)
    }
}

fn mercator_y(lat_rad: f32) -> f32 {
    (PI / 4.0 + lat_rad / 2.0).tan().ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_spherical_radius_over_domain() {
        let base = 10.0;
        for lon_step in 0..=36 {
            for lat_step in 0..=18 {
                let lon = -180.0 + lon_step as f32 * 10.0;
                let lat = -90.0 + lat_step as f32 * 10.0;
                let p = lglt2xyz(lon, lat, 0.0, base);
                assert!(
                    (p.length() - base).abs() < EPSILON,
                    "({lon}, {lat}) landed at radius {}",
                    p.length()
                );
            }
        }
    }

    #[test]
    fn test_spherical_reference_point() {
        // lon=0, lat=0 is the reference-forward point on +X.
        let p = lglt2xyz(0.0, 0.0, 0.0, 10.0);
        assert!((p.x - 10.0).abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert!(p.z.abs() < EPSILON);
    }

    #[test]
    fn test_spherical_antipodal_point() {
        let p = lglt2xyz(180.0, 0.0, 0.0, 10.0);
        assert!((p.x + 10.0).abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert!(p.z.abs() < EPSILON);
    }

    #[test]
    fn test_spherical_poles() {
        let north = lglt2xyz(0.0, 90.0, 0.0, 10.0);
        assert!((north.y - 10.0).abs() < EPSILON);
        let south = lglt2xyz(0.0, -90.0, 0.0, 10.0);
        assert!((south.y + 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_spherical_offset_adds_to_radius() {
        let p = lglt2xyz(30.0, 45.0, 0.1, 1.0);
        assert!((p.length() - 1.1).abs() < EPSILON);
    }

    #[test]
    fn test_spherical_nan_propagates() {
        let p = lglt2xyz(f32::NAN, 0.0, 0.0, 10.0);
        assert!(p.x.is_nan() || p.y.is_nan() || p.z.is_nan());
    }

    #[test]
    fn test_projector_center_maps_to_origin() {
        let proj = MapProjector::new(104.0, 37.5, 60.0);
        let p = proj.project(104.0, 37.5);
        assert!(p.x.abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert!(p.z.abs() < EPSILON);
    }

    #[test]
    fn test_projector_axis_swap() {
        // A point due east of center moves the longitude term, which the
        // swapped output carries in .y.
        let proj = MapProjector::new(0.0, 0.0, 100.0);
        let p = proj.project(10.0, 0.0);
        assert!(p.x.abs() < EPSILON, "latitude term should be zero");
        assert!(p.y > 1.0, "longitude term should be in .y, got {p:?}");
    }

    #[test]
    fn test_projector_north_is_negative_screen_y() {
        let proj = MapProjector::new(0.0, 0.0, 100.0);
        let p = proj.project(0.0, 10.0);
        // Pre-swap y (screen-down) is negative north of center; it lands in .x.
        assert!(p.x < 0.0, "north of center should be negative, got {p:?}");
    }

    #[test]
    fn test_preset_lookup() {
        assert!(MapProjector::for_map("china").is_ok());
        assert!(MapProjector::for_map("atlantis").is_err());
    }
}
