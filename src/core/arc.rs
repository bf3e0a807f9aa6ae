//! Cubic Bezier flight-arc construction
//!
//! Derives the two interior control points so an arc between two points on
//! the globe bulges outward, with bulge height and control-point spread both
//! growing with the angular separation of the endpoints: short hops get
//! shallow arcs, long hops get tall ones.

use bevy::prelude::*;
use std::f32::consts::PI;

/// Number of segments sampled per flight line.
pub const ARC_SEGMENTS: usize = 100;

/// Derive the four cubic Bezier control points for a flight arc between two
/// endpoint positions on (or near) the sphere surface.
///
/// The angle factor, lateral offset and height are hand-tuned constants.
/// Coincident endpoints collapse all four points onto the shared endpoint,
/// degenerating the arc to a point; that is accepted.
pub fn arc_control_points(v0: Vec3, v3: Vec3) -> [Vec3; 4] {
    let angle = v0.angle_between(v3) * 1.5 / PI / 0.1;
    let a_len = angle * 0.4;
    let h_len = angle * angle * 12.0;

    // Peak of the arc, projected outward along the midpoint ray. Antipodal
    // endpoints have a zero midpoint; any orthonormal direction keeps the
    // peak finite and at maximal height.
    let midpoint = (v0 + v3) / 2.0;
    let ray_dir = midpoint.try_normalize().unwrap_or_else(|| {
        v0.try_normalize()
            .map(|n| n.any_orthonormal_vector())
            .unwrap_or(Vec3::Y)
    });
    let peak = ray_dir * h_len;

    let v1 = lerp_towards(v0, peak, a_len);
    let v2 = lerp_towards(v3, peak, a_len);
    [v0, v1, v2, v3]
}

/// Move `from` towards `to` by `distance` world units (not a 0..1 fraction).
fn lerp_towards(from: Vec3, to: Vec3, distance: f32) -> Vec3 {
    let span = from.distance(to);
    if span <= f32::EPSILON {
        return from;
    }
    from.lerp(to, distance / span)
}

/// Sample a cubic Bezier into `segments + 1` points, endpoints included.
pub fn sample_cubic(points: &[Vec3; 4], segments: usize) -> Vec<Vec3> {
    let [p0, p1, p2, p3] = *points;
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            p0 * (u * u * u)
                + p1 * (3.0 * u * u * t)
                + p2 * (3.0 * u * t * t)
                + p3 * (t * t * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_coincident_endpoints_degenerate() {
        let p = Vec3::new(0.0, 0.0, 1.0);
        let [v0, v1, v2, v3] = arc_control_points(p, p);
        assert!((v0 - p).length() < EPSILON);
        assert!((v1 - p).length() < EPSILON);
        assert!((v2 - p).length() < EPSILON);
        assert!((v3 - p).length() < EPSILON);
    }

    #[test]
    fn test_control_points_leave_the_surface() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        let [_, v1, v2, _] = arc_control_points(a, b);
        assert!(v1.length() > 1.0);
        assert!(v2.length() > 1.0);
    }

    #[test]
    fn test_peak_height_grows_with_separation() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let near = Vec3::new(1.0, 0.1, 0.0).normalize();
        let far = Vec3::new(0.0, 1.0, 0.0);

        let apex = |points: [Vec3; 4]| {
            sample_cubic(&points, ARC_SEGMENTS)
                .iter()
                .map(|p| p.length())
                .fold(0.0_f32, f32::max)
        };

        let shallow = apex(arc_control_points(a, near));
        let tall = apex(arc_control_points(a, far));
        assert!(
            tall > shallow,
            "larger separation should arc higher ({tall} <= {shallow})"
        );
    }

    #[test]
    fn test_antipodal_peak_is_finite_and_maximal() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let antipode = arc_control_points(a, -a);
        for p in antipode {
            assert!(p.is_finite(), "antipodal control points must stay finite");
        }

        let max_ctrl_height = |points: [Vec3; 4]| {
            points.iter().map(|p| p.length()).fold(0.0_f32, f32::max)
        };
        let antipodal_height = max_ctrl_height(antipode);
        for lon in [10.0_f32, 60.0, 120.0, 170.0] {
            let other = Vec3::new(
                (lon.to_radians()).cos(),
                0.0,
                (lon.to_radians()).sin(),
            );
            let height = max_ctrl_height(arc_control_points(a, other));
            assert!(
                antipodal_height >= height,
                "antipodal arc should be at least as tall as {lon} degrees"
            );
        }
    }

    #[test]
    fn test_sampler_point_count_and_endpoints() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        let points = arc_control_points(a, b);
        let samples = sample_cubic(&points, ARC_SEGMENTS);
        assert_eq!(samples.len(), ARC_SEGMENTS + 1);
        assert!((samples[0] - a).length() < EPSILON);
        assert!((samples[ARC_SEGMENTS] - b).length() < EPSILON);
    }

    #[test]
    fn test_sampler_midpoint_of_straight_segment() {
        // With all control points collinear the curve is the segment itself.
        let a = Vec3::ZERO;
        let b = Vec3::new(4.0, 0.0, 0.0);
        let points = [a, Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), b];
        let samples = sample_cubic(&points, 2);
        assert!((samples[1] - Vec3::new(2.0, 0.0, 0.0)).length() < EPSILON);
    }
}
