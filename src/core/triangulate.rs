//! Ear-clipping triangulation for region polygons
//!
//! The flat-map variant extrudes each GeoJSON region ring into a prism; the
//! cap faces need the ring triangulated. Simple polygons only, no holes,
//! which matches the border data this dashboard consumes.

use bevy::prelude::*;

/// Triangulate a simple polygon given as an open ring (no repeated closing
/// point). Returns index triples into the input slice, or `None` when the
/// ring has fewer than three usable vertices or no ear can be clipped
/// (self-intersecting input).
pub fn triangulate_ring(ring: &[Vec2]) -> Option<Vec<[u32; 3]>> {
    if ring.len() < 3 {
        return None;
    }

    let ccw = signed_area(ring) >= 0.0;
    let mut remaining: Vec<u32> = (0..ring.len() as u32).collect();
    let mut triangles = Vec::with_capacity(ring.len() - 2);

    while remaining.len() > 3 {
        let before = triangles.len();
        let mut i = 0;
        while i < remaining.len() {
            let prev = remaining[(i + remaining.len() - 1) % remaining.len()];
            let curr = remaining[i];
            let next = remaining[(i + 1) % remaining.len()];
            if is_ear(ring, &remaining, prev, curr, next, ccw) {
                triangles.push(emit(prev, curr, next, ccw));
                remaining.remove(i);
                break;
            }
            i += 1;
        }
        if triangles.len() == before {
            // No ear found: degenerate or self-intersecting ring.
            return None;
        }
    }
    triangles.push(emit(remaining[0], remaining[1], remaining[2], ccw));
    Some(triangles)
}

/// Signed area of an open ring; positive for counter-clockwise winding.
pub fn signed_area(ring: &[Vec2]) -> f32 {
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

fn emit(a: u32, b: u32, c: u32, ccw: bool) -> [u32; 3] {
    // Emit counter-clockwise triangles regardless of input winding.
    if ccw { [a, b, c] } else { [c, b, a] }
}

fn is_ear(ring: &[Vec2], remaining: &[u32], prev: u32, curr: u32, next: u32, ccw: bool) -> bool {
    let a = ring[prev as usize];
    let b = ring[curr as usize];
    let c = ring[next as usize];

    let cross = (b - a).perp_dot(c - a);
    let convex = if ccw { cross > 0.0 } else { cross < 0.0 };
    if !convex {
        return false;
    }

    // An ear must not contain any other remaining vertex.
    for &idx in remaining {
        if idx == prev || idx == curr || idx == next {
            continue;
        }
        if point_in_triangle(ring[idx as usize], a, b, c) {
            return false;
        }
    }
    true
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_area(ring: &[Vec2], tri: [u32; 3]) -> f32 {
        let [a, b, c] = tri.map(|i| ring[i as usize]);
        (b - a).perp_dot(c - a) / 2.0
    }

    #[test]
    fn test_square_splits_into_two_triangles() {
        let ring = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let tris = triangulate_ring(&ring).unwrap();
        assert_eq!(tris.len(), 2);
        let covered: f32 = tris.iter().map(|t| triangle_area(&ring, *t)).sum();
        assert!((covered - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_count_is_n_minus_two() {
        // Convex octagon.
        let ring: Vec<Vec2> = (0..8)
            .map(|i| {
                let a = i as f32 / 8.0 * std::f32::consts::TAU;
                Vec2::new(a.cos(), a.sin())
            })
            .collect();
        let tris = triangulate_ring(&ring).unwrap();
        assert_eq!(tris.len(), ring.len() - 2);
    }

    #[test]
    fn test_concave_polygon() {
        // Arrowhead with a reflex vertex at the origin.
        let ring = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(0.5, 0.0),
            Vec2::new(2.0, 1.0),
        ];
        let tris = triangulate_ring(&ring).unwrap();
        assert_eq!(tris.len(), 2);
        let area = signed_area(&ring).abs();
        let covered: f32 = tris.iter().map(|t| triangle_area(&ring, *t).abs()).sum();
        assert!((covered - area).abs() < 1e-5);
    }

    #[test]
    fn test_clockwise_input_emits_ccw_triangles() {
        let ring = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        assert!(signed_area(&ring) < 0.0);
        let tris = triangulate_ring(&ring).unwrap();
        for tri in tris {
            assert!(triangle_area(&ring, tri) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_input() {
        assert!(triangulate_ring(&[]).is_none());
        assert!(triangulate_ring(&[Vec2::ZERO, Vec2::X]).is_none());
    }
}
