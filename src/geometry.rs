// src/geometry.rs
//
// Stateless 2D primitives used to turn predicted corner trajectories into
// collision decisions. All functions operate in pixel space (y grows
// downward); none of the tests depend on orientation sign, only on
// sign changes and zero.

use crate::types::{BoundingBox, Point};

// ============================================================================
// SEGMENTS
// ============================================================================

/// Orientation of `c` relative to the directed line `a -> b`
fn cross(a: Point, b: Point, c: Point) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// True if `q` lies within the axis range spanned by `p` and `r`.
/// Only meaningful when the three points are already known to be collinear.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    p.x.min(r.x) <= q.x && q.x <= p.x.max(r.x) && p.y.min(r.y) <= q.y && q.y <= p.y.max(r.y)
}

/// Segment `p1-p2` against segment `p3-p4`. Touching endpoints and
/// overlapping collinear segments count as intersecting.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = cross(p3, p4, p1);
    let d2 = cross(p3, p4, p2);
    let d3 = cross(p1, p2, p3);
    let d4 = cross(p1, p2, p4);

    let straddles_34 = (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0);
    let straddles_12 = (d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0);
    if straddles_34 && straddles_12 {
        return true;
    }

    // Collinear / touching fallback
    (d1 == 0.0 && on_segment(p3, p1, p4))
        || (d2 == 0.0 && on_segment(p3, p2, p4))
        || (d3 == 0.0 && on_segment(p1, p3, p2))
        || (d4 == 0.0 && on_segment(p1, p4, p2))
}

/// Shortest distance from `p` to segment `a-b`. A zero-length segment
/// degrades to point distance.
pub fn distance_point_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let len_sq = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if len_sq == 0.0 {
        return p.distance_to(a);
    }

    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    p.distance_to(closest)
}

// ============================================================================
// BOXES
// ============================================================================

/// Inclusive containment
pub fn point_in_box(point: Point, bbox: &BoundingBox) -> bool {
    bbox.x1() <= point.x && point.x <= bbox.x2() && bbox.y1() <= point.y && point.y <= bbox.y2()
}

pub fn line_intersects_box(start: Point, end: Point, bbox: &BoundingBox) -> bool {
    // Both endpoints beyond the same side of either axis
    if (start.x < bbox.x1() && end.x < bbox.x1()) || (start.x > bbox.x2() && end.x > bbox.x2()) {
        return false;
    }
    if (start.y < bbox.y1() && end.y < bbox.y1()) || (start.y > bbox.y2() && end.y > bbox.y2()) {
        return false;
    }

    if point_in_box(start, bbox) || point_in_box(end, bbox) {
        return true;
    }

    bbox.edges()
        .iter()
        .any(|(a, b)| segments_intersect(start, end, *a, *b))
}

// ============================================================================
// POLYGONS
// ============================================================================

/// Winding number test. Works for non-convex polygons; polygons with fewer
/// than three vertices contain nothing.
pub fn point_in_polygon_winding(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut winding = 0i32;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        if a.y <= point.y {
            if b.y > point.y && is_left(a, b, point) > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && is_left(a, b, point) < 0.0 {
            winding -= 1;
        }
    }
    winding != 0
}

/// >0 left of `p0 -> p1`, <0 right, 0 on the line
fn is_left(p0: Point, p1: Point, p2: Point) -> f32 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

/// Does the region swept by two adjacent corners moving to their predicted
/// positions overlap the crash box?
///
/// The quad is built as `[a, b, predicted_b, predicted_a]` so it stays
/// simple. Three checks are needed: crash corners inside the quad (quad
/// engulfs the zone), quad vertices inside the zone (zone engulfs part of
/// the quad), and edge crossings (the two straddle each other).
pub fn sweep_intersects(
    crash: &BoundingBox,
    corner_a: Point,
    predicted_a: Point,
    corner_b: Point,
    predicted_b: Point,
) -> bool {
    let quad = [corner_a, corner_b, predicted_b, predicted_a];

    if crash
        .corners()
        .points()
        .iter()
        .any(|c| point_in_polygon_winding(*c, &quad))
    {
        return true;
    }

    if quad.iter().any(|v| point_in_box(*v, crash)) {
        return true;
    }

    let crash_edges = crash.edges();
    (0..quad.len()).any(|i| {
        let (q1, q2) = (quad[i], quad[(i + 1) % quad.len()]);
        crash_edges
            .iter()
            .any(|(c1, c2)| segments_intersect(q1, q2, *c1, *c2))
    })
}
