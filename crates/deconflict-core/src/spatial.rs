//! Spatial math for trajectory construction and conflict detection.

use crate::models::{Point3, TimedPoint};

/// 3D Euclidean distance between two points in meters.
pub fn distance_3d(a: &Point3, b: &Point3) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Check separation between two positions.
/// Returns (horizontal_distance_squared, vertical_distance_m).
pub fn separation(a: &Point3, b: &Point3) -> (f64, f64) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy, (a.z - b.z).abs())
}

/// True if `b` lies strictly inside the safety cylinder centred on `a`.
///
/// The cylinder has radius `buffer_horizontal_m` and half-height
/// `buffer_vertical_m`. Both comparisons are strict, so a drone sitting
/// exactly on the boundary is clear.
pub fn within_cylinder(
    a: &Point3,
    b: &Point3,
    buffer_horizontal_m: f64,
    buffer_vertical_m: f64,
) -> bool {
    let (horizontal_sq, vertical) = separation(a, b);
    horizontal_sq < buffer_horizontal_m * buffer_horizontal_m && vertical < buffer_vertical_m
}

/// Linearly interpolate a position along a single leg.
///
/// Times at or outside the leg bounds return the matching endpoint unchanged.
pub fn interpolate(start: &TimedPoint, end: &TimedPoint, t: f64) -> Point3 {
    if t <= start.time {
        return start.point;
    }
    if t >= end.time {
        return end.point;
    }

    let span = end.time - start.time;
    if span == 0.0 {
        return start.point;
    }

    let ratio = (t - start.time) / span;
    let (a, b) = (&start.point, &end.point);
    Point3 {
        x: a.x + (b.x - a.x) * ratio,
        y: a.y + (b.y - a.y) * ratio,
        z: a.z + (b.z - a.z) * ratio,
    }
}

/// Position of a drone at time `t`.
///
/// Returns `None` when no leg covers `t`: the drone has not taken off yet or
/// has already landed. Positions are never clamped to an endpoint.
pub fn position_at(points: &[TimedPoint], t: f64) -> Option<Point3> {
    points
        .windows(2)
        .find(|leg| leg[0].time <= t && t <= leg[1].time)
        .map(|leg| interpolate(&leg[0], &leg[1], t))
}
