//! Core data models for mission deconfliction.

use serde::{Deserialize, Serialize};

/// A spatial coordinate in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A position the drone occupies at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedPoint {
    #[serde(flatten)]
    pub point: Point3,
    /// Seconds on the shared mission clock
    pub time: f64,
}

impl TimedPoint {
    pub const fn new(point: Point3, time: f64) -> Self {
        Self { point, time }
    }

    /// Shorthand used heavily by scenario definitions and tests.
    pub const fn at(x: f64, y: f64, z: f64, time: f64) -> Self {
        Self::new(Point3::new(x, y, z), time)
    }
}

/// The primary mission we are trying to deconflict.
///
/// A mission is declared intent only. It becomes a [`Trajectory`] once a
/// concrete start time is chosen, see [`crate::trajectory::build_trajectory`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub waypoints: Vec<Point3>,
    /// Constant travel speed (m/s)
    pub speed: f64,
    /// Earliest the mission may begin
    #[serde(alias = "mission_start_time")]
    pub window_start: f64,
    /// Latest the mission must be completed
    #[serde(alias = "mission_end_time")]
    pub window_end: f64,
}

/// Time-stamped path, ordered by non-decreasing time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    points: Vec<TimedPoint>,
}

impl Trajectory {
    pub fn new(points: Vec<TimedPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TimedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TimedPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimedPoint> {
        self.points.last()
    }

    /// Time of the first point, if any.
    pub fn start_time(&self) -> Option<f64> {
        self.first().map(|p| p.time)
    }

    /// Time of the last point, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.last().map(|p| p.time)
    }

    /// Elapsed time between the first and last point.
    pub fn duration(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// True when no point is earlier than its predecessor.
    pub fn is_time_ordered(&self) -> bool {
        self.points.windows(2).all(|leg| leg[0].time <= leg[1].time)
    }

    /// Interpolated position at `t`, or `None` while the drone is not airborne.
    pub fn position_at(&self, t: f64) -> Option<Point3> {
        crate::spatial::position_at(&self.points, t)
    }
}

impl From<Vec<TimedPoint>> for Trajectory {
    fn from(points: Vec<TimedPoint>) -> Self {
        Self::new(points)
    }
}

/// Another drone's already-known flight path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedFlight {
    #[serde(alias = "flight_id")]
    pub id: String,
    pub trajectory: Trajectory,
}

impl TrackedFlight {
    pub fn new(id: impl Into<String>, trajectory: impl Into<Trajectory>) -> Self {
        Self {
            id: id.into(),
            trajectory: trajectory.into(),
        }
    }
}
