//! Converts a declared mission into a time-stamped trajectory.

use thiserror::Error;

use crate::models::{Mission, TimedPoint, Trajectory};
use crate::spatial::distance_3d;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    #[error("Cannot travel {distance_m} m on leg {leg} with non-positive speed {speed}")]
    InvalidSpeed { leg: usize, distance_m: f64, speed: f64 },
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;

/// Build the realized trajectory of `mission` departing at `start_time`.
///
/// Each waypoint is stamped with the cumulative travel time from the first
/// waypoint at constant `mission.speed`. `start_time` is independent of the
/// mission window, so the same mission can be re-evaluated at several
/// departure times.
///
/// A non-positive speed is only accepted when every waypoint coincides with
/// its predecessor; such stationary repeats are emitted once.
pub fn build_trajectory(mission: &Mission, start_time: f64) -> Result<Trajectory> {
    let Some(first) = mission.waypoints.first() else {
        return Ok(Trajectory::default());
    };

    let mut points = Vec::with_capacity(mission.waypoints.len());
    let mut clock = start_time;
    points.push(TimedPoint::new(*first, clock));

    for (leg, pair) in mission.waypoints.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let distance_m = distance_3d(from, to);

        if mission.speed > 0.0 {
            clock += distance_m / mission.speed;
            points.push(TimedPoint::new(*to, clock));
            continue;
        }

        // Zero, negative and NaN speeds end up here
        if distance_m > 0.0 {
            return Err(TrajectoryError::InvalidSpeed {
                leg,
                distance_m,
                speed: mission.speed,
            });
        }
        if !points.iter().any(|p: &TimedPoint| p.point == *to) {
            points.push(TimedPoint::new(*to, clock));
        }
    }

    Ok(Trajectory::new(points))
}

/// Total straight-line length of the mission's waypoint sequence.
pub fn path_length(mission: &Mission) -> f64 {
    mission
        .waypoints
        .windows(2)
        .map(|pair| distance_3d(&pair[0], &pair[1]))
        .sum()
}
