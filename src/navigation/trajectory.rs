//! Waypoint types and trapezoidal speed-profile insertion

use thiserror::Error;

/// Errors raised while constructing a path
#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("a path needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    #[error("acceleration must be positive and deceleration negative (got a={0}, d={1})")]
    InvalidLimits(f64, f64),
}

/// A target planar pose plus the speed the robot should carry through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    /// Desired robot heading (radians)
    pub theta: f64,
    /// Desired speed (m/s)
    pub v: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, theta: f64, v: f64) -> Self {
        Waypoint { x, y, theta, v }
    }

    /// Mirror across the field centerline: negates y and heading only.
    /// Applying it twice returns the original waypoint.
    pub fn reflect(&self) -> Waypoint {
        Waypoint {
            x: self.x,
            y: -self.y,
            theta: -self.theta,
            v: self.v,
        }
    }

    /// Euclidean distance to another waypoint
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A [`Waypoint`] augmented with its cumulative displacement `s` (meters)
/// from the start of the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub v: f64,
    /// Cumulative displacement along the path
    pub s: f64,
}

/// Annotate an ordered waypoint list with cumulative displacement.
///
/// Zero-length hops contribute nothing to `s`, so the result is always
/// non-decreasing and finite.
pub fn annotate_path(waypoints: &[Waypoint]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(waypoints.len());
    let mut distance = 0.0;
    let mut previous: Option<&Waypoint> = None;
    for waypoint in waypoints {
        if let Some(prev) = previous {
            distance += prev.distance_to(waypoint);
        }
        previous = Some(waypoint);
        segments.push(Segment {
            x: waypoint.x,
            y: waypoint.y,
            theta: waypoint.theta,
            v: waypoint.v,
            s: distance,
        });
    }
    segments
}

/// Insert intermediate waypoints so that speed changes between consecutive
/// points are achievable under the given acceleration limits.
///
/// Assumes the robot should accelerate then cruise when the segment ends
/// faster than it starts, and cruise then decelerate otherwise. Segment
/// endpoints are preserved exactly. If a speed change cannot be achieved
/// within its segment the segment is left as given.
///
/// `acceleration` must be positive, `deceleration` negative.
pub fn insert_trapezoidal_waypoints(
    waypoints: &[Waypoint],
    acceleration: f64,
    deceleration: f64,
) -> Result<Vec<Segment>, PathError> {
    if waypoints.len() < 2 {
        return Err(PathError::TooFewWaypoints(waypoints.len()));
    }
    if acceleration <= 0.0 || deceleration >= 0.0 {
        return Err(PathError::InvalidLimits(acceleration, deceleration));
    }

    let mut trap_waypoints = Vec::with_capacity(waypoints.len() * 2 - 1);
    for pair in waypoints.windows(2) {
        let (segment_start, segment_end) = (pair[0], pair[1]);
        let dx = segment_end.x - segment_start.x;
        let dy = segment_end.y - segment_start.y;
        let segment_distance = dx.hypot(dy);
        let u = segment_start.v;
        let v = segment_end.v;

        trap_waypoints.push(segment_start);
        if segment_distance == 0.0 {
            // Degenerate segment: the end waypoint's speed takes effect
            // immediately, and there is nowhere to put an intermediate.
            continue;
        }

        if v > u {
            // Faster at the end - accelerating.
            // Rearrange v^2 = u^2 + 2as
            let s = (v * v - u * u) / (2.0 * acceleration);
            if s > segment_distance {
                // Cannot actually get to speed in time
                continue;
            }
            trap_waypoints.push(Waypoint {
                x: segment_start.x + dx * s / segment_distance,
                y: segment_start.y + dy * s / segment_distance,
                theta: segment_end.theta,
                v: segment_end.v,
            });
        } else if u > v {
            // Cruise at the start speed, then decelerate over the tail.
            let s = segment_distance - (v * v - u * u) / (2.0 * deceleration);
            if s < 0.0 {
                // Not enough room to decelerate
                continue;
            }
            trap_waypoints.push(Waypoint {
                x: segment_start.x + dx * s / segment_distance,
                y: segment_start.y + dy * s / segment_distance,
                theta: segment_start.theta,
                v: segment_start.v,
            });
        }
    }
    // windows() pushed every segment start; close with the final waypoint.
    if let Some(last) = waypoints.last() {
        trap_waypoints.push(*last);
    }

    Ok(annotate_path(&trap_waypoints))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(xs: &[(f64, f64)]) -> Vec<Waypoint> {
        xs.iter().map(|&(x, v)| Waypoint::new(x, 0.0, 0.0, v)).collect()
    }

    #[test]
    fn reflect_is_an_involution() {
        let w = Waypoint::new(3.3, 3.3, std::f64::consts::PI, 2.0);
        let twice = w.reflect().reflect();
        assert_eq!(twice, w);
        let once = w.reflect();
        assert_eq!(once.x, w.x);
        assert_eq!(once.v, w.v);
        assert_eq!(once.y, -w.y);
        assert_eq!(once.theta, -w.theta);
    }

    #[test]
    fn annotate_is_cumulative_and_monotonic() {
        let waypoints = vec![
            Waypoint::new(0.0, 0.0, 0.0, 1.0),
            Waypoint::new(3.0, 4.0, 0.0, 1.0),
            Waypoint::new(3.0, 4.0, 0.0, 2.0),
            Waypoint::new(6.0, 8.0, 0.0, 0.0),
        ];
        let segments = annotate_path(&waypoints);
        assert_eq!(segments[0].s, 0.0);
        assert!((segments[1].s - 5.0).abs() < 1e-9);
        assert_eq!(segments[1].s, segments[2].s); // zero-length hop
        assert!((segments[3].s - 10.0).abs() < 1e-9);
        for pair in segments.windows(2) {
            assert!(pair[1].s >= pair[0].s);
        }
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let one = straight(&[(0.0, 1.0)]);
        assert_eq!(
            insert_trapezoidal_waypoints(&one, 1.0, -0.5),
            Err(PathError::TooFewWaypoints(1))
        );
        let two = straight(&[(0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(
            insert_trapezoidal_waypoints(&two, -1.0, -0.5),
            Err(PathError::InvalidLimits(-1.0, -0.5))
        );
        assert_eq!(
            insert_trapezoidal_waypoints(&two, 1.0, 0.5),
            Err(PathError::InvalidLimits(1.0, 0.5))
        );
    }

    #[test]
    fn inserts_acceleration_waypoint() {
        // u=0 to v=2 over 8 m at a=1: v^2 = 2as gives s = 2 m
        let waypoints = straight(&[(0.0, 0.0), (8.0, 2.0)]);
        let profile = insert_trapezoidal_waypoints(&waypoints, 1.0, -0.5).unwrap();
        assert_eq!(profile.len(), 3);
        assert!((profile[1].x - 2.0).abs() < 1e-9);
        assert_eq!(profile[1].v, 2.0);
        // endpoints preserved exactly
        assert_eq!((profile[0].x, profile[0].v), (0.0, 0.0));
        assert_eq!((profile[2].x, profile[2].v), (8.0, 2.0));
    }

    #[test]
    fn inserts_deceleration_waypoint() {
        // u=2 to v=0 over 8 m at d=-0.5: braking needs 4 m, cruise for 4 m
        let waypoints = straight(&[(0.0, 2.0), (8.0, 0.0)]);
        let profile = insert_trapezoidal_waypoints(&waypoints, 1.0, -0.5).unwrap();
        assert_eq!(profile.len(), 3);
        assert!((profile[1].x - 4.0).abs() < 1e-9);
        assert_eq!(profile[1].v, 2.0);
        assert_eq!((profile[2].x, profile[2].v), (8.0, 0.0));
    }

    #[test]
    fn leaves_unachievable_segment_untouched() {
        // u=0 to v=4 over 1 m at a=1 needs 8 m; no intermediate inserted
        let waypoints = straight(&[(0.0, 0.0), (1.0, 4.0)]);
        let profile = insert_trapezoidal_waypoints(&waypoints, 1.0, -0.5).unwrap();
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn profile_respects_speed_limits() {
        let acceleration = 1.0;
        let deceleration = -0.5;
        let waypoints = vec![
            Waypoint::new(0.0, 0.0, 0.0, 0.0),
            Waypoint::new(10.0, 0.0, 0.0, 2.0),
            Waypoint::new(10.0, 10.0, 0.0, 0.5),
            Waypoint::new(20.0, 10.0, 0.0, 0.0),
        ];
        let profile =
            insert_trapezoidal_waypoints(&waypoints, acceleration, deceleration).unwrap();
        for pair in profile.windows(2) {
            let ds = pair[1].s - pair[0].s;
            let dv2 = pair[1].v * pair[1].v - pair[0].v * pair[0].v;
            if dv2 > 0.0 {
                assert!(dv2 <= 2.0 * acceleration * ds + 1e-9);
            } else {
                assert!(dv2 >= 2.0 * deceleration * ds - 1e-9);
            }
        }
    }

    #[test]
    fn zero_length_segment_stays_finite() {
        let waypoints = vec![
            Waypoint::new(0.0, 0.0, 0.0, 1.0),
            Waypoint::new(2.0, 0.0, 0.0, 2.0),
            Waypoint::new(2.0, 0.0, 0.0, 0.5),
            Waypoint::new(4.0, 0.0, 0.0, 0.5),
        ];
        let profile = insert_trapezoidal_waypoints(&waypoints, 1.0, -0.5).unwrap();
        for segment in &profile {
            assert!(segment.s.is_finite());
            assert!(segment.v.is_finite());
        }
        for pair in profile.windows(2) {
            assert!(pair[1].s >= pair[0].s);
        }
        assert_eq!(profile.last().map(|s| s.v), Some(0.5));
    }
}
