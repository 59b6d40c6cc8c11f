//! Pure Pursuit path follower for absolute waypoint paths
//!
//! Steers toward the intersection of a speed-scaled look-ahead circle with
//! the planned path, after the method outlined in Coulter's "Implementation
//! of the Pure Pursuit Path Tracking Algorithm" (CMU-RI-TR-92-01), adapted
//! for a holonomic drivetrain: the output is a field-oriented velocity
//! vector plus an independent heading target.

use crate::common::types::Point2D;
use crate::navigation::trajectory::Segment;
use nalgebra::Vector2;
use std::collections::HashMap;

/// Pure Pursuit follower over one built path.
///
/// Holds the active path and a running distance-traveled estimate; call
/// [`PurePursuit::find_velocity`] once per control-loop tick.
#[derive(Debug)]
pub struct PurePursuit {
    waypoints: Vec<Segment>,
    current_waypoint_number: usize,
    look_ahead: f64,
    look_ahead_speed_modifier: f64,
    speed_look_ahead: f64,
    completed_path: bool,
    distance_traveled: f64,
    last_robot_x: f64,
    last_robot_y: f64,
}

impl PurePursuit {
    /// Create a follower with a base look-ahead distance and the factor by
    /// which the look-ahead grows with the current target speed.
    pub fn new(look_ahead: f64, look_ahead_speed_modifier: f64) -> Self {
        PurePursuit {
            waypoints: Vec::new(),
            current_waypoint_number: 0,
            look_ahead,
            look_ahead_speed_modifier,
            speed_look_ahead: look_ahead,
            completed_path: false,
            distance_traveled: 0.0,
            last_robot_x: 0.0,
            last_robot_y: 0.0,
        }
    }

    /// Configure the follower with parameters
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), String> {
        if let Some(&look_ahead) = params.get("look_ahead") {
            if look_ahead <= 0.0 {
                return Err("Look ahead distance must be positive".to_string());
            }
            self.look_ahead = look_ahead;
            self.speed_look_ahead = look_ahead;
        }

        if let Some(&modifier) = params.get("look_ahead_speed_modifier") {
            if modifier < 0.0 {
                return Err("Look ahead speed modifier must not be negative".to_string());
            }
            self.look_ahead_speed_modifier = modifier;
        }

        Ok(())
    }

    /// Replace the active path.
    ///
    /// Resets distance-traveled and clears the completion flag. The path is
    /// consumed as-is; displacements must be non-decreasing (as produced by
    /// [`crate::navigation::trajectory::annotate_path`]).
    pub fn build_path(&mut self, path: &[Segment]) {
        self.waypoints = path.to_vec();
        self.current_waypoint_number = 0;
        self.completed_path = false;
        self.distance_traveled = 0.0;
        self.speed_look_ahead = self.look_ahead;
        if let Some(first) = self.waypoints.first() {
            self.last_robot_x = first.x;
            self.last_robot_y = first.y;
        }
    }

    /// Whether the robot has passed the last waypoint of the active path.
    /// Stays set until the next [`PurePursuit::build_path`].
    pub fn completed_path(&self) -> bool {
        self.completed_path
    }

    /// Odometry distance accumulated since the path was built
    pub fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    /// The active path
    pub fn waypoints(&self) -> &[Segment] {
        &self.waypoints
    }

    /// Path length still ahead of the robot, zero for an empty path
    pub fn remaining_distance(&self) -> f64 {
        self.waypoints
            .last()
            .map(|end| (end.s - self.distance_traveled).max(0.0))
            .unwrap_or(0.0)
    }

    /// Compute the velocity command for this tick.
    ///
    /// Returns field-oriented (vx, vy) at the interpolated target speed plus
    /// the heading target of the current segment's end. A degenerate path
    /// (fewer than two waypoints) completes immediately with a zero command
    /// rather than steering at an undefined look-ahead target.
    pub fn find_velocity(&mut self, robot_position: Point2D) -> (f64, f64, f64) {
        if self.current_waypoint_number + 1 >= self.waypoints.len() {
            self.completed_path = true;
            return (0.0, 0.0, 0.0);
        }
        let distance_along_path = self.update_distance_traveled(robot_position);
        let segment_start = self.waypoints[self.current_waypoint_number];
        let segment_end = self.waypoints[self.current_waypoint_number + 1];
        let direction = self.compute_direction(robot_position, &segment_start, &segment_end);
        let speed = find_speed(
            segment_start.s,
            segment_end.s,
            segment_start.v,
            segment_end.v,
            distance_along_path,
        );
        let heading = segment_end.theta;
        self.speed_look_ahead = self.look_ahead + self.look_ahead_speed_modifier * speed;
        if self.distance_traveled + self.speed_look_ahead >= segment_end.s {
            // Reached the end of the current segment
            self.current_waypoint_number += 1;
        }
        (direction.x * speed, direction.y * speed, heading)
    }

    /// Track the robot's position along the path using odometry: every tick,
    /// add the distance moved since the last tick to a running total.
    fn update_distance_traveled(&mut self, robot_position: Point2D) -> f64 {
        let (robot_x, robot_y) = robot_position;
        self.distance_traveled += (robot_x - self.last_robot_x).hypot(robot_y - self.last_robot_y);
        self.last_robot_x = robot_x;
        self.last_robot_y = robot_y;
        self.distance_traveled
    }

    /// Find the goal point and return the unit direction toward it,
    /// relative to the robot but field-axis aligned.
    fn compute_direction(
        &self,
        robot_position: Point2D,
        segment_start: &Segment,
        segment_end: &Segment,
    ) -> Vector2<f64> {
        let goal_point = self
            .find_intersection(segment_start, segment_end, robot_position)
            .unwrap_or_else(|| {
                // No intersection between the look-ahead circle and this
                // segment; fall back to aiming at the segment end.
                Vector2::new(
                    segment_end.x - robot_position.0,
                    segment_end.y - robot_position.1,
                )
            });
        let norm = goal_point.norm();
        if norm == 0.0 {
            // Already on top of the goal point
            return Vector2::zeros();
        }
        goal_point / norm
    }

    /// Intersect the look-ahead circle with the current path segment.
    ///
    /// Standard circle/line intersection with the robot translated to the
    /// origin, so the result is robot-relative. Of the two candidate points
    /// the one closer to the segment end is chosen. Returns `None` when the
    /// segment passes outside the look-ahead radius.
    fn find_intersection(
        &self,
        segment_start: &Segment,
        segment_end: &Segment,
        robot_position: Point2D,
    ) -> Option<Vector2<f64>> {
        let (robot_x, robot_y) = robot_position;
        let p1 = Vector2::new(segment_start.x - robot_x, segment_start.y - robot_y);
        let p2 = Vector2::new(segment_end.x - robot_x, segment_end.y - robot_y);

        let d = p2 - p1;
        let dr2 = d.norm_squared();
        if dr2 == 0.0 {
            // Degenerate segment, caught to avoid a division by zero
            return None;
        }
        let cross = p1.x * p2.y - p2.x * p1.y;
        let r = self.speed_look_ahead;
        let delta = r * r * dr2 - cross * cross;
        if delta < 0.0 {
            return None;
        }

        let sqrt_delta = delta.sqrt();
        let sign_dy = if d.y < 0.0 { -1.0 } else { 1.0 };
        let intersection_1 = Vector2::new(
            (cross * d.y + sign_dy * d.x * sqrt_delta) / dr2,
            (-cross * d.x + d.y.abs() * sqrt_delta) / dr2,
        );
        if delta == 0.0 {
            // Tangent to the path
            return Some(intersection_1);
        }
        let intersection_2 = Vector2::new(
            (cross * d.y - sign_dy * d.x * sqrt_delta) / dr2,
            (-cross * d.x - d.y.abs() * sqrt_delta) / dr2,
        );
        if (intersection_1 - p2).norm() < (intersection_2 - p2).norm() {
            Some(intersection_1)
        } else {
            Some(intersection_2)
        }
    }
}

/// Interpolate how fast the robot should be moving at its current distance
/// along the segment. A zero-length segment jumps straight to the end speed.
fn find_speed(
    start_path_distance: f64,
    end_path_distance: f64,
    start_speed: f64,
    end_speed: f64,
    distance_along_path: f64,
) -> f64 {
    let local_end_distance = end_path_distance - start_path_distance;
    if local_end_distance <= 0.0 {
        return end_speed;
    }
    let local_robot_distance = distance_along_path - start_path_distance;
    let portion_completed = local_robot_distance / local_end_distance;
    (end_speed - start_speed) * portion_completed + start_speed
}
