//! Drivetrain and heading-sensor interfaces

use crate::common::types::Point2D;

/// Robot footprint, used to offset field constants by half the frame (meters)
pub const ROBOT_LENGTH: f64 = 0.75;
pub const ROBOT_WIDTH: f64 = 0.75;

/// The sole actuation channel for robot motion.
///
/// Accepts a velocity command each tick and reports back the odometry
/// estimate the pursuit follower steers from.
pub trait Drivetrain {
    /// Command field-oriented velocities directly (vx, vy in m/s, vz in rad/s)
    fn set_inputs(&mut self, vx: f64, vy: f64, vz: f64);

    /// Command translational velocity while holding an absolute heading
    fn set_velocity_heading(&mut self, vx: f64, vy: f64, heading: f64);

    /// Current odometry position estimate
    fn position(&self) -> Point2D;

    /// Override the odometry estimate, e.g. to seed a known starting pose
    fn set_odometry(&mut self, x: f64, y: f64);
}

/// Absolute heading sensor, read-only
pub trait HeadingSensor {
    /// Current absolute heading in radians
    fn angle(&self) -> f64;
}
