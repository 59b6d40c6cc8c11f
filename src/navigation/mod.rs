//! Navigation module for the Talos robot
//!
//! Paths are described sparsely as [`trajectory::Waypoint`]s, densified by
//! the trapezoidal profile inserter, and consumed tick-by-tick by the
//! [`pursuit::PurePursuit`] follower.
pub mod pursuit;
pub mod trajectory;

pub use pursuit::PurePursuit;
pub use trajectory::{annotate_path, insert_trapezoidal_waypoints, PathError, Segment, Waypoint};
