//! Hand-off rule between path following and vision alignment

use crate::navigation::PurePursuit;
use std::collections::HashMap;

/// Decision rule for leaving a driving state early.
///
/// Vision correction is only trusted close to the objective; further out,
/// dead-reckoning along the planned path is more reliable. The
/// path-completed disjunct guarantees the hand-off still happens when
/// vision never acquires a target.
#[derive(Debug)]
pub struct VisionGate {
    /// Hand off once less than this much path remains (meters)
    min_remaining_path: f64,
}

impl Default for VisionGate {
    fn default() -> Self {
        VisionGate::new(1.0)
    }
}

impl VisionGate {
    pub fn new(min_remaining_path: f64) -> Self {
        VisionGate { min_remaining_path }
    }

    /// Configure the gate with parameters
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), String> {
        if let Some(&remaining) = params.get("min_remaining_path") {
            if remaining <= 0.0 {
                return Err("Minimum remaining path must be positive".to_string());
            }
            self.min_remaining_path = remaining;
        }
        Ok(())
    }

    /// Whether the driving state should yield to the alignment sub-routine.
    pub fn should_hand_off(&self, pursuit: &PurePursuit, target_in_sight: bool) -> bool {
        (target_in_sight && pursuit.remaining_distance() < self.min_remaining_path)
            || pursuit.completed_path()
    }
}
