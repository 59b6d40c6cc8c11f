//! Actuator-sequencing automations for the Talos robot
pub mod hatch;

pub use hatch::{HatchAutomation, HatchAutomationState};
