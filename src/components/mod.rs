//! Collaborator interfaces for the Talos robot
//!
//! The autonomous core never talks to hardware directly; every actuated or
//! sensed resource is reached through one of these traits. The hosting
//! robot program supplies the implementations.
pub mod alignment;
pub mod chassis;
pub mod hatch;
pub mod vision;

pub use alignment::{Aligner, AlignerState};
pub use chassis::{Drivetrain, HeadingSensor};
pub use hatch::HatchEffector;
pub use vision::Vision;

/// Mutable borrows of every collaborator, rebuilt for each control-loop tick.
///
/// Holding all shared resources in one bundle keeps ownership single-owner
/// per tick: whichever state machine is handed the context is the only
/// writer until it returns.
pub struct RobotContext<'a> {
    pub chassis: &'a mut dyn Drivetrain,
    pub imu: &'a dyn HeadingSensor,
    pub vision: &'a dyn Vision,
    pub hatch: &'a mut dyn HatchEffector,
    pub hatch_deposit: &'a mut dyn Aligner,
    pub hatch_intake: &'a mut dyn Aligner,
}
