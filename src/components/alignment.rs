//! Vision-corrected alignment sub-routine interface

/// Initial sub-state an aligner can be engaged at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignerState {
    /// Hold position until a vision target is acquired
    WaitForVision,
    /// Correct toward the target using the tape above the objective
    TargetTapeAlign,
}

/// A vision-corrected fine-alignment service.
///
/// The orchestrator treats these as opaque: engage at a sub-state, poll
/// `is_executing` until the routine reports completion. The routine owns
/// the drivetrain for as long as it reports it is executing.
pub trait Aligner {
    /// Start (or restart) the routine at the given sub-state
    fn engage(&mut self, initial_state: AlignerState);

    /// Whether the routine is still running
    fn is_executing(&self) -> bool;
}
