//! Vision subsystem interface

/// The vision collaborator as seen by the autonomous core.
///
/// Fine-alignment geometry stays inside the alignment sub-routines; the
/// orchestrator only needs to know whether a target is currently acquired.
pub trait Vision {
    /// Whether a vision target is currently in view
    fn target_in_sight(&self) -> bool;
}
