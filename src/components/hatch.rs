//! Hatch end-effector interface

/// Discrete actuation and sensing primitives of the hatch mechanism.
///
/// The release automation sequences these; it never assumes how long a
/// solenoid takes to move, only the ordering and dwell it enforces itself.
pub trait HatchEffector {
    /// Extend the holding fingers to grip a hatch
    fn extend_fingers(&mut self);

    /// Retract the holding fingers, releasing the grip
    fn retract_fingers(&mut self);

    /// Fire the punch mechanism to eject the hatch
    fn punch(&mut self);

    /// Retract the punch mechanism
    fn retract(&mut self);

    /// Whether a hatch is physically contained (limit switches)
    fn is_contained(&self) -> bool;

    /// Whether the robot believes it is holding a hatch
    fn has_hatch(&self) -> bool;

    /// Update the held-hatch belief
    fn set_has_hatch(&mut self, held: bool);
}
