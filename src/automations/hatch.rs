//! Hatch release automation
//!
//! Times the two-stage release: retract the holding fingers, dwell long
//! enough for them to clear, fire the punch exactly once, then retract the
//! punch mechanism. The firing states are must-finish so nothing can
//! redirect the effector mid-release.

use crate::components::HatchEffector;

/// How long to hold the fingers retracted before firing (seconds)
const FIRE_DWELL: f64 = 0.5;

/// States of the release sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatchAutomationState {
    /// Normal scoring release
    Outaking,
    /// Contingency release, entered from a different mechanical context
    OutakingForceful,
    /// Post-fire retract for the forced path
    Retract,
    /// Post-fire retract for the normal path, after the robot moves clear
    RetractAfterMove,
}

impl HatchAutomationState {
    fn must_finish(self) -> bool {
        matches!(
            self,
            HatchAutomationState::Outaking
                | HatchAutomationState::OutakingForceful
                | HatchAutomationState::RetractAfterMove
        )
    }
}

/// Cooperative state machine for the hatch effector, run once per tick.
pub struct HatchAutomation {
    state: HatchAutomationState,
    engaged: bool,
    initial_call: bool,
    /// Time spent in the current state (seconds); reset on fresh entry
    state_tm: f64,
    /// One-shot flag so a state entry fires the punch at most once
    fired: bool,
}

impl Default for HatchAutomation {
    fn default() -> Self {
        HatchAutomation::new()
    }
}

impl HatchAutomation {
    pub fn new() -> Self {
        HatchAutomation {
            state: HatchAutomationState::Outaking,
            engaged: false,
            initial_call: false,
            state_tm: 0.0,
            fired: false,
        }
    }

    /// Grip a hatch: retract the punch mechanism, extend the fingers and
    /// mark the piece as held. Synchronous, no dwell.
    pub fn grab(&mut self, hatch: &mut dyn HatchEffector) {
        hatch.retract();
        hatch.extend_fingers();
        hatch.set_has_hatch(true);
    }

    /// Start the release sequence. `force` selects the contingency entry
    /// point; both share the same dwell-then-fire behavior. Re-invoking
    /// while a release is in flight restarts the dwell from zero.
    pub fn outake(&mut self, force: bool) {
        let initial = if force {
            HatchAutomationState::OutakingForceful
        } else {
            HatchAutomationState::Outaking
        };
        self.next_state(initial);
        self.engaged = true;
    }

    /// Whether the sequence is still running
    pub fn is_executing(&self) -> bool {
        self.engaged
    }

    /// Current state, meaningful only while executing
    pub fn state(&self) -> HatchAutomationState {
        self.state
    }

    /// External cancellation request; ignored while a must-finish state is
    /// active.
    pub fn disable(&mut self) {
        if self.engaged && self.state.must_finish() {
            return;
        }
        self.engaged = false;
    }

    /// Run one control-loop tick. `dt` is the tick period in seconds.
    pub fn execute(&mut self, dt: f64, hatch: &mut dyn HatchEffector) {
        if !self.engaged {
            return;
        }
        if self.initial_call {
            self.initial_call = false;
        } else {
            self.state_tm += dt;
        }
        match self.state {
            HatchAutomationState::Outaking => self.outaking(hatch, HatchAutomationState::RetractAfterMove),
            HatchAutomationState::OutakingForceful => {
                self.outaking(hatch, HatchAutomationState::Retract)
            }
            HatchAutomationState::Retract | HatchAutomationState::RetractAfterMove => {
                hatch.retract();
                self.done();
            }
        }
    }

    /// Shared dwell-then-fire body for both entry points
    fn outaking(&mut self, hatch: &mut dyn HatchEffector, after_fire: HatchAutomationState) {
        if self.state_tm == 0.0 {
            hatch.retract_fingers();
        }
        if self.state_tm >= FIRE_DWELL && !self.fired {
            hatch.punch();
            self.fired = true;
            self.next_state(after_fire);
        }
    }

    fn next_state(&mut self, state: HatchAutomationState) {
        self.state = state;
        self.initial_call = true;
        self.state_tm = 0.0;
        self.fired = false;
    }

    fn done(&mut self) {
        self.engaged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeHatch {
        fingers_extended: bool,
        punch_count: u32,
        punch_out: bool,
        has_hatch: bool,
    }

    impl HatchEffector for FakeHatch {
        fn extend_fingers(&mut self) {
            self.fingers_extended = true;
        }
        fn retract_fingers(&mut self) {
            self.fingers_extended = false;
        }
        fn punch(&mut self) {
            self.punch_count += 1;
            self.punch_out = true;
            self.has_hatch = false;
        }
        fn retract(&mut self) {
            self.punch_out = false;
        }
        fn is_contained(&self) -> bool {
            self.has_hatch
        }
        fn has_hatch(&self) -> bool {
            self.has_hatch
        }
        fn set_has_hatch(&mut self, held: bool) {
            self.has_hatch = held;
        }
    }

    #[test]
    fn grab_is_synchronous() {
        let mut automation = HatchAutomation::new();
        let mut hatch = FakeHatch::default();
        automation.grab(&mut hatch);
        assert!(hatch.fingers_extended);
        assert!(!hatch.punch_out);
        assert!(hatch.has_hatch);
        assert!(!automation.is_executing());
    }

    #[test]
    fn fires_once_after_the_dwell() {
        let mut automation = HatchAutomation::new();
        let mut hatch = FakeHatch::default();
        automation.grab(&mut hatch);
        automation.outake(false);
        assert!(automation.is_executing());

        // Entry tick: fingers retract, punch stays in
        automation.execute(0.0, &mut hatch);
        assert!(!hatch.fingers_extended);
        assert_eq!(hatch.punch_count, 0);

        // Just inside the dwell
        automation.execute(0.49, &mut hatch);
        assert_eq!(hatch.punch_count, 0);
        assert_eq!(automation.state(), HatchAutomationState::Outaking);

        // Dwell elapsed: exactly one fire, then the post-move retract state
        automation.execute(0.01, &mut hatch);
        assert_eq!(hatch.punch_count, 1);
        assert_eq!(automation.state(), HatchAutomationState::RetractAfterMove);
        assert!(automation.is_executing());

        // Retract state finishes the sequence
        automation.execute(0.02, &mut hatch);
        assert_eq!(hatch.punch_count, 1);
        assert!(!hatch.punch_out);
        assert!(!automation.is_executing());
    }

    #[test]
    fn forceful_path_uses_its_own_retract_state() {
        let mut automation = HatchAutomation::new();
        let mut hatch = FakeHatch::default();
        automation.outake(true);
        automation.execute(0.0, &mut hatch);
        automation.execute(0.6, &mut hatch);
        assert_eq!(hatch.punch_count, 1);
        assert_eq!(automation.state(), HatchAutomationState::Retract);
        automation.execute(0.02, &mut hatch);
        assert!(!automation.is_executing());
    }

    #[test]
    fn reengaging_restarts_the_dwell() {
        let mut automation = HatchAutomation::new();
        let mut hatch = FakeHatch::default();
        automation.outake(false);
        automation.execute(0.0, &mut hatch);
        automation.execute(0.4, &mut hatch);

        // Re-invoked mid-dwell: timer starts over, still no fire
        automation.outake(false);
        automation.execute(0.0, &mut hatch);
        automation.execute(0.4, &mut hatch);
        assert_eq!(hatch.punch_count, 0);

        automation.execute(0.1, &mut hatch);
        assert_eq!(hatch.punch_count, 1);
    }

    #[test]
    fn disable_is_deferred_while_firing() {
        let mut automation = HatchAutomation::new();
        let mut hatch = FakeHatch::default();
        automation.outake(false);
        automation.execute(0.0, &mut hatch);
        automation.disable();
        // Must-finish state shrugged the request off
        assert!(automation.is_executing());
        automation.execute(0.6, &mut hatch);
        automation.execute(0.02, &mut hatch);
        assert!(!automation.is_executing());
    }
}
