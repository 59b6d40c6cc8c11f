//! Lifecycle management for Talos robot modes

use crate::components::RobotContext;

/// Trait for top-level robot routines hosted by the mode framework.
///
/// A mode is enabled, executed once per control-loop tick until it reports
/// it is finished (or the match ends), then disabled. `execute` must never
/// block; anything that takes time is modeled as a state spanning ticks.
pub trait RobotMode {
    /// Human-readable name shown on the selection surface
    fn mode_name(&self) -> &str;

    /// Whether this mode is the default selection
    fn is_default(&self) -> bool {
        false
    }

    /// Called once when the mode is enabled
    fn on_enable(&mut self, ctx: &mut RobotContext<'_>);

    /// Called once when the mode is disabled
    fn on_disable(&mut self);

    /// Run one control-loop tick. `dt` is the tick period in seconds.
    fn execute(&mut self, ctx: &mut RobotContext<'_>, dt: f64);

    /// Whether the routine has reached its terminal state
    fn is_finished(&self) -> bool;
}
