pub mod auto;
pub mod automations;
pub mod common;
pub mod components;
pub mod lifecycle;
pub mod navigation;

use crate::components::RobotContext;
use crate::lifecycle::RobotMode;

/// Core autonomous functionality for the Talos robot.
///
/// Holds the registered top-level routines and drives whichever one is
/// selected through its enable/execute/disable lifecycle. The registry's
/// names and default flags are the whole configuration surface the hosting
/// framework sees.
pub struct TalosCore {
    modes: Vec<Box<dyn RobotMode>>,
    active: Option<usize>,
}

impl Default for TalosCore {
    fn default() -> Self {
        TalosCore::new()
    }
}

impl TalosCore {
    /// Create a new instance of TalosCore
    pub fn new() -> Self {
        TalosCore {
            modes: Vec::new(),
            active: None,
        }
    }

    /// Register a routine with the core
    pub fn register<T: RobotMode + 'static>(&mut self, mode: T) {
        self.modes.push(Box::new(mode));
    }

    /// Names of all registered routines, for the selection surface
    pub fn mode_names(&self) -> Vec<&str> {
        self.modes.iter().map(|mode| mode.mode_name()).collect()
    }

    /// Select a routine by name
    pub fn select(&mut self, name: &str) -> Result<(), String> {
        match self
            .modes
            .iter()
            .position(|mode| mode.mode_name() == name)
        {
            Some(index) => {
                self.active = Some(index);
                Ok(())
            }
            None => Err(format!("No registered mode named {:?}", name)),
        }
    }

    /// Select the routine flagged as default, or the first registered one
    pub fn select_default(&mut self) -> Result<(), String> {
        if self.modes.is_empty() {
            return Err("No modes registered".to_string());
        }
        let index = self
            .modes
            .iter()
            .position(|mode| mode.is_default())
            .unwrap_or(0);
        self.active = Some(index);
        Ok(())
    }

    /// Name of the currently selected routine
    pub fn selected(&self) -> Option<&str> {
        self.active.map(|index| self.modes[index].mode_name())
    }

    /// Enable the selected routine
    pub fn enable(&mut self, ctx: &mut RobotContext<'_>) {
        if let Some(index) = self.active {
            self.modes[index].on_enable(ctx);
        }
    }

    /// Disable the selected routine
    pub fn disable(&mut self) {
        if let Some(index) = self.active {
            self.modes[index].on_disable();
        }
    }

    /// Run one control-loop tick of the selected routine
    pub fn execute(&mut self, ctx: &mut RobotContext<'_>, dt: f64) {
        if let Some(index) = self.active {
            self.modes[index].execute(ctx, dt);
        }
    }

    /// Whether the selected routine has reached its terminal state
    pub fn is_finished(&self) -> bool {
        self.active
            .map(|index| self.modes[index].is_finished())
            .unwrap_or(true)
    }
}
