//! Autonomous orchestrator for the hatch cycle
//!
//! Top-level state machine sequencing "drive to a scoring bay, deposit,
//! drive to the loading area, intake" legs, delegating to the vision
//! alignment sub-routines and zeroing the drivetrain when out of legs.
pub mod gate;

use crate::components::{AlignerState, RobotContext};
use crate::lifecycle::RobotMode;
use crate::navigation::trajectory::{insert_trapezoidal_waypoints, Waypoint};
use crate::navigation::PurePursuit;
use gate::VisionGate;

use crate::components::chassis::{ROBOT_LENGTH, ROBOT_WIDTH};
use std::f64::consts::{FRAC_PI_2, PI};

/// States of the autonomous routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoState {
    DriveToCargoBay,
    DepositHatch,
    DriveToLoadingBay,
    IntakeHatch,
    Stop,
}

impl AutoState {
    /// Driving states commit to their maneuver; external stop requests are
    /// deferred until the state reaches its own completion.
    fn must_finish(self) -> bool {
        matches!(self, AutoState::DriveToCargoBay | AutoState::DriveToLoadingBay)
    }
}

/// The hatch-cycle autonomous routine.
///
/// Two mirrored variants exist for the two starting positions; they differ
/// only by [`Waypoint::reflect`] applied to the fixed field locations at
/// construction time.
pub struct HatchRoutine {
    mode_name: &'static str,
    default: bool,

    // Fixed field locations, reflected once for the right-start variant
    front_cargo_bay: Waypoint,
    setup_loading_bay: Waypoint,
    loading_bay: Waypoint,
    side_cargo_bay: Waypoint,
    side_cargo_bay_alignment_point: Waypoint,
    start_pos: Waypoint,

    completed_runs: u32,
    acceleration: f64,
    deceleration: f64,

    pursuit: PurePursuit,
    gate: VisionGate,

    state: AutoState,
    initial_call: bool,
    stop_requested: bool,
    finished: bool,
}

impl HatchRoutine {
    fn new(mode_name: &'static str, default: bool) -> Self {
        HatchRoutine {
            mode_name,
            default,
            front_cargo_bay: Waypoint::new(5.6 - ROBOT_LENGTH / 2.0, 0.2, 0.0, 0.75),
            setup_loading_bay: Waypoint::new(3.3, 3.3, PI, 2.0),
            loading_bay: Waypoint::new(0.2 + ROBOT_LENGTH / 2.0, 3.4, PI, 1.0),
            side_cargo_bay: Waypoint::new(7.0, 0.8 + ROBOT_WIDTH / 2.0, -FRAC_PI_2, 1.0),
            side_cargo_bay_alignment_point: Waypoint::new(
                7.0,
                1.8 + ROBOT_WIDTH / 2.0,
                -FRAC_PI_2,
                0.75,
            ),
            start_pos: Waypoint::new(1.2 + ROBOT_LENGTH / 2.0, ROBOT_WIDTH / 2.0, 0.0, 2.0),
            completed_runs: 0,
            acceleration: 1.0,
            deceleration: -0.5,
            pursuit: PurePursuit::new(0.2, 0.25),
            gate: VisionGate::default(),
            state: AutoState::DriveToCargoBay,
            initial_call: true,
            stop_requested: false,
            finished: false,
        }
    }

    /// Routine for a robot starting on the left side of the field
    pub fn left_start() -> Self {
        HatchRoutine::new("Left start autonomous", true)
    }

    /// Routine for a robot starting on the right side: every fixed field
    /// location is mirrored across the centerline.
    pub fn right_start() -> Self {
        let mut routine = HatchRoutine::new("Right start autonomous", false);
        routine.front_cargo_bay = routine.front_cargo_bay.reflect();
        routine.setup_loading_bay = routine.setup_loading_bay.reflect();
        routine.loading_bay = routine.loading_bay.reflect();
        routine.side_cargo_bay = routine.side_cargo_bay.reflect();
        routine.side_cargo_bay_alignment_point = routine.side_cargo_bay_alignment_point.reflect();
        routine.start_pos = routine.start_pos.reflect();
        routine
    }

    /// Current state, exposed for the hosting program's dashboards
    pub fn state(&self) -> AutoState {
        self.state
    }

    /// Completed bay-to-bay cycles this run
    pub fn completed_runs(&self) -> u32 {
        self.completed_runs
    }

    /// The follower driving the active leg
    pub fn pursuit(&self) -> &PurePursuit {
        &self.pursuit
    }

    /// Ask the routine to stop. Takes effect immediately outside a
    /// must-finish state, otherwise at that state's own next transition.
    pub fn request_stop(&mut self) {
        if self.state.must_finish() {
            self.stop_requested = true;
        } else {
            self.enter(AutoState::Stop);
        }
    }

    fn enter(&mut self, state: AutoState) {
        self.state = if self.stop_requested {
            AutoState::Stop
        } else {
            state
        };
        self.initial_call = true;
    }

    fn current_pos(&self, ctx: &RobotContext<'_>) -> Waypoint {
        let (x, y) = ctx.chassis.position();
        Waypoint::new(x, y, ctx.imu.angle(), 2.0)
    }

    fn build_leg(&mut self, waypoints: &[Waypoint]) -> bool {
        match insert_trapezoidal_waypoints(waypoints, self.acceleration, self.deceleration) {
            Ok(path) => {
                self.pursuit.build_path(&path);
                true
            }
            Err(e) => {
                println!("Failed to build path for {:?}: {}", self.state, e);
                self.enter(AutoState::Stop);
                false
            }
        }
    }

    fn follow_path(&mut self, ctx: &mut RobotContext<'_>) {
        let (vx, vy, heading) = self.pursuit.find_velocity(ctx.chassis.position());
        if self.pursuit.completed_path() {
            ctx.chassis.set_inputs(0.0, 0.0, 0.0);
            return;
        }
        ctx.chassis.set_velocity_heading(vx, vy, heading);
    }

    fn drive_to_cargo_bay(&mut self, ctx: &mut RobotContext<'_>) {
        if self.initial_call {
            self.initial_call = false;
            let waypoints = match self.completed_runs {
                0 => vec![self.current_pos(ctx), self.front_cargo_bay],
                1 => vec![
                    self.current_pos(ctx),
                    self.side_cargo_bay_alignment_point,
                    self.side_cargo_bay,
                ],
                _ => {
                    // No more bays to visit from here
                    self.completed_runs += 1;
                    self.enter(AutoState::DriveToLoadingBay);
                    return;
                }
            };
            if !self.build_leg(&waypoints) {
                return;
            }
        }
        self.follow_path(ctx);
        if self
            .gate
            .should_hand_off(&self.pursuit, ctx.vision.target_in_sight())
        {
            self.completed_runs += 1;
            self.enter(AutoState::DepositHatch);
        }
    }

    fn deposit_hatch(&mut self, ctx: &mut RobotContext<'_>) {
        if self.initial_call {
            self.initial_call = false;
            ctx.hatch_deposit.engage(AlignerState::TargetTapeAlign);
        }
        if !ctx.hatch.has_hatch() {
            self.enter(AutoState::DriveToLoadingBay);
        }
    }

    fn drive_to_loading_bay(&mut self, ctx: &mut RobotContext<'_>) {
        if self.initial_call {
            self.initial_call = false;
            let waypoints = match self.completed_runs {
                1 => {
                    let current = self.current_pos(ctx);
                    // Back out before swinging around to the loading bay
                    let reposition =
                        Waypoint::new(current.x - 0.5, current.y, ctx.imu.angle(), 1.5);
                    vec![current, reposition, self.setup_loading_bay, self.loading_bay]
                }
                2 => vec![
                    self.current_pos(ctx),
                    self.setup_loading_bay,
                    self.loading_bay,
                ],
                _ => {
                    self.enter(AutoState::Stop);
                    return;
                }
            };
            if !self.build_leg(&waypoints) {
                return;
            }
        }
        self.follow_path(ctx);
        if self
            .gate
            .should_hand_off(&self.pursuit, ctx.vision.target_in_sight())
        {
            self.enter(AutoState::IntakeHatch);
        }
    }

    fn intake_hatch(&mut self, ctx: &mut RobotContext<'_>) {
        if self.initial_call {
            self.initial_call = false;
            ctx.hatch_intake.engage(AlignerState::TargetTapeAlign);
        } else if !ctx.hatch_intake.is_executing() {
            self.enter(AutoState::DriveToCargoBay);
        }
    }

    fn stop(&mut self, ctx: &mut RobotContext<'_>) {
        ctx.chassis.set_inputs(0.0, 0.0, 0.0);
        self.finished = true;
    }
}

impl RobotMode for HatchRoutine {
    fn mode_name(&self) -> &str {
        self.mode_name
    }

    fn is_default(&self) -> bool {
        self.default
    }

    fn on_enable(&mut self, ctx: &mut RobotContext<'_>) {
        ctx.chassis.set_odometry(self.start_pos.x, self.start_pos.y);
        self.completed_runs = 0;
        self.state = AutoState::DriveToCargoBay;
        self.initial_call = true;
        self.stop_requested = false;
        self.finished = false;
    }

    fn on_disable(&mut self) {
        self.request_stop();
    }

    fn execute(&mut self, ctx: &mut RobotContext<'_>, _dt: f64) {
        match self.state {
            AutoState::DriveToCargoBay => self.drive_to_cargo_bay(ctx),
            AutoState::DepositHatch => self.deposit_hatch(ctx),
            AutoState::DriveToLoadingBay => self.drive_to_loading_bay(ctx),
            AutoState::IntakeHatch => self.intake_hatch(ctx),
            AutoState::Stop => self.stop(ctx),
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
