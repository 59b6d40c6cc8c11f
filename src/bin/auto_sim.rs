//! Closed-loop kinematic simulation of the full autonomous hatch cycle.
//!
//! Stands in for the robot hardware with ideal collaborators: the chassis
//! tracks velocity commands exactly, the aligners finish after a fixed
//! number of ticks and the vision target never acquires, exercising the
//! path-completed fallback of the gate.

use anyhow::{bail, Result};
use talos_core::auto::HatchRoutine;
use talos_core::automations::HatchAutomation;
use talos_core::components::{
    Aligner, AlignerState, Drivetrain, HatchEffector, HeadingSensor, RobotContext, Vision,
};
use talos_core::lifecycle::RobotMode;
use talos_core::TalosCore;

struct SimChassis {
    x: f64,
    y: f64,
    heading: f64,
    vx: f64,
    vy: f64,
}

impl SimChassis {
    fn new() -> Self {
        SimChassis {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Integrate the commanded velocities over one tick
    fn step(&mut self, dt: f64) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }
}

impl Drivetrain for SimChassis {
    fn set_inputs(&mut self, vx: f64, vy: f64, _vz: f64) {
        self.vx = vx;
        self.vy = vy;
    }

    fn set_velocity_heading(&mut self, vx: f64, vy: f64, heading: f64) {
        self.vx = vx;
        self.vy = vy;
        self.heading = heading;
    }

    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn set_odometry(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

struct SimImu {
    angle: f64,
}

impl HeadingSensor for SimImu {
    fn angle(&self) -> f64 {
        self.angle
    }
}

struct SimVision;

impl Vision for SimVision {
    fn target_in_sight(&self) -> bool {
        false
    }
}

#[derive(Default)]
struct SimHatch {
    fingers_extended: bool,
    punch_out: bool,
    has_hatch: bool,
}

impl HatchEffector for SimHatch {
    fn extend_fingers(&mut self) {
        self.fingers_extended = true;
    }
    fn retract_fingers(&mut self) {
        self.fingers_extended = false;
    }
    fn punch(&mut self) {
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

/// Alignment stub that reports done a fixed number of ticks after engage
struct SimAligner {
    executing: bool,
    remaining: u32,
    duration: u32,
}

impl SimAligner {
    fn new(duration: u32) -> Self {
        SimAligner {
            executing: false,
            remaining: 0,
            duration,
        }
    }

    /// Advance one tick; true exactly when the routine finishes
    fn step(&mut self) -> bool {
        if !self.executing {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.executing = false;
            return true;
        }
        false
    }
}

impl Aligner for SimAligner {
    fn engage(&mut self, _initial_state: AlignerState) {
        self.executing = true;
        self.remaining = self.duration;
    }

    fn is_executing(&self) -> bool {
        self.executing
    }
}

fn main() -> Result<()> {
    println!("Initializing Talos autonomous simulation...");

    // Show the mode selection surface the hosting framework would see
    let mut core = TalosCore::new();
    core.register(HatchRoutine::left_start());
    core.register(HatchRoutine::right_start());
    println!("Registered modes: {:?}", core.mode_names());
    if let Err(e) = core.select_default() {
        bail!("Failed to select default mode: {}", e);
    }
    println!("Selected mode: {:?}", core.selected());

    let mut chassis = SimChassis::new();
    let mut imu = SimImu { angle: 0.0 };
    let vision = SimVision;
    let mut hatch = SimHatch::default();
    let mut hatch_deposit = SimAligner::new(25);
    let mut hatch_intake = SimAligner::new(25);
    let mut hatch_automation = HatchAutomation::new();
    let mut routine = HatchRoutine::left_start();

    // Preloaded with a hatch at the start of the match
    hatch_automation.grab(&mut hatch);

    {
        let mut ctx = RobotContext {
            chassis: &mut chassis,
            imu: &imu,
            vision: &vision,
            hatch: &mut hatch,
            hatch_deposit: &mut hatch_deposit,
            hatch_intake: &mut hatch_intake,
        };
        routine.on_enable(&mut ctx);
    }

    let dt = 0.02; // 50 Hz control loop
    let mut last_state = routine.state();
    let mut finished_tick = None;

    for tick in 0..3000 {
        {
            let mut ctx = RobotContext {
                chassis: &mut chassis,
                imu: &imu,
                vision: &vision,
                hatch: &mut hatch,
                hatch_deposit: &mut hatch_deposit,
                hatch_intake: &mut hatch_intake,
            };
            routine.execute(&mut ctx, dt);
        }

        // The alignment stubs trigger the effector work the real sub-routines
        // would perform on completion.
        if hatch_deposit.step() {
            hatch_automation.outake(false);
        }
        if hatch_intake.step() {
            hatch_automation.grab(&mut hatch);
        }
        hatch_automation.execute(dt, &mut hatch);

        chassis.step(dt);
        imu.angle = chassis.heading;

        if routine.state() != last_state {
            let (x, y) = chassis.position();
            println!(
                "t={:6.2}s  {:?} -> {:?} at ({:.2}, {:.2}), runs={}",
                tick as f64 * dt,
                last_state,
                routine.state(),
                x,
                y,
                routine.completed_runs(),
            );
            last_state = routine.state();
        }
        if routine.is_finished() {
            finished_tick = Some(tick);
            break;
        }
    }

    match finished_tick {
        Some(tick) => {
            println!("Routine finished after {:.2} s", tick as f64 * dt);
            Ok(())
        }
        None => bail!("Routine did not finish within the simulated minute"),
    }
}
