//! # ADAS Actuation Control Unit
//!
//! Fixed-rate runner for the command translation core. Loads the session
//! configuration (vehicle profile + cycle cadence), performs optional RT
//! setup, and drives the engagement state machine and tick pipeline at the
//! configured period.
//!
//! Without a bus attached this binary runs a scripted demo session: a
//! synthetic decoder produces `VehicleState` frames (speed ramp, cruise
//! button script, steering loopback echo) and every emitted command is
//! logged instead of serialized.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use adas_common::command::{ActuatorCommand, HudControl, OutgoingCommand};
use adas_common::profile::VehicleModel;
use adas_common::state::{CruiseButtons, GearShifter, LkaStatus, VehicleState, derive_button_event};
use adas_control_unit::config::{SessionConfig, load_config};
use adas_control_unit::cycle::{CyclePacer, CycleStats, rt_setup};
use adas_control_unit::tick::ActuationController;

/// ADAS Actuation Control Unit — per-cycle command translation
#[derive(Parser, Debug)]
#[command(name = "adas_control_unit")]
#[command(version)]
#[command(about = "Per-cycle actuator command translation and engagement control")]
struct Args {
    /// Path to the session configuration TOML.
    #[arg(long, default_value = "config/session.toml")]
    config: PathBuf,

    /// Vehicle model override (volt, acadia, other); also used when no
    /// config file is present.
    #[arg(long)]
    model: Option<VehicleModel>,

    /// Force the pedal interceptor capability on.
    #[arg(long)]
    pedal_interceptor: bool,

    /// Number of cycles to run (0 = run until interrupted).
    #[arg(long, default_value_t = 6000)]
    cycles: u64,

    /// CPU core to pin the cycle thread to (rt builds).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (rt builds).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!(
        "ADAS Control Unit v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("ADAS Control Unit shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    let profile = config.vehicle_profile();

    info!(
        "Config OK: cycle_time={}µs, model={}, pedal_interceptor={}",
        config.cycle_time_us, profile.model, profile.pedal_interceptor
    );

    rt_setup(args.cpu_core, args.rt_priority)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut controller = ActuationController::new(profile);
    let mut pacer = CyclePacer::new(config.cycle_time_us)?;
    let mut stats = CycleStats::new();
    let mut decoder = SyntheticDecoder::new(config.cycle_time_us);

    info!("Entering cycle loop");

    let mut cycle: u64 = 0;
    while running.load(Ordering::SeqCst) && (args.cycles == 0 || cycle < args.cycles) {
        let start = std::time::Instant::now();

        let vehicle = decoder.next_state(cycle, &controller);
        let events: Vec<_> =
            derive_button_event(vehicle.cruise_buttons, vehicle.prev_cruise_buttons)
                .into_iter()
                .collect();

        let engage = controller.update_engagement(&vehicle, &events);
        if !engage.events.is_empty() {
            info!(
                "engagement event {:?} (adaptive_cruise={}, lane_keep={})",
                engage.events, engage.adaptive_cruise_enabled, engage.lane_keep_enabled
            );
        }

        let enabled = engage.adaptive_cruise_enabled || engage.lane_keep_enabled;
        let actuators = decoder.next_actuators(cycle);
        let hud = HudControl::default();

        let commands = controller.tick(enabled, &vehicle, cycle, &actuators, &hud);
        for cmd in &commands {
            debug!("cycle {cycle}: {cmd:?}");
            if let OutgoingCommand::Steering { counter, .. } = cmd {
                decoder.acknowledge_steering(*counter);
            }
        }

        stats.record(start.elapsed().as_nanos() as i64, pacer.cycle_time_ns());
        if cycle > 0 && cycle % 1000 == 0 {
            info!(
                "cycle {cycle}: avg={}ns max={}ns overruns={}",
                stats.avg_cycle_ns(),
                stats.max_cycle_ns,
                stats.overruns
            );
        }

        cycle += 1;
        pacer.wait();
    }

    info!(
        "Ran {} cycles: avg={}ns max={}ns overruns={}",
        stats.cycle_count,
        stats.avg_cycle_ns(),
        stats.max_cycle_ns,
        stats.overruns
    );

    Ok(())
}

/// Load the session config, or fall back to CLI-only settings when the
/// file is absent and a model was given.
fn resolve_config(args: &Args) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        load_config(&args.config)?
    } else if args.model.is_some() {
        warn!(
            "No config at {}; using CLI settings",
            args.config.display()
        );
        SessionConfig::default()
    } else {
        return Err(format!(
            "config file {} not found (pass --model to run without one)",
            args.config.display()
        )
        .into());
    };

    if let Some(model) = args.model {
        config.profile.model = model;
    }
    if args.pedal_interceptor {
        config.profile.pedal_interceptor = true;
    }
    Ok(config)
}

// ─── Synthetic Decoder ──────────────────────────────────────────────

/// Scripted stand-in for the bus decoder: speed ramp, a cruise button
/// script, and a one-cycle-delayed steering loopback echo.
struct SyntheticDecoder {
    dt: f64,
    loopback_counter: u8,
    pending_echo: Option<u8>,
    buttons: CruiseButtons,
    prev_buttons: CruiseButtons,
}

impl SyntheticDecoder {
    fn new(cycle_time_us: u32) -> Self {
        Self {
            dt: f64::from(cycle_time_us) / 1_000_000.0,
            loopback_counter: 0,
            pending_echo: None,
            buttons: CruiseButtons::Unpress,
            prev_buttons: CruiseButtons::Unpress,
        }
    }

    /// The safety layer echoes an accepted steering counter on the next
    /// cycle's state frame.
    fn acknowledge_steering(&mut self, counter: u8) {
        self.pending_echo = Some(counter);
    }

    fn next_state(&mut self, cycle: u64, controller: &ActuationController) -> VehicleState {
        if let Some(echo) = self.pending_echo.take() {
            self.loopback_counter = echo;
        }

        self.prev_buttons = self.buttons;
        self.buttons = match cycle {
            300..=304 => CruiseButtons::DecelSet,
            2000..=2004 => CruiseButtons::Cancel,
            _ => CruiseButtons::Unpress,
        };

        let speed = (cycle as f64 * self.dt * 2.0).min(15.0);
        let lane_keep = controller.state.engage.lane_keep_enabled;

        VehicleState {
            speed,
            cruise_buttons: self.buttons,
            prev_cruise_buttons: self.prev_buttons,
            cruise_available: true,
            gear_shifter: GearShifter::Drive,
            loopback_counter: self.loopback_counter,
            lka_status: if lane_keep {
                LkaStatus::Active
            } else {
                LkaStatus::Inactive
            },
            ..Default::default()
        }
    }

    fn next_actuators(&self, cycle: u64) -> ActuatorCommand {
        let t = cycle as f64 * self.dt;
        ActuatorCommand {
            accel: 0.3 + 0.5 * (0.5 * t).sin(),
            steer: 0.3 * (0.2 * t).sin(),
        }
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
