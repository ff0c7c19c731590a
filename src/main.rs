//! Brewtimer main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  FileAlarmStore   JsonConfigStore   FileInitTracker  FileLocks │
//! │  (AlarmPort)      (ConfigPort)      (InitRecordPort) (LockPort)│
//! │  HardwareAdapter  LogEventSink      SystemClock                │
//! │  (ActuatorPort)   (EventSink)       (ClockPort)                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          ScheduleEvaluator (pure logic)                │    │
//! │  │  due check · init staleness · retire                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  `tick` for cron · `run` for a long-lived TickLoop             │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use brewtimer::adapters::alarm_file::FileAlarmStore;
use brewtimer::adapters::config_file::JsonConfigStore;
use brewtimer::adapters::gpio::RelayPin;
use brewtimer::adapters::hardware::HardwareAdapter;
use brewtimer::adapters::init_file::FileInitTracker;
use brewtimer::adapters::lock_file::FileLocks;
use brewtimer::adapters::log_sink::LogEventSink;
use brewtimer::adapters::time::{SystemClock, SystemDelay};
use brewtimer::app::events::Outcome;
use brewtimer::app::ports::{AlarmPort, ClockPort, ConfigPort, InitRecordPort};
use brewtimer::app::service::ScheduleEvaluator;
use brewtimer::brew::BrewType;
use brewtimer::config::{BrewDurations, EngineTiming};
use brewtimer::drivers::relay::RelayDriver;
use brewtimer::runner::TickLoop;
use brewtimer::timestamp;

// ── CLI ───────────────────────────────────────────────────────

/// Scheduled brew-relay controller.
#[derive(Parser)]
#[command(name = "brewtimer", version, about)]
struct Cli {
    /// Directory holding config.json, the init record and alarm markers.
    #[arg(long, env = "BREWTIMER_STATE_DIR", default_value = "/coffee", global = true)]
    state_dir: PathBuf,

    /// BCM number of the brew relay GPIO.
    #[arg(long, env = "BREWTIMER_RELAY_PIN", default_value_t = 17, global = true)]
    relay_pin: u8,

    /// Log relay transitions instead of driving the GPIO.
    #[arg(long, env = "BREWTIMER_SIMULATE", global = true)]
    simulate: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long, env = "BREWTIMER_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate every brew type once (cron entry point).
    Tick,

    /// Evaluate on a fixed interval until stopped.
    Run {
        /// Seconds between evaluation passes.
        #[arg(long, env = "BREWTIMER_INTERVAL_SECS", default_value_t = 60)]
        interval_secs: u64,

        /// Stop after this many passes.
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Arm a brew, replacing any pending one.
    Schedule {
        /// `coffee` or `espresso`.
        brew: BrewType,

        /// Local time, `YYYY-MM-DD HH:MM:SS`.
        at: String,
    },

    /// Remove every pending brew.
    Cancel,

    /// Show the pending brew, last init and durations.
    Status,

    /// Read or change brew durations.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the durations in effect.
    Show,

    /// Persist new durations, 1 to 600 seconds each.
    Set {
        #[arg(long)]
        coffee: Option<u32>,

        #[arg(long)]
        espresso: Option<u32>,
    },
}

// ── Entry ─────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let dir = cli.state_dir.as_path();
    match cli.command {
        Command::Tick => {
            let outcomes = tick_once(dir, cli.relay_pin, cli.simulate);
            for (brew, _) in outcomes.iter().filter(|(_, o)| o.brewed()) {
                info!("{} brewed this tick", brew);
            }
            if outcomes.iter().any(|(_, o)| *o == Outcome::Failed) {
                bail!("one or more brews failed, see log");
            }
            Ok(())
        }
        Command::Run {
            interval_secs,
            ticks,
        } => {
            run_loop(dir, cli.relay_pin, cli.simulate, interval_secs, ticks);
            Ok(())
        }
        Command::Schedule { brew, at } => schedule(dir, brew, &at),
        Command::Cancel => {
            FileAlarmStore::new(dir)
                .retire_all()
                .context("failed to remove alarm markers")?;
            println!("no brew scheduled");
            Ok(())
        }
        Command::Status => {
            status(dir);
            Ok(())
        }
        Command::Config { action } => configure(dir, action),
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let name = path
                .file_name()
                .with_context(|| format!("--log-file {} has no file name", path.display()))?
                .to_string_lossy()
                .into_owned();
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(name)
                .build(dir)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(appender).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow!("logging init failed: {e}"))
}

// ── Wiring ────────────────────────────────────────────────────

type Evaluator = ScheduleEvaluator<JsonConfigStore, FileAlarmStore, FileInitTracker, FileLocks, SystemClock>;
type Hardware = HardwareAdapter<RelayPin, SystemDelay, FileInitTracker, SystemClock>;

fn evaluator(dir: &Path, timing: EngineTiming) -> Evaluator {
    ScheduleEvaluator::new(
        JsonConfigStore::in_dir(dir),
        FileAlarmStore::new(dir),
        FileInitTracker::in_dir(dir),
        FileLocks::new(dir, timing.lock_stale_after),
        SystemClock,
        timing,
    )
}

fn hardware(dir: &Path, relay_pin: u8, simulate: bool, timing: &EngineTiming) -> Hardware {
    let relay = RelayDriver::new(RelayPin::new(relay_pin, simulate), SystemDelay, timing);
    HardwareAdapter::new(relay, FileInitTracker::in_dir(dir), SystemClock)
}

fn tick_once(dir: &Path, relay_pin: u8, simulate: bool) -> Vec<(BrewType, Outcome)> {
    let timing = EngineTiming::default();
    let mut hw = hardware(dir, relay_pin, simulate, &timing);
    evaluator(dir, timing).tick(&mut hw, &mut SystemDelay, &mut LogEventSink::new())
}

fn run_loop(dir: &Path, relay_pin: u8, simulate: bool, interval_secs: u64, ticks: Option<u64>) {
    let timing = EngineTiming::default();
    let mut hw = hardware(dir, relay_pin, simulate, &timing);
    let evaluator = evaluator(dir, timing);
    let mut sink = LogEventSink::new();
    let mut settle = SystemDelay;

    info!(
        "watching {} (relay GPIO{}{})",
        dir.display(),
        relay_pin,
        if simulate { ", simulated" } else { "" }
    );
    let ran = TickLoop::new(Duration::from_secs(interval_secs.max(1)), ticks).run(
        &mut SystemDelay,
        |_| {
            evaluator.tick(&mut hw, &mut settle, &mut sink);
        },
    );
    info!("tick loop stopped after {} passes", ran);
}

// ── Operator commands ─────────────────────────────────────────

fn schedule(dir: &Path, brew: BrewType, at: &str) -> Result<()> {
    let when = timestamp::parse(at)
        .with_context(|| format!("{at:?} is not a YYYY-MM-DD HH:MM:SS time"))?;
    if when <= SystemClock.now() {
        warn!("{} is not in the future, it will brew on the next tick", at);
    }
    FileAlarmStore::new(dir)
        .arm(brew, when)
        .with_context(|| format!("failed to arm {brew}"))?;
    println!("{} scheduled for {}", brew, timestamp::format(when));
    Ok(())
}

fn status(dir: &Path) {
    match FileAlarmStore::new(dir).pending() {
        None => println!("scheduled: none"),
        Some((brew, Ok(at))) => println!("scheduled: {} at {}", brew, timestamp::format(at)),
        Some((brew, Err(e))) => println!("scheduled: {} (unreadable: {})", brew, e),
    }
    match FileInitTracker::in_dir(dir).last_init() {
        Some(at) => println!("last init: {}", timestamp::format(at)),
        None => println!("last init: unknown"),
    }
    print_durations(&JsonConfigStore::in_dir(dir).load());
}

fn configure(dir: &Path, action: ConfigAction) -> Result<()> {
    let store = JsonConfigStore::in_dir(dir);
    match action {
        ConfigAction::Show => print_durations(&store.load()),
        ConfigAction::Set { coffee, espresso } => {
            if coffee.is_none() && espresso.is_none() {
                bail!("nothing to set, pass --coffee and/or --espresso");
            }
            let mut durations = store.load();
            if let Some(secs) = coffee {
                durations.coffee_duration_seconds = secs;
            }
            if let Some(secs) = espresso {
                durations.espresso_duration_seconds = secs;
            }
            store
                .save(&durations)
                .with_context(|| format!("failed to write {}", store.path().display()))?;
            print_durations(&durations);
        }
    }
    Ok(())
}

fn print_durations(durations: &BrewDurations) {
    for brew in BrewType::ALL {
        match durations.seconds(brew) {
            0 => println!("{}: not configured", brew.config_key()),
            secs => println!("{}: {}", brew.config_key(), secs),
        }
    }
}
