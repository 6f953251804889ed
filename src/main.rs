use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use escooter_display_lib::constants::BAUD_RATE;
use escooter_display_lib::demo::DemoSweep;
use escooter_display_lib::transport::{ByteSource, FrameSink, Mirror, Transmitter, relay};
use escooter_display_lib::{DisplayFrame, DisplayState, LedState, Message, OperationMode};
use std::time::Duration;
use tokio::{signal, time::sleep};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod device;
mod error;

use device::{LogSink, SerialLink, list_ports};

/// Drive an e-scooter instrument display over its serial link.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the serial ports on this machine.
    Ports,
    /// Send one display state, optionally repeated.
    Send {
        #[command(flatten)]
        link: LinkArgs,
        #[command(flatten)]
        state: StateArgs,
        /// Number of times to send the frame.
        #[arg(short, long, default_value_t = 1)]
        repeat: u32,
        /// Pause between repeated frames in milliseconds.
        #[arg(short, long, default_value_t = 100)]
        interval_ms: u64,
    },
    /// Sweep speed, blank and charge like the bench test pattern.
    Demo {
        #[command(flatten)]
        link: LinkArgs,
        /// Stop after this many cycles instead of running until Ctrl+C.
        #[arg(short, long)]
        cycles: Option<u64>,
    },
    /// Decode a 14-byte frame given as hex.
    Decode {
        /// Frame bytes, e.g. "020e01000100000008f0000000f4".
        frame: String,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct LinkArgs {
    /// Serial port the display is wired to.
    #[arg(short, long, required_unless_present = "dry_run")]
    display: Option<String>,
    /// Serial port of the host link; every frame is mirrored there and display bytes relayed.
    #[arg(long)]
    host: Option<String>,
    /// Baud rate of both links.
    #[arg(short, long, default_value_t = BAUD_RATE)]
    baud: u32,
    /// Log frames instead of opening any port.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug, Clone)]
struct StateArgs {
    #[arg(short, long, value_enum, default_value_t = ModeArg::Speed)]
    mode: ModeArg,
    #[arg(short, long, value_enum, default_value_t = LedArg::Off)]
    led: LedArg,
    /// Battery level in thousandths (0-999).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    battery: i32,
    /// Speed in display units.
    #[arg(short, long, default_value_t = 0.0)]
    speed: f64,
    /// Error code shown by the display, 0 for none.
    #[arg(short, long, default_value_t = 0)]
    error_code: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Blank,
    Charge,
    Speed,
}

impl From<ModeArg> for OperationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Blank => OperationMode::Blank,
            ModeArg::Charge => OperationMode::Charge,
            ModeArg::Speed => OperationMode::Speed,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LedArg {
    Off,
    On,
    Blink,
}

impl From<LedArg> for LedState {
    fn from(arg: LedArg) -> Self {
        match arg {
            LedArg::Off => LedState::Off,
            LedArg::On => LedState::On,
            LedArg::Blink => LedState::Blink,
        }
    }
}

impl StateArgs {
    fn to_message(&self) -> Message {
        let state = DisplayState {
            mode: self.mode.into(),
            led: self.led.into(),
            battery_thousandths: self.battery,
            speed: self.speed,
        };
        let mut message = Message::with_error_code(self.error_code);
        state.apply(&mut message);
        message
    }
}

/// What to do once the links are open.
enum Job {
    Send {
        message: Message,
        repeat: u32,
        interval: Duration,
    },
    Demo {
        cycles: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_target(false).with_env_filter(filter).init();

    tokio::select! {
        res = run(cli.command) => {
            if let Err(e) = res {
                error!("Application failed: {:?}", e);
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down gracefully.");
        }
    }
    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Ports => {
            list_ports().context("Failed to list serial ports")?;
            Ok(())
        }
        Command::Decode { frame, json } => {
            let frame = DisplayFrame::from_hex(&frame).context("Failed to decode frame")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                println!("{}", frame);
            }
            Ok(())
        }
        Command::Send {
            link,
            state,
            repeat,
            interval_ms,
        } => {
            let job = Job::Send {
                message: state.to_message(),
                repeat,
                interval: Duration::from_millis(interval_ms),
            };
            open_and_run(&link, job).await
        }
        Command::Demo { link, cycles } => open_and_run(&link, Job::Demo { cycles }).await,
    }
}

/// Open the links `link` asks for and run `job` against them.
async fn open_and_run(link: &LinkArgs, job: Job) -> Result<()> {
    if link.dry_run {
        return run_job(LogSink, job).await;
    }

    let display_path = link
        .display
        .as_deref()
        .context("--display is required unless --dry-run is given")?;
    let mut display = SerialLink::open(display_path, link.baud)?;

    match link.host.as_deref() {
        Some(host_path) => {
            let host = SerialLink::open(host_path, link.baud)?;
            relay(&mut display, host.try_clone()?).context("Failed to start display relay")?;
            info!("Mirroring frames and relaying display bytes to {}", host.name());
            run_job(Mirror::new(display, host), job).await
        }
        None => {
            display
                .on_receive(Box::new(|bytes: &[u8]| {
                    info!(bytes = hex::encode(bytes), "Display sent");
                }))
                .context("Failed to start display receiver")?;
            run_job(display, job).await
        }
    }
}

async fn run_job<S: FrameSink>(sink: S, job: Job) -> Result<()> {
    let mut transmitter = Transmitter::new(sink);
    match job {
        Job::Send {
            mut message,
            repeat,
            interval,
        } => {
            for i in 0..repeat {
                transmitter.send(&mut message).context("Failed to send frame")?;
                if i == 0 {
                    info!("Sent frame:\n{}", DisplayFrame::from(&message));
                }
                if i + 1 < repeat {
                    sleep(interval).await;
                }
            }
        }
        Job::Demo { cycles } => {
            let sweep = match cycles {
                Some(n) => DemoSweep::new().cycles(n),
                None => DemoSweep::new(),
            };
            let mut phase = None;
            for step in sweep {
                if phase != Some(step.phase) {
                    info!("--- Demo: {} ---", step.phase);
                    phase = Some(step.phase);
                }
                let mut message = step.message;
                transmitter.send(&mut message).context("Failed to send demo frame")?;
                sleep(step.hold).await;
            }
        }
    }
    info!("Finished after {} frame(s).", transmitter.frames_sent());
    Ok(())
}
