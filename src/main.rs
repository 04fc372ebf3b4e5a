//! Veado CLI
//!
//! Usage:
//!   veado --input frames.jsonl          # Replay recorded snapshots
//!   producer | veado                    # Classify snapshots from stdin
//!   veado --serve                       # HTTP API server
//!   veado --write-config                # Write merged config and exit

use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, warn};

use veado::core::{load_config, run_server, save_config, ExpressionDetector, HandSupport, KeyAnnouncer, LogSink};
use veado::types::{ControllerConfig, FrameOutput, FrameReason, Snapshot};
use veado::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "veado",
    version = VERSION,
    about = "Veado - turn facial expressions into stable key actions",
    long_about = "Veado reads per-frame face/hand landmark snapshots (JSON lines),\n\
                  classifies them into one expression per frame and announces\n\
                  the bound key whenever the stable action changes.\n\n\
                  Actions (priority order):\n  \
                  THINKING  - fingertip at the chin (needs hands)\n  \
                  MALICIOUS - frown + smile\n  \
                  WINK, TILT, FROWN, RAISE, SMILE\n  \
                  NEUTRAL   - nothing active"
)]
struct Args {
    /// JSON-lines snapshot file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Disable hand support (THINKING never fires)
    #[arg(long)]
    no_hands: bool,

    /// Hand model file; hand support is off if it does not exist
    #[arg(long)]
    hand_model: Option<PathBuf>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Write the merged config back to --config and exit
    #[arg(long)]
    write_config: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Print every frame, not only action changes
    #[arg(short, long)]
    verbose: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veado=info".into()),
        )
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let hands = HandSupport::probe(args.hand_model.as_deref(), args.no_hands);

    let config = match load_config(&args.config) {
        Ok(load) => load.config,
        Err(reason) => {
            error!("{}: {}", args.config.display(), reason);
            std::process::exit(1);
        }
    };

    if args.serve {
        if let Err(e) = run_server(&args.addr, hands, config).await {
            error!("server failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if args.write_config {
        match save_config(&config, &args.config) {
            Ok(()) => println!("Config written to {}", args.config.display()),
            Err(reason) => {
                error!("{}: {}", args.config.display(), reason);
                std::process::exit(1);
            }
        }
        return;
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    run_stream(reader, &config, hands, &args);
}

/// Classify snapshots line by line, announcing each action change
fn run_stream(reader: Box<dyn BufRead>, config: &ControllerConfig, hands: HandSupport, args: &Args) {
    let mut detector = ExpressionDetector::new(hands);
    let mut announcer = KeyAnnouncer::new(LogSink);
    let started = Instant::now();

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("read failed: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let snapshot: Snapshot = match serde_json::from_str(line) {
            Ok(s) => s,
            Err(e) => {
                warn!("line {}: {} ({})", line_no + 1, FrameReason::R201_FRAME_DECODE_ERROR, e);
                continue;
            }
        };

        let now = snapshot.timestamp.unwrap_or_else(|| started.elapsed().as_secs_f64());
        let output = match detector.process(&snapshot, config, now) {
            Ok(o) => o,
            Err(reason) => {
                warn!("line {}: {}", line_no + 1, reason);
                continue;
            }
        };

        if output.changed {
            // unbound keys are already logged by the announcer
            let _ = announcer.announce(output.action, config);
        }

        if output.changed || args.verbose {
            print_output(&output, args);
        }
    }

    eprintln!(
        "Session ended. Frames: {} | Announced: {} | Final action: {}",
        detector.frames_processed(),
        announcer.announced(),
        detector.current_action()
    );
}

fn print_output(output: &FrameOutput, args: &Args) {
    if args.json {
        match serde_json::to_string(output) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("encode failed: {}", e),
        }
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }

    if args.verbose && !args.json {
        println!("    {}", output.readings_string());
    }
}
