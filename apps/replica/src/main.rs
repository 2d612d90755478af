//! Replay CLI: feed a recorded JSONL frame stream through a replica and print
//! the final snapshot and event log.

use std::fs::File;
use std::io::{self, BufReader, Write};

use clap::{Parser, ValueEnum};
use replica::domain::{DeckVariant, PlayerId, RoomId};
use replica::replay::{replay, ReplayOptions};
use replica::{telemetry, AppError, ReplicaConfig};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "replica")]
#[command(about = "Replay game frames through a local replica")]
struct Args {
    /// JSONL file of server frames; `-` reads stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Player the replica renders for
    #[arg(long)]
    viewer: String,

    /// Room id, used when the stream does not open with a snapshot
    #[arg(long, default_value = "room")]
    room: String,

    /// Room owner, used when the stream does not open with a snapshot
    #[arg(long)]
    owner: Option<String>,

    #[arg(long, default_value = "4")]
    room_size: u32,

    #[arg(long, default_value = "10")]
    rounds: u32,

    #[arg(long, default_value = "standard")]
    deck: Deck,

    /// Omit the event log from the output
    #[arg(long)]
    no_log: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum Deck {
    Standard,
    Expansion,
}

impl From<Deck> for DeckVariant {
    fn from(deck: Deck) -> Self {
        match deck {
            Deck::Standard => DeckVariant::Standard,
            Deck::Expansion => DeckVariant::Expansion,
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config = ReplicaConfig::from_env()?;
    let options = ReplayOptions {
        viewer: PlayerId::new(args.viewer.clone()),
        room_id: RoomId::new(args.room),
        owner: PlayerId::new(args.owner.unwrap_or(args.viewer)),
        room_size: args.room_size,
        rounds: args.rounds,
        deck: args.deck.into(),
    };

    let mut report = if args.input == "-" {
        replay(io::stdin().lock(), &options, config).await?
    } else {
        replay(BufReader::new(File::open(&args.input)?), &options, config).await?
    };
    if args.no_log {
        report.log.clear();
    }

    info!(
        frames = report.frames,
        skipped = report.skipped_lines,
        phase = report.snapshot.state.kind().as_str(),
        "replay finished"
    );

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();
    let args = Args::parse();

    if let Err(err) = run(args).await {
        error!(code = %err.code(), error = %err, "replay failed");
        return Err(err.into());
    }
    Ok(())
}
