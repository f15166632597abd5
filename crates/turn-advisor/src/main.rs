//! NPC Turn Advisor
//!
//! Replays a scripted encounter and prints the advisory whispered to the game
//! master on every NPC turn.

use clap::Parser;
use std::io::{self, Stdout};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use turn_advisor::{
    default_config_toml, run_scenario, Advisor, AdvisorError, Advisory, AdvisoryLogWriter,
    MessageSink, RngDice, Scenario, SkipReason, WriterSink,
};

/// Command line arguments for the advisor
#[derive(Parser, Debug)]
#[command(name = "npc_advisor")]
#[command(about = "Suggests NPC combat turns to the game master")]
struct Args {
    /// Scenario file (JSON) to replay
    #[arg(long, required_unless_present = "print_default_config")]
    scenario: Option<PathBuf>,

    /// Advisor configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Append delivered advisories to this JSON Lines file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

/// Prints to stdout and optionally mirrors to the advisory log.
struct CliSink {
    stdout: WriterSink<Stdout>,
    log: Option<AdvisoryLogWriter>,
}

impl MessageSink for CliSink {
    fn deliver(&mut self, advisory: &Advisory) {
        self.stdout.deliver(advisory);
        if let Some(log) = self.log.as_mut() {
            log.deliver(advisory);
        }
    }
}

fn main() -> Result<(), AdvisorError> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return Ok(());
    }

    // clap enforces --scenario whenever --print-default-config is absent
    let Some(scenario_path) = args.scenario else {
        return Ok(());
    };

    let mut advisor = match &args.config {
        Some(path) => Advisor::from_config_file(path)?,
        None => Advisor::with_defaults(),
    };
    let scenario = Scenario::from_file(&scenario_path)?;

    tracing::info!(
        "Replaying scenario '{}' ({} tokens, {} turns, seed {})",
        scenario.name,
        scenario.tokens.len(),
        scenario.turns.len(),
        args.seed
    );

    let log = match &args.log {
        Some(path) => Some(AdvisoryLogWriter::open(path)?),
        None => None,
    };
    let mut sink = CliSink {
        stdout: WriterSink::new(io::stdout()),
        log,
    };
    let mut dice = RngDice::seeded(args.seed);

    let summary = run_scenario(&mut advisor, &scenario, &mut sink, &mut dice);

    if let Some(log) = sink.log.as_mut() {
        log.flush()?;
        tracing::info!("Wrote {} advisories to {:?}", log.written(), log.path());
    }

    tracing::info!(
        "Encounter {}: {} advised, {} without offensive action, \
         {} without players, {} unresolvable",
        summary.encounter,
        summary.advised(),
        summary.skipped(SkipReason::NoOffensiveAction),
        summary.skipped(SkipReason::NoPlayers),
        summary.skipped(SkipReason::UnresolvableCombatant)
    );

    Ok(())
}
