use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use entity_store::config::Config;
use entity_store::entity::{EntityAdapter, EntityReducer, EntityState};
use entity_store::logging;
use entity_store::replay::{self, JsonState, StepOutcome};
use entity_store::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Final entities in collection order, as a JSON array
    Json,
    /// Final ids, one per line
    Ids,
    /// One line per replayed action
    Summary,
}

/// Replay entity actions over a normalized JSON collection.
#[derive(Debug, Parser)]
#[command(name = "entity-store", version)]
struct Cli {
    /// JSON-lines file with one action per line
    script: PathBuf,

    /// Config file (default: <config dir>/entity-store/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snapshot to start from instead of an empty collection
    #[arg(long)]
    initial: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    logging::init_tracing(&config.logging.level);

    let adapter = EntityAdapter::new(config.collection.policy());
    let initial = match &cli.initial {
        Some(path) => {
            let snapshot = replay::load_snapshot(path)?;
            adapter
                .check(&snapshot)
                .with_context(|| format!("Snapshot '{}' does not fit the configured collection", path.display()))?;
            snapshot
        }
        None => EntityState::new(),
    };

    let actions = replay::load_script(&cli.script)?;
    tracing::debug!(actions = actions.len(), sorted = adapter.is_sorted(), "Loaded script");

    let store = Store::new(EntityReducer::with_initial_state(adapter, initial));
    let outcomes = replay::run(&store, actions);

    print!("{}", render(cli.format, &store.state(), &outcomes)?);
    Ok(())
}

fn render(format: OutputFormat, state: &JsonState, outcomes: &[StepOutcome]) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            let entities: Vec<_> = state.iter().collect();
            out.push_str(&serde_json::to_string_pretty(&entities)?);
            out.push('\n');
        }
        OutputFormat::Ids => {
            for id in state.ids() {
                out.push_str(id);
                out.push('\n');
            }
        }
        OutputFormat::Summary => {
            for (step, outcome) in outcomes.iter().enumerate() {
                out.push_str(&format!(
                    "{:>4} {:<11} changed={} ids_changed={} total={}\n",
                    step + 1,
                    outcome.kind,
                    outcome.changed,
                    outcome.ids_changed,
                    outcome.total
                ));
            }
        }
    }
    Ok(out)
}
