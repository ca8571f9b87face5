//! Command-line host for the trait system.
//!
//! Loads content, attaches a file-backed entity and either runs the scheduler
//! until Ctrl-C or edits/prints the entity's persisted trait state.
mod behaviours;
mod config;

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use trait_core::EntityId;
use trait_runtime::{EntityHandle, FileAttributeStore, RuntimeConfig, SystemClock, TraitSystem};

use behaviours::LogFiring;
use config::CliConfig;

/// Timed, repeatable traits on a single entity
#[derive(Parser)]
#[command(name = "traits")]
#[command(about = "Apply traits to an entity and run the trait scheduler", long_about = None)]
#[command(version)]
struct Cli {
    /// Entity whose attributes are read from the save directory
    #[arg(long, default_value = "player")]
    entity: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply traits, then tick until Ctrl-C
    Run {
        /// Also apply every trait of this character class
        #[arg(long)]
        class: Option<String>,

        /// Trait codes to apply
        traits: Vec<String>,
    },

    /// Remove traits from the entity
    Remove { traits: Vec<String> },

    /// Print the persisted trait state as JSON
    Inspect,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for TRAITS_* variables)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env();

    let content = trait_content::load_content_dir(&config.content_dir).with_context(|| {
        format!("failed to load content from {}", config.content_dir.display())
    })?;

    // One logging behaviour per stat property that any trait touches.
    let properties: BTreeSet<String> = content
        .traits
        .iter()
        .flat_map(|definition| definition.attributes.keys().cloned())
        .collect();

    let mut builder = TraitSystem::builder()
        .config(RuntimeConfig::default().with_scheduler(config.scheduler.clone()))
        .clock(Arc::new(SystemClock))
        .traits(content.traits)
        .classes(content.classes);
    for property in properties {
        builder = builder.behaviour(Arc::new(LogFiring::new(property)));
    }
    let system = builder.build().await?;

    let id = EntityId::new(cli.entity);
    let store = FileAttributeStore::open(&config.save_dir, &id)
        .with_context(|| format!("failed to open save data in {}", config.save_dir.display()))?;
    let entity = Arc::new(EntityHandle::new(id.clone(), Arc::new(store)));

    match cli.command {
        Command::Run { class, traits } => {
            system.join(entity.clone())?;

            let mut codes = traits;
            if let Some(name) = class {
                let class = system
                    .classes()
                    .get(&name)
                    .with_context(|| format!("unknown character class `{name}`"))?;
                codes.extend(class.traits.iter().cloned());
            }
            for code in &codes {
                if system.apply_trait(&*entity, code)? {
                    tracing::info!(entity = %id, %code, "trait applied");
                }
            }

            tracing::info!(entity = %id, "running; press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            system.leave(&id);
        }
        Command::Remove { traits } => {
            for code in &traits {
                if system.remove_trait(&*entity, code)? {
                    tracing::info!(entity = %id, %code, "trait removed");
                }
            }
        }
        Command::Inspect => {
            let snapshot = system.lifecycle().state_snapshot(&*entity)?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    system.shutdown().await?;
    Ok(())
}
