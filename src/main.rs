//! Upgrades - Entry Point
//!
//! Operator tool for checking upgrade formulas against a config file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use upgrades::config::{export_default_config, UpgradeConfig, VanillaCatalog};
use upgrades::save::{JsonLevelStore, LevelStore};
use upgrades::tiers::{Dimension, DimensionIndex, DimensionKind, Material};
use upgrades::UpgradeService;

#[derive(Parser, Debug)]
#[command(name = "upgrades")]
#[command(about = "Inspect upgrade tiers and quotes from an upgrade config")]
struct Args {
    /// Config file (.ron or .json); the built-in defaults when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote the next level of one upgrade
    Quote {
        /// range, block, entity, group or command
        dimension: String,
        /// Material, entity type, group or command id (not used for range)
        key: Option<String>,
        #[arg(long, short, default_value = "BSkyBlock")]
        namespace: String,
        /// Current upgrade level
        #[arg(long, short)]
        level: i64,
        #[arg(long, default_value_t = 0)]
        island_level: i64,
        #[arg(long, default_value_t = 1)]
        players: i64,
    },
    /// List the merged tiers of one upgrade
    Tiers {
        dimension: String,
        key: Option<String>,
        #[arg(long, short, default_value = "BSkyBlock")]
        namespace: String,
    },
    /// Show the stored levels of one island against the configured maximums
    Levels {
        island: String,
        #[arg(long, short, default_value = "BSkyBlock")]
        namespace: String,
        /// Level file directory; the per-user data directory when omitted
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Write the default config for editing
    Export { path: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Export { path } => {
            let path = export_default_config(&path)?;
            println!("Wrote {}", path.display());
        }
        Command::Quote {
            dimension,
            key,
            namespace,
            level,
            island_level,
            players,
        } => {
            let service = load_service(args.config.as_deref())?;
            let dimension = parse_dimension(&dimension, key.as_deref())?;
            if !service.is_enabled(&namespace) {
                let disabled: Vec<_> = service.snapshot().disabled_namespaces().map(str::to_string).collect();
                println!("Upgrades are disabled in {} (disabled: {})", namespace, disabled.join(", "));
                return Ok(());
            }
            match service.offer(&dimension, &namespace, level, island_level, players)? {
                Some(offer) => {
                    println!("{} level {} -> {} (tier {})", offer.upgrade_name, level, level + 1, offer.tier_name);
                    println!("  effect:           {}", offer.values.effect);
                    println!("  island level:     {}", offer.values.island_level);
                    println!("  cost:             {}", offer.values.cost);
                    println!("  permission level: {}", offer.permission_level);
                    println!("  max level:        {}", offer.max_level);
                }
                None => println!("{} is fully upgraded at level {}", dimension.upgrade_name(), level),
            }
        }
        Command::Tiers {
            dimension,
            key,
            namespace,
        } => {
            let service = load_service(args.config.as_deref())?;
            let dimension = parse_dimension(&dimension, key.as_deref())?;
            let index = service.snapshot();
            let tiers = index.tiers(&dimension, &namespace);
            if tiers.is_empty() {
                println!("{} has no tiers in {}", dimension, namespace);
            }
            if let Some(icon) = icon(&index, &dimension) {
                println!("{} (icon {})", dimension, icon);
            }
            for tier in tiers.iter() {
                let ceiling = if tier.is_unbounded() {
                    "none".to_string()
                } else {
                    tier.max_level.to_string()
                };
                println!(
                    "{:<12} max-level {:<6} upgrade {:<16} island {:<16} cost {}",
                    tier.id,
                    ceiling,
                    tier.effect.to_string(),
                    tier.min_secondary_level.to_string(),
                    tier.cost
                );
            }
        }
        Command::Levels { island, namespace, dir } => {
            let service = load_service(args.config.as_deref())?;
            let store = match dir {
                Some(dir) => JsonLevelStore::new(dir),
                None => JsonLevelStore::open_default(),
            };
            let index = service.snapshot();
            println!("Levels of {} in {}", island, store.dir().display());
            for kind in DimensionKind::ALL {
                for dimension in index.managed(kind, &namespace) {
                    let name = dimension.upgrade_name();
                    let level = store.get_progress_level(&island, &name)?;
                    println!("  {:<32} {} / {}", name, level, index.max_level(&dimension, &namespace));
                }
            }
        }
    }

    Ok(())
}

fn load_service(path: Option<&Path>) -> Result<UpgradeService> {
    let config = match path {
        Some(path) => UpgradeConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => UpgradeConfig::defaults()?,
    };
    let (service, diagnostics) = UpgradeService::from_config(&config, Arc::new(VanillaCatalog))?;
    if !diagnostics.is_empty() {
        log::warn!("{} config entries were skipped", diagnostics.len());
    }
    Ok(service)
}

fn parse_dimension(name: &str, key: Option<&str>) -> Result<Dimension> {
    let Some(kind) = DimensionKind::from_name(name) else {
        bail!("unknown dimension '{}' (expected range, block, entity, group or command)", name);
    };
    if let (false, Some(key)) = (kind.is_keyed(), key) {
        log::warn!("dimension '{}' takes no key, ignoring '{}'", name, key);
    }
    Dimension::from_parts(kind, key).with_context(|| format!("dimension '{}' needs a key", name))
}

fn icon<'a>(index: &'a DimensionIndex, dimension: &Dimension) -> Option<&'a Material> {
    match dimension {
        Dimension::Range | Dimension::BlockLimit(_) => None,
        Dimension::EntityLimit(entity) => index.entity_icon(entity),
        Dimension::GroupLimit(group) => index.group_icon(group),
        Dimension::CommandLimit(command) => index.command_icon(command),
    }
}
