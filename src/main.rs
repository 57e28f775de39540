//! ReviewXP - Entry Point
//!
//! Command-line front end: score answers, inspect progress, buy skills.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use reviewxp::engine::Notification;
use reviewxp::{Engine, EngineConfig, Grade, JsonFileStore};

#[derive(Parser)]
#[command(name = "reviewxp", version, about = "XP, levels and skills for your flashcard reviews")]
struct Cli {
    /// State file (defaults to the platform data directory)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// RON tuning file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one or more answers (again, hard, good, easy or 1-4)
    Grade {
        #[arg(required = true, value_parser = parse_grade)]
        grades: Vec<Grade>,
    },
    /// Show the status line and full stats
    Stats,
    /// List the skill tree
    Skills,
    /// Spend a skill point on a skill
    Unlock {
        skill: String,
    },
    /// List achievements
    Achievements,
    /// Show archived daily XP
    History,
    /// Wipe all progress
    Reset {
        /// Required to actually reset
        #[arg(long)]
        yes: bool,
    },
    /// Write the default tuning file
    ExportConfig {
        path: PathBuf,
    },
}

fn parse_grade(s: &str) -> Result<Grade, String> {
    Grade::from_name(s).ok_or_else(|| format!("unknown grade '{}'", s))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::info!("Starting ReviewXP v{}", env!("CARGO_PKG_VERSION"));

    let config = cli
        .config
        .as_deref()
        .map(EngineConfig::load)
        .unwrap_or_default();

    if let Commands::ExportConfig { path } = &cli.command {
        config
            .export(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("exporting config to {}", path.display()))?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let store = match cli.state {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::at_default_location(),
    };
    let mut engine = Engine::new(store).with_config(config);
    print_notifications(&engine.initialize());

    match cli.command {
        Commands::Grade { grades } => {
            for grade in grades {
                let outcome = engine.process_grade(grade);
                if cli.json {
                    println!("{}", serde_json::to_string(&outcome)?);
                    continue;
                }
                println!("{}: {}", grade, outcome);
                print_notifications(&outcome.notifications);
                if !outcome.saved {
                    eprintln!("warning: progress could not be saved");
                }
            }
            if !cli.json {
                println!("{}", engine.display_snapshot());
            }
        }
        Commands::Stats => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&engine.stats_report())?);
            } else {
                println!("{}", engine.display_snapshot());
                println!();
                println!("{}", engine.stats_report());
            }
        }
        Commands::Skills => {
            let tree = engine.skill_tree();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                println!("Skill points: {}", engine.state().skill_points);
                for status in tree {
                    let node = status.node;
                    let note = match &status.blocked_by {
                        None => "available".to_string(),
                        Some(reason) => reason.to_string(),
                    };
                    println!(
                        "{} {:<18} {}/{}  {} [{}]",
                        node.icon, node.name, status.level, node.max_level, node.description, note
                    );
                }
            }
        }
        Commands::Unlock { skill } => {
            let upgrade = engine.unlock_skill(&skill)?;
            println!("{} is now level {}", upgrade.skill, upgrade.new_level);
            print_notifications(&upgrade.notifications);
        }
        Commands::Achievements => {
            let list = engine.achievements();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for a in list {
                    let mark = if a.earned { "x" } else { " " };
                    let date = a.date.unwrap_or_default();
                    println!(
                        "[{}] {} {:<22} {:<32} +{} XP {}",
                        mark, a.icon, a.name, a.description, a.reward_xp, date
                    );
                }
            }
        }
        Commands::History => {
            let history = engine.xp_history();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No history yet");
            } else {
                for (date, xp) in history {
                    println!("{}  {:>6} XP", date, xp);
                }
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("refusing to reset without --yes");
            }
            if engine.reset() {
                println!("XP data has been reset.");
            } else {
                anyhow::bail!("progress was reset in memory but could not be saved");
            }
        }
        Commands::ExportConfig { .. } => {}
    }

    Ok(())
}

fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        println!("  {}", n);
    }
}
