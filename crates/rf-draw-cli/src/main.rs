//! rf-draw — terminal prize wheel
//!
//! Usage:
//!   rf-draw Alice Bob Carol
//!   rf-draw --names names.txt --priority vip.txt --remove --spins 3
//!   rf-draw --config draw.json --profile turbo --timeline

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use rf_draw::{
    CadenceConfig, CadenceProfile, Callbacks, DrawConfig, NameDrawEngine, SpinDriver,
    parse_name_list,
};

#[derive(Parser, Debug)]
#[command(name = "rf-draw", about = "Draw winners from a name list on a spinning reel")]
struct Cli {
    /// Names to draw from (added after any --names file)
    names: Vec<String>,

    /// File with one name per line
    #[arg(long = "names", value_name = "FILE")]
    names_file: Option<PathBuf>,

    /// File with priority names, drawn before anyone else
    #[arg(long, value_name = "FILE")]
    priority: Option<PathBuf>,

    /// JSON draw config to start from
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Remove each winner from its pool
    #[arg(short, long)]
    remove: bool,

    /// Number of spins
    #[arg(short, long, default_value_t = 1)]
    spins: u32,

    /// Entries shown per spin
    #[arg(long)]
    reel_length: Option<usize>,

    /// Reel timing
    #[arg(long, value_enum)]
    profile: Option<Profile>,

    /// Seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    /// Print each spin's stage timeline as JSON
    #[arg(long)]
    timeline: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Profile {
    Normal,
    Turbo,
    Studio,
}

impl From<Profile> for CadenceProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Normal => CadenceProfile::Normal,
            Profile::Turbo => CadenceProfile::Turbo,
            Profile::Studio => CadenceProfile::Studio,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;
    runtime.block_on(run(&cli, config))
}

fn read_name_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_name_list(&text))
}

fn build_config(cli: &Cli) -> Result<DrawConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            DrawConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => DrawConfig::default(),
    };

    if let Some(path) = &cli.names_file {
        config.names = read_name_file(path)?;
    }
    config.names.extend(parse_name_list(&cli.names.join("\n")));

    if let Some(path) = &cli.priority {
        config.priority_names = read_name_file(path)?;
    }

    config.remove_winner_from_pool |= cli.remove;
    if let Some(length) = cli.reel_length {
        config.max_reel_length = length;
    }
    if let Some(profile) = cli.profile {
        config.cadence = CadenceConfig::from_profile(profile.into());
    }

    if config.names.is_empty() && config.priority_names.is_empty() {
        bail!("No names given; pass names or --names <FILE>");
    }
    config.validate()?;
    Ok(config)
}

/// Redraw the reel line in place
fn show_entry(out: &mut impl Write, index: usize, entry: &str) -> std::io::Result<()> {
    write!(out, "\r{:>3}  {:<40}", index + 1, entry)?;
    out.flush()
}

async fn run(cli: &Cli, config: DrawConfig) -> Result<()> {
    let hooks = Callbacks::new()
        .with_spin_start(|| log::debug!("Spin started, controls locked"))
        .with_spin_end(|outcome| {
            println!();
            println!("Winner #{}: {}", outcome.spin_id, outcome.winner);
        })
        .with_pool_changed(|| log::debug!("Pool changed, winner highlight cleared"));

    let mut engine = NameDrawEngine::with_config(config, hooks)?;
    if let Some(seed) = cli.seed {
        engine.seed(seed);
    }

    let mut driver = SpinDriver::new().on_advance(|index, entry| {
        if let Err(e) = show_entry(&mut std::io::stdout(), index, entry) {
            log::debug!("Reel output failed: {}", e);
        }
    });

    for _ in 0..cli.spins {
        if engine.names().is_empty() && engine.priority_names().is_empty() {
            println!("No names left to draw.");
            break;
        }

        let Some(outcome) = driver.play(&mut engine).await? else {
            break;
        };
        if cli.timeline {
            println!("{}", serde_json::to_string_pretty(&outcome.timeline())?);
        }
    }

    println!("Spin: {}", engine.spin_count());
    Ok(())
}
