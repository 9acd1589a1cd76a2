//! Undercroft dungeon generator
//!
//! Generates a multi-level dungeon and prints a summary and a map of each
//! level.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use log::info;

use uc_core::DungeonConfig;
use uc_core::dungeon::{Coord, Dungeon, DungeonGenerator};
use uc_save::{default_save_path, save_dungeon, save_dungeon_compressed};

/// Multi-level dungeon layout generator
#[derive(Parser, Debug)]
#[command(name = "undercroft")]
#[command(author, version, about = "Undercroft - Dig a dungeon!", long_about = None)]
#[command(group(ArgGroup::new("destination").args(["save", "name"])))]
struct Args {
    /// Seed text; integers are used directly, anything else is hashed
    #[arg(short = 's', long = "seed")]
    seed: Option<String>,

    /// Dungeon extent as WIDTHxLEVELSxDEPTH (e.g. 40x4x40)
    #[arg(long = "size", value_parser = parse_extent)]
    size: Option<Coord>,

    /// Number of rooms to attempt to place
    #[arg(short = 'r', long = "rooms")]
    rooms: Option<usize>,

    /// Smallest room as WIDTHxHEIGHTxDEPTH
    #[arg(long = "min-room", value_parser = parse_extent)]
    min_room: Option<Coord>,

    /// Largest room as WIDTHxHEIGHTxDEPTH
    #[arg(long = "max-room", value_parser = parse_extent)]
    max_room: Option<Coord>,

    /// Chance of keeping each extra connection (0 to 1)
    #[arg(long = "loop-chance")]
    loop_chance: Option<f64>,

    /// JSON config file; command-line flags override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write the generated dungeon to this file
    #[arg(long = "save")]
    save: Option<PathBuf>,

    /// Save under this name in the user's data directory
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Gzip the saved dungeon
    #[arg(long = "compress", requires = "destination")]
    compress: bool,

    /// Print only the summary, no level maps
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// More log output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parse `WxHxD` into a coordinate
fn parse_extent(text: &str) -> Result<Coord, String> {
    let parts: Vec<&str> = text.split(['x', 'X']).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected WIDTHxHEIGHTxDEPTH, got '{text}'"));
    };
    let parse = |s: &str| {
        s.trim()
            .parse::<i32>()
            .map_err(|e| format!("bad number '{s}' in '{text}': {e}"))
    };
    Ok(Coord::new(parse(*x)?, parse(*y)?, parse(*z)?))
}

impl Args {
    /// Load the config file (or defaults) and apply command-line overrides
    fn build_config(&self) -> anyhow::Result<DungeonConfig> {
        let mut config = match &self.config {
            Some(path) => DungeonConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => DungeonConfig::default(),
        };

        if let Some(seed) = &self.seed {
            config.seed = seed.clone();
        }
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(rooms) = self.rooms {
            config.room_count = rooms;
        }
        if let Some(min_room) = self.min_room {
            config.min_room_size = min_room;
        }
        if let Some(max_room) = self.max_room {
            config.max_room_size = max_room;
        }
        if let Some(loop_chance) = self.loop_chance {
            config.loop_chance = loop_chance;
        }
        Ok(config)
    }

    /// Where to write the dungeon, if anywhere
    fn save_path(&self) -> Option<PathBuf> {
        match (&self.save, &self.name) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(name)) => Some(default_save_path(name)),
            (None, None) => None,
        }
    }

    fn log_level(&self) -> simplelog::LevelFilter {
        use simplelog::LevelFilter::{Debug, Info, Trace, Warn};
        match self.verbose {
            0 => Warn,
            1 => Info,
            2 => Debug,
            _ => Trace,
        }
    }
}

fn print_dungeon(dungeon: &Dungeon, quiet: bool) {
    println!("{}", dungeon.report());
    if quiet {
        return;
    }
    for y in 0..dungeon.level_count() {
        println!();
        println!(
            "level {y} ({} stairs up)",
            dungeon.stairs_between(y).count()
        );
        println!("{}", dungeon.render_level(y));
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    use simplelog::LevelFilter::Off;
    simplelog::TermLogger::init(
        args.log_level(),
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let config = args.build_config()?;
    let generator = DungeonGenerator::new(config).context("invalid dungeon configuration")?;
    let dungeon = generator.generate();

    print_dungeon(&dungeon, args.quiet);

    if let Some(path) = args.save_path() {
        let saved = if args.compress {
            save_dungeon_compressed(&dungeon, &path)
        } else {
            save_dungeon(&dungeon, &path)
        };
        saved.with_context(|| format!("saving dungeon to {}", path.display()))?;
        info!("saved dungeon to {}", path.display());
    }

    Ok(())
}
