use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pullgen_core::arena::NodeArena;
use pullgen_core::config::Config;
use pullgen_core::level::{self, Level};
use pullgen_core::level_writer::build_level;
use pullgen_core::progress::Ticker;
use pullgen_core::search;

/// Pull-based level generator and solver.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for the hardest reachable level starting from a seed map.
    Generate {
        /// Path to the seed level file (walls, sink and player start).
        #[arg(long = "map")]
        map: PathBuf,
        /// Where to write the generated level.
        #[arg(short, long)]
        output: PathBuf,
        /// Print progress once a second.
        #[arg(long)]
        progress: bool,
        /// Stop after visiting this many search nodes.
        #[arg(long)]
        node_limit: Option<usize>,
        /// Longest block-line a single pull may cover (1 = ordinary pulls).
        #[arg(long, default_value_t = 1)]
        max_push: usize,
    },
    /// Forward-solve a level, printing the push sequence if one exists.
    Solve {
        #[arg(long = "map")]
        map: PathBuf,
        #[arg(long)]
        node_limit: Option<usize>,
        /// Longest block-line a single pull may cover (1 = ordinary pulls).
        #[arg(long, default_value_t = 1)]
        max_push: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            map,
            output,
            progress,
            node_limit,
            max_push,
        } => run_generate(&map, &output, progress, node_limit, max_push),
        Command::Solve {
            map,
            node_limit,
            max_push,
        } => run_solve(&map, node_limit, max_push),
    }
}

/// How many of the top rows of a decoded level actually carry content
/// (anything other than floor). Used to pick the smallest supported board
/// height const generic for the engine.
fn active_height(level: &Level) -> usize {
    let mut height = 1;
    for y in 0..level::MAP_SIDE {
        for x in 0..level::MAP_SIDE {
            if level.get(x, y) != pullgen_core::tile::Tile::Floor {
                height = height.max(y + 1);
            }
        }
    }
    height
}

macro_rules! dispatch_height {
    ($height:expr, $level:ident, $body:expr) => {
        match $height {
            h if h <= 5 => run_sized::<5>($level, $body),
            h if h <= 8 => run_sized::<8>($level, $body),
            h if h <= 10 => run_sized::<10>($level, $body),
            h if h <= 16 => run_sized::<16>($level, $body),
            h => bail!("level height {h} exceeds the supported maximum of 16"),
        }
    };
}

fn run_generate(
    map: &PathBuf,
    output: &PathBuf,
    progress: bool,
    node_limit: Option<usize>,
    max_push: usize,
) -> Result<()> {
    let bytes = std::fs::read(map).with_context(|| format!("reading {}", map.display()))?;
    let seed = level::decode(&bytes).with_context(|| format!("decoding {}", map.display()))?;
    let height = active_height(&seed);

    dispatch_height!(
        height,
        seed,
        GenerateOp {
            output,
            progress,
            node_limit,
            max_push
        }
    )
}

fn run_solve(map: &PathBuf, node_limit: Option<usize>, max_push: usize) -> Result<()> {
    let bytes = std::fs::read(map).with_context(|| format!("reading {}", map.display()))?;
    let seed = level::decode(&bytes).with_context(|| format!("decoding {}", map.display()))?;
    let height = active_height(&seed);

    dispatch_height!(height, seed, SolveOp { node_limit, max_push })
}

struct GenerateOp<'a> {
    output: &'a PathBuf,
    progress: bool,
    node_limit: Option<usize>,
    max_push: usize,
}

struct SolveOp {
    node_limit: Option<usize>,
    max_push: usize,
}

trait Op {
    fn run<const H: usize>(&self, level: &Level) -> Result<()>;
}

impl<'a> Op for GenerateOp<'a> {
    fn run<const H: usize>(&self, level: &Level) -> Result<()> {
        let mut cfg: Config<H> = Config::from_level(level)?;
        cfg.max_push = self.max_push.max(1);
        let arena = NodeArena::<H>::new();
        let ticker = if self.progress {
            Some(Ticker::once_per_second())
        } else {
            None
        };

        log::info!("starting generation search");
        let (best, stats) = search::generate(&cfg, &arena, self.node_limit, ticker.as_ref());
        log::info!(
            "search finished: {} nodes visited, {} pruned, best depth {}, {:?} elapsed",
            stats.nodes_visited,
            stats.nodes_pruned,
            stats.max_depth_seen,
            stats.elapsed
        );
        if let Some(bytes) = stats.peak_memory_bytes {
            log::debug!("peak resident memory: {} bytes", bytes);
        }

        let generated = build_level(&cfg, best, &level.title);
        let encoded = level::encode(&generated);
        let mut file = File::create(self.output)
            .with_context(|| format!("creating {}", self.output.display()))?;
        file.write_all(&encoded)?;
        println!(
            "wrote {} (search depth {})",
            self.output.display(),
            best.depth
        );
        Ok(())
    }
}

impl Op for SolveOp {
    fn run<const H: usize>(&self, level: &Level) -> Result<()> {
        let mut cfg: Config<H> = Config::from_level(level)?;
        cfg.max_push = self.max_push.max(1);
        match search::solve(&cfg, self.node_limit) {
            Some(moves) => {
                println!("solved in {} pushes:", moves.len());
                for d in moves {
                    println!("{}", direction_name(d));
                }
            }
            None => println!("no solution found"),
        }
        Ok(())
    }
}

fn direction_name(d: pullgen_core::point::Direction) -> &'static str {
    match (d.dx, d.dy) {
        (0, -1) => "north",
        (0, 1) => "south",
        (-1, 0) => "west",
        (1, 0) => "east",
        _ => "?",
    }
}

fn run_sized<const H: usize>(level: Level, op: impl Op) -> Result<()> {
    op.run::<H>(&level)
}
