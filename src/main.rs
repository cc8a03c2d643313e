use clap::{Parser, Subcommand};
use jigsolve::evolve::Evolve;
use jigsolve::puzzle::PieceSet;
use jigsolve::size_detector::{detect_piece_size, MAX_PIECE_SIZE, MIN_PIECE_SIZE};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_GENERATIONS: usize = 20;
const DEFAULT_POPULATION: usize = 200;

#[derive(Parser)]
#[command(name = "jigsolve", version, about = "Solve or create puzzles with square pieces")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a jigsaw puzzle with square pieces
    Create {
        /// Input image file to create the puzzle from
        image: PathBuf,
        /// Output puzzle image with square pieces
        puzzle: PathBuf,
        /// Size of a single square puzzle piece in pixels
        #[arg(
            short,
            long,
            default_value_t = MAX_PIECE_SIZE,
            value_parser = clap::value_parser!(u32).range(MIN_PIECE_SIZE as i64..=MAX_PIECE_SIZE as i64)
        )]
        size: u32,
    },
    /// Run the puzzle solver
    Run {
        /// Input puzzle image with square pieces
        puzzle: PathBuf,
        /// Output image file for the solved puzzle
        solution: PathBuf,
        /// Size of a single square puzzle piece in pixels; autodetected if
        /// not specified
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        size: Option<u32>,
        /// The number of generations for the genetic algorithm
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_GENERATIONS,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        generations: usize,
        /// The size of the population for the genetic algorithm
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_POPULATION,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..)
        )]
        population: usize,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Create {
            image,
            puzzle,
            size,
        } => create_puzzle(&image, &puzzle, size),
        Command::Run {
            puzzle,
            solution,
            size,
            generations,
            population,
        } => solve_puzzle(&puzzle, &solution, size, generations, population),
    }
}

fn create_puzzle(image: &PathBuf, puzzle: &PathBuf, size: u32) -> Result<(), Box<dyn Error>> {
    let input = image::open(image)?.to_rgb8();
    let pieces = PieceSet::from_image(&input, size)?;

    let mut rng = SmallRng::from_entropy();
    let output = pieces.shuffled_image(&mut rng)?;
    output.save(puzzle)?;

    log::info!("created puzzle with {} pieces", pieces.len());
    Ok(())
}

fn solve_puzzle(
    puzzle: &PathBuf,
    solution: &PathBuf,
    size: Option<u32>,
    generations: usize,
    population: usize,
) -> Result<(), Box<dyn Error>> {
    let input = image::open(puzzle)?.to_rgb8();
    let size = match size {
        Some(size) => size,
        None => {
            let detected = detect_piece_size(&input)?;
            log::info!("autodetected piece size: {detected}");
            detected
        }
    };

    log::info!("population: {population}");
    log::info!("generations: {generations}");
    log::info!("piece size: {size}");

    let pieces = PieceSet::from_image(&input, size)?;
    let mut evolve = Evolve::builder()
        .with_piece_set(pieces)
        .with_target_population_size(population)
        .with_max_generations(generations)
        .with_par_fitness(true)
        .with_par_crossover(true)
        .build()
        .map_err(|error| error.0)?;

    let best = evolve.call()?;
    let output = evolve.piece_set.assemble(&best.genes)?;
    output.save(solution)?;

    log::info!(
        "puzzle solved in {} generations, best fitness {:?}",
        evolve.state.current_generation,
        evolve.state.best_fitness_score(),
    );
    Ok(())
}
