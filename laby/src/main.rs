use clap::Parser;
use rand::{thread_rng, Rng, SeedableRng};

use claby::{generate, solve, LabyError, Pos, Random};

#[derive(Parser, Debug)]
#[clap(version, author, about, name = "laby")]
struct Args {
    #[clap(short, long, default_value_t = 12, help = "Number of maze rows")]
    rows: i32,
    #[clap(short, long, default_value_t = 16, help = "Number of maze columns")]
    cols: i32,
    #[clap(short, long, help = "Seed for reproducible mazes")]
    seed: Option<u64>,
    #[clap(short, long, action, help = "Print the maze without its solution")]
    unsolved: bool,
}

fn main() -> Result<(), LabyError> {
    better_panic::install();

    let args = Args::parse();
    let mut rng = Random::seed_from_u64(args.seed.unwrap_or_else(|| thread_rng().gen()));

    let mut laby = generate(Pos(args.rows, args.cols), &mut rng)?;
    println!("{}", laby.render()?);

    if args.unsolved {
        return Ok(());
    }

    let route = solve(&laby, &mut rng)?;
    laby.write(&route, false)?;
    println!();
    println!("{}", laby.render()?);

    Ok(())
}
