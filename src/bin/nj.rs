use clap::Parser;
use ncdtree::io::read_distance_matrix;
use ncdtree::newick::to_newick;
use ncdtree::nj::neighbour_joining;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Reconstruct a neighbour-joining tree from a labelled lower-triangular
/// distance matrix and print it in Newick format.
#[derive(Parser, Debug)]
#[command(name = "nj", version, about = "Neighbour-joining tree from a distance matrix")]
struct Args {
    /// File with the labelled lower-triangular distance matrix (stdin if omitted)
    matrix: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let reader: Box<dyn BufRead> = match &args.matrix {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("Failed to open {:?}: {e}", path);
                std::process::exit(2);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let (taxa, d) = match read_distance_matrix(reader) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Failed to read distance matrix: {e}");
            std::process::exit(2);
        }
    };

    let tree = match neighbour_joining(&taxa, d) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Neighbour-joining failed: {e}");
            std::process::exit(2);
        }
    };

    println!("{}", to_newick(&tree));
}
