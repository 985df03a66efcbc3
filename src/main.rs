use clap::{Parser, ValueEnum};
use ncdtree::compressor::{DeflateSizer, GzipSizer, SizeCompressor, ZlibSizer};
use ncdtree::fasta::read_fasta;
use ncdtree::io::{open_output, write_labelled_matrix};
use ncdtree::ncd::{cx_vector, cxx_vector, ncd_matrix_parallel, self_ncd_vector};
use ncdtree::newick::to_newick;
use ncdtree::nj::neighbour_joining;
use ncdtree::stats;
use ncdtree::taxa::TaxonSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Estimate a phylogeny from sequences using the normalized compression
/// distance (NCD) and neighbour-joining, writing a labelled distance matrix
/// and a Newick tree.
#[derive(Parser, Debug)]
#[command(name = "ncdtree", version, about = "NCD distance matrix and neighbour-joining tree from FASTA sequences")]
struct Args {
    /// File with sequences in FASTA format (stdin if omitted)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Compression algorithm used for size measurements
    #[arg(short = 'a', long = "algo", value_enum, default_value_t = CodecArg::Gzip)]
    algo: CodecArg,

    /// Print per-sequence compression statistics
    #[arg(short = 's', long = "stats", default_value_t = false)]
    stats: bool,

    /// Skip tree estimation; only write the distance matrix
    #[arg(long = "notree", default_value_t = false)]
    no_tree: bool,

    /// Output path for the distance matrix (gzip-compressed if it ends in .gz)
    #[arg(short = 'm', long = "matrix-output", default_value = "ncd_matrix.txt")]
    matrix_output: PathBuf,

    /// Output path for the Newick tree
    #[arg(short = 'o', long = "tree-output", default_value = "tree.nwk")]
    tree_output: PathBuf,

    /// Decimal places for matrix entries
    #[arg(short = 'p', long = "precision", default_value_t = 9)]
    precision: usize,

    /// Quiet mode: suppresses progress messages on stdout
    #[arg(short = 'q', long = "quiet", default_value_t = false)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CodecArg {
    Gzip,
    Zlib,
    Deflate,
}

impl CodecArg {
    fn label(self) -> &'static str {
        match self {
            CodecArg::Gzip => "gzip",
            CodecArg::Zlib => "zlib",
            CodecArg::Deflate => "deflate",
        }
    }
}

fn main() {
    let args = Args::parse();

    // Read sequences
    let t0 = Instant::now();
    let reader: Box<dyn BufRead> = match &args.file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("Failed to open {:?}: {e}", path);
                std::process::exit(2);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };
    let (names, seqs) = match read_fasta(reader) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Failed to read FASTA input: {e}");
            std::process::exit(2);
        }
    };
    let n = names.len();
    if !args.no_tree && n < 2 {
        eprintln!("Need at least 2 sequences to estimate a tree, got {n}.");
        std::process::exit(2);
    }
    let read_s = t0.elapsed().as_secs_f64();
    log_if(!args.quiet, format!("Reading FASTA {read_s:.3}s"));
    log_if(!args.quiet, format!("Read {n} sequences"));
    log_if(!args.quiet, format!("Compressor {}", args.algo.label()));

    // Per-sequence compressed sizes (and self-concatenations for diagnostics)
    let t1 = Instant::now();
    let (cx, cxx) = match measure_sizes(args.algo, &seqs) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Compression failed: {e}");
            std::process::exit(2);
        }
    };
    let size_s = t1.elapsed().as_secs_f64();
    log_if(!args.quiet, format!("Measuring sequence sizes {size_s:.3}s"));

    if args.stats {
        let self_ncd = self_ncd_vector(&cx, &cxx);
        write_stats_table(&mut io::stdout().lock(), &names, &seqs, &cx, &self_ncd)
            .unwrap_or_else(|e| eprintln!("Failed to print statistics: {e}"));
    }

    // Pairwise NCD matrix
    let t2 = Instant::now();
    log_if(
        !args.quiet,
        format!("Determining NCD for {} pairs", n * (n.max(1) - 1) / 2),
    );
    let d = match build_matrix(args.algo, &seqs, &cx) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Compression failed: {e}");
            std::process::exit(2);
        }
    };
    let ncd_s = t2.elapsed().as_secs_f64();
    log_if(!args.quiet, format!("Determining NCD matrix {ncd_s:.3}s"));

    let t3 = Instant::now();
    if let Err(e) = open_output(&args.matrix_output)
        .and_then(|mut out| write_labelled_matrix(&mut out, &names, &d, args.precision))
    {
        eprintln!("Failed to write matrix {:?}: {e}", args.matrix_output);
        std::process::exit(4);
    }
    let write_s = t3.elapsed().as_secs_f64();
    log_if(
        !args.quiet,
        format!("Writing matrix to {:?} {write_s:.3}s", args.matrix_output),
    );

    if args.no_tree {
        return;
    }

    // Neighbour-joining
    let t4 = Instant::now();
    let taxa = match TaxonSet::new(names) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid taxon set: {e}");
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
    let nj_s = t4.elapsed().as_secs_f64();
    log_if(!args.quiet, format!("Neighbour-joining {nj_s:.3}s"));

    if let Err(e) = std::fs::write(&args.tree_output, to_newick(&tree) + "\n") {
        eprintln!("Failed to write tree {:?}: {e}", args.tree_output);
        std::process::exit(4);
    }
    log_if(
        !args.quiet,
        format!("Wrote tree to {:?}", args.tree_output),
    );
}

/// cx and cxx vectors under the selected codec.
fn measure_sizes(algo: CodecArg, seqs: &[Vec<u8>]) -> io::Result<(Vec<f64>, Vec<f64>)> {
    fn run<C: SizeCompressor>(mut mc: C, seqs: &[Vec<u8>]) -> io::Result<(Vec<f64>, Vec<f64>)> {
        let cx = cx_vector(seqs, &mut mc)?;
        let cxx = cxx_vector(seqs, &mut mc)?;
        Ok((cx, cxx))
    }
    match algo {
        CodecArg::Gzip => run(GzipSizer::default(), seqs),
        CodecArg::Zlib => run(ZlibSizer::default(), seqs),
        CodecArg::Deflate => run(DeflateSizer::default(), seqs),
    }
}

/// Pairwise matrix under the selected codec, one backend per worker.
fn build_matrix(
    algo: CodecArg,
    seqs: &[Vec<u8>],
    cx: &[f64],
) -> io::Result<ncdtree::TriangularMatrix> {
    match algo {
        CodecArg::Gzip => ncd_matrix_parallel(seqs, cx, GzipSizer::default),
        CodecArg::Zlib => ncd_matrix_parallel(seqs, cx, ZlibSizer::default),
        CodecArg::Deflate => ncd_matrix_parallel(seqs, cx, DeflateSizer::default),
    }
}

/// Per-sequence compression diagnostics plus summary rows.
fn write_stats_table<W: Write>(
    w: &mut W,
    names: &[String],
    seqs: &[Vec<u8>],
    cx: &[f64],
    self_ncd: &[f64],
) -> io::Result<()> {
    let sizes: Vec<f64> = seqs.iter().map(|s| s.len() as f64).collect();
    let ratios: Vec<f64> = sizes.iter().zip(cx).map(|(&l, &c)| l / c).collect();

    let name_width = names
        .iter()
        .map(|s| s.len())
        .max()
        .unwrap_or(0)
        .max("Taxon".len());

    writeln!(
        w,
        "{:>4}  {:<name_width$}  {:>10}  {:>14}  {:>16}  {:>10}",
        "#", "Taxon", "Size", "CompressedSize", "CompressionRatio", "SelfNCD"
    )?;
    for (i, name) in names.iter().enumerate() {
        writeln!(
            w,
            "{:>4}  {:<name_width$}  {:>10}  {:>14}  {:>16.4}  {:>10.6}",
            i + 1,
            name,
            sizes[i],
            cx[i],
            ratios[i],
            self_ncd[i]
        )?;
    }

    for (title, f) in [
        ("Mean", stats::mean as fn(&[f64]) -> f64),
        ("Median", stats::median),
        ("Minimum", stats::minimum),
        ("Maximum", stats::maximum),
    ] {
        writeln!(
            w,
            "{:>4}  {:<name_width$}  {:>10.1}  {:>14.1}  {:>16.4}  {:>10.6}",
            "",
            title,
            f(&sizes),
            f(cx),
            f(&ratios),
            f(self_ncd)
        )?;
    }

    Ok(())
}

fn log_if(show: bool, msg: String) {
    if show {
        println!("{}", msg);
    }
}
