//! Crate root: lightweight module orchestration and public re-exports.
//!
//! Estimates a phylogeny from byte sequences via the normalized compression
//! distance (NCD) and reconstructs the tree with neighbour-joining.
//!
//! Modules:
//! - `compressor`: streaming compressed-size backends (flate2 codecs).
//! - `ncd`: NCD formula and pairwise distance-matrix estimation.
//! - `matrix`: triangular distance matrix with active-row elimination.
//! - `taxa`: taxon name/id bookkeeping.
//! - `tree`: arena tree model, traversals, star/balanced generators.
//! - `newick`: Newick serialization.
//! - `nj`: the neighbour-joining engine.
//! - `stats`: summary statistics for the diagnostic report.
//! - `fasta`: FASTA input parsing.
//! - `io`: labelled distance-matrix text I/O.

pub mod compressor;
pub mod fasta;
pub mod io;
pub mod matrix;
pub mod ncd;
pub mod newick;
pub mod nj;
pub mod stats;
pub mod taxa;
pub mod tree;

// Re-export frequently used types & functions
pub use compressor::{DeflateSizer, GzipSizer, SizeCompressor, ZlibSizer};
pub use matrix::TriangularMatrix;
pub use newick::to_newick;
pub use nj::neighbour_joining;
pub use taxa::TaxonSet;
pub use tree::Tree;
