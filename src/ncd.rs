//! Normalized compression distance estimation.
//!
//! NCD after Cilibrasi & Vitányi (2005): for two byte sequences with
//! standalone compressed sizes `x`, `y` and joint (concatenated) compressed
//! size `xy`,
//!
//! ```text
//! NCD(x, y, xy) = (xy - min(x, y)) / max(x, y)
//! ```
//!
//! Every function here works purely on compressed-size measurements taken
//! through a [`SizeCompressor`]; the concrete codec is irrelevant. The
//! pairwise pass dominates the whole program: `n(n-1)/2` compressions, each
//! linear in sequence length.

use std::io;

use rayon::prelude::*;

use crate::compressor::SizeCompressor;
use crate::matrix::TriangularMatrix;

/// NCD from the compressed sizes of two sequences and their concatenation.
///
/// Symmetric by construction. Callers must never pass `x == 0` or `y == 0`;
/// real backends report a strictly positive baseline even for empty input.
pub fn ncd(x: f64, y: f64, xy: f64) -> f64 {
    if x > y { (xy - y) / x } else { (xy - x) / y }
}

/// Standalone compressed size of each sequence, index-aligned with `seqs`.
///
/// Sizes are f64 for direct use in NCD arithmetic.
pub fn cx_vector<C: SizeCompressor>(seqs: &[Vec<u8>], mc: &mut C) -> io::Result<Vec<f64>> {
    seqs.iter()
        .map(|s| {
            mc.send(s)?;
            Ok(mc.finalize_and_reset()? as f64)
        })
        .collect()
}

/// Compressed size of each sequence concatenated with itself.
///
/// Only used for the diagnostic self-NCD, never by neighbour-joining.
pub fn cxx_vector<C: SizeCompressor>(seqs: &[Vec<u8>], mc: &mut C) -> io::Result<Vec<f64>> {
    seqs.iter()
        .map(|s| {
            mc.send(s)?;
            mc.send(s)?;
            Ok(mc.finalize_and_reset()? as f64)
        })
        .collect()
}

/// Self-NCD of each sequence: `ncd(cx, cx, cxx)`, a compressor sanity
/// diagnostic (values near zero mean the codec exploits the repetition).
pub fn self_ncd_vector(cx: &[f64], cxx: &[f64]) -> Vec<f64> {
    cx.iter()
        .zip(cxx)
        .map(|(&x, &xx)| ncd(x, x, xx))
        .collect()
}

/// Builds the pairwise NCD matrix from a sequence list and the pre-computed
/// standalone sizes `cx`.
///
/// For every unordered pair `j < i` the backend receives `seqs[i]` then
/// `seqs[j]`, larger index first, always: a context-sensitive codec can
/// produce order-dependent sizes.
pub fn ncd_matrix<C: SizeCompressor>(
    seqs: &[Vec<u8>],
    cx: &[f64],
    mc: &mut C,
) -> io::Result<TriangularMatrix> {
    let n = seqs.len();
    let mut d = TriangularMatrix::new(n);

    // Discard whatever a previous measurement may have left behind
    mc.finalize_and_reset()?;

    for i in 0..n {
        let ca = cx[i];
        for j in 0..i {
            let cb = cx[j];
            mc.send(&seqs[i])?;
            mc.send(&seqs[j])?;
            let cab = mc.finalize_and_reset()? as f64;
            d.set(i, j, ncd(ca, cb, cab));
        }
    }

    Ok(d)
}

/// Parallel [`ncd_matrix`]: pairwise compressions are independent, so each
/// rayon worker measures with its own backend instance built by `make`.
/// Produces the same matrix as the sequential version.
pub fn ncd_matrix_parallel<C, F>(
    seqs: &[Vec<u8>],
    cx: &[f64],
    make: F,
) -> io::Result<TriangularMatrix>
where
    C: SizeCompressor,
    F: Fn() -> C + Sync,
{
    let n = seqs.len();

    let pairs: Vec<(usize, usize, f64)> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| (0..i).map(move |j| (i, j)))
        .map_init(|| make(), |mc, (i, j)| {
            mc.send(&seqs[i])?;
            mc.send(&seqs[j])?;
            let cab = mc.finalize_and_reset()? as f64;
            Ok((i, j, ncd(cx[i], cx[j], cab)))
        })
        .collect::<io::Result<Vec<_>>>()?;

    let mut d = TriangularMatrix::new(n);
    for (i, j, v) in pairs {
        d.set(i, j, v);
    }

    Ok(d)
}
