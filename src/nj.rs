//! Neighbour-joining tree reconstruction (Saitou & Nei 1987).
//!
//! Consumes a taxon set and its pairwise distance matrix and produces a
//! binary-structured unrooted tree: `n` leaves, `n - 2` internal nodes
//! (`2n - 2` total), `2n - 3` branches. Branch lengths are taken from the
//! classical formulas and are deliberately not clamped: pathological
//! inputs may yield negative lengths, exactly like the textbook algorithm.
//!
//! Formula references: Yang (2014), *Molecular Evolution: A Statistical
//! Approach*, eqs. 3.8-3.10.

use thiserror::Error;

use crate::matrix::TriangularMatrix;
use crate::taxa::TaxonSet;
use crate::tree::Tree;

#[derive(Debug, Error, PartialEq)]
pub enum NjError {
    #[error("neighbour-joining needs at least 2 taxa, got {0}")]
    TooFewTaxa(usize),
    #[error("distance matrix dimension ({matrix}) does not match taxon count ({taxa})")]
    DimensionMismatch { matrix: usize, taxa: usize },
}

/// Recomputes the row-sum vector `R` over active rows: `R[i]` is the sum of
/// `D[i, j]` for every active `j != i`.
fn update_r(d: &TriangularMatrix, r: &mut [f64]) {
    r.fill(0.0);
    for i in 0..d.n() {
        if !d.is_active(i) {
            continue;
        }
        for j in 0..i {
            if !d.is_active(j) {
                continue;
            }
            let v = d.get(i, j);
            r[i] += v;
            r[j] += v;
        }
    }
}

/// Replaces row `a` with the distances from the new cluster `c`:
/// `D[a, k] = (D[a, k] + D[b, k] - d_ca - d_cb) / 2` (Yang 2014, eq. 3.10).
/// Row `b` is left stale; the caller deactivates it right after.
fn update_d(d: &mut TriangularMatrix, a: usize, b: usize, d_ca: f64, d_cb: f64) {
    for k in 0..d.n() {
        if !d.is_active(k) || k == a || k == b {
            continue;
        }
        let d_ak = d.get(a, k);
        let d_bk = d.get(b, k);
        d.set(a, k, 0.5 * (d_ak + d_bk - d_ca - d_cb));
    }
}

/// Scans active pairs `(i, j)`, `j < i`, row-major, and returns the first
/// pair minimizing the Q-criterion `(m-2)*D[i,j] - R[i] - R[j]` (Yang 2014,
/// eq. 3.8) together with its distance. Ties keep the earliest pair: the
/// comparison is strict, so an equal Q never replaces the current winner.
fn select_join_targets(d: &TriangularMatrix, r: &[f64], m: f64) -> (usize, usize, f64) {
    let mut q_min = f64::MAX;
    let mut a = 0;
    let mut b = 0;
    let mut d_ab = 0.0;

    for i in 0..d.n() {
        if !d.is_active(i) {
            continue;
        }
        for j in 0..i {
            if !d.is_active(j) {
                continue;
            }
            let d_ij = d.get(i, j);
            let q = (m - 2.0) * d_ij - r[i] - r[j];
            if q < q_min {
                q_min = q;
                a = i;
                b = j;
                d_ab = d_ij;
            }
        }
    }

    (a, b, d_ab)
}

/// Returns the two remaining active indices (lower first) and their
/// distance, once the elimination loop has reduced the matrix to two rows.
fn select_last_targets(d: &TriangularMatrix) -> (usize, usize, f64) {
    for i in 0..d.n() {
        if !d.is_active(i) {
            continue;
        }
        for j in (i + 1..d.n()).rev() {
            if d.is_active(j) {
                return (i, j, d.get(i, j));
            }
        }
    }
    unreachable!("fewer than two active rows at termination");
}

/// Builds the neighbour-joining tree for `taxa` from the distance matrix
/// `d`. The matrix is consumed: it is mutated in place during elimination
/// and is meaningless afterwards.
///
/// Node layout: leaves at ids `0..n`, internal nodes at `n..2n-2`. Join
/// nodes are handed out from the highest id downward, so the last join
/// (conceptually the tree's arbitrary root) lands on the node designated
/// as root up front.
///
/// # Errors
/// [`NjError::TooFewTaxa`] for `n < 2`; [`NjError::DimensionMismatch`] when
/// the matrix was not built over exactly these taxa.
///
/// # Panics
/// Panics if the final join does not involve the designated root. That
/// state is unreachable for valid input and indicates an elimination
/// bookkeeping bug, not a caller error.
pub fn neighbour_joining(taxa: &TaxonSet, mut d: TriangularMatrix) -> Result<Tree, NjError> {
    let nb_taxa = taxa.len();
    if nb_taxa < 2 {
        return Err(NjError::TooFewTaxa(nb_taxa));
    }
    if d.n() != nb_taxa {
        return Err(NjError::DimensionMismatch {
            matrix: d.n(),
            taxa: nb_taxa,
        });
    }

    let nb_node = 2 * nb_taxa - 2;
    let mut tree = Tree::unassembled(nb_node);
    // With only two taxa the loop below never runs and no internal node
    // exists; one of the leaves serves as the root for the single join.
    tree.set_root(if nb_taxa > 2 { nb_taxa } else { 0 });

    // target_nodes[i] is the tree node currently standing for matrix row i:
    // a leaf at first, the joined cluster's internal node later.
    let mut target_nodes: Vec<Option<usize>> = (0..nb_taxa).map(Some).collect();

    for i in 0..nb_taxa {
        tree.assign_taxon(i, i, taxa.name(i));
    }

    let mut r = vec![0.0; nb_taxa];
    let mut m = nb_taxa as f64;

    // Internal node ids are consumed from the top down so that the last
    // iteration joins at the designated root.
    for c in (nb_taxa..nb_node).rev() {
        update_r(&d, &mut r);
        let (a, b, d_ab) = select_join_targets(&d, &r, m);

        let node_a = target_nodes[a].expect("join target must be active");
        let node_b = target_nodes[b].expect("join target must be active");
        let branch_ca = tree.new_branch();
        let branch_cb = tree.new_branch();

        // Yang 2014, eq. 3.9
        let d_ca = 0.5 * (d_ab + (r[a] - r[b]) / (m - 2.0));
        let d_cb = d_ab - d_ca;
        tree.set_branch_length(branch_ca, d_ca);
        tree.set_branch_length(branch_cb, d_cb);

        tree.add_child(c, node_a, branch_ca);
        tree.add_child(c, node_b, branch_cb);

        update_d(&mut d, a, b, d_ca, d_cb);
        d.set_active(b, false);

        target_nodes[a] = Some(c);
        target_nodes[b] = None;

        m -= 1.0;
    }

    debug_assert_eq!(d.active_count(), 2, "elimination must leave two rows");
    let (a, b, d_ab) = select_last_targets(&d);
    let node_a = target_nodes[a].expect("last target must be active");
    let node_b = target_nodes[b].expect("last target must be active");
    let branch_ab = tree.new_branch();
    tree.set_branch_length(branch_ab, d_ab);

    let root = tree.root().expect("root designated at construction");
    if node_a == root {
        tree.add_child(node_a, node_b, branch_ab);
    } else if node_b == root {
        tree.add_child(node_b, node_a, branch_ab);
    } else {
        panic!("the root was not used in the last join");
    }

    Ok(tree)
}
