//! Taxon bookkeeping: unique names mapped to dense integer ids.

use std::collections::HashSet;

use thiserror::Error;

use crate::tree::Tree;

#[derive(Debug, Error, PartialEq)]
pub enum TaxonSetError {
    #[error("duplicate taxon name \"{0}\"")]
    DuplicateName(String),
}

/// Unique taxon names with dense ids in `[0, n)`, looked up by index.
/// Built once from input identifiers, immutable afterwards.
#[derive(Debug, Clone)]
pub struct TaxonSet {
    names: Vec<String>,
}

impl TaxonSet {
    /// Creates a taxon set from an ordered name list; ids follow input
    /// order. Fails on the first duplicate name.
    pub fn new(names: Vec<String>) -> Result<Self, TaxonSetError> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(TaxonSetError::DuplicateName(name.clone()));
            }
        }
        Ok(TaxonSet { names })
    }

    /// Name of the taxon with id `i`.
    pub fn name(&self, i: usize) -> &str {
        &self.names[i]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Allocates the node skeleton for top-down tree generation: `2n - 1`
    /// nodes with taxa and labels assigned to the first `n`, the root
    /// designated at index `n`, and no branches yet.
    pub fn unassembled_tree(&self) -> Tree {
        let nb_outer = self.len();
        let mut tree = Tree::unassembled(2 * nb_outer - 1);

        for i in 0..nb_outer {
            tree.assign_taxon(i, i, self.name(i));
        }
        tree.set_root(nb_outer);

        tree
    }
}
