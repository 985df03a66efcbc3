//! Newick serialization.
//!
//! A node with children renders as `(child1,child2,...)label`, a leaf as
//! just `label`; a branch contributes `:length` after its child only when
//! its length has been assigned (NaN lengths are omitted). The tree string
//! is the root's rendering terminated by `;`.
//!
//! Format reference: <https://phylipweb.github.io/phylip/newicktree.html>

use std::fmt::Write;

use crate::tree::Tree;

fn write_node(tree: &Tree, node_id: usize, out: &mut String) {
    let node = tree.node(node_id);

    if node.is_internal() {
        out.push('(');
        let mut is_first = true;
        for &branch_id in &node.outgoing {
            if !is_first {
                out.push(',');
            }
            is_first = false;

            let branch = tree.branch(branch_id);
            if let Some(child) = branch.child {
                write_node(tree, child, out);
            }
            if branch.has_length() {
                out.push(':');
                // Default f64 formatting never fails on a String
                let _ = write!(out, "{}", branch.length);
            }
        }
        out.push(')');
    }
    out.push_str(&node.label);
}

/// Newick representation of the subtree rooted at `node_id`, with the
/// terminating semicolon.
pub fn subtree_to_newick(tree: &Tree, node_id: usize) -> String {
    let mut out = String::new();
    write_node(tree, node_id, &mut out);
    out.push(';');
    out
}

/// Newick representation of the whole tree.
pub fn to_newick(tree: &Tree) -> String {
    match tree.root() {
        Some(root) => subtree_to_newick(tree, root),
        None => ";".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxa::TaxonSet;
    use crate::tree::make_star_tree;

    #[test]
    fn test_single_node() {
        let mut tree = Tree::unassembled(1);
        tree.assign_taxon(0, 0, "A");
        tree.set_root(0);
        assert_eq!(to_newick(&tree), "A;");
    }

    #[test]
    fn test_star_tree_without_lengths() {
        let names = ["A", "B", "C"].map(String::from).to_vec();
        let taxa = TaxonSet::new(names).unwrap();
        let tree = make_star_tree(&taxa);
        assert_eq!(to_newick(&tree), "(A,B,C);");
    }

    #[test]
    fn test_undefined_length_omitted() {
        // Root with children A (no branch length) and B (length 2.5)
        let mut tree = Tree::unassembled(3);
        tree.set_root(0);
        tree.assign_taxon(1, 0, "A");
        tree.assign_taxon(2, 1, "B");
        let ba = tree.new_branch();
        tree.add_child(0, 1, ba);
        let bb = tree.new_branch();
        tree.add_child(0, 2, bb);
        tree.set_branch_length(bb, 2.5);

        assert_eq!(to_newick(&tree), "(A,B:2.5);");
    }

    #[test]
    fn test_nested_with_lengths() {
        // ((A:1.2,B:2.3):3.4,C:4.5);
        let mut tree = Tree::unassembled(5);
        tree.set_root(4);
        tree.assign_taxon(0, 0, "A");
        tree.assign_taxon(1, 1, "B");
        tree.assign_taxon(2, 2, "C");
        let b = tree.new_branch();
        tree.add_child(4, 3, b);
        tree.set_branch_length(b, 3.4);
        let b = tree.new_branch();
        tree.add_child(3, 0, b);
        tree.set_branch_length(b, 1.2);
        let b = tree.new_branch();
        tree.add_child(3, 1, b);
        tree.set_branch_length(b, 2.3);
        let b = tree.new_branch();
        tree.add_child(4, 2, b);
        tree.set_branch_length(b, 4.5);

        assert_eq!(to_newick(&tree), "((A:1.2,B:2.3):3.4,C:4.5);");
    }

    #[test]
    fn test_single_child_keeps_parentheses() {
        // Two-leaf degenerate tree: the child must not be dropped
        let mut tree = Tree::unassembled(2);
        tree.set_root(0);
        tree.assign_taxon(0, 0, "A");
        tree.assign_taxon(1, 1, "B");
        let b = tree.new_branch();
        tree.add_child(0, 1, b);
        tree.set_branch_length(b, 1.5);

        assert_eq!(to_newick(&tree), "(B:1.5)A;");
    }

    #[test]
    fn test_subtree_rendering() {
        let names = ["A", "B", "C"].map(String::from).to_vec();
        let taxa = TaxonSet::new(names).unwrap();
        let tree = make_star_tree(&taxa);
        assert_eq!(subtree_to_newick(&tree, 1), "B;");
    }
}
