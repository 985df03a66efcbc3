//! Arena-based rooted tree with labelled leaves and branch lengths.
//!
//! # Overview
//! The [`Tree`] owns two contiguous collections (nodes and branches)
//! addressed by small integer ids that never change after creation.
//! Parent/child "pointers" are indices into these collections, so the
//! bidirectional navigation of a phylogeny is cycle-free to own.
//!
//! Branch lengths start undefined (NaN) and are only rendered to Newick
//! once assigned.

use crate::taxa::TaxonSet;

/// Traversal orders over nodes or branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Each node is visited before its children.
    PreOrder,
    /// Each node is visited after its children.
    PostOrder,
}

/// A tree node. Leaves carry a taxon id and its name as label; internal
/// nodes carry neither (empty label by convention).
#[derive(Debug, Clone)]
pub struct Node {
    pub id: usize,
    pub taxon: Option<usize>,
    pub label: String,
    /// Incoming branch id; `None` for the root.
    pub incoming: Option<usize>,
    /// Outgoing branch ids, in insertion order.
    pub outgoing: Vec<usize>,
}

impl Node {
    pub fn in_degree(&self) -> usize {
        usize::from(self.incoming.is_some())
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn degree(&self) -> usize {
        self.in_degree() + self.out_degree()
    }

    /// An internal ("inner") node has children.
    pub fn is_internal(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// A leaf ("outer" node, tip) has no children.
    pub fn is_leaf(&self) -> bool {
        !self.is_internal()
    }
}

/// A directed parent→child edge. `length` is NaN until assigned.
#[derive(Debug, Clone)]
pub struct Branch {
    pub id: usize,
    pub parent: Option<usize>,
    pub child: Option<usize>,
    pub length: f64,
}

impl Branch {
    pub fn has_length(&self) -> bool {
        !self.length.is_nan()
    }
}

/// Owner of all nodes and branches; nodes and branches never outlive it.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    branches: Vec<Branch>,
    root: Option<usize>,
}

impl Tree {
    /// Creates a tree with `nb_node` initialized but unconnected nodes:
    /// sequential ids, no taxon, empty label, no branches, no root.
    pub fn unassembled(nb_node: usize) -> Self {
        let nodes = (0..nb_node)
            .map(|i| Node {
                id: i,
                taxon: None,
                label: String::new(),
                incoming: None,
                outgoing: Vec::with_capacity(3),
            })
            .collect();

        Tree {
            nodes,
            branches: Vec::with_capacity(nb_node.saturating_sub(1)),
            root: None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    pub fn branch(&self, id: usize) -> &Branch {
        &self.branches[id]
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn set_root(&mut self, node_id: usize) {
        self.root = Some(node_id);
    }

    /// Marks node `node_id` as the leaf for taxon `taxon_id`, labelled with
    /// the taxon name.
    pub fn assign_taxon(&mut self, node_id: usize, taxon_id: usize, name: &str) {
        let node = &mut self.nodes[node_id];
        node.taxon = Some(taxon_id);
        node.label = name.to_string();
    }

    /// Appends an unattached branch with a fresh id and undefined length,
    /// returning its id. Always create branches through here so ids stay
    /// equal to arena positions.
    pub fn new_branch(&mut self) -> usize {
        let id = self.branches.len();
        self.branches.push(Branch {
            id,
            parent: None,
            child: None,
            length: f64::NAN,
        });
        id
    }

    /// Sets the length of branch `branch_id`.
    pub fn set_branch_length(&mut self, branch_id: usize, length: f64) {
        self.branches[branch_id].length = length;
    }

    /// Wires `parent` to `child` through `branch`: the branch gets both
    /// endpoints, the parent registers it as its newest outgoing edge, and
    /// it becomes the child's sole incoming edge. Both sides are updated
    /// together; never call this twice for the same child.
    pub fn add_child(&mut self, parent: usize, child: usize, branch: usize) {
        let b = &mut self.branches[branch];
        b.parent = Some(parent);
        b.child = Some(child);
        self.nodes[parent].outgoing.push(branch);
        self.nodes[child].incoming = Some(branch);
    }

    /// Applies `f` to every node of the subtree rooted at `node_id`, in the
    /// given traversal order (children visited left to right).
    pub fn traverse_nodes_from<F: FnMut(&Node)>(
        &self,
        node_id: usize,
        order: Traversal,
        f: &mut F,
    ) {
        if order == Traversal::PreOrder {
            f(&self.nodes[node_id]);
        }
        for &branch_id in &self.nodes[node_id].outgoing {
            if let Some(child) = self.branches[branch_id].child {
                self.traverse_nodes_from(child, order, f);
            }
        }
        if order == Traversal::PostOrder {
            f(&self.nodes[node_id]);
        }
    }

    /// Applies `f` to every node of the tree in the given traversal order.
    pub fn traverse_nodes<F: FnMut(&Node)>(&self, order: Traversal, mut f: F) {
        if let Some(root) = self.root {
            self.traverse_nodes_from(root, order, &mut f);
        }
    }

    fn traverse_branches_from<F: FnMut(&Branch)>(
        &self,
        branch_id: usize,
        order: Traversal,
        f: &mut F,
    ) {
        if order == Traversal::PreOrder {
            f(&self.branches[branch_id]);
        }
        if let Some(child) = self.branches[branch_id].child {
            for &child_branch in &self.nodes[child].outgoing {
                self.traverse_branches_from(child_branch, order, f);
            }
        }
        if order == Traversal::PostOrder {
            f(&self.branches[branch_id]);
        }
    }

    /// Applies `f` to every branch of the tree in the given traversal order.
    pub fn traverse_branches<F: FnMut(&Branch)>(&self, order: Traversal, mut f: F) {
        let Some(root) = self.root else { return };
        for &branch_id in &self.nodes[root].outgoing {
            self.traverse_branches_from(branch_id, order, &mut f);
        }
    }

    /// Number of nodes in the subtree rooted at `node_id`, itself included.
    pub fn nb_descendants(&self, node_id: usize) -> usize {
        let mut nb = 0;
        self.traverse_nodes_from(node_id, Traversal::PreOrder, &mut |_| nb += 1);
        nb
    }

    /// Number of nodes reachable from the root.
    pub fn nb_nodes(&self) -> usize {
        self.root.map_or(0, |root| self.nb_descendants(root))
    }

    /// Number of branches reachable from the root.
    pub fn nb_branches(&self) -> usize {
        self.nb_nodes().saturating_sub(1)
    }
}

/// Creates a star tree: a single inner node (the root) with every taxon as
/// a direct leaf child. Node ids are assigned in PHYLIP order.
///
/// # Panics
/// Panics with fewer than 2 taxa.
pub fn make_star_tree(taxa: &TaxonSet) -> Tree {
    let nb_outer = taxa.len();
    assert!(nb_outer >= 2, "cannot make a star tree with less than 2 taxa");

    let mut tree = taxa.unassembled_tree();
    let root = tree.root().unwrap();
    for i in 0..nb_outer {
        let branch = tree.new_branch();
        tree.add_child(root, i, branch);
    }

    tree
}

/// Creates a tree as balanced as possible for the given taxa: each internal
/// node splits its leaves as evenly as the count allows. Node ids are
/// assigned in PHYLIP order (leaves `0..n`, inner nodes from `n` on, in
/// discovery order).
///
/// # Panics
/// Panics with fewer than 2 taxa.
pub fn make_balanced_tree(taxa: &TaxonSet) -> Tree {
    let nb_outer = taxa.len();
    assert!(
        nb_outer >= 2,
        "cannot make a balanced tree with less than 2 taxa"
    );

    let mut tree = taxa.unassembled_tree();
    let root = tree.root().unwrap();
    bifurcate(&mut tree, root, nb_outer, nb_outer + 1, 0);

    tree
}

/// Splits `nb_outer` leaves under `node`, handing out inner node ids from
/// `next_id_inner` and leaf ids from `next_id_outer`. Returns the updated
/// counters.
fn bifurcate(
    tree: &mut Tree,
    node: usize,
    nb_outer: usize,
    mut next_id_inner: usize,
    mut next_id_outer: usize,
) -> (usize, usize) {
    let nb_outer_right = nb_outer / 2;
    let nb_outer_left = nb_outer - nb_outer_right;

    let left_child = if nb_outer_left == 1 {
        let id = next_id_outer;
        next_id_outer += 1;
        id
    } else {
        let id = next_id_inner;
        next_id_inner += 1;
        id
    };
    let branch = tree.new_branch();
    tree.add_child(node, left_child, branch);
    if nb_outer_left > 1 {
        (next_id_inner, next_id_outer) =
            bifurcate(tree, left_child, nb_outer_left, next_id_inner, next_id_outer);
    }

    let right_child = if nb_outer_right == 1 {
        let id = next_id_outer;
        next_id_outer += 1;
        id
    } else {
        let id = next_id_inner;
        next_id_inner += 1;
        id
    };
    let branch = tree.new_branch();
    tree.add_child(node, right_child, branch);
    if nb_outer_right > 1 {
        (next_id_inner, next_id_outer) = bifurcate(
            tree,
            right_child,
            nb_outer_right,
            next_id_inner,
            next_id_outer,
        );
    }

    (next_id_inner, next_id_outer)
}
