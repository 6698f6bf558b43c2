//! Arena-allocated MCTS tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>.

use crate::node::{Node, NodeId};

/// Arena-allocated search tree for one planning call.
///
/// Nodes are stored in a contiguous vector and referenced by index.
/// Children are owned through the arena; parent links are non-owning
/// indices used only to walk upward during backpropagation.
#[derive(Clone, Debug)]
pub struct SearchTree<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A: Copy> SearchTree<S, A> {
    /// Create a tree holding only a root for `state`.
    pub fn new(state: S, legal_actions: Vec<A>) -> Self {
        Self {
            nodes: vec![Node::new(state, None, None, legal_actions)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<S, A> {
        &mut self.nodes[id.0]
    }

    /// Attach a new child below `parent`, returning its ID.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        action: A,
        state: S,
        untried: Vec<A>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(state, Some(parent), Some(action), untried));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S, A> {
        self.get(NodeId::ROOT)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true, the root always exists).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in creation order, paired with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S, A>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Children of `id` with their incoming actions, in expansion order.
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = (A, &Node<S, A>)> + '_ {
        self.get(id).children.iter().filter_map(move |&child_id| {
            let child = self.get(child_id);
            child.action.map(|a| (a, child))
        })
    }

    /// Depth of a node (root = 0), found by walking parent links.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Shape of the tree as (parent index, incoming action) per node,
    /// in creation order. Two trees with equal shapes were grown identically.
    pub fn shape(&self) -> Vec<(Option<usize>, Option<A>)> {
        self.nodes
            .iter()
            .map(|n| (n.parent.map(NodeId::index), n.action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_creation() {
        let tree: SearchTree<u8, char> = SearchTree::new(0, vec!['a', 'b']);
        assert_eq!(tree.len(), 1); // Root node
        assert!(!tree.is_empty());
        assert_eq!(tree.root().untried_actions(), &['a', 'b']);
        assert_eq!(tree.root().parent(), None);
    }

    #[test]
    fn test_tree_add_child() {
        let mut tree: SearchTree<u8, char> = SearchTree::new(0, vec!['a']);
        let id = tree.add_child(NodeId::ROOT, 'a', 1, vec!['x']);

        assert_eq!(id.index(), 1); // After root
        assert_eq!(tree.get(id).action(), Some('a'));
        assert_eq!(tree.get(id).parent(), Some(NodeId::ROOT));
        assert_eq!(tree.root().children(), &[id]);
        assert_eq!(tree.depth(id), 1);
    }

    #[test]
    fn test_children_of_preserves_expansion_order() {
        let mut tree: SearchTree<u8, char> = SearchTree::new(0, Vec::new());
        tree.add_child(NodeId::ROOT, 'c', 3, Vec::new());
        tree.add_child(NodeId::ROOT, 'a', 1, Vec::new());
        tree.add_child(NodeId::ROOT, 'b', 2, Vec::new());

        let actions: Vec<char> = tree.children_of(NodeId::ROOT).map(|(a, _)| a).collect();
        assert_eq!(actions, vec!['c', 'a', 'b']);
    }

    #[test]
    fn test_shape_and_depth() {
        let mut tree: SearchTree<u8, char> = SearchTree::new(0, Vec::new());
        let a = tree.add_child(NodeId::ROOT, 'a', 1, Vec::new());
        let b = tree.add_child(a, 'b', 2, Vec::new());

        assert_eq!(tree.depth(b), 2);
        assert_eq!(
            tree.shape(),
            vec![(None, None), (Some(0), Some('a')), (Some(1), Some('b'))]
        );
    }
}
