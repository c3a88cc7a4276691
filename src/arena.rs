//! Bump-allocated search-tree storage.
//!
//! The reverse search keeps every visited node alive for the lifetime of the
//! run (a node's parent chain is the only way to reconstruct the move
//! sequence into a finished level), but never frees or mutates a node once
//! allocated. A `typed_arena::Arena` gives every node a stable `&'a Node`
//! address for the run's lifetime without the per-node overhead of
//! individually heap-allocating `Rc`/`Box` nodes, matching the pattern the
//! sokoban solver pack example uses its own arena for.

use typed_arena::Arena;

use crate::point::Direction;
use crate::state::State;

/// One explored node in the search tree.
pub struct Node<'a, const H: usize> {
    pub state: State<H>,
    pub parent: Option<&'a Node<'a, H>>,
    /// The pull direction that produced this node from its parent, `None`
    /// for the root.
    pub pulled: Option<Direction>,
    pub depth: u32,
}

impl<'a, const H: usize> Node<'a, H> {
    pub fn root(state: State<H>) -> Self {
        Self {
            state,
            parent: None,
            pulled: None,
            depth: 0,
        }
    }

    /// `cost` is the successor's move cost (1 for an ordinary pull, 3 for one
    /// that crosses a live turtle — see [`crate::move_gen::Successor`]); the
    /// child's `depth` is its parent's running cost plus this edge's cost,
    /// i.e. the path-length metric the search's priority queue minimizes.
    pub fn child(parent: &'a Node<'a, H>, state: State<H>, pulled: Direction, cost: u32) -> Self {
        Self {
            state,
            parent: Some(parent),
            pulled: Some(pulled),
            depth: parent.depth + cost,
        }
    }

    /// Walks the parent chain from root to `self`, yielding pull directions
    /// in the order they were applied.
    pub fn path(&self) -> Vec<Direction> {
        let mut moves = Vec::with_capacity(self.depth as usize);
        let mut cur = self;
        while let Some(d) = cur.pulled {
            moves.push(d);
            cur = cur.parent.expect("pulled direction implies a parent");
        }
        moves.reverse();
        moves
    }
}

/// Owns the bump arena backing every [`Node`] allocated during one search run.
pub struct NodeArena<'a, const H: usize> {
    arena: Arena<Node<'a, H>>,
}

impl<'a, const H: usize> NodeArena<'a, H> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn alloc(&'a self, node: Node<'a, H>) -> &'a Node<'a, H> {
        self.arena.alloc(node)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }
}

impl<'a, const H: usize> Default for NodeArena<'a, H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::point::{Point, DIRECTIONS};
    use crate::state::{Aux, State};

    #[test]
    fn path_reconstructs_in_application_order() {
        let arena = NodeArena::<5>::new();
        let root = arena.alloc(Node::root(State::new(
            Bitmap::new(),
            Point::new(1, 1),
            Aux::None,
        )));
        let mid = arena.alloc(Node::child(
            root,
            State::new(Bitmap::new(), Point::new(1, 2), Aux::None),
            DIRECTIONS[1],
            1,
        ));
        let leaf = arena.alloc(Node::child(
            mid,
            State::new(Bitmap::new(), Point::new(2, 2), Aux::None),
            DIRECTIONS[3],
            1,
        ));

        assert_eq!(leaf.depth, 2);
        assert_eq!(leaf.path(), vec![DIRECTIONS[1], DIRECTIONS[3]]);
    }

    #[test]
    fn arena_len_tracks_allocations() {
        let arena = NodeArena::<5>::new();
        assert_eq!(arena.len(), 0);
        arena.alloc(Node::root(State::new(
            Bitmap::new(),
            Point::new(0, 0),
            Aux::None,
        )));
        assert_eq!(arena.len(), 1);
    }
}
