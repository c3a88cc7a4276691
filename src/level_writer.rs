//! Reconstructs an on-disk [`Level`] from a finished search node.
//!
//! The generated level's starting position is the search node's state (the
//! hardest configuration the reverse search found); its solution, played
//! forward, is exactly the node's root-to-leaf path reversed, since every
//! edge in the search tree is a pull and the level is meant to be solved by
//! the corresponding pushes in forward order.

use crate::arena::Node;
use crate::config::Config;
use crate::level::Level;
use crate::tile::Tile;

/// Builds a fresh [`Level`] whose start state is `node`'s, reusing `cfg`'s
/// static layout (walls, sink, specials) and overwriting the dynamic tiles
/// (blocks, player) from the node.
pub fn build_level<const H: usize>(cfg: &Config<H>, node: &Node<H>, title: &str) -> Level {
    let mut level = Level::new(title, 999);

    for y in 0..H {
        for x in 0..cfg.width {
            let (px, py) = (x as i8, y as i8);
            let tile = if cfg.dirt.test(px, py) {
                Tile::Dirt
            } else if cfg.popups.test(px, py) {
                // popups are also set in `cfg.walls` (they block by
                // default), so this check must come before the walls check.
                Tile::Popup
            } else if cfg.turtles.test(px, py) {
                Tile::Turtle
            } else if cfg.fire.test(px, py) {
                Tile::Fire
            } else if cfg.walls.test(px, py) {
                Tile::Wall
            } else if cfg.toggle[0][0].test(px, py) {
                Tile::ToggleWall
            } else if cfg.toggle[0][1].test(px, py) {
                Tile::ToggleFloor
            } else if cfg.trap == Some(crate::point::Point::new(px, py)) {
                Tile::Trap
            } else if cfg.trap_button == Some(crate::point::Point::new(px, py)) {
                Tile::TrapButton
            } else {
                Tile::Floor
            };
            level.set(x, y, tile);
        }
    }

    for &button in &cfg.buttons {
        level.set(button.x as usize, button.y as usize, Tile::ToggleButton);
    }

    level.set(cfg.sink.x as usize, cfg.sink.y as usize, Tile::Teleport);

    for y in 0..H {
        for x in 0..cfg.width {
            if node.state.blocks.test(x as i8, y as i8) {
                level.set(x, y, Tile::Block);
            }
        }
    }

    level.set(
        node.state.pos.x as usize,
        node.state.pos.y as usize,
        Tile::Player,
    );

    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Node, NodeArena};
    use crate::bitmap::Bitmap;
    use crate::point::Point;
    use crate::state::{Aux, State};
    use crate::tile::Tile as T;

    fn room() -> Config<4> {
        let mut level = Level::new("t", 1);
        for x in 0..6 {
            level.set(x, 0, T::Wall);
            level.set(x, 3, T::Wall);
        }
        for y in 0..4 {
            level.set(0, y, T::Wall);
            level.set(5, y, T::Wall);
        }
        level.set(1, 1, T::Player);
        level.set(3, 1, T::Teleport);
        Config::<4>::from_level(&level).unwrap()
    }

    #[test]
    fn built_level_places_blocks_and_player_from_node_state() {
        let cfg = room();
        let arena = NodeArena::<4>::new();
        let mut blocks = Bitmap::<4>::new();
        blocks.set(2, 1, true);
        let node = arena.alloc(Node::root(State::new(blocks, Point::new(4, 1), Aux::None)));

        let level = build_level(&cfg, node, "generated");
        assert_eq!(level.get(2, 1), T::Block);
        assert_eq!(level.get(4, 1), T::Player);
        assert_eq!(level.get(3, 1), T::Teleport);
        assert_eq!(level.title, "generated");
    }
}
