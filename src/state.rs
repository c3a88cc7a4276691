//! Search-node state: the piece of a board configuration that varies from
//! node to node, and its canonical (normalized) form used to deduplicate the
//! visited set.

use crate::bitmap::{self, Bitmap};
use crate::config::Config;
use crate::point::Point;

/// Auxiliary state beyond blocks and player position, varying by
/// [`RuleSet`](crate::config::RuleSet).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Aux {
    /// Base, trap and fire rulesets carry no extra state.
    None,
    /// Toggle rulesets: bit `i` set means button group `i` is active.
    Toggle(u16),
    /// Specials ruleset: which dirt/popup/turtle cells have already been
    /// consumed (cleared to plain floor), one bit per cell in raster order.
    Active(u32),
}

impl Default for Aux {
    fn default() -> Self {
        Aux::None
    }
}

/// A single search-reachable board state.
///
/// `Hash`/`Eq` are derived from the bitmap and aux state directly, not from
/// `pos` — `pos` is always stored normalized (see [`State::normalize`]), so
/// two states with the same blocks/aux and player positions in the same
/// reachable region compare equal regardless of exactly where the player
/// happens to stand within it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct State<const H: usize> {
    pub blocks: Bitmap<H>,
    pub pos: Point,
    pub aux: Aux,
}

impl<const H: usize> State<H> {
    pub fn new(blocks: Bitmap<H>, pos: Point, aux: Aux) -> Self {
        Self { blocks, pos, aux }
    }

    /// Returns the no-go mask (walls plus whatever toggle/trap cells are
    /// currently solid) this state's player must stay clear of, given the
    /// board's static configuration.
    pub fn nogo(&self, cfg: &Config<H>) -> Bitmap<H> {
        match self.aux {
            Aux::Toggle(active) => cfg.nogo(active),
            _ => cfg.walls,
        }
    }

    /// Replaces `pos` with the canonical representative of its reachable
    /// region (blocks plus this state's no-go cells as obstructions). Two
    /// states that differ only by which cell of a shared reachable region
    /// the player occupies normalize to the same `State`.
    pub fn normalize(&self, cfg: &Config<H>) -> Self {
        let obstruction = self.blocks.row_union(&self.nogo(cfg));
        let normalized = bitmap::normalize_pos(self.pos, &obstruction);
        Self {
            pos: normalized,
            ..*self
        }
    }

    /// Whether `p` is reachable from this state's player position without
    /// crossing a block or no-go cell.
    pub fn can_reach(&self, cfg: &Config<H>, p: Point) -> bool {
        let obstruction = self.blocks.row_union(&self.nogo(cfg));
        bitmap::reachable(self.pos, &obstruction).test_point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::tile::Tile;

    fn small_config() -> Config<5> {
        let mut level = Level::new("t", 1);
        for x in 0..8 {
            level.set(x, 0, Tile::Wall);
            level.set(x, 4, Tile::Wall);
        }
        for y in 0..5 {
            level.set(0, y, Tile::Wall);
            level.set(7, y, Tile::Wall);
        }
        level.set(1, 1, Tile::Player);
        level.set(5, 3, Tile::Teleport);
        Config::<5>::from_level(&level).unwrap()
    }

    #[test]
    fn normalize_is_idempotent() {
        let cfg = small_config();
        let s = State::new(Bitmap::new(), Point::new(3, 2), Aux::None);
        let once = s.normalize(&cfg);
        let twice = once.normalize(&cfg);
        assert_eq!(once, twice);
    }

    #[test]
    fn states_differing_only_by_reachable_pos_normalize_equal() {
        let cfg = small_config();
        let a = State::new(Bitmap::new(), Point::new(1, 1), Aux::None).normalize(&cfg);
        let b = State::new(Bitmap::new(), Point::new(5, 1), Aux::None).normalize(&cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn can_reach_false_across_a_block_wall() {
        let cfg = small_config();
        let mut blocks = Bitmap::<5>::new();
        for y in 1..4 {
            blocks.set(4, y, true);
        }
        let s = State::new(blocks, Point::new(1, 1), Aux::None);
        assert!(!s.can_reach(&cfg, Point::new(5, 1)));
    }
}
