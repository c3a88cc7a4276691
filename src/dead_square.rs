//! Dead-square analysis: precomputing which cells a lone block can never be
//! pushed onto on any path that ends at the sink.
//!
//! Used by the forward solver to prune states the instant a block lands
//! somewhere no sequence of further pushes can ever recover from, without
//! having to search the rest of the board out. The analysis only reasons
//! about wall geometry (and, for toggle levels, the no-go mask for a given
//! button combination) — it ignores every other block and the player's
//! actual position, which is always a sound over-approximation: a square
//! unreachable even with every other obstacle removed is certainly
//! unreachable with them present.

use std::collections::VecDeque;

use crate::bitmap::Bitmap;
use crate::config::{Config, RuleSet};
use crate::point::{Point, DIRECTIONS};

/// The set of cells a single block, starting at the sink, could have arrived
/// at by some sequence of forward pushes. Its complement is the dead-square
/// set.
pub fn safe_squares<const H: usize>(cfg: &Config<H>, nogo: &Bitmap<H>) -> Bitmap<H> {
    let mut safe = Bitmap::<H>::new();
    safe.set(cfg.sink.x, cfg.sink.y, true);

    let mut queue = VecDeque::new();
    queue.push_back(cfg.sink);

    while let Some(c) = queue.pop_front() {
        for &d in &DIRECTIONS {
            // a block at `c` could have been pushed there, in direction d,
            // from `prev`; the player needed to stand at `behind` to do it.
            let prev = c + (d * -1);
            let behind = prev + (d * -1);

            if !in_bounds(cfg, prev) || !in_bounds(cfg, behind) {
                continue;
            }
            if nogo.test_point(prev) || nogo.test_point(behind) {
                continue;
            }
            if safe.test_point(prev) {
                continue;
            }
            safe.set(prev.x, prev.y, true);
            queue.push_back(prev);
        }
    }

    safe
}

/// `!safe_squares(cfg, nogo)`, restricted to in-bounds cells.
pub fn dead_squares<const H: usize>(cfg: &Config<H>, nogo: &Bitmap<H>) -> Bitmap<H> {
    let safe = safe_squares(cfg, nogo);
    let mut dead = safe.row_complement();
    for y in 0..H as i8 {
        for x in cfg.width as i8..16 {
            dead.set(x, y, false);
        }
    }
    dead
}

/// For toggle rulesets, a cell's safety can depend on which button groups
/// are active. A cell only counts as truly dead if it is dead under every
/// reachable combination — the forward solver can't assume any particular
/// combination stays fixed for the rest of the solve. Bounded to
/// `cfg.num_buttons` groups; realistic toggle levels use only a handful, so
/// the `1 << num_buttons` enumeration stays small in practice even though
/// `num_buttons` can in principle be as large as 16.
pub fn dead_squares_across_toggles<const H: usize>(cfg: &Config<H>) -> Bitmap<H> {
    if !matches!(cfg.rule_set, RuleSet::ToggleSingle | RuleSet::ToggleMulti) {
        return dead_squares(cfg, &cfg.walls);
    }
    if cfg.num_buttons > 20 {
        log::warn!(
            "dead square analysis skipped for {} toggle groups (too many combinations)",
            cfg.num_buttons
        );
        return Bitmap::<H>::new();
    }

    let combos = 1u32 << cfg.num_buttons;
    let mut dead = Bitmap::<H>::new();
    for active in 0..combos {
        let nogo = cfg.nogo(active as u16);
        let this_dead = dead_squares(cfg, &nogo);
        if active == 0 {
            dead = this_dead;
        } else {
            dead = dead.row_intersect(&this_dead);
        }
    }
    dead
}

fn in_bounds<const H: usize>(cfg: &Config<H>, p: Point) -> bool {
    p.x >= 0 && (p.x as usize) < cfg.width && p.y >= 0 && (p.y as usize) < H
}
