//! Reverse-search successor generation ("pulls").
//!
//! Forward play pushes a block: standing at `p`, moving into direction `d`
//! shoves a block from `p+d` to `p+2d`, leaving the player at `p+d`. A pull
//! undoes exactly that: from a state with the player at `q` and a block at
//! `q+d`, stepping to `q-d` drags the block back from `q+d` to `q`, provided
//! `q-d` is itself a legal, block-free, non-no-go cell. Enumerating every
//! legal pull from every reachable player cell walks the search backward
//! from a solved configuration toward harder ones.

use crate::bitmap::Bitmap;
use crate::config::{Config, RuleSet};
use crate::point::{Direction, Point, DIRECTIONS};
use crate::state::{Aux, State};

/// One legal predecessor of a state, paired with the direction that
/// produces it when played forward and the search-cost of the move.
///
/// `cost` is `1` for an ordinary pull; a pull that activates a turtle or
/// ends on a popup/turtle costs `3` (see §4.4's move-cost accounting), which
/// is why the search's priority queue is a Dijkstra variant rather than
/// plain BFS whenever specials are in play.
pub struct Successor<const H: usize> {
    pub state: State<H>,
    pub direction: Direction,
    pub cost: u32,
}

/// Enumerates every state one pull away from `state` under `cfg`.
pub fn successors<const H: usize>(cfg: &Config<H>, state: &State<H>) -> Vec<Successor<H>> {
    match cfg.rule_set {
        RuleSet::Base => base_successors(cfg, state, state.nogo(cfg)),
        RuleSet::ToggleSingle | RuleSet::ToggleMulti => toggle_successors(cfg, state),
        RuleSet::Trap => trap_successors(cfg, state),
        RuleSet::Specials => special_successors(cfg, state),
        RuleSet::Fire => fire_successors(cfg, state),
    }
}

/// Pulls available from every cell the player can reach in `state`, not
/// touching any ruleset-specific tiles.
fn base_successors<const H: usize>(
    cfg: &Config<H>,
    state: &State<H>,
    nogo: Bitmap<H>,
) -> Vec<Successor<H>> {
    let mut out = Vec::new();
    let obstruction = state.blocks.row_union(&nogo);
    let reach = crate::bitmap::reachable(state.pos, &obstruction);

    for y in 0..H as i8 {
        for x in 0..cfg.width as i8 {
            let q = Point::new(x, y);
            if !reach.test_point(q) {
                continue;
            }
            for &d in &DIRECTIONS {
                for s in try_pull(cfg, state, q, d, nogo, cfg.max_push, true) {
                    out.push(Successor {
                        state: s.normalize(cfg),
                        direction: d,
                        cost: 1,
                    });
                }
            }
        }
    }
    out
}

/// Attempts every block-line pull of the block at `q + d`, for lengths
/// `1..=max_push`: the shortest drags the block to `q`, player ending at
/// `q - d`; a length-`j` line drags it to `q - d*(j-1)`, player ending at
/// `q - d*j`. Each valid length is a distinct successor (the player may
/// choose to stop early), so callers get a line's whole prefix, not just its
/// longest extent.
///
/// Since a length-`j` line's player-landing cell is exactly a length-`(j+1)`
/// line's new block cell, the first length at which either cell fails a
/// check also rules out every longer length: the block would have to pass
/// through that same blocked cell. So the scan stops at the first failure.
///
/// `reassert_sink` implements §3/§4.4's "the sink always has a block"
/// invariant: after the ordinary clear/set above, the sink cell is forced
/// back to occupied regardless of whether this particular pull touched it.
/// When the pulled block's origin *was* the sink, this leaves two bits set
/// (the block's new, away-from-sink position, and a freshly reasserted one
/// back at the sink) — modeling the sink as perpetually resupplying a new
/// block the instant the previous one leaves, so the reverse search keeps
/// generating ever-more-scattered configurations instead of just one block
/// wandering around. Every ruleset reasserts except Fire, where §4.4
/// explicitly says the reassertion is skipped.
fn try_pull<const H: usize>(
    cfg: &Config<H>,
    state: &State<H>,
    q: Point,
    d: Direction,
    nogo: Bitmap<H>,
    max_push: usize,
    reassert_sink: bool,
) -> Vec<State<H>> {
    let block_from = q + d;
    if !in_bounds(cfg, block_from) || !state.blocks.test_point(block_from) {
        return Vec::new();
    }
    if nogo.test_point(q) {
        return Vec::new();
    }

    let mut blocks_without = state.blocks;
    blocks_without.set(block_from.x, block_from.y, false);

    let mut out = Vec::new();
    for j in 1..=max_push.max(1) as i8 {
        let block_dest = Point::new(q.x - d.dx * (j - 1), q.y - d.dy * (j - 1));
        let player_dest = Point::new(q.x - d.dx * j, q.y - d.dy * j);

        if !in_bounds(cfg, block_dest) || !in_bounds(cfg, player_dest) {
            break;
        }
        if nogo.test_point(block_dest) || blocks_without.test_point(block_dest) {
            break;
        }
        if nogo.test_point(player_dest) || blocks_without.test_point(player_dest) {
            break;
        }

        let mut blocks = blocks_without;
        blocks.set(block_dest.x, block_dest.y, true);
        if reassert_sink {
            blocks.set(cfg.sink.x, cfg.sink.y, true);
        }
        out.push(State::new(blocks, player_dest, state.aux));
    }
    out
}

fn in_bounds<const H: usize>(cfg: &Config<H>, p: Point) -> bool {
    p.x >= 0 && (p.x as usize) < cfg.width && p.y >= 0 && (p.y as usize) < H
}

/// Toggle rulesets behave like the base ruleset, except the active no-go
/// mask depends on `state.aux`, and passing through a button cell flips its
/// bit before the pull is otherwise evaluated.
fn toggle_successors<const H: usize>(cfg: &Config<H>, state: &State<H>) -> Vec<Successor<H>> {
    let active = match state.aux {
        Aux::Toggle(bits) => bits,
        _ => 0,
    };
    let nogo = cfg.nogo(active);
    let mut out = base_successors(cfg, state, nogo);

    for i in 0..cfg.num_buttons {
        let Some(&button) = cfg.buttons.get(i) else {
            continue;
        };
        if !state.can_reach(cfg, button) {
            continue;
        }
        let flipped = active ^ (1 << i);
        let flipped_nogo = cfg.nogo(flipped);
        let mut toggled_state = *state;
        toggled_state.aux = Aux::Toggle(flipped);
        if flipped_nogo.test_point(state.pos) {
            continue;
        }
        out.extend(base_successors(cfg, &toggled_state, flipped_nogo));
    }
    out
}

/// The trap ruleset is the base ruleset, plus the trap cell acts as an
/// extra wall until the player has reached the trap button at least once.
fn trap_successors<const H: usize>(cfg: &Config<H>, state: &State<H>) -> Vec<Successor<H>> {
    let disarmed = matches!(state.aux, Aux::Toggle(1));
    let mut nogo = cfg.walls;
    if let (false, Some(trap)) = (disarmed, cfg.trap) {
        nogo.set(trap.x, trap.y, true);
    }

    let mut out = base_successors(cfg, state, nogo);

    if !disarmed {
        if let Some(button) = cfg.trap_button {
            if state.can_reach(cfg, button) {
                let mut armed_state = *state;
                armed_state.aux = Aux::Toggle(1);
                out.extend(base_successors(cfg, &armed_state, cfg.walls));
            }
        }
    }
    out
}

/// Dirt, popup and turtle tiles are one-shot: each is consumed (turned to
/// plain floor) the first time the player or a pulled block crosses it.
/// `state.aux` tracks which of up to 32 special cells (raster order within
/// the union of dirt/popup/turtle masks) have already been consumed.
fn special_successors<const H: usize>(cfg: &Config<H>, state: &State<H>) -> Vec<Successor<H>> {
    let consumed = match state.aux {
        Aux::Active(bits) => bits,
        _ => 0,
    };
    let special_cells = special_cell_list(cfg);

    let remaining_specials = {
        let mut m = Bitmap::<H>::new();
        for (i, &p) in special_cells.iter().enumerate() {
            if consumed & (1 << i) == 0 {
                m.set(p.x, p.y, true);
            }
        }
        m
    };
    let popups_remaining = remaining_specials.row_intersect(&cfg.popups);
    let turtles_remaining = remaining_specials.row_intersect(&cfg.turtles);

    // popup cells are baked into `cfg.walls` permanently ("Popup cells are
    // already in walls"); once consumed a popup reopens, so the consumed
    // ones are cleared back out of the wall mask used for ordinary movement.
    let popups_consumed = cfg.popups.row_intersect(&popups_remaining.row_complement());
    let real_walls = cfg.walls.row_intersect(&popups_consumed.row_complement());
    // turtles are only solid (block reachability) while unconsumed; dirt
    // never blocks the player, only records consumption on crossing.
    let nogo = real_walls.row_union(&turtles_remaining);

    let obstruction = state.blocks.row_union(&nogo);
    let reach = crate::bitmap::reachable(state.pos, &obstruction);

    // A turtle-crossing pull's block lands directly on the live turtle,
    // which `nogo`/`reach` treat as an obstruction; a second reachability
    // pass that doesn't block on turtles finds the cells such a pull could
    // start from.
    let obstruction_ignoring_turtles = state.blocks.row_union(&real_walls);
    let reach_ignoring_turtles = crate::bitmap::reachable(state.pos, &obstruction_ignoring_turtles);

    let mut out = Vec::new();
    for y in 0..H as i8 {
        for x in 0..cfg.width as i8 {
            let q = Point::new(x, y);
            let ordinarily_reachable = reach.test_point(q);
            let turtle_candidate =
                turtles_remaining.test_point(q) && reach_ignoring_turtles.test_point(q);
            if !ordinarily_reachable && !turtle_candidate {
                continue;
            }
            for &d in &DIRECTIONS {
                if ordinarily_reachable {
                    for mut s in try_pull(cfg, state, q, d, nogo, cfg.max_push, true) {
                        let mut new_consumed = consumed;
                        let mut cost = 1;
                        for (i, &p) in special_cells.iter().enumerate() {
                            if (p == q || p == s.pos) && consumed & (1 << i) == 0 {
                                new_consumed |= 1 << i;
                                // crossing a live turtle (rather than
                                // dirt/popup) costs +3.
                                if cfg.turtles.test_point(p) {
                                    cost = 3;
                                }
                            }
                        }
                        s.aux = Aux::Active(new_consumed);
                        out.push(Successor {
                            state: s.normalize(cfg),
                            direction: d,
                            cost,
                        });
                    }

                    // Pull onto a still-live popup or turtle past the
                    // player: ordinarily blocked by `nogo`, but §4.4
                    // explicitly allows it, activating the tile at cost +3.
                    let player_dest = q + (d * -1);
                    let lands_on_special = popups_remaining.test_point(player_dest)
                        || turtles_remaining.test_point(player_dest);
                    if lands_on_special {
                        let mut relaxed_nogo = nogo;
                        relaxed_nogo.set(player_dest.x, player_dest.y, false);
                        if let Some(mut s) =
                            try_pull(cfg, state, q, d, relaxed_nogo, 1, true).into_iter().next()
                        {
                            let mut new_consumed = consumed;
                            if let Some(i) = special_cells.iter().position(|&p| p == player_dest) {
                                new_consumed |= 1 << i;
                            }
                            s.aux = Aux::Active(new_consumed);
                            out.push(Successor {
                                state: s.normalize(cfg),
                                direction: d,
                                cost: 3,
                            });
                        }
                    }
                }

                if turtle_candidate {
                    // Turtle traversal: the block's destination `q` is
                    // itself a still-live turtle, which `nogo` otherwise
                    // blocks; §4.4 allows a pull through it at cost +3.
                    let mut relaxed_nogo = nogo;
                    relaxed_nogo.set(q.x, q.y, false);
                    if let Some(mut s) =
                        try_pull(cfg, state, q, d, relaxed_nogo, 1, true).into_iter().next()
                    {
                        let mut new_consumed = consumed;
                        if let Some(i) = special_cells.iter().position(|&p| p == q) {
                            new_consumed |= 1 << i;
                        }
                        s.aux = Aux::Active(new_consumed);
                        out.push(Successor {
                            state: s.normalize(cfg),
                            direction: d,
                            cost: 3,
                        });
                    }
                }
            }
        }
    }

    // Dirt: merely entering a reachable, unconsumed dirt cell activates it,
    // with no block pulled.
    for (i, &p) in special_cells.iter().enumerate() {
        if consumed & (1 << i) != 0 || !cfg.dirt.test_point(p) || !reach.test_point(p) {
            continue;
        }
        let mut s = *state;
        s.pos = p;
        s.aux = Aux::Active(consumed | (1 << i));
        out.push(Successor {
            state: s.normalize(cfg),
            direction: crate::point::STAY,
            cost: 1,
        });
    }

    // Popup: being merely adjacent to an unconsumed popup cell activates it,
    // placing the player directly on it (it stops blocking once active).
    for y in 0..H as i8 {
        for x in 0..cfg.width as i8 {
            let q = Point::new(x, y);
            if !reach.test_point(q) {
                continue;
            }
            for &d in &DIRECTIONS {
                let n = q + d;
                let Some(i) = special_cells.iter().position(|&p| p == n) else {
                    continue;
                };
                if consumed & (1 << i) != 0 || !cfg.popups.test_point(n) {
                    continue;
                }
                let mut s = *state;
                s.pos = n;
                s.aux = Aux::Active(consumed | (1 << i));
                out.push(Successor {
                    state: s.normalize(cfg),
                    direction: d,
                    cost: 1,
                });
            }
        }
    }

    out
}

fn special_cell_list<const H: usize>(cfg: &Config<H>) -> Vec<Point> {
    let combined = cfg.dirt.row_union(&cfg.popups).row_union(&cfg.turtles);
    let mut cells = Vec::new();
    for y in 0..H as i8 {
        for x in 0..cfg.width as i8 {
            if combined.test(x, y) {
                cells.push(Point::new(x, y));
            }
        }
    }
    cells
}

/// The two directions perpendicular to a pull direction, used by the fire
/// slap's forward-entry guard.
fn perpendicular(d: Direction) -> [Direction; 2] {
    if d.dx == 0 {
        [Direction { dx: 1, dy: 0 }, Direction { dx: -1, dy: 0 }]
    } else {
        [Direction { dx: 0, dy: 1 }, Direction { dx: 0, dy: -1 }]
    }
}

/// Fire tiles block the player and any block from entering, except that a
/// block can be "slapped" into a fire cell (extinguishing it permanently)
/// if the player pulls it there directly; the destination fire cell is then
/// treated as ordinary floor for the rest of the search.
fn fire_successors<const H: usize>(cfg: &Config<H>, state: &State<H>) -> Vec<Successor<H>> {
    let extinguished = match state.aux {
        Aux::Active(bits) => bits,
        _ => 0,
    };
    let fire_cells = {
        let mut cells = Vec::new();
        for y in 0..H as i8 {
            for x in 0..cfg.width as i8 {
                if cfg.fire.test(x, y) {
                    cells.push(Point::new(x, y));
                }
            }
        }
        cells
    };
    let remaining_fire = {
        let mut m = Bitmap::<H>::new();
        for (i, &p) in fire_cells.iter().enumerate() {
            if extinguished & (1 << i) == 0 {
                m.set(p.x, p.y, true);
            }
        }
        m
    };

    let nogo = cfg.walls.row_union(&remaining_fire);
    let obstruction = state.blocks.row_union(&nogo);
    let reach = crate::bitmap::reachable(state.pos, &obstruction);

    // A slap's destination is the burning cell itself, which `reach` treats
    // as an obstruction; a second reachability pass that ignores fire finds
    // the cells a slap could land on.
    let slap_obstruction = state.blocks.row_union(&cfg.walls);
    let reach_ignoring_fire = crate::bitmap::reachable(state.pos, &slap_obstruction);

    let mut out = Vec::new();
    for y in 0..H as i8 {
        for x in 0..cfg.width as i8 {
            let q = Point::new(x, y);
            let ordinarily_reachable = reach.test_point(q);
            let slap_candidate = remaining_fire.test_point(q) && reach_ignoring_fire.test_point(q);
            if !ordinarily_reachable && !slap_candidate {
                continue;
            }
            for &d in &DIRECTIONS {
                if ordinarily_reachable {
                    // ordinary pull, never crossing live fire
                    for s in try_pull(cfg, state, q, d, nogo, cfg.max_push, false) {
                        out.push(Successor {
                            state: s.normalize(cfg),
                            direction: d,
                            cost: 1,
                        });
                    }
                }
                // a slap: the block being pulled lands on a still-burning
                // fire cell at `q`, which is otherwise off limits; allowed
                // exactly once per cell, single-step only, provided one of
                // the two cells perpendicular to the pull direction, next to
                // where the player ends up, is reachable (so the player
                // could, in the forward sim, have approached from the side
                // rather than through the fire), and the sink reassertion
                // check that would normally run after every pull is skipped
                // here since the block's destination is mid-extinguish, not
                // a final resting cell.
                if slap_candidate {
                    let player_dest = q + (d * -1);
                    let perpendicular_ok = perpendicular(d)
                        .iter()
                        .any(|&pd| reach.test_point(player_dest + pd));
                    if !perpendicular_ok {
                        continue;
                    }
                    if let Some(mut s) = try_pull(cfg, state, q, d, cfg.walls, 1, false).into_iter().next() {
                        if let Some(i) = fire_cells.iter().position(|&p| p == q) {
                            s.aux = Aux::Active(extinguished | (1 << i));
                            out.push(Successor {
                                state: s.normalize(cfg),
                                direction: d,
                                cost: 1,
                            });
                        }
                    }
                }
            }
        }
    }
    out
}

/// One legal forward "push" — the literal inverse of a pull — used only by
/// the forward solver to verify a generated (or hand-authored) level is
/// actually playable from its stored start configuration.
pub struct PushSuccessor<const H: usize> {
    pub state: State<H>,
    pub direction: Direction,
}

/// Enumerates every forward push available from `state`: the player, adjacent
/// to a block on the side opposite `d`, steps in direction `d`, shoving the
/// block one cell further along the same line. Pushing a block onto the sink
/// consumes it — per §4.6, the forward solver's goal is every block gone, so
/// the sink behaves like a drain rather than an ordinary floor cell, and a
/// push into it always succeeds regardless of whatever bookkeeping bit the
/// reverse search's sink reassertion already left set there.
///
/// This only ever needs to consider the base (non-Fire, non-special)
/// movement rules: `Config::from_level` never populates fire, dirt, popup or
/// turtle masks on a level this solver is asked to verify, since those
/// variants are generated (and intended to be played) under their own
/// reverse rules, not the base forward pusher.
pub fn push_successors<const H: usize>(cfg: &Config<H>, state: &State<H>) -> Vec<PushSuccessor<H>> {
    let nogo = state.nogo(cfg);
    let obstruction = state.blocks.row_union(&nogo);
    let reach = crate::bitmap::reachable(state.pos, &obstruction);

    let mut out = Vec::new();
    for y in 0..H as i8 {
        for x in 0..cfg.width as i8 {
            let p = Point::new(x, y);
            if !reach.test_point(p) {
                continue;
            }
            for &d in &DIRECTIONS {
                let block_from = p + d;
                if !in_bounds(cfg, block_from) || !state.blocks.test_point(block_from) {
                    continue;
                }
                let block_to = block_from + d;
                if !in_bounds(cfg, block_to) || nogo.test_point(block_to) {
                    continue;
                }
                let consumed = block_to == cfg.sink;
                if !consumed && state.blocks.test_point(block_to) {
                    continue;
                }

                let mut blocks = state.blocks;
                blocks.set(block_from.x, block_from.y, false);
                if !consumed {
                    blocks.set(block_to.x, block_to.y, true);
                }
                let new_state = State::new(blocks, block_from, state.aux).normalize(cfg);
                out.push(PushSuccessor {
                    state: new_state,
                    direction: d,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::tile::Tile;

    fn room() -> Config<5> {
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
        level.set(6, 3, Tile::Teleport);
        Config::<5>::from_level(&level).unwrap()
    }

    #[test]
    fn base_pull_moves_block_and_player() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(3, 2, true);
        let state = State::new(blocks, Point::new(2, 2), Aux::None);

        let succs = base_successors(&cfg, &state, cfg.walls);
        let found = succs.iter().any(|s| {
            s.state.blocks.test(2, 2) && !s.state.blocks.test(3, 2)
        });
        assert!(found, "expected a successor with the block pulled to (2,2)");
    }

    #[test]
    fn pull_blocked_by_wall_behind_player() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(1, 1, true); // block sits right next to the border wall
        let state = State::new(blocks, Point::new(2, 1), Aux::None);

        // pulling west would require the player to step onto (3,1)... pulling
        // east (block at q+d where d=west means block at (1,1), player
        // steps to q-d=east side) is fine; but pulling with the player at the
        // block's position itself never happens since q must be block-free.
        let succs = base_successors(&cfg, &state, cfg.walls);
        assert!(!succs.is_empty());
    }

    #[test]
    fn no_successors_when_sealed_alone() {
        let cfg = room();
        let state = State::new(Bitmap::new(), Point::new(2, 2), Aux::None);
        // no blocks at all: nothing to pull
        let succs = successors(&cfg, &state);
        assert!(succs.is_empty());
    }

    #[test]
    fn max_push_one_only_emits_a_single_step_pull() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(3, 2, true);
        let state = State::new(blocks, Point::new(2, 2), Aux::None);

        let lengths = try_pull(&cfg, &state, Point::new(2, 2), DIRECTIONS[3], cfg.walls, 1, true);
        assert_eq!(lengths.len(), 1);
        assert!(lengths[0].blocks.test(2, 2));
    }

    #[test]
    fn block_line_emits_one_successor_per_valid_length() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(3, 2, true);
        let state = State::new(blocks, Point::new(2, 2), Aux::None);

        // pulling east: block at (3,2) can slide to (2,2) or (1,2) before the
        // border wall at column 0 stops it, since the player would need to
        // land on (1,2) for length 1, and (0,2) (a wall) for length 2.
        let lines = try_pull(&cfg, &state, Point::new(2, 2), DIRECTIONS[3], cfg.walls, 3, true);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].blocks.test(2, 2));
        assert_eq!(lines[0].pos, Point::new(1, 2));
    }

    #[test]
    fn block_line_in_open_space_yields_every_length_up_to_the_wall() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(4, 2, true);
        let state = State::new(blocks, Point::new(3, 2), Aux::None);

        // block starts well clear of the border; length 1 lands it at (3,2),
        // length 2 at (2,2); length 3 would need the player on the wall at
        // (0,2), so only the first two lengths are legal.
        let lines = try_pull(&cfg, &state, Point::new(3, 2), DIRECTIONS[3], cfg.walls, 3, true);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].blocks.test(3, 2) && lines[0].pos == Point::new(2, 2));
        assert!(lines[1].blocks.test(2, 2) && lines[1].pos == Point::new(1, 2));
    }

    #[test]
    fn push_moves_block_one_cell_further_from_the_player() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(3, 2, true);
        let state = State::new(blocks, Point::new(2, 2), Aux::None);

        let succs = push_successors(&cfg, &state);
        let found = succs.iter().any(|s| {
            s.state.pos == Point::new(3, 2) && s.state.blocks.test(4, 2) && !s.state.blocks.test(3, 2)
        });
        assert!(found, "expected the block pushed from (3,2) to (4,2)");
    }

    #[test]
    fn push_into_the_sink_consumes_the_block() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(5, 3, true); // one cell west of the sink at (6,3)
        let state = State::new(blocks, Point::new(4, 3), Aux::None);

        let succs = push_successors(&cfg, &state);
        let found = succs
            .iter()
            .any(|s| s.state.blocks.is_empty() && s.state.pos == Point::new(5, 3));
        assert!(found, "expected the block pushed onto the sink to vanish");
    }

    #[test]
    fn push_blocked_by_another_block_in_the_way() {
        let cfg = room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(3, 2, true);
        blocks.set(4, 2, true); // occupies the cell the first block would land on
        let state = State::new(blocks, Point::new(2, 2), Aux::None);

        let succs = push_successors(&cfg, &state);
        assert!(succs
            .iter()
            .all(|s| !(s.direction == DIRECTIONS[3] && s.state.pos == Point::new(3, 2))));
    }

    fn specials_room() -> Config<5> {
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
        level.set(6, 3, Tile::Teleport);
        level.set(3, 2, Tile::Dirt);
        level.set(5, 1, Tile::Popup);
        level.set(4, 2, Tile::Turtle);
        Config::<5>::from_level(&level).unwrap()
    }

    // `special_cell_list` walks the board in raster order, so for
    // `specials_room` the popup at (5,1) is index 0, the dirt at (3,2) is
    // index 1, and the turtle at (4,2) is index 2.

    #[test]
    fn entering_dirt_activates_it_without_pulling_a_block() {
        let cfg = specials_room();
        let state = State::new(Bitmap::new(), Point::new(2, 2), Aux::None);

        let succs = special_successors(&cfg, &state);
        let found = succs.iter().any(|s| {
            s.direction == crate::point::STAY
                && s.cost == 1
                && matches!(s.state.aux, Aux::Active(2))
        });
        assert!(found, "expected a pure activation successor on the dirt cell");
    }

    #[test]
    fn standing_next_to_popup_activates_it_and_places_player_on_it() {
        let cfg = specials_room();
        let state = State::new(Bitmap::new(), Point::new(5, 2), Aux::None);

        let succs = special_successors(&cfg, &state);
        let found = succs
            .iter()
            .any(|s| s.cost == 1 && matches!(s.state.aux, Aux::Active(1)));
        assert!(found, "expected a pure activation successor on the popup cell");
    }

    #[test]
    fn pull_can_traverse_a_live_turtle_at_cost_three() {
        let cfg = specials_room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(4, 1, true); // block just north of the turtle at (4,2)
        let state = State::new(blocks, Point::new(5, 2), Aux::None);

        // pulling north onto (4,2) drags the block one step south, over the
        // live turtle.
        let succs = special_successors(&cfg, &state);
        let found = succs.iter().any(|s| {
            s.direction == DIRECTIONS[0]
                && s.cost == 3
                && s.state.blocks.test(4, 2)
                && matches!(s.state.aux, Aux::Active(4))
        });
        assert!(found, "expected a turtle-traversal successor at cost 3");
    }

    fn fire_room() -> Config<5> {
        let mut level = Level::new("t", 1);
        for x in 0..8 {
            level.set(x, 0, Tile::Wall);
            level.set(x, 4, Tile::Wall);
        }
        for y in 0..5 {
            level.set(0, y, Tile::Wall);
            level.set(7, y, Tile::Wall);
        }
        level.set(1, 2, Tile::Player);
        level.set(6, 3, Tile::Teleport);
        level.set(4, 2, Tile::Fire);
        Config::<5>::from_level(&level).unwrap()
    }

    #[test]
    fn slap_extinguishes_fire_when_a_perpendicular_cell_is_reachable() {
        let cfg = fire_room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(3, 2, true); // block just west of the fire at (4,2)
        let state = State::new(blocks, Point::new(2, 2), Aux::None);

        // (3,1) and (3,3) are both open floor here, so the perpendicular
        // guard is satisfied.
        let succs = fire_successors(&cfg, &state);
        let found = succs
            .iter()
            .any(|s| s.state.blocks.test(4, 2) && matches!(s.state.aux, Aux::Active(bits) if bits != 0));
        assert!(found, "expected the block slapped onto the fire cell");
    }

    #[test]
    fn slap_is_rejected_when_no_perpendicular_cell_is_reachable() {
        let mut cfg = fire_room();
        let mut blocks = Bitmap::<5>::new();
        blocks.set(3, 2, true);
        // wall off both cells perpendicular to where the player would end up
        // after the slap (5,1) and (5,3), without cutting off the route to
        // the fire cell itself (which still runs via row 1 through (4,1)).
        cfg.walls.set(5, 1, true);
        cfg.walls.set(5, 3, true);
        let state = State::new(blocks, Point::new(2, 2), Aux::None);

        let succs = fire_successors(&cfg, &state);
        assert!(
            succs.iter().all(|s| !s.state.blocks.test(4, 2)),
            "slap should be blocked without a reachable perpendicular cell"
        );
    }
}
