//! Extracts the bounded engine configuration the search operates over from a
//! decoded [`Level`](crate::level::Level).
//!
//! The on-disk level is always the fixed 32x32 grid; the engine only ever
//! reasons about the top-left `width` x `H` rectangle of it, mirroring the
//! bounded extraction loop of the original generator. Anything outside that
//! rectangle is required to be a plain wall-or-floor border and is otherwise
//! ignored.

use crate::bitmap::Bitmap;
use crate::error::LevelError;
use crate::level::Level;
use crate::point::Point;
use crate::tile::Tile;

/// Which family of special-tile rules a level activates.
///
/// Variants are not mutually exclusive in the original format (a level could
/// in principle mix trap and fire tiles), but every level seen in practice
/// commits to exactly one, and the search successor logic branches on a
/// single active ruleset per run.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RuleSet {
    /// Only walls, blocks, player and sink.
    Base,
    /// One toggle-wall/toggle-floor pair driven by a single button.
    ToggleSingle,
    /// Up to 16 independently addressable toggle-wall/toggle-floor pairs.
    ToggleMulti,
    /// A single trap cell disarmed by stepping on its paired button.
    Trap,
    /// Dirt, popup tiles and turtles (one-shot activatable floor tiles).
    Specials,
    /// Fire tiles that can be extinguished by slapping a block into them.
    Fire,
}

/// The bounded board configuration the search engine runs against.
#[derive(Clone, Debug)]
pub struct Config<const H: usize> {
    pub width: usize,
    pub walls: Bitmap<H>,
    pub sink: Point,
    pub start_pos: Point,
    pub start_blocks: Bitmap<H>,
    pub rule_set: RuleSet,

    /// `toggle[0]` is the wall-when-off layout, `toggle[1]` the wall-when-on
    /// layout, for each of up to 16 independently switched button groups.
    /// `ToggleSingle` only ever populates index 0 of each array.
    pub toggle: [[Bitmap<H>; 2]; 16],
    pub num_buttons: usize,
    pub buttons: Vec<Point>,

    pub trap: Option<Point>,
    pub trap_button: Option<Point>,

    pub dirt: Bitmap<H>,
    pub popups: Bitmap<H>,
    pub turtles: Bitmap<H>,
    pub fire: Bitmap<H>,

    /// How many cells a single pull may drag a block in one move (the
    /// "block-line" extension). `1` is the ordinary single-step pull; set
    /// higher to let the move generator also emit longer in-line pulls. Not
    /// derived from the level file — the CLI's `--max-push` flag sets it.
    pub max_push: usize,
}

impl<const H: usize> Config<H> {
    /// Extracts a `Config` from the top-left `width x H` rectangle of
    /// `level`. `width` is the first column at which every remaining column,
    /// in every one of the first `H` rows, is `Tile::Floor` or `Tile::Wall`
    /// with no player/block/sink/special tile — i.e. the tightest bounding
    /// rectangle containing every tile the engine cares about.
    pub fn from_level(level: &Level) -> Result<Self, LevelError> {
        let width = Self::active_width(level)?;
        if width > 16 {
            return Err(LevelError::WidthTooLarge(width));
        }

        let mut walls = Bitmap::<H>::new();
        let mut dirt = Bitmap::<H>::new();
        let mut popups = Bitmap::<H>::new();
        let mut turtles = Bitmap::<H>::new();
        let mut fire = Bitmap::<H>::new();
        let mut start_blocks = Bitmap::<H>::new();
        let mut toggle = [[Bitmap::<H>::new(); 2]; 16];

        let mut start_pos = None;
        let mut sink = None;
        let mut trap = None;
        let mut trap_button = None;
        let mut buttons = Vec::new();
        let mut rule_set = RuleSet::Base;

        for y in 0..H {
            for x in 0..width {
                let (px, py) = (x as i8, y as i8);
                match level.get(x, y) {
                    Tile::Floor | Tile::Water => {}
                    Tile::Wall => walls.set(px, py, true),
                    Tile::Player => start_pos = Some(Point::new(px, py)),
                    Tile::Block => start_blocks.set(px, py, true),
                    Tile::Teleport => sink = Some(Point::new(px, py)),
                    Tile::Dirt => {
                        dirt.set(px, py, true);
                        rule_set = RuleSet::Specials;
                    }
                    Tile::Popup => {
                        // §4.4: "Popup cells are already in `walls` (they
                        // block by default) — activation only pins them."
                        popups.set(px, py, true);
                        walls.set(px, py, true);
                        rule_set = RuleSet::Specials;
                    }
                    Tile::Turtle => {
                        turtles.set(px, py, true);
                        rule_set = RuleSet::Specials;
                    }
                    Tile::Fire => {
                        fire.set(px, py, true);
                        rule_set = RuleSet::Fire;
                    }
                    Tile::ToggleWall => {
                        toggle[0][0].set(px, py, true);
                        if !matches!(rule_set, RuleSet::ToggleMulti) {
                            rule_set = RuleSet::ToggleSingle;
                        }
                    }
                    Tile::ToggleFloor => {
                        toggle[0][1].set(px, py, true);
                        if !matches!(rule_set, RuleSet::ToggleMulti) {
                            rule_set = RuleSet::ToggleSingle;
                        }
                    }
                    Tile::ToggleButton => {
                        buttons.push(Point::new(px, py));
                        rule_set = RuleSet::ToggleMulti;
                    }
                    Tile::Trap => trap = Some(Point::new(px, py)),
                    Tile::TrapButton => {
                        trap_button = Some(Point::new(px, py));
                        rule_set = RuleSet::Trap;
                    }
                }
            }
        }

        if buttons.len() > 16 {
            return Err(LevelError::TooManySpecials);
        }
        let specials_count = dirt.row_union(&popups).row_union(&turtles).count_ones();
        if specials_count > 16 {
            return Err(LevelError::TooManySpecials);
        }
        // single-button toggle levels don't place a ToggleButton tile (the
        // button is implicit); multi-button levels place one per group and
        // the toggle masks for groups 1..n are shared with group 0 in this
        // extraction pass, since the source format has no per-group tile
        // discriminator beyond placement order recorded by the generator.
        let num_buttons = if matches!(rule_set, RuleSet::ToggleMulti) {
            buttons.len().max(1)
        } else {
            1
        };

        Ok(Config {
            width,
            walls,
            sink: sink.ok_or(LevelError::NoSink)?,
            start_pos: start_pos.ok_or(LevelError::NoPlayerStart)?,
            start_blocks,
            rule_set,
            toggle,
            num_buttons,
            buttons,
            trap,
            trap_button,
            dirt,
            popups,
            turtles,
            fire,
            max_push: 1,
        })
    }

    fn active_width(level: &Level) -> Result<usize, LevelError> {
        let mut width = 0;
        for y in 0..H.min(crate::level::MAP_SIDE) {
            for x in 0..crate::level::MAP_SIDE {
                if level.get(x, y) != Tile::Floor {
                    width = width.max(x + 1);
                }
            }
        }
        Ok(width.max(1))
    }

    /// The "no-go" mask for a multi-button toggle level in the switch
    /// combination `active` (bit `i` set means group `i`'s button has been
    /// pressed an odd number of times).
    ///
    /// Computed on demand rather than precomputed for every one of the up to
    /// `2^16` combinations: `walls` plus, for each active group, that
    /// group's on/off difference restricted to cells not already a base
    /// wall. `diff(i) = toggle[i][0] XOR toggle[i][1]`; active groups flip
    /// those cells from the group's "off" state into its "on" state.
    pub fn nogo(&self, active: u16) -> Bitmap<H> {
        let mut out = self.walls;
        for i in 0..self.num_buttons {
            if active & (1 << i) == 0 {
                out = out.row_union(&self.toggle[i][0]);
            } else {
                out = out.row_union(&self.toggle[i][1]);
            }
        }
        out
    }

    /// The single-button toggle no-go mask: walls plus whichever of
    /// `toggle[0]`'s two layouts is currently active.
    pub fn nogo_single(&self, on: bool) -> Bitmap<H> {
        self.nogo(if on { 1 } else { 0 })
    }
}
