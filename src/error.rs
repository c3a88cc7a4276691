//! Error kinds surfaced at the crate boundary.
//!
//! Decode-time warnings (unknown tile bytes) are not errors — they are logged
//! via [`log::warn!`] once per level and otherwise ignored. Invariant
//! violations inside the search loop (a block disagreeing with its own
//! bitmap, a missing one-shot-tile index) are bugs, not user errors, and are
//! raised with `panic!`/`debug_assert!` rather than this type, matching the
//! teacher crate's use of `panic!` for "should never happen" conditions.

use thiserror::Error;

/// Errors raised while decoding or validating a level file.
#[derive(Error, Debug, Eq, PartialEq, Clone, Copy)]
pub enum LevelError {
    #[error("level: unexpected end of file")]
    UnexpectedEndOfFile,
    #[error("level: invalid magic bytes")]
    InvalidMagic,
    #[error("level: levelset has no levels")]
    LevelsetEmpty,
    #[error("level: sets with more than one level are unsupported")]
    UnsupportedMultiLevel,
    #[error("level: malformed level")]
    MalformedLevel,
    #[error("level: garbage at end of file")]
    GarbageAtEnd,
    #[error("level: unexpected end of layer data")]
    UnexpectedEndOfLayerData,
    #[error("level: garbage at end of layer data")]
    GarbageAtEndOfLayer,
    #[error("level: more than 16 activatable special tiles")]
    TooManySpecials,
    #[error("level: board width {0} exceeds the 16-column bitmap limit")]
    WidthTooLarge(usize),
    #[error("level: no player start tile found")]
    NoPlayerStart,
    #[error("level: no sink (teleport) tile found")]
    NoSink,
}
