use thiserror::Error;

/// Fatal level-construction errors.
///
/// These are caught at the scene boundary and surfaced as an in-scene
/// message with a return-to-menu action; they never crash the process.
/// Missing textures and persistence failures are not errors of this kind,
/// they degrade with a warning instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown level id {0}")]
    UnknownLevel(u32),
    #[error("level data missing object layer {0:?}")]
    MissingObjectLayer(&'static str),
}
