//! Error type for the application crate.
//!
//! Only device-level failures are errors.  Missing hands, debounced
//! gestures and a zero cursor radius are ordinary states.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The display window could not be created or updated.
    #[error("window error: {0}")]
    Window(String),

    /// The hand-tracking device stopped delivering frames.  Fatal.
    #[error("hand capture failed: {0}")]
    Capture(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
