use bridge_traits::{presentation::PresentationStyle, BridgeError};
use thiserror::Error;

/// Navigation failure taxonomy.
///
/// Every variant is recoverable: the prop-channel entry point logs and drops,
/// while direct callers get the error for inspection. Nothing here is fatal
/// to the process.
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Malformed screen props: {0}")]
    MalformedProps(String),

    #[error("Malformed navigation command: {0}")]
    MalformedCommand(String),

    #[error("Screen not registered: {0}")]
    UnknownScreen(String),

    #[error("No active navigation stack")]
    NoActiveStack,

    #[error("No presented {0} to dismiss")]
    NoPresentedController(PresentationStyle),

    #[error("Cannot pop the root entry of a navigation stack")]
    CannotPopRoot,

    #[error("Screen '{0}' is not in the current stack")]
    TargetNotInStack(String),

    #[error("Tab root unavailable or '{0}' is not a registered tab")]
    TabNotFound(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, NavigationError>;
