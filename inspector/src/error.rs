use std::{error::Error, fmt, io};

use crate::layer::LayerKind;

/// The inspector's result type.
pub type Result<T> = std::result::Result<T, InspectErr>;

/// Everything that can go wrong while building the catalog or resolving an action.
#[derive(Debug)]
pub enum InspectErr {
    /// The layer id does not exist in the catalog.
    NotFound { layer_id: usize },
    /// A filter, feature map or input index outside its valid bounds.
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// Malformed topology or configuration file, fatal at startup.
    Configuration(String),
    /// Input-side lookup on the first layer.
    NoPredecessor { layer_id: usize },
    /// The asset provider returned fewer items than the catalog requires.
    AssetUnavailable {
        layer: String,
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// An action that needs a selected layer was raised while idle.
    NoLayerSelected { action: &'static str },
    /// The selected layer kind does not offer the action.
    Unsupported {
        action: &'static str,
        kind: LayerKind,
    },
    Io(io::Error),
}

impl InspectErr {
    /// Returns `true` for errors that must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Io(_))
    }
}

impl fmt::Display for InspectErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { layer_id } => write!(f, "layer {layer_id} not found"),
            Self::OutOfRange { what, index, len } => {
                write!(f, "{what} index {index} out of range (0..{len})")
            }
            Self::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::NoPredecessor { layer_id } => {
                write!(f, "layer {layer_id} has no predecessor")
            }
            Self::AssetUnavailable {
                layer,
                what,
                got,
                expected,
            } => write!(
                f,
                "assets for '{layer}' unavailable: got {got} {what}, expected at least {expected}"
            ),
            Self::NoLayerSelected { action } => write!(f, "{action}: no layer selected"),
            Self::Unsupported { action, kind } => {
                write!(f, "{action} is not available on {kind} layers")
            }
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for InspectErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for InspectErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for InspectErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Configuration(value.to_string())
    }
}
