//! Layer inspection state machine of the CNN visualizer.
//!
//! The [`Inspector`] tracks which layer, input image, filter and feature map
//! the user is looking at and answers every [`Intent`] with the
//! [`Directive`]s a presentation layer has to apply.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod directive;
pub mod error;
mod inspector;
pub mod input;
pub mod layer;
pub mod slicing;
mod state;

pub use assets::{AssetProvider, Sprite, StaticAssets};
pub use catalog::{LayerCatalog, LayerSpec};
pub use config::InspectorConfig;
pub use directive::{ConvInput, CountLabel, Directive, Intent, Panel, PanelSet, Side};
pub use error::{InspectErr, Result};
pub use input::{Calibration, INPUT_COUNT, InputSelector};
pub use inspector::Inspector;
pub use layer::{Layer, LayerKind, MapCounts};
pub use state::{InspectionState, View};
