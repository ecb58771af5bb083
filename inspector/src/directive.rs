use crate::{assets::Sprite, input::InputSelector, layer::LayerKind};

/// Which group of maps a feature map belongs to within the selected layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Maps consumed by the layer, produced by its predecessor.
    In,
    /// Maps produced by the layer itself.
    Out,
}

/// Detail panels that can be closed independently of the layer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    FilterDetails,
    FeatureMapDetails(Side),
}

/// What feeds a convolution layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvInput {
    /// The first convolution reads the raw input image.
    RawImage(Sprite),
    /// Later convolutions read the visible block of the predecessor's maps.
    FeatureMaps(Vec<Sprite>),
}

/// The regions shown for the selected layer, one variant per layer kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelSet {
    Input {
        image: Sprite,
    },
    Conv {
        input: ConvInput,
        filters: Vec<Sprite>,
        output: Vec<Sprite>,
    },
    Pool {
        input: Vec<Sprite>,
        output: Vec<Sprite>,
    },
    FullyConnected {
        input: Vec<Sprite>,
        /// Scalar output panel belonging to this input image.
        output_for: InputSelector,
    },
    Output {
        /// Classification result panel belonging to this input image.
        result_for: InputSelector,
    },
}

impl PanelSet {
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Input { .. } => LayerKind::Input,
            Self::Conv { .. } => LayerKind::Conv,
            Self::Pool { .. } => LayerKind::Pool,
            Self::FullyConnected { .. } => LayerKind::FullyConnected,
            Self::Output { .. } => LayerKind::Output,
        }
    }

    /// The maps shown in the input region, if the layer has any.
    pub fn input_maps(&self) -> Option<&[Sprite]> {
        match self {
            Self::Conv {
                input: ConvInput::FeatureMaps(maps),
                ..
            }
            | Self::Pool { input: maps, .. }
            | Self::FullyConnected { input: maps, .. } => Some(maps.as_slice()),
            _ => None,
        }
    }

    /// The maps shown in the output region, if the layer has any.
    pub fn output_maps(&self) -> Option<&[Sprite]> {
        match self {
            Self::Conv { output, .. } | Self::Pool { output, .. } => Some(output.as_slice()),
            _ => None,
        }
    }
}

/// Label next to a region telling how many items it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountLabel {
    Filters,
    InputMaps,
    OutputMaps,
}

/// Instruction for the presentation layer. Directives are plain data, applying
/// them in order reproduces the visible state.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    ShowPanelSet {
        layer_id: usize,
        layer_name: String,
        panels: PanelSet,
    },
    SetFilterDisplay {
        index: usize,
        name: String,
        image: Sprite,
        weights: Vec<f32>,
    },
    SetFeatureMapDisplay {
        side: Side,
        index: usize,
        name: String,
        image: Sprite,
        dimension: Option<String>,
        /// Whether the panel can be closed on its own, output maps of a
        /// convolution follow their filter instead.
        closable: bool,
    },
    SetCountLabel {
        label: CountLabel,
        count: usize,
    },
    SetInputImage(Sprite),
    /// Upper bound of the feature map colour bar, the lower bound is always 0.
    SetMaxValue(f32),
    SetLinkIndicator(bool),
    HidePanel(Panel),
}

/// A user action raised by the presentation layer (mouse click, key press or
/// controller trigger release).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SelectLayer(usize),
    SelectInput(usize),
    OpenFilter(usize),
    OpenFeatureMap(usize, Side),
    SetLinked(bool),
    HidePanel(Panel),
}
