use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InspectErr, Result};

/// The stage a layer represents in the visualized network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Input,
    Conv,
    Pool,
    #[serde(alias = "fc")]
    FullyConnected,
    Output,
}

impl LayerKind {
    /// Whether layers of this kind consume and produce feature maps.
    pub fn has_feature_maps(self) -> bool {
        matches!(self, Self::Conv | Self::Pool | Self::FullyConnected)
    }

    /// Whether layers of this kind produce square maps shown in an output region.
    pub fn has_output_maps(self) -> bool {
        matches!(self, Self::Conv | Self::Pool)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Input => "input",
            Self::Conv => "conv",
            Self::Pool => "pool",
            Self::FullyConnected => "fc",
            Self::Output => "output",
        };

        f.write_str(s)
    }
}

/// Amount of feature maps a layer consumes and produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCounts {
    pub input: usize,
    pub output: usize,
}

/// One stage of the network, as shown in the 3D model.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: usize,
    kind: LayerKind,
    name: String,
    counts: Option<MapCounts>,
    map_size: Option<usize>,
}

impl Layer {
    pub(crate) fn new(id: usize, kind: LayerKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            counts: None,
            map_size: None,
        }
    }

    /// Sets the input and output feature map counts.
    ///
    /// # Errors
    /// Returns `InspectErr::Configuration` if this layer's kind doesn't accept counts.
    pub(crate) fn set_counts(&mut self, input: usize, output: usize) -> Result<()> {
        if !self.kind.has_feature_maps() {
            log::warn!(layer = self.id; "{} layer '{}' has no feature map counts", self.kind, self.name);
            return Err(InspectErr::Configuration(format!(
                "layer {} ({}): {} layers take no input/output counts",
                self.id, self.name, self.kind
            )));
        }

        self.counts = Some(MapCounts { input, output });
        Ok(())
    }

    /// Sets the side length of the square maps this layer produces.
    ///
    /// # Errors
    /// Returns `InspectErr::Configuration` if this layer doesn't produce output maps.
    pub(crate) fn set_map_size(&mut self, size: usize) -> Result<()> {
        if !self.kind.has_output_maps() {
            return Err(InspectErr::Configuration(format!(
                "layer {} ({}): {} layers produce no square maps",
                self.id, self.name, self.kind
            )));
        }

        self.map_size = Some(size);
        Ok(())
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn counts(&self) -> Option<MapCounts> {
        self.counts
    }

    /// Number of feature maps consumed, `None` for input and output layers.
    pub fn input_count(&self) -> Option<usize> {
        self.counts.map(|c| c.input)
    }

    /// Number of feature maps produced, `None` for input and output layers.
    pub fn output_count(&self) -> Option<usize> {
        self.counts.map(|c| c.output)
    }

    pub fn map_size(&self) -> Option<usize> {
        self.map_size
    }

    /// The dimension label of the maps this layer produces, e.g. `"26x26"`.
    pub fn map_label(&self) -> Option<String> {
        self.map_size.map(|s| format!("{s}x{s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_rejected_on_input_and_output() {
        let mut input = Layer::new(0, LayerKind::Input, "Input");
        let mut output = Layer::new(4, LayerKind::Output, "Output");

        assert!(matches!(
            input.set_counts(1, 1),
            Err(InspectErr::Configuration(_))
        ));
        assert!(matches!(
            output.set_counts(10, 10),
            Err(InspectErr::Configuration(_))
        ));
        assert_eq!(input.counts(), None);
        assert_eq!(output.input_count(), None);
    }

    #[test]
    fn counts_are_kept_on_operation_layers() {
        for kind in [LayerKind::Conv, LayerKind::Pool, LayerKind::FullyConnected] {
            let mut layer = Layer::new(1, kind, "op");
            layer.set_counts(32, 10).unwrap();
            assert_eq!(layer.input_count(), Some(32));
            assert_eq!(layer.output_count(), Some(10));
        }
    }

    #[test]
    fn map_label_is_square() {
        let mut layer = Layer::new(1, LayerKind::Conv, "Convolution 1");
        assert_eq!(layer.map_label(), None);

        layer.set_map_size(26).unwrap();
        assert_eq!(layer.map_label().as_deref(), Some("26x26"));
    }

    #[test]
    fn fully_connected_has_no_square_maps() {
        let mut layer = Layer::new(3, LayerKind::FullyConnected, "Fully Connected 1");
        assert!(layer.set_map_size(1).is_err());
    }

    #[test]
    fn kind_parses_short_fc_name() {
        let kind: LayerKind = serde_json::from_str("\"fc\"").unwrap();
        assert_eq!(kind, LayerKind::FullyConnected);

        let kind: LayerKind = serde_json::from_str("\"fully_connected\"").unwrap();
        assert_eq!(kind, LayerKind::FullyConnected);
    }
}
