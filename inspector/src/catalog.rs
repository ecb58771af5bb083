use serde::{Deserialize, Serialize};

use crate::{
    error::{InspectErr, Result},
    layer::{Layer, LayerKind, MapCounts},
};

/// Static description of one layer, as read from the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub name: String,
    #[serde(default)]
    pub counts: Option<MapCounts>,
    #[serde(default)]
    pub map_size: Option<usize>,
}

impl LayerSpec {
    pub fn new(kind: LayerKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            counts: None,
            map_size: None,
        }
    }

    pub fn with_counts(mut self, input: usize, output: usize) -> Self {
        self.counts = Some(MapCounts { input, output });
        self
    }

    pub fn with_map_size(mut self, size: usize) -> Self {
        self.map_size = Some(size);
        self
    }
}

/// The five-layer network shipped with the application.
pub fn default_topology() -> Vec<LayerSpec> {
    vec![
        LayerSpec::new(LayerKind::Input, "Input"),
        LayerSpec::new(LayerKind::Conv, "Convolution 1")
            .with_counts(1, 32)
            .with_map_size(26),
        LayerSpec::new(LayerKind::Pool, "Pooling 1")
            .with_counts(32, 32)
            .with_map_size(13),
        LayerSpec::new(LayerKind::FullyConnected, "Fully Connected 1").with_counts(32, 10),
        LayerSpec::new(LayerKind::Output, "Output"),
    ]
}

/// Immutable, ordered topology of the network. Layer ids match their position.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCatalog {
    layers: Vec<Layer>,
}

impl LayerCatalog {
    /// Builds the catalog, assigning sequential ids.
    ///
    /// # Errors
    /// Returns `InspectErr::Configuration` if the topology is malformed.
    pub fn build<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = LayerSpec>,
    {
        let layers = specs
            .into_iter()
            .enumerate()
            .map(|(id, spec)| Self::build_layer(id, spec))
            .collect::<Result<Vec<_>>>()?;

        Self::validate(&layers)?;
        log::info!("built layer catalog with {} layers", layers.len());
        Ok(Self { layers })
    }

    fn build_layer(id: usize, spec: LayerSpec) -> Result<Layer> {
        let mut layer = Layer::new(id, spec.kind, spec.name);

        match (spec.kind.has_feature_maps(), spec.counts) {
            (_, Some(c)) => {
                layer.set_counts(c.input, c.output)?;
                if c.input == 0 || c.output == 0 {
                    return Err(InspectErr::Configuration(format!(
                        "layer {id} ({}): feature map counts must be greater than 0",
                        layer.name()
                    )));
                }
            }
            (true, None) => {
                return Err(InspectErr::Configuration(format!(
                    "layer {id} ({}): {} layers require input/output counts",
                    layer.name(),
                    spec.kind
                )));
            }
            (false, None) => {}
        }

        if let Some(size) = spec.map_size {
            layer.set_map_size(size)?;
        }

        Ok(layer)
    }

    fn validate(layers: &[Layer]) -> Result<()> {
        let (Some(first), Some(last)) = (layers.first(), layers.last()) else {
            return Err(InspectErr::Configuration(
                "topology must have at least one layer".into(),
            ));
        };

        if first.kind() != LayerKind::Input {
            return Err(InspectErr::Configuration(format!(
                "topology must start with an input layer, got {}",
                first.kind()
            )));
        }

        if last.kind() != LayerKind::Output || layers.len() < 2 {
            return Err(InspectErr::Configuration(format!(
                "topology must end with an output layer, got {}",
                last.kind()
            )));
        }

        let inner = &layers[1..layers.len() - 1];
        if let Some(l) = inner.iter().find(|l| !l.kind().has_feature_maps()) {
            return Err(InspectErr::Configuration(format!(
                "layer {} ({}): {} layers are only allowed at the ends",
                l.id(),
                l.name(),
                l.kind()
            )));
        }

        // Every operation layer reads the raw image or its predecessor's output maps.
        for pair in layers[..layers.len() - 1].windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let readable = match prev.kind() {
                LayerKind::Input => next.kind() == LayerKind::Conv,
                kind => kind.has_output_maps(),
            };
            if !readable {
                return Err(InspectErr::Configuration(format!(
                    "layer {} ({}): {} layers can't follow {} layers",
                    next.id(),
                    next.name(),
                    next.kind(),
                    prev.kind()
                )));
            }
        }

        // Adjacent layers must agree on the amount of maps passed between them.
        for pair in inner.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.output_count() != next.input_count() {
                return Err(InspectErr::Configuration(format!(
                    "layer {}: input count ({:?}) does not match previous layer output count ({:?})",
                    next.id(),
                    next.input_count(),
                    prev.output_count()
                )));
            }
        }

        Ok(())
    }

    /// Returns the layer with the given id.
    ///
    /// # Errors
    /// Returns `InspectErr::NotFound` if the id is out of range.
    pub fn layer_at(&self, id: usize) -> Result<&Layer> {
        self.layers
            .get(id)
            .ok_or(InspectErr::NotFound { layer_id: id })
    }

    /// Returns the layer feeding into the given one.
    ///
    /// # Errors
    /// Returns `InspectErr::NoPredecessor` for the first layer and
    /// `InspectErr::NotFound` if the id is out of range.
    pub fn layer_before(&self, id: usize) -> Result<&Layer> {
        self.layer_at(id)?;
        match id.checked_sub(1) {
            Some(prev) => self.layer_at(prev),
            None => Err(InspectErr::NoPredecessor { layer_id: id }),
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }
}
