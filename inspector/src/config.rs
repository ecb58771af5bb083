use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{LayerCatalog, LayerSpec, default_topology},
    error::Result,
    input::Calibration,
};

/// Startup configuration: the network topology and the colour-bar calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorConfig {
    #[serde(default = "default_topology")]
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub calibration: Calibration,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            layers: default_topology(),
            calibration: Calibration::default(),
        }
    }
}

impl InspectorConfig {
    /// # Errors
    /// Returns `InspectErr::Configuration` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    /// Returns `InspectErr::Io` if the file can't be read, `InspectErr::Configuration`
    /// if it isn't a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        log::info!("loaded configuration {}", path.as_ref().display());
        Ok(config)
    }

    /// Builds the layer catalog described by this configuration.
    ///
    /// # Errors
    /// Returns `InspectErr::Configuration` if the topology is malformed.
    pub fn catalog(&self) -> Result<LayerCatalog> {
        LayerCatalog::build(self.layers.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::InspectErr, input::InputSelector, layer::LayerKind};

    #[test]
    fn empty_object_uses_defaults() {
        let config = InspectorConfig::from_json("{}").unwrap();
        assert_eq!(config, InspectorConfig::default());
    }

    #[test]
    fn parses_topology_and_calibration() {
        let json = r#"{
            "layers": [
                { "kind": "input", "name": "Input" },
                { "kind": "conv", "name": "Conv", "counts": { "input": 1, "output": 8 }, "map_size": 28 },
                { "kind": "fc", "name": "Dense", "counts": { "input": 8, "output": 10 } },
                { "kind": "output", "name": "Output" }
            ],
            "calibration": [1.0, 1.0, 1.0, 1.0, 1.0, 2.0]
        }"#;
        let config = InspectorConfig::from_json(json).unwrap();
        let catalog = config.catalog().unwrap();

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.layer_at(2).unwrap().kind(), LayerKind::FullyConnected);
        assert_eq!(catalog.layer_at(1).unwrap().map_label().as_deref(), Some("28x28"));
        assert_eq!(
            config.calibration.max_value(InputSelector::new(5).unwrap()),
            2.0
        );
    }

    #[test]
    fn calibration_needs_six_values() {
        assert!(InspectorConfig::from_json(r#"{ "calibration": [1.0, 2.0] }"#).is_err());
    }

    #[test]
    fn unknown_layer_kind_is_rejected() {
        let json = r#"{ "layers": [{ "kind": "lstm", "name": "x" }] }"#;
        assert!(matches!(
            InspectorConfig::from_json(json),
            Err(InspectErr::Configuration(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = InspectorConfig::load("/nonexistent/inspector.json").unwrap_err();
        assert!(matches!(err, InspectErr::Io(_)));
        assert!(err.is_fatal());
    }
}
