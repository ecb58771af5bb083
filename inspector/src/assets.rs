use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::{
    catalog::LayerCatalog,
    error::Result,
    input::INPUT_COUNT,
    layer::LayerKind,
};

/// A renderable image handed out by an [`AssetProvider`].
///
/// `index` is the sprite's position in the sequence it was returned in, so
/// identity never has to be recovered from `key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub index: usize,
    pub key: String,
}

impl Sprite {
    pub fn new(index: usize, key: impl Into<String>) -> Self {
        Self {
            index,
            key: key.into(),
        }
    }
}

/// Lookup of the precomputed images and weights of the network.
///
/// Implementations must be free of side effects, the inspector may call any
/// method repeatedly for the same action.
pub trait AssetProvider {
    /// Filter images of a convolution layer, ordered by filter index.
    fn filter_sprites(&self, layer: &str) -> &[Sprite];

    /// Feature maps of a layer, one block per input image, concatenated in input order.
    fn feature_map_sprites(&self, layer: &str) -> &[Sprite];

    /// Kernel weights of a convolution layer, one row per filter.
    fn filter_weights(&self, layer: &str) -> &[Vec<f32>];

    /// The input images, ordered by input selector.
    fn input_images(&self) -> &[Sprite];
}

#[derive(Debug, Clone, Default, PartialEq)]
struct LayerAssets {
    filters: Vec<Sprite>,
    feature_maps: Vec<Sprite>,
    weights: Vec<Vec<f32>>,
}

/// In-memory [`AssetProvider`], read from a JSON manifest or generated to match a catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticAssets {
    layers: HashMap<String, LayerAssets>,
    inputs: Vec<Sprite>,
}

#[derive(Deserialize)]
struct Manifest {
    inputs: Vec<String>,
    #[serde(default)]
    layers: HashMap<String, ManifestLayer>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ManifestLayer {
    filters: Vec<String>,
    feature_maps: Vec<String>,
    weights: Vec<Vec<f32>>,
}

fn sprites(keys: Vec<String>) -> Vec<Sprite> {
    keys.into_iter()
        .enumerate()
        .map(|(i, key)| Sprite::new(i, key))
        .collect()
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a manifest listing the asset keys of every layer.
    ///
    /// # Errors
    /// Returns `InspectErr::Configuration` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;

        let layers = manifest
            .layers
            .into_iter()
            .map(|(name, l)| {
                let assets = LayerAssets {
                    filters: sprites(l.filters),
                    feature_maps: sprites(l.feature_maps),
                    weights: l.weights,
                };
                (name, assets)
            })
            .collect();

        Ok(Self {
            layers,
            inputs: sprites(manifest.inputs),
        })
    }

    /// Reads a manifest from disk.
    ///
    /// # Errors
    /// Returns `InspectErr::Io` if the file can't be read, `InspectErr::Configuration`
    /// if it isn't a valid manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let assets = Self::from_json(&content)?;
        log::info!(
            "loaded asset manifest {} ({} layers)",
            path.as_ref().display(),
            assets.layers.len()
        );
        Ok(assets)
    }

    /// Generates placeholder assets with the exact shape the catalog expects.
    pub fn synthetic(catalog: &LayerCatalog) -> Self {
        let mut assets = Self::new();

        for k in 0..INPUT_COUNT {
            assets.inputs.push(Sprite::new(k, format!("input/{k}")));
        }

        for layer in catalog.iter() {
            let Some(out) = layer.output_count() else {
                continue;
            };
            let name = layer.name();
            let mut entry = LayerAssets::default();

            if layer.kind() == LayerKind::Conv {
                entry.filters = (0..out)
                    .map(|i| Sprite::new(i, format!("{name}/filter_{i:02}")))
                    .collect();
                entry.weights = (0..out).map(synthetic_kernel).collect();
            }

            if layer.kind().has_output_maps() {
                entry.feature_maps = (0..out * INPUT_COUNT)
                    .map(|i| Sprite::new(i, format!("{name}/input_{}/fm_{:02}", i / out, i % out)))
                    .collect();
            }

            assets.layers.insert(name.to_string(), entry);
        }

        assets
    }

    /// Replaces the assets of a layer. Indices are assigned by position.
    pub fn insert_layer(
        &mut self,
        layer: impl Into<String>,
        filters: Vec<String>,
        feature_maps: Vec<String>,
        weights: Vec<Vec<f32>>,
    ) {
        let assets = LayerAssets {
            filters: sprites(filters),
            feature_maps: sprites(feature_maps),
            weights,
        };
        self.layers.insert(layer.into(), assets);
    }

    pub fn set_inputs(&mut self, keys: Vec<String>) {
        self.inputs = sprites(keys);
    }
}

fn synthetic_kernel(filter: usize) -> Vec<f32> {
    (0..9)
        .map(|j| {
            let x = (filter * 9 + j) as f32;
            (x * 0.731).sin() * 0.5
        })
        .collect()
}

impl AssetProvider for StaticAssets {
    fn filter_sprites(&self, layer: &str) -> &[Sprite] {
        self.layers
            .get(layer)
            .map(|l| l.filters.as_slice())
            .unwrap_or_default()
    }

    fn feature_map_sprites(&self, layer: &str) -> &[Sprite] {
        self.layers
            .get(layer)
            .map(|l| l.feature_maps.as_slice())
            .unwrap_or_default()
    }

    fn filter_weights(&self, layer: &str) -> &[Vec<f32>] {
        self.layers
            .get(layer)
            .map(|l| l.weights.as_slice())
            .unwrap_or_default()
    }

    fn input_images(&self) -> &[Sprite] {
        &self.inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_topology;

    #[test]
    fn synthetic_assets_match_catalog_shape() {
        let catalog = LayerCatalog::build(default_topology()).unwrap();
        let assets = StaticAssets::synthetic(&catalog);

        assert_eq!(assets.input_images().len(), INPUT_COUNT);
        assert_eq!(assets.filter_sprites("Convolution 1").len(), 32);
        assert_eq!(assets.filter_weights("Convolution 1")[0].len(), 9);
        assert_eq!(assets.feature_map_sprites("Convolution 1").len(), 192);
        assert_eq!(assets.feature_map_sprites("Pooling 1").len(), 192);
        assert!(assets.feature_map_sprites("Fully Connected 1").is_empty());
        assert!(assets.filter_sprites("Pooling 1").is_empty());
    }

    #[test]
    fn synthetic_keys_carry_block_and_local_index() {
        let catalog = LayerCatalog::build(default_topology()).unwrap();
        let assets = StaticAssets::synthetic(&catalog);
        let fm = &assets.feature_map_sprites("Convolution 1")[69];

        assert_eq!(fm.index, 69);
        assert_eq!(fm.key, "Convolution 1/input_2/fm_05");
    }

    #[test]
    fn unknown_layer_is_empty() {
        let assets = StaticAssets::new();
        assert!(assets.filter_sprites("nope").is_empty());
        assert!(assets.feature_map_sprites("nope").is_empty());
        assert!(assets.filter_weights("nope").is_empty());
    }

    #[test]
    fn manifest_assigns_positions() {
        let json = r#"{
            "inputs": ["a.png", "b.png"],
            "layers": {
                "Convolution 1": {
                    "filters": ["f0.png", "f1.png"],
                    "weights": [[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]]
                }
            }
        }"#;
        let assets = StaticAssets::from_json(json).unwrap();

        assert_eq!(assets.input_images()[1], Sprite::new(1, "b.png"));
        assert_eq!(assets.filter_sprites("Convolution 1")[1].index, 1);
        assert!(assets.feature_map_sprites("Convolution 1").is_empty());
        assert_eq!(assets.filter_weights("Convolution 1").len(), 1);
    }

    #[test]
    fn missing_manifest_is_an_io_error() {
        let err = StaticAssets::load("/nonexistent/assets.json").unwrap_err();
        assert!(matches!(err, crate::error::InspectErr::Io(_)));
    }

    #[test]
    fn malformed_manifest_is_a_configuration_error() {
        let err = StaticAssets::from_json("{ \"layers\": 3 }").unwrap_err();
        assert!(err.is_fatal());
    }
}
