use log::{debug, warn};

use crate::{
    assets::{AssetProvider, Sprite},
    catalog::LayerCatalog,
    directive::{ConvInput, CountLabel, Directive, Intent, Panel, PanelSet, Side},
    error::{InspectErr, Result},
    input::{Calibration, InputSelector},
    layer::{Layer, LayerKind},
    slicing,
    state::{InspectionState, View},
};

/// Drives an [`InspectionState`] from user intents.
///
/// Every operation validates and looks up everything it needs before touching
/// the state, so a failed operation leaves the state as it was and emits nothing.
pub struct Inspector<'a, P: AssetProvider + ?Sized> {
    catalog: &'a LayerCatalog,
    assets: &'a P,
    calibration: Calibration,
    state: InspectionState,
}

impl<'a, P: AssetProvider + ?Sized> Inspector<'a, P> {
    /// Creates a new idle `Inspector`.
    ///
    /// # Arguments
    /// * `catalog` - The network topology.
    /// * `assets` - The provider of sprites and weights for the catalog's layers.
    /// * `calibration` - The colour-bar maximum per input image.
    pub fn new(catalog: &'a LayerCatalog, assets: &'a P, calibration: Calibration) -> Self {
        Self {
            catalog,
            assets,
            calibration,
            state: InspectionState::new(),
        }
    }

    pub fn state(&self) -> &InspectionState {
        &self.state
    }

    pub fn catalog(&self) -> &'a LayerCatalog {
        self.catalog
    }

    pub fn view(&self) -> View {
        match self.selected_layer() {
            Some(layer) => View::Layer {
                id: layer.id(),
                kind: layer.kind(),
            },
            None => View::Idle,
        }
    }

    /// Resolves an intent, logging and swallowing per-action errors.
    ///
    /// # Returns
    /// The directives to apply, empty if the intent was rejected.
    pub fn dispatch(&mut self, intent: Intent) -> Vec<Directive> {
        self.try_dispatch(intent).unwrap_or_else(|e| {
            warn!("rejected {intent:?}: {e}");
            Vec::new()
        })
    }

    /// Resolves an intent.
    ///
    /// # Errors
    /// Whatever error the matching operation returns.
    pub fn try_dispatch(&mut self, intent: Intent) -> Result<Vec<Directive>> {
        match intent {
            Intent::SelectLayer(id) => self.select_layer(id),
            Intent::SelectInput(index) => self.select_input(index),
            Intent::OpenFilter(index) => self.open_filter(index),
            Intent::OpenFeatureMap(index, side) => self.open_feature_map(index, side),
            Intent::SetLinked(value) => self.set_linked(value),
            Intent::HidePanel(panel) => self.hide_panel(panel),
        }
    }

    /// Shows the panel set of a layer and closes every detail panel.
    ///
    /// # Errors
    /// `NotFound` for an invalid id, `AssetUnavailable` if the layer's maps or
    /// the input image are missing.
    pub fn select_layer(&mut self, layer_id: usize) -> Result<Vec<Directive>> {
        let catalog = self.catalog;
        let layer = catalog.layer_at(layer_id)?;

        let mut directives = vec![
            Directive::HidePanel(Panel::FilterDetails),
            Directive::HidePanel(Panel::FeatureMapDetails(Side::Out)),
            Directive::HidePanel(Panel::FeatureMapDetails(Side::In)),
        ];
        directives.extend(self.layer_directives(layer, self.state.selected_input)?);

        self.state.enter_layer(layer_id);
        debug!(layer = layer_id; "selected {} layer '{}'", layer.kind(), layer.name());
        Ok(directives)
    }

    /// Switches the active input image and refreshes everything derived from it.
    ///
    /// # Errors
    /// `OutOfRange` if `index` is not in `[0, 5]`, `AssetUnavailable` if the
    /// selected layer's maps for the new input are missing.
    pub fn select_input(&mut self, index: usize) -> Result<Vec<Directive>> {
        let input = InputSelector::new(index)?;
        let mut directives = Vec::new();

        match self.input_image(input) {
            Ok(image) => directives.push(Directive::SetInputImage(image)),
            Err(e) => warn!("input image not updated: {e}"),
        }

        if let Some(layer) = self.selected_layer() {
            directives.extend(self.layer_directives(layer, input)?);

            if self.state.active_input_map.is_some() {
                directives.push(Directive::HidePanel(Panel::FeatureMapDetails(Side::In)));
            }

            if let Some(fm) = self.state.active_feature_map {
                directives.push(self.feature_map_display(layer, fm, Side::Out, input)?);
            }
        }

        directives.push(Directive::SetMaxValue(self.calibration.max_value(input)));

        self.state.selected_input = input;
        self.state.active_input_map = None;
        debug!(input = index; "selected input image");
        Ok(directives)
    }

    /// Opens the detail panel of a filter of the selected convolution layer.
    /// When linked, also opens the output feature map with the same index.
    ///
    /// # Errors
    /// `NoLayerSelected`, `Unsupported` on other layer kinds, `OutOfRange` if
    /// the layer has no such filter.
    pub fn open_filter(&mut self, index: usize) -> Result<Vec<Directive>> {
        let layer = self.selected("open filter")?;
        if layer.kind() != LayerKind::Conv {
            return Err(InspectErr::Unsupported {
                action: "open filter",
                kind: layer.kind(),
            });
        }

        let linked = self.state.linked;
        let mut directives = vec![
            self.filter_display(layer, index)?,
            Directive::SetLinkIndicator(linked),
        ];

        if linked {
            let input = self.state.selected_input;
            directives.push(self.feature_map_display(layer, index, Side::Out, input)?);
        }

        self.state.active_filter = Some(index);
        if linked {
            self.state.active_feature_map = Some(index);
        }

        debug!(filter = index, linked = linked; "opened filter");
        Ok(directives)
    }

    /// Opens the detail panel of a feature map of the selected layer.
    ///
    /// Output maps of a convolution bring their filter along when linked or
    /// when no filter panel is open yet.
    ///
    /// # Errors
    /// `NoLayerSelected`, `Unsupported` if the layer has no maps on that side,
    /// `OutOfRange` for an invalid index, `AssetUnavailable` for missing maps.
    pub fn open_feature_map(&mut self, index: usize, side: Side) -> Result<Vec<Directive>> {
        let layer = self.selected("open feature map")?;
        let input = self.state.selected_input;

        let mut directives = vec![self.feature_map_display(layer, index, side, input)?];

        let follow_filter = side == Side::Out
            && layer.kind() == LayerKind::Conv
            && (self.state.linked || self.state.active_filter.is_none());

        if follow_filter {
            directives.push(self.filter_display(layer, index)?);
        }

        match side {
            Side::In => self.state.active_input_map = Some(index),
            Side::Out => self.state.active_feature_map = Some(index),
        }
        if follow_filter {
            self.state.active_filter = Some(index);
        }

        debug!(feature_map = index; "opened {side:?} feature map");
        Ok(directives)
    }

    /// Turns link mode on or off. Turning it on while a filter is open brings
    /// the output feature map back to the filter's index.
    ///
    /// # Errors
    /// `AssetUnavailable` if the resynced feature map is missing.
    pub fn set_linked(&mut self, value: bool) -> Result<Vec<Directive>> {
        let mut directives = vec![Directive::SetLinkIndicator(value)];

        let resync = match self.state.active_filter {
            Some(filter) if value && !self.state.linked => Some(filter),
            _ => None,
        };

        if let Some(filter) = resync {
            let layer = self.selected("set linked")?;
            let input = self.state.selected_input;
            directives.push(self.feature_map_display(layer, filter, Side::Out, input)?);
        }

        self.state.linked = value;
        if let Some(filter) = resync {
            self.state.active_feature_map = Some(filter);
        }

        debug!(linked = value; "link mode changed");
        Ok(directives)
    }

    /// Closes a detail panel. Closing the filter panel closes its feature map too.
    ///
    /// # Errors
    /// Never fails, the `Result` keeps every operation uniform.
    pub fn hide_panel(&mut self, panel: Panel) -> Result<Vec<Directive>> {
        let directives = match panel {
            Panel::FilterDetails => {
                self.state.active_filter = None;
                self.state.active_feature_map = None;
                vec![
                    Directive::HidePanel(Panel::FilterDetails),
                    Directive::HidePanel(Panel::FeatureMapDetails(Side::Out)),
                ]
            }
            Panel::FeatureMapDetails(Side::Out) => {
                self.state.active_feature_map = None;
                vec![Directive::HidePanel(panel)]
            }
            Panel::FeatureMapDetails(Side::In) => {
                self.state.active_input_map = None;
                vec![Directive::HidePanel(panel)]
            }
        };

        Ok(directives)
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    fn selected_layer(&self) -> Option<&'a Layer> {
        let catalog = self.catalog;
        self.state
            .selected_layer
            .and_then(|id| catalog.layer_at(id).ok())
    }

    fn selected(&self, action: &'static str) -> Result<&'a Layer> {
        self.selected_layer()
            .ok_or(InspectErr::NoLayerSelected { action })
    }

    fn layer_directives(&self, layer: &Layer, input: InputSelector) -> Result<Vec<Directive>> {
        let mut counts = Vec::new();
        let mut count = |label, n| counts.push(Directive::SetCountLabel { label, count: n });

        let panels = match layer.kind() {
            LayerKind::Input => PanelSet::Input {
                image: self.input_image(input)?,
            },
            LayerKind::Conv => {
                let source = self.catalog.layer_before(layer.id())?;
                let input_region = if source.kind() == LayerKind::Input {
                    ConvInput::RawImage(self.input_image(input)?)
                } else {
                    let maps = self.maps(layer, Side::In, input)?;
                    count(CountLabel::InputMaps, maps.len());
                    ConvInput::FeatureMaps(maps)
                };

                let filters = self.filters(layer);
                count(CountLabel::Filters, filters.len());

                let output = self.maps(layer, Side::Out, input)?;
                count(CountLabel::OutputMaps, output.len());

                PanelSet::Conv {
                    input: input_region,
                    filters,
                    output,
                }
            }
            LayerKind::Pool => {
                let maps = self.maps(layer, Side::In, input)?;
                count(CountLabel::InputMaps, maps.len());

                let output = self.maps(layer, Side::Out, input)?;
                count(CountLabel::OutputMaps, output.len());

                PanelSet::Pool {
                    input: maps,
                    output,
                }
            }
            LayerKind::FullyConnected => {
                let maps = self.maps(layer, Side::In, input)?;
                count(CountLabel::InputMaps, maps.len());

                PanelSet::FullyConnected {
                    input: maps,
                    output_for: input,
                }
            }
            LayerKind::Output => PanelSet::Output { result_for: input },
        };

        let mut directives = vec![Directive::ShowPanelSet {
            layer_id: layer.id(),
            layer_name: layer.name().to_string(),
            panels,
        }];
        directives.append(&mut counts);
        Ok(directives)
    }

    fn input_image(&self, input: InputSelector) -> Result<Sprite> {
        let images = self.assets.input_images();
        images
            .get(input.index())
            .cloned()
            .ok_or_else(|| InspectErr::AssetUnavailable {
                layer: "input".into(),
                what: "input images",
                got: images.len(),
                expected: input.index() + 1,
            })
    }

    /// Filter sprites of a layer. Fewer filters than output maps is tolerated.
    fn filters(&self, layer: &Layer) -> Vec<Sprite> {
        let filters = self.assets.filter_sprites(layer.name());
        let expected = layer.output_count().unwrap_or_default();

        if filters.len() < expected {
            warn!(
                "'{}': only {} of {expected} filter sprites available",
                layer.name(),
                filters.len()
            );
        }

        filters.to_vec()
    }

    /// Returns the layer that produced the maps on `side` and their block length.
    fn map_source(&self, layer: &Layer, side: Side) -> Result<(&'a Layer, usize)> {
        let catalog = self.catalog;
        let unsupported = || InspectErr::Unsupported {
            action: match side {
                Side::In => "input feature maps",
                Side::Out => "output feature maps",
            },
            kind: layer.kind(),
        };

        match side {
            Side::In => {
                let source = catalog.layer_before(layer.id())?;
                let fm_num = layer.input_count().ok_or_else(unsupported)?;
                if !source.kind().has_output_maps() {
                    return Err(unsupported());
                }
                Ok((source, fm_num))
            }
            Side::Out => {
                if !layer.kind().has_output_maps() {
                    return Err(unsupported());
                }
                let fm_num = layer.output_count().ok_or_else(unsupported)?;
                Ok((catalog.layer_at(layer.id())?, fm_num))
            }
        }
    }

    fn maps(&self, layer: &Layer, side: Side, input: InputSelector) -> Result<Vec<Sprite>> {
        let (source, fm_num) = self.map_source(layer, side)?;
        let seq = self.assets.feature_map_sprites(source.name());
        Ok(slicing::visible_block(source.name(), seq, fm_num, input)?.to_vec())
    }

    fn filter_display(&self, layer: &Layer, index: usize) -> Result<Directive> {
        let filters = self.assets.filter_sprites(layer.name());
        let image = filters
            .get(index)
            .cloned()
            .ok_or(InspectErr::OutOfRange {
                what: "filter",
                index,
                len: filters.len(),
            })?;

        let rows = self.assets.filter_weights(layer.name());
        let weights = rows
            .get(index)
            .cloned()
            .ok_or_else(|| InspectErr::AssetUnavailable {
                layer: layer.name().to_string(),
                what: "filter weight rows",
                got: rows.len(),
                expected: index + 1,
            })?;

        Ok(Directive::SetFilterDisplay {
            index,
            name: format!("Filter {index}"),
            image,
            weights,
        })
    }

    fn feature_map_display(
        &self,
        layer: &Layer,
        index: usize,
        side: Side,
        input: InputSelector,
    ) -> Result<Directive> {
        let (source, fm_num) = self.map_source(layer, side)?;
        if index >= fm_num {
            return Err(InspectErr::OutOfRange {
                what: "feature map",
                index,
                len: fm_num,
            });
        }

        let seq = self.assets.feature_map_sprites(source.name());
        let block = slicing::visible_block(source.name(), seq, fm_num, input)?;

        Ok(Directive::SetFeatureMapDisplay {
            side,
            index,
            name: format!("Feature Map {index}"),
            image: block[index].clone(),
            dimension: source.map_label(),
            closable: !(side == Side::Out && layer.kind() == LayerKind::Conv),
        })
    }
}
