use inspector::{
    ConvInput, CountLabel, Directive, LayerCatalog, LayerKind, Panel, PanelSet, Side, Sprite,
};

const MAX_LOGS: usize = 200;

/// A layer tab in the layer strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTab {
    pub id: usize,
    pub name: String,
    pub kind: LayerKind,
}

/// Browsable region of the selected layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    InputMaps,
    Filters,
    OutputMaps,
}

impl Region {
    pub fn title(self) -> &'static str {
        match self {
            Region::InputMaps => "Input Maps",
            Region::Filters => "Filters",
            Region::OutputMaps => "Output Maps",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterDetail {
    pub index: usize,
    pub name: String,
    pub image: Sprite,
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDetail {
    pub index: usize,
    pub name: String,
    pub image: Sprite,
    pub dimension: Option<String>,
    pub closable: bool,
}

/// A single log entry shown in the event panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub level: &'static str,
    pub message: String,
}

/// Widget model of the viewer. Only ever changed by applying directives.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerModel {
    pub layers: Vec<LayerTab>,
    pub selected: Option<usize>,
    pub layer_name: Option<String>,
    pub panels: Option<PanelSet>,
    pub filter_count: Option<usize>,
    pub input_count: Option<usize>,
    pub output_count: Option<usize>,
    pub input_image: Option<Sprite>,
    pub filter: Option<FilterDetail>,
    pub map_in: Option<MapDetail>,
    pub map_out: Option<MapDetail>,
    pub max_value: f32,
    pub linked: bool,
    pub logs: Vec<LogLine>,
}

impl ViewerModel {
    pub fn new(catalog: &LayerCatalog) -> Self {
        let layers = catalog
            .iter()
            .map(|l| LayerTab {
                id: l.id(),
                name: l.name().to_string(),
                kind: l.kind(),
            })
            .collect();

        Self {
            layers,
            selected: None,
            layer_name: None,
            panels: None,
            filter_count: None,
            input_count: None,
            output_count: None,
            input_image: None,
            filter: None,
            map_in: None,
            map_out: None,
            max_value: 0.0,
            linked: true,
            logs: vec![LogLine {
                level: "INFO",
                message: "select a layer with ← →".into(),
            }],
        }
    }

    pub fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::ShowPanelSet {
                layer_id,
                layer_name,
                panels,
            } => {
                self.selected = Some(layer_id);
                self.layer_name = Some(layer_name);
                self.panels = Some(panels);
                self.filter_count = None;
                self.input_count = None;
                self.output_count = None;
            }
            Directive::SetFilterDisplay {
                index,
                name,
                image,
                weights,
            } => {
                self.filter = Some(FilterDetail {
                    index,
                    name,
                    image,
                    weights,
                });
            }
            Directive::SetFeatureMapDisplay {
                side,
                index,
                name,
                image,
                dimension,
                closable,
            } => {
                let detail = Some(MapDetail {
                    index,
                    name,
                    image,
                    dimension,
                    closable,
                });
                match side {
                    Side::In => self.map_in = detail,
                    Side::Out => self.map_out = detail,
                }
            }
            Directive::SetCountLabel { label, count } => match label {
                CountLabel::Filters => self.filter_count = Some(count),
                CountLabel::InputMaps => self.input_count = Some(count),
                CountLabel::OutputMaps => self.output_count = Some(count),
            },
            Directive::SetInputImage(image) => self.input_image = Some(image),
            Directive::SetMaxValue(value) => self.max_value = value,
            Directive::SetLinkIndicator(linked) => self.linked = linked,
            Directive::HidePanel(panel) => match panel {
                Panel::FilterDetails => self.filter = None,
                Panel::FeatureMapDetails(Side::In) => self.map_in = None,
                Panel::FeatureMapDetails(Side::Out) => self.map_out = None,
            },
        }
    }

    /// Regions of the selected layer that hold browsable items, in screen order.
    pub fn regions(&self) -> Vec<Region> {
        [Region::InputMaps, Region::Filters, Region::OutputMaps]
            .into_iter()
            .filter(|r| !self.items(*r).is_empty())
            .collect()
    }

    pub fn items(&self, region: Region) -> &[Sprite] {
        let Some(panels) = &self.panels else {
            return &[];
        };

        match (region, panels) {
            (Region::InputMaps, _) => panels.input_maps().unwrap_or_default(),
            (Region::Filters, PanelSet::Conv { filters, .. }) => filters.as_slice(),
            (Region::Filters, _) => &[],
            (Region::OutputMaps, _) => panels.output_maps().unwrap_or_default(),
        }
    }

    pub fn count(&self, region: Region) -> Option<usize> {
        match region {
            Region::InputMaps => self.input_count,
            Region::Filters => self.filter_count,
            Region::OutputMaps => self.output_count,
        }
    }

    /// Whether the selected layer shows an image or a result panel besides its regions.
    pub fn has_summary(&self) -> bool {
        !matches!(
            self.panels,
            Some(PanelSet::Pool { .. })
                | Some(PanelSet::Conv {
                    input: ConvInput::FeatureMaps(_),
                    ..
                })
        )
    }

    pub fn selected_kind(&self) -> Option<LayerKind> {
        self.panels.as_ref().map(PanelSet::kind)
    }

    pub fn push_log(&mut self, level: &'static str, message: String) {
        self.logs.push(LogLine { level, message });
        if self.logs.len() > MAX_LOGS {
            let drain = self.logs.len() - MAX_LOGS;
            self.logs.drain(0..drain);
        }
    }
}

#[cfg(test)]
mod tests {
    use inspector::{catalog::default_topology, InputSelector};

    use super::*;

    fn model() -> ViewerModel {
        let catalog = LayerCatalog::build(default_topology()).unwrap();
        ViewerModel::new(&catalog)
    }

    fn sprites(n: usize) -> Vec<Sprite> {
        (0..n).map(|i| Sprite::new(i, format!("s{i}"))).collect()
    }

    #[test]
    fn layer_strip_follows_catalog() {
        let model = model();
        let kinds: Vec<_> = model.layers.iter().map(|l| l.kind).collect();

        assert_eq!(
            kinds,
            vec![
                LayerKind::Input,
                LayerKind::Conv,
                LayerKind::Pool,
                LayerKind::FullyConnected,
                LayerKind::Output
            ]
        );
        assert!(model.linked);
    }

    #[test]
    fn new_panel_set_resets_count_labels() {
        let mut model = model();
        model.apply(Directive::SetCountLabel {
            label: CountLabel::InputMaps,
            count: 32,
        });

        model.apply(Directive::ShowPanelSet {
            layer_id: 1,
            layer_name: "Convolution 1".into(),
            panels: PanelSet::Conv {
                input: ConvInput::RawImage(Sprite::new(0, "input/0")),
                filters: sprites(4),
                output: sprites(4),
            },
        });

        assert_eq!(model.selected, Some(1));
        assert_eq!(model.input_count, None);
        assert!(model.has_summary());
        assert_eq!(model.regions(), vec![Region::Filters, Region::OutputMaps]);
    }

    #[test]
    fn regions_skip_empty_groups() {
        let mut model = model();
        assert!(model.regions().is_empty());

        model.apply(Directive::ShowPanelSet {
            layer_id: 3,
            layer_name: "Fully Connected 1".into(),
            panels: PanelSet::FullyConnected {
                input: sprites(3),
                output_for: InputSelector::default(),
            },
        });

        assert_eq!(model.regions(), vec![Region::InputMaps]);
        assert_eq!(model.items(Region::InputMaps).len(), 3);
        assert!(model.items(Region::Filters).is_empty());
    }

    #[test]
    fn hide_panel_clears_detail() {
        let mut model = model();
        model.apply(Directive::SetFeatureMapDisplay {
            side: Side::In,
            index: 2,
            name: "Feature Map 2".into(),
            image: Sprite::new(2, "s2"),
            dimension: Some("26x26".into()),
            closable: true,
        });
        assert!(model.map_in.is_some());

        model.apply(Directive::HidePanel(Panel::FeatureMapDetails(Side::In)));
        assert!(model.map_in.is_none());
    }

    #[test]
    fn logs_are_bounded() {
        let mut model = model();
        for i in 0..250 {
            model.push_log("WARN", format!("line {i}"));
        }

        assert_eq!(model.logs.len(), MAX_LOGS);
        assert_eq!(model.logs.last().unwrap().message, "line 249");
    }
}
