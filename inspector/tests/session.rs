use inspector::{
    Calibration, ConvInput, CountLabel, Directive, InspectErr, Inspector, LayerCatalog,
    LayerKind, PanelSet, Side, StaticAssets, View, catalog::default_topology,
};

fn fixture() -> (LayerCatalog, StaticAssets) {
    let _ = env_logger::builder().is_test(true).try_init();
    let catalog = LayerCatalog::build(default_topology()).unwrap();
    let assets = StaticAssets::synthetic(&catalog);
    (catalog, assets)
}

fn panel_set(directives: &[Directive]) -> &PanelSet {
    directives
        .iter()
        .find_map(|d| match d {
            Directive::ShowPanelSet { panels, .. } => Some(panels),
            _ => None,
        })
        .expect("no panel set emitted")
}

fn count(directives: &[Directive], label: CountLabel) -> Option<usize> {
    directives.iter().find_map(|d| match d {
        Directive::SetCountLabel { label: l, count } if *l == label => Some(*count),
        _ => None,
    })
}

fn feature_map(directives: &[Directive], side: Side) -> Option<(usize, usize)> {
    directives.iter().find_map(|d| match d {
        Directive::SetFeatureMapDisplay {
            side: s,
            index,
            image,
            ..
        } if *s == side => Some((*index, image.index)),
        _ => None,
    })
}

#[test]
fn panel_sets_follow_layer_kind() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());

    let input = inspector.select_layer(0).unwrap();
    assert!(matches!(panel_set(&input), PanelSet::Input { image } if image.index == 0));

    let conv = inspector.select_layer(1).unwrap();
    match panel_set(&conv) {
        PanelSet::Conv {
            input: ConvInput::RawImage(image),
            filters,
            output,
        } => {
            assert_eq!(image.index, 0);
            assert_eq!(filters.len(), 32);
            assert_eq!(output.len(), 32);
        }
        other => panic!("unexpected panel set {other:?}"),
    }
    assert_eq!(count(&conv, CountLabel::InputMaps), None);
    assert_eq!(count(&conv, CountLabel::OutputMaps), Some(32));
    assert_eq!(count(&conv, CountLabel::Filters), Some(32));

    let pool = inspector.select_layer(2).unwrap();
    match panel_set(&pool) {
        PanelSet::Pool { input, output } => {
            assert_eq!(input.len(), 32);
            assert_eq!(output.len(), 32);
            assert_eq!(input[0].key, "Convolution 1/input_0/fm_00");
            assert_eq!(output[0].key, "Pooling 1/input_0/fm_00");
        }
        other => panic!("unexpected panel set {other:?}"),
    }

    let fc = inspector.select_layer(3).unwrap();
    match panel_set(&fc) {
        PanelSet::FullyConnected { input, output_for } => {
            assert_eq!(input.len(), 32);
            assert_eq!(input[0].key, "Pooling 1/input_0/fm_00");
            assert_eq!(output_for.index(), 0);
        }
        other => panic!("unexpected panel set {other:?}"),
    }
    assert_eq!(count(&fc, CountLabel::InputMaps), Some(32));

    let output = inspector.select_layer(4).unwrap();
    assert!(matches!(
        panel_set(&output),
        PanelSet::Output { result_for } if result_for.index() == 0
    ));
}

#[test]
fn select_layer_clears_active_indices() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());
    inspector.select_layer(1).unwrap();
    inspector.open_filter(7).unwrap();

    let directives = inspector.select_layer(2).unwrap();

    assert!(directives.contains(&Directive::HidePanel(inspector::Panel::FilterDetails)));
    assert_eq!(inspector.state().active_filter(), None);
    assert_eq!(inspector.state().active_feature_map(), None);
    assert_eq!(
        inspector.view(),
        View::Layer {
            id: 2,
            kind: LayerKind::Pool
        }
    );
}

#[test]
fn select_layer_is_idempotent() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());

    let first = inspector.select_layer(2).unwrap();
    let state = inspector.state().clone();
    let second = inspector.select_layer(2).unwrap();

    assert_eq!(first, second);
    assert_eq!(inspector.state(), &state);
}

#[test]
fn select_input_rejects_out_of_range_and_keeps_state() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());
    inspector.select_layer(1).unwrap();
    inspector.select_input(3).unwrap();
    let before = inspector.state().clone();

    assert!(matches!(
        inspector.select_input(6),
        Err(InspectErr::OutOfRange { index: 6, .. })
    ));
    assert_eq!(inspector.state(), &before);
}

#[test]
fn select_input_while_idle_updates_image_and_max_value() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());

    let directives = inspector.select_input(5).unwrap();

    assert!(matches!(&directives[0], Directive::SetInputImage(s) if s.index == 5));
    assert_eq!(directives.last(), Some(&Directive::SetMaxValue(1.14)));
    assert_eq!(inspector.view(), View::Idle);
}

#[test]
fn select_input_moves_the_visible_block() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());
    inspector.select_layer(2).unwrap();

    let directives = inspector.select_input(5).unwrap();

    let panels = panel_set(&directives);
    let input = panels.input_maps().unwrap();
    let output = panels.output_maps().unwrap();
    assert_eq!(input.first().unwrap().index, 160);
    assert_eq!(input.last().unwrap().index, 191);
    assert_eq!(output.first().unwrap().index, 160);
}

#[test]
fn select_input_closes_input_side_details() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());
    inspector.select_layer(2).unwrap();
    inspector.open_feature_map(4, Side::In).unwrap();

    let directives = inspector.select_input(1).unwrap();

    assert!(directives.contains(&Directive::HidePanel(inspector::Panel::FeatureMapDetails(
        Side::In
    ))));
    assert_eq!(inspector.state().active_input_map(), None);
}

#[test]
fn fully_connected_output_follows_input() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());
    inspector.select_layer(3).unwrap();

    let directives = inspector.select_input(4).unwrap();

    assert!(matches!(
        panel_set(&directives),
        PanelSet::FullyConnected { output_for, .. } if output_for.index() == 4
    ));
}

#[test]
fn end_to_end_scenario() {
    let (catalog, assets) = fixture();
    let mut inspector = Inspector::new(&catalog, &assets, Calibration::default());

    let directives = inspector.select_layer(1).unwrap();
    match panel_set(&directives) {
        PanelSet::Conv {
            input: ConvInput::RawImage(_),
            output,
            ..
        } => assert_eq!(output.len(), 32),
        other => panic!("unexpected panel set {other:?}"),
    }

    let directives = inspector.open_filter(5).unwrap();
    assert_eq!(inspector.state().active_filter(), Some(5));
    assert_eq!(inspector.state().active_feature_map(), Some(5));
    assert_eq!(feature_map(&directives, Side::Out), Some((5, 5)));

    let directives = inspector.select_input(2).unwrap();
    let output = panel_set(&directives).output_maps().unwrap();
    assert_eq!(output.first().unwrap().index, 64);
    assert_eq!(output.last().unwrap().index, 95);
    assert_eq!(feature_map(&directives, Side::Out), Some((5, 69)));
    assert!(directives.contains(&Directive::SetMaxValue(0.91)));
    assert_eq!(inspector.state().selected_input().index(), 2);
}
