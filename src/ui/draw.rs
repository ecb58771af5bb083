use ratatui::{widgets::Block, Frame};

use crate::state::{model::ViewerModel, session::Focus};

use super::{layout, theme::Theme, widgets};

/// Draws the entire UI.
pub fn draw(f: &mut Frame, model: &ViewerModel, focus: Option<Focus>) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let (header_area, strip_area, body_area, logs_area, hint_area) = layout::vertical(area);
    let (regions_area, details_area) = layout::body(body_area);
    let (filter_area, map_out_area, map_in_area) = layout::details(details_area);

    f.render_widget(widgets::header(model), header_area);
    f.render_widget(widgets::layer_strip(model), strip_area);

    let regions = model.regions();
    let summary = model.has_summary();
    let mut columns =
        layout::columns(regions_area, regions.len() + usize::from(summary)).into_iter();

    if summary {
        if let Some(area) = columns.next() {
            f.render_widget(widgets::layer_summary(model), area);
        }
    }
    for (region, area) in regions.iter().zip(columns) {
        let (list, mut state) = widgets::region_list(model, *region, focus);
        f.render_stateful_widget(list, area, &mut state);
    }

    f.render_widget(widgets::filter_panel(model.filter.as_ref()), filter_area);
    f.render_widget(
        widgets::map_panel("Output Map", model.map_out.as_ref(), 'c', model.max_value),
        map_out_area,
    );
    f.render_widget(
        widgets::map_panel("Input Map", model.map_in.as_ref(), 'z', model.max_value),
        map_in_area,
    );

    f.render_widget(widgets::logs(model), logs_area);
    f.render_widget(widgets::hint(), hint_area);
}
