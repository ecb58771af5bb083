use inspector::{Calibration, ConvInput, PanelSet, INPUT_COUNT};
use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::state::{
    model::{FilterDetail, MapDetail, Region, ViewerModel},
    session::Focus,
};

use super::theme::Theme;

const KERNEL_SIDE: usize = 3;

/// Bounds of the feature map colour bar.
fn colour_range(max_value: f32) -> String {
    format!("{:.2} .. {max_value:.2}", Calibration::MIN_VALUE)
}

fn block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(title)
        .title_style(Theme::title())
}

pub fn header(model: &ViewerModel) -> Paragraph<'_> {
    let input = model
        .input_image
        .as_ref()
        .map_or_else(|| "-".to_string(), |s| (s.index + 1).to_string());

    let link = if model.linked {
        Span::styled("linked", Theme::text())
    } else {
        Span::styled("unlinked", Theme::warn())
    };

    let layer = match (model.selected_kind(), &model.layer_name) {
        (Some(kind), Some(name)) => {
            Span::styled(format!("{name} [{kind}]"), Theme::layer(kind, false))
        }
        _ => Span::styled("no layer", Theme::muted()),
    };

    let line = Line::from(vec![
        Span::styled("CNN Layer Inspector", Theme::title()),
        Span::raw("  |  "),
        layer,
        Span::raw("  |  "),
        Span::raw(format!("Input: {input} / {INPUT_COUNT}")),
        Span::raw("  |  "),
        Span::raw(format!("Range: {}", colour_range(model.max_value))),
        Span::raw("  |  "),
        link,
    ]);

    Paragraph::new(line).block(block("Overview"))
}

pub fn layer_strip(model: &ViewerModel) -> Paragraph<'_> {
    let mut spans = Vec::new();

    for (i, tab) in model.layers.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" → ", Theme::muted()));
        }
        let selected = model.selected == Some(tab.id);
        spans.push(Span::styled(
            format!(" {} ", tab.name),
            Theme::layer(tab.kind, selected),
        ));
    }

    Paragraph::new(Line::from(spans)).block(block("Layers"))
}

/// Items of a region with the cursor highlighted when the region has focus.
pub fn region_list<'a>(
    model: &'a ViewerModel,
    region: Region,
    focus: Option<Focus>,
) -> (List<'a>, ListState) {
    let items = model
        .items(region)
        .iter()
        .enumerate()
        .map(|(i, s)| ListItem::new(format!("{i:>2}  {}", s.key)))
        .collect::<Vec<_>>();

    let title = match model.count(region) {
        Some(n) => format!("{} ({n})", region.title()),
        None => region.title().to_string(),
    };

    let focused = focus.filter(|f| f.region == region);
    let border = if focused.is_some() {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title)
                .title_style(Theme::title()),
        )
        .style(Theme::text())
        .highlight_style(Theme::highlight_bg())
        .highlight_symbol("▶ ");

    let state = ListState::default().with_selected(focused.map(|f| f.cursor));
    (list, state)
}

/// Body of a layer without browsable regions.
pub fn layer_summary(model: &ViewerModel) -> Paragraph<'_> {
    let title = model.layer_name.as_deref().unwrap_or("No layer selected");

    let lines = match &model.panels {
        None => vec![Line::from(Span::styled(
            "use ← → to pick a layer, 1-6 to pick an input image",
            Theme::dim(),
        ))],
        Some(PanelSet::Input { image }) => vec![
            Line::from(format!("input image {}", image.index + 1)),
            Line::from(Span::styled(image.key.as_str(), Theme::dim())),
        ],
        Some(PanelSet::FullyConnected { output_for, .. }) => vec![Line::from(format!(
            "scalar outputs for input image {}",
            output_for.index() + 1
        ))],
        Some(PanelSet::Output { result_for }) => vec![Line::from(format!(
            "classification result for input image {}",
            result_for.index() + 1
        ))],
        Some(PanelSet::Conv {
            input: ConvInput::RawImage(image),
            ..
        }) => vec![Line::from(format!("reads raw image {}", image.key))],
        Some(_) => Vec::new(),
    };

    Paragraph::new(lines)
        .block(block(title))
        .wrap(Wrap { trim: true })
}

pub fn filter_panel(filter: Option<&FilterDetail>) -> Paragraph<'_> {
    let Some(filter) = filter else {
        return Paragraph::new(Span::styled("no filter open", Theme::muted()))
            .block(block("Filter"));
    };

    let max = filter
        .weights
        .iter()
        .fold(0.0_f32, |acc, w| acc.max(w.abs()));

    let mut lines = vec![
        Line::from(Span::styled(filter.name.as_str(), Theme::title())),
        Line::from(Span::styled(filter.image.key.as_str(), Theme::dim())),
        Line::from(""),
    ];

    for row in filter.weights.chunks(KERNEL_SIDE) {
        let cells = row
            .iter()
            .flat_map(|w| {
                [
                    Span::styled(format!(" {w:+.3} "), Theme::weight(*w, max)),
                    Span::raw(" "),
                ]
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(cells));
    }

    lines.push(Line::from(Span::styled("[x] close", Theme::muted())));

    Paragraph::new(lines).block(block("Filter"))
}

pub fn map_panel<'a>(
    title: &'a str,
    map: Option<&'a MapDetail>,
    close_key: char,
    max_value: f32,
) -> Paragraph<'a> {
    let Some(map) = map else {
        return Paragraph::new(Span::styled("no feature map open", Theme::muted()))
            .block(block(title));
    };

    let mut lines = vec![
        Line::from(Span::styled(map.name.as_str(), Theme::title())),
        Line::from(Span::styled(map.image.key.as_str(), Theme::dim())),
    ];

    if let Some(dim) = &map.dimension {
        lines.push(Line::from(format!("size {dim}")));
    }

    lines.push(Line::from(vec![
        Span::raw(format!("{:.2} ", Calibration::MIN_VALUE)),
        Span::styled("▁▂▃▄▅▆▇█", Style::default().fg(Theme::NORMAL)),
        Span::raw(format!(" {max_value:.2}")),
    ]));

    let close = if map.closable {
        format!("[{close_key}] close")
    } else {
        "closes with its filter".to_string()
    };
    lines.push(Line::from(Span::styled(close, Theme::muted())));

    Paragraph::new(lines)
        .block(block(title))
        .wrap(Wrap { trim: true })
}

pub fn logs(model: &ViewerModel) -> Paragraph<'_> {
    let tail = model.logs.iter().rev().take(6).rev();

    let lines = tail
        .map(|l| {
            let style = match l.level {
                "WARN" => Theme::warn(),
                _ => Theme::info(),
            };
            Line::from(vec![
                Span::styled(format!("[{}] ", l.level), style),
                Span::raw(l.message.as_str()),
            ])
        })
        .collect::<Vec<_>>();

    Paragraph::new(lines)
        .block(block("Events"))
        .wrap(Wrap { trim: true })
}

pub fn hint() -> Paragraph<'static> {
    let keys = [
        ("← →", "layer"),
        ("1-6", "input"),
        ("tab", "region"),
        ("↑ ↓", "item"),
        ("enter", "open"),
        ("l", "link"),
        ("x c z", "close"),
        ("q", "quit"),
    ];

    let spans = keys
        .iter()
        .flat_map(|(key, what)| {
            [
                Span::styled(*key, Theme::dim()),
                Span::styled(format!(" {what}   "), Theme::muted()),
            ]
        })
        .collect::<Vec<_>>();

    Paragraph::new(Line::from(spans))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_range_starts_at_calibration_minimum() {
        assert_eq!(colour_range(1.14), "0.00 .. 1.14");
        assert_eq!(colour_range(0.891), "0.00 .. 0.89");
    }
}
