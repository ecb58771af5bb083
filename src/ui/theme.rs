use inspector::LayerKind;
use ratatui::style::{Color, Modifier, Style};

/// Dark theme with the layer colours of the 3D scene.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Rgb(0, 0, 0);
    pub const FG: Color = Color::Rgb(220, 220, 220);
    pub const FG_DIM: Color = Color::Rgb(140, 140, 140);
    pub const FG_MUTED: Color = Color::Rgb(80, 80, 80);

    // Layer kinds
    pub const CONV: Color = Color::Rgb(226, 127, 42);
    pub const POOL: Color = Color::Rgb(226, 56, 42);
    pub const FC: Color = Color::Rgb(65, 101, 195);
    pub const NORMAL: Color = Color::Rgb(0, 211, 224);

    pub const ACCENT_YELLOW: Color = Color::Rgb(255, 255, 0);

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    /// Border of the focused region.
    pub fn border_focused() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    pub fn highlight_bg() -> Style {
        Style::default()
            .bg(Color::Rgb(40, 40, 40))
            .add_modifier(Modifier::BOLD)
    }

    pub fn warn() -> Style {
        Style::default()
            .fg(Self::ACCENT_YELLOW)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn kind_color(kind: LayerKind) -> Color {
        match kind {
            LayerKind::Conv => Self::CONV,
            LayerKind::Pool => Self::POOL,
            LayerKind::FullyConnected => Self::FC,
            LayerKind::Input | LayerKind::Output => Self::NORMAL,
        }
    }

    /// Layer tab style, inverted when selected.
    pub fn layer(kind: LayerKind, selected: bool) -> Style {
        let color = Self::kind_color(kind);
        if selected {
            Style::default()
                .fg(Self::BG)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    }

    /// Colour of a kernel weight, red for negative and blue for positive.
    pub fn weight(value: f32, max: f32) -> Style {
        let t = if max > 0.0 {
            (value.abs() / max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let level = (80.0 + t * 175.0) as u8;

        let color = if value < 0.0 {
            Color::Rgb(level, 40, 40)
        } else {
            Color::Rgb(40, 40, level)
        };
        Style::default().fg(Self::FG).bg(color)
    }
}
