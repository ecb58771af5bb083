use crossterm::event::KeyCode;
use inspector::{
    AssetProvider, Calibration, InspectErr, Inspector, Intent, LayerCatalog, Panel, Side,
};
use log::{debug, warn};

use super::model::{Region, ViewerModel};

pub enum Action {
    None,
    Quit,
}

/// Keyboard focus within the selected layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub region: Region,
    pub cursor: usize,
}

/// Turns key presses into intents and feeds the resulting directives to the
/// widget model.
pub struct ViewerSession<'a> {
    inspector: Inspector<'a, dyn AssetProvider + 'a>,
    model: ViewerModel,
    focus: Option<Focus>,
}

impl<'a> ViewerSession<'a> {
    /// Creates a new `ViewerSession` showing the first input image.
    ///
    /// # Args
    /// * `catalog` - The network topology.
    /// * `assets` - Sprites and weights of the catalog's layers.
    /// * `calibration` - The colour-bar maximum per input image.
    pub fn new(
        catalog: &'a LayerCatalog,
        assets: &'a (dyn AssetProvider + 'a),
        calibration: Calibration,
    ) -> Self {
        let mut session = Self {
            inspector: Inspector::new(catalog, assets, calibration),
            model: ViewerModel::new(catalog),
            focus: None,
        };

        session.submit(Intent::SelectInput(0));
        session
    }

    pub fn model(&self) -> &ViewerModel {
        &self.model
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            other => {
                if let Some(intent) = self.intent_for(other) {
                    self.submit(intent);
                }
            }
        }

        Action::None
    }

    fn intent_for(&mut self, key: KeyCode) -> Option<Intent> {
        let last = self.model.layers.len().checked_sub(1)?;

        match key {
            KeyCode::Right => match self.model.selected {
                Some(id) if id >= last => None,
                Some(id) => Some(Intent::SelectLayer(id + 1)),
                None => Some(Intent::SelectLayer(0)),
            },
            KeyCode::Left => match self.model.selected {
                Some(id) => id.checked_sub(1).map(Intent::SelectLayer),
                None => Some(Intent::SelectLayer(last)),
            },
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|d| Intent::SelectInput(d as usize - 1)),
            KeyCode::Enter => {
                let focus = self.focus?;
                Some(match focus.region {
                    Region::InputMaps => Intent::OpenFeatureMap(focus.cursor, Side::In),
                    Region::Filters => Intent::OpenFilter(focus.cursor),
                    Region::OutputMaps => Intent::OpenFeatureMap(focus.cursor, Side::Out),
                })
            }
            KeyCode::Char('l') => Some(Intent::SetLinked(!self.model.linked)),
            KeyCode::Char('x') => Some(Intent::HidePanel(Panel::FilterDetails)),
            KeyCode::Char('c') => {
                if self.model.map_out.as_ref().is_some_and(|m| !m.closable) {
                    self.model.push_log(
                        "INFO",
                        "this feature map closes with its filter (x)".into(),
                    );
                    return None;
                }
                Some(Intent::HidePanel(Panel::FeatureMapDetails(Side::Out)))
            }
            KeyCode::Char('z') => Some(Intent::HidePanel(Panel::FeatureMapDetails(Side::In))),
            _ => None,
        }
    }

    fn submit(&mut self, intent: Intent) {
        match self.inspector.try_dispatch(intent) {
            Ok(directives) => {
                debug!("{intent:?} produced {} directives", directives.len());
                for directive in directives {
                    self.model.apply(directive);
                }
                self.refocus(matches!(intent, Intent::SelectLayer(_)));
            }
            Err(e) => self.reject(intent, &e),
        }
    }

    fn reject(&mut self, intent: Intent, e: &InspectErr) {
        warn!("rejected {intent:?}: {e}");
        self.model.push_log("WARN", e.to_string());
    }

    /// Keeps the focus on a region that still exists, with the cursor in range.
    fn refocus(&mut self, reset: bool) {
        let regions = self.model.regions();

        self.focus = match self.focus {
            Some(f) if !reset && regions.contains(&f.region) => {
                let len = self.model.items(f.region).len();
                Some(Focus {
                    region: f.region,
                    cursor: f.cursor.min(len.saturating_sub(1)),
                })
            }
            _ => regions.first().map(|&region| Focus { region, cursor: 0 }),
        };
    }

    fn cycle_focus(&mut self) {
        let regions = self.model.regions();
        let next = match self.focus {
            Some(f) => regions
                .iter()
                .position(|r| *r == f.region)
                .map_or(0, |i| (i + 1) % regions.len()),
            None => 0,
        };

        self.focus = regions.get(next).map(|&region| Focus { region, cursor: 0 });
    }

    fn move_cursor(&mut self, down: bool) {
        let Some(focus) = self.focus.as_mut() else {
            return;
        };
        let len = self.model.items(focus.region).len();

        focus.cursor = if down {
            (focus.cursor + 1).min(len.saturating_sub(1))
        } else {
            focus.cursor.saturating_sub(1)
        };
    }
}
