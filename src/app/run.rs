use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use inspector::{Calibration, LayerCatalog, StaticAssets};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{
    state::session::{Action, ViewerSession},
    ui::draw,
};

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the viewer until the user quits.
///
/// # Arguments
/// * `catalog` - The network topology to inspect.
/// * `assets` - Sprites and weights of the catalog's layers.
/// * `calibration` - The colour-bar maximum per input image.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails.
pub fn run(catalog: &LayerCatalog, assets: &StaticAssets, calibration: Calibration) -> Result<()> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut session = ViewerSession::new(catalog, assets, calibration);

    loop {
        terminal.draw(|f| draw::draw(f, session.model(), session.focus()))?;

        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match session.handle_key(k.code) {
                    Action::Quit => break,
                    Action::None => {}
                }
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}
