pub mod app;
pub mod calendar_view;
pub mod clock_view;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::text::Line;
use ratatui::{Frame, Terminal};
use std::io::{Stdout, stdout};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(out)).context("failed to create terminal")
}

pub fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Restores the terminal before the default panic output is printed.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));
}

/// Theme color from a config string (`#rrggbb` or a color name).
pub fn accent_color(color: &str) -> Color {
    color.trim().parse::<Color>().unwrap_or(Color::Magenta)
}

pub(crate) fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Draws a one-line notice when the frame is smaller than `width` x
/// `height`. Returns whether the panel fits.
pub(crate) fn fits_or_notice(f: &mut Frame, width: u16, height: u16) -> bool {
    let area = f.area();
    if area.width >= width && area.height >= height {
        return true;
    }
    let notice = format!(
        "terminal too small: need {}x{}, have {}x{}",
        width, height, area.width, area.height
    );
    f.render_widget(Line::from(notice), area);
    false
}

/// Centers a `width` x `height` box inside `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_color_parses_hex_and_names() {
        assert_eq!(accent_color("#f06292"), Color::Rgb(0xf0, 0x62, 0x92));
        assert_eq!(accent_color("blue"), Color::Blue);
        assert_eq!(accent_color("not-a-color"), Color::Magenta);
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(contains(r, 2, 3));
        assert!(contains(r, 5, 4));
        assert!(!contains(r, 6, 4));
        assert!(!contains(r, 5, 5));
    }

    #[test]
    fn test_fits_or_notice_reports_small_frame() {
        use ratatui::backend::TestBackend;
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        let mut fits = true;
        terminal.draw(|f| fits = fits_or_notice(f, 25, 14)).unwrap();
        assert!(!fits);
        let first_row: String = (0..20u16)
            .map(|x| terminal.backend().buffer()[(x, 0u16)].symbol().to_string())
            .collect();
        assert_eq!(first_row, "terminal too small: ");

        terminal.draw(|f| fits = fits_or_notice(f, 20, 3)).unwrap();
        assert!(fits);
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered(area, 30, 10), Rect::new(25, 7, 30, 10));
        assert_eq!(centered(Rect::new(0, 0, 10, 5), 30, 10), Rect::new(0, 0, 10, 5));
    }
}
