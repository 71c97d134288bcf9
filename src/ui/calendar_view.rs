use crate::ui::{accent_color, centered, contains, fits_or_notice};
use pickdial::calc::calendar_math::month_name;
use pickdial::data::{DateValue, Layout as PanelLayout};
use pickdial::input::ItemState;
use pickdial::panel::{CalendarHit, CalendarPanel, MonthGrid, YearList};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Clear};
use std::time::Duration;

const CELL_WIDTH: u16 = 3;
const GRID_WIDTH: u16 = 7 * CELL_WIDTH;
const GRID_ROWS: u16 = 6;
const YEAR_ROWS: u16 = 8;
/// Side column holding the header fields in landscape layout.
const SIDE_WIDTH: u16 = 12;
const WEEKDAYS: &str = "Su Mo Tu We Th Fr Sa";

/// Screen rectangles of one rendered calendar panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarLayout {
    pub panel: Rect,
    pub year_label: Rect,
    pub date_label: Rect,
    pub prev: Rect,
    pub next: Rect,
    pub title: Rect,
    pub weekdays: Rect,
    pub grid: Rect,
    pub years: Rect,
    pub today: Rect,
    pub close: Rect,
    pub confirm: Rect,
    landscape: bool,
}

impl CalendarLayout {
    /// Panel size in cells; smaller terminals get a notice instead.
    pub fn size(layout: PanelLayout) -> (u16, u16) {
        match layout {
            PanelLayout::Landscape => (SIDE_WIDTH + GRID_WIDTH + 4, GRID_ROWS + 6),
            PanelLayout::Portrait => (GRID_WIDTH + 4, GRID_ROWS + 8),
        }
    }

    pub fn compute(area: Rect, layout: PanelLayout) -> Self {
        let landscape = layout == PanelLayout::Landscape;
        let (width, height) = Self::size(layout);
        let panel = centered(area, width, height);
        let inner_x = panel.x + 1;
        let inner_y = panel.y + 1;
        let (body_x, body_y) = if landscape {
            (inner_x + SIDE_WIDTH + 1, inner_y)
        } else {
            (inner_x + 1, inner_y + 2)
        };
        let (year_label, date_label) = if landscape {
            (
                Rect::new(inner_x + 1, inner_y, SIDE_WIDTH - 1, 1),
                Rect::new(inner_x + 1, inner_y + 1, SIDE_WIDTH - 1, 3),
            )
        } else {
            (
                Rect::new(body_x, inner_y, 5, 1),
                Rect::new(body_x + 6, inner_y, GRID_WIDTH - 6, 1),
            )
        };
        let buttons_y = body_y + GRID_ROWS + 3;
        CalendarLayout {
            panel,
            year_label,
            date_label,
            prev: Rect::new(body_x, body_y, 1, 1),
            next: Rect::new(body_x + GRID_WIDTH - 1, body_y, 1, 1),
            title: Rect::new(body_x + 2, body_y, GRID_WIDTH - 4, 1),
            weekdays: Rect::new(body_x, body_y + 1, GRID_WIDTH, 1),
            grid: Rect::new(body_x, body_y + 2, GRID_WIDTH, GRID_ROWS),
            years: Rect::new(body_x, body_y, GRID_WIDTH, YEAR_ROWS),
            today: Rect::new(body_x, buttons_y, 7, 1),
            close: Rect::new(body_x + 8, buttons_y, 7, 1),
            confirm: Rect::new(body_x + GRID_WIDTH - 4, buttons_y, 4, 1),
            landscape,
        }
    }

    /// Resolves a terminal cell to what the panel shows there.
    pub fn hit_test(&self, panel: &CalendarPanel, column: u16, row: u16) -> CalendarHit {
        let at = |rect: Rect| contains(rect, column, row);
        if !at(self.panel) {
            return CalendarHit::Backdrop;
        }
        if at(self.year_label) {
            return CalendarHit::YearLabel;
        }
        if at(self.date_label) {
            return CalendarHit::DateLabel;
        }
        if at(self.today) {
            return CalendarHit::Today;
        }
        if at(self.close) {
            return CalendarHit::Close;
        }
        if at(self.confirm) {
            return CalendarHit::Confirm;
        }
        if let Some(list) = panel.year_list().filter(|l| l.is_open()) {
            if !at(self.years) {
                return CalendarHit::Panel;
            }
            let index = first_visible_year(list) + (row - self.years.y) as usize;
            return list
                .entries()
                .nth(index)
                .map(|(year, _)| CalendarHit::YearEntry(year))
                .unwrap_or(CalendarHit::Panel);
        }
        if at(self.prev) {
            return CalendarHit::PrevMonth;
        }
        if at(self.next) {
            return CalendarHit::NextMonth;
        }
        if at(self.grid) {
            let col = ((column - self.grid.x) / CELL_WIDTH) as usize;
            let line = (row - self.grid.y) as usize;
            return panel
                .grids()
                .last()
                .and_then(|g| {
                    let day = g.rows.get(line)?.get(col)?.day?;
                    g.date(day)
                })
                .map(CalendarHit::Day)
                .unwrap_or(CalendarHit::BlankCell);
        }
        CalendarHit::Panel
    }
}

fn first_visible_year(list: &YearList) -> usize {
    let offset = list.scroll_offset(YEAR_ROWS as f64, 1.0).floor() as usize;
    let total = list.entries().count();
    offset.min(total.saturating_sub(YEAR_ROWS as usize))
}

/// Draws the open calendar panel. `slide_elapsed` is the time since the
/// current slide started, if one is running.
pub fn render_calendar(
    f: &mut Frame,
    panel: &CalendarPanel,
    slide_elapsed: Option<Duration>,
) -> Option<CalendarLayout> {
    let config = panel.config()?;
    let (width, height) = CalendarLayout::size(config.layout);
    if !fits_or_notice(f, width, height) {
        return None;
    }
    let layout = CalendarLayout::compute(f.area(), config.layout);
    let accent = accent_color(&config.color);
    f.render_widget(Clear, layout.panel);
    f.render_widget(
        Block::bordered().border_style(Style::default().fg(accent)),
        layout.panel,
    );
    let buf = f.buffer_mut();
    draw_header(buf, &layout, panel, accent);
    match panel.year_list().filter(|l| l.is_open()) {
        Some(list) => draw_years(buf, layout.years, list, accent),
        None => {
            draw_nav(buf, &layout, panel);
            draw_grids(buf, layout.grid, panel, slide_elapsed, accent);
        }
    }
    let button = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    buf.set_string(layout.today.x, layout.today.y, "[Today]", button);
    buf.set_string(layout.close.x, layout.close.y, "[Close]", button);
    buf.set_string(layout.confirm.x, layout.confirm.y, "[OK]", button);
    Some(layout)
}

fn draw_header(buf: &mut Buffer, layout: &CalendarLayout, panel: &CalendarPanel, accent: Color) {
    let Some(display) = panel.display() else {
        return;
    };
    let mut year_style = Style::default().fg(accent);
    if panel.year_list().is_some_and(|l| l.is_open()) {
        year_style = year_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    let date_style = Style::default().add_modifier(Modifier::BOLD);
    let (yl, dl) = (layout.year_label, layout.date_label);
    buf.set_string(yl.x, yl.y, &display.year, year_style);
    if layout.landscape {
        buf.set_string(dl.x, dl.y, &display.month, date_style);
        buf.set_string(dl.x, dl.y + 1, &display.day, date_style);
        buf.set_string(dl.x, dl.y + 2, &display.weekday, Style::default());
    } else {
        let text = format!("{} {} {}", display.month, display.day, display.weekday);
        buf.set_string(dl.x, dl.y, text, date_style);
    }
}

fn draw_nav(buf: &mut Buffer, layout: &CalendarLayout, panel: &CalendarPanel) {
    let Some(cursor) = panel.cursor() else {
        return;
    };
    let title = format!("{} {}", month_name(cursor.month), cursor.year);
    let width = layout.title.width as usize;
    buf.set_string(layout.prev.x, layout.prev.y, "‹", Style::default());
    buf.set_string(
        layout.title.x,
        layout.title.y,
        format!("{:^width$}", title, width = width),
        Style::default().add_modifier(Modifier::BOLD),
    );
    buf.set_string(layout.next.x, layout.next.y, "›", Style::default());
    buf.set_string(
        layout.weekdays.x,
        layout.weekdays.y,
        WEEKDAYS,
        Style::default().add_modifier(Modifier::DIM),
    );
}

fn draw_grids(
    buf: &mut Buffer,
    area: Rect,
    panel: &CalendarPanel,
    slide_elapsed: Option<Duration>,
    accent: Color,
) {
    let hovered = panel.hovered();
    let Some(incoming) = panel.grids().last() else {
        return;
    };
    match (panel.slide_animation(), slide_elapsed) {
        (Some(animation), Some(elapsed)) => {
            let (outgoing_pct, incoming_pct) = animation.offsets_at(elapsed);
            if let Some(outgoing) = panel.outgoing_grid() {
                draw_grid(buf, area, outgoing, shift_columns(outgoing_pct), hovered, accent);
            }
            draw_grid(buf, area, incoming, shift_columns(incoming_pct), hovered, accent);
        }
        _ => draw_grid(buf, area, incoming, 0, hovered, accent),
    }
}

fn shift_columns(percent: f64) -> i32 {
    (percent / 100.0 * GRID_WIDTH as f64).round() as i32
}

fn draw_grid(
    buf: &mut Buffer,
    area: Rect,
    grid: &MonthGrid,
    shift: i32,
    hovered: Option<DateValue>,
    accent: Color,
) {
    let left = area.x as i32;
    let right = area.right() as i32;
    for (r, row) in grid.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let Some(day) = cell.day else {
                continue;
            };
            let x = left + c as i32 * CELL_WIDTH as i32 + shift;
            if x < left || x + 2 > right {
                continue;
            }
            let is_hovered =
                hovered.is_some_and(|d| d.same_month(grid.year, grid.month) && d.day() == day);
            buf.set_string(
                x as u16,
                area.y + r as u16,
                format!("{:2}", day),
                calendar_day_style(cell.state, is_hovered, accent),
            );
        }
    }
}

fn draw_years(buf: &mut Buffer, area: Rect, list: &YearList, accent: Color) {
    let width = area.width as usize;
    for (i, (year, state)) in list
        .entries()
        .skip(first_visible_year(list))
        .take(YEAR_ROWS as usize)
        .enumerate()
    {
        buf.set_string(
            area.x,
            area.y + i as u16,
            format!("{:^width$}", year, width = width),
            calendar_day_style(state, false, accent),
        );
    }
}

/// Style of a day cell or year entry.
pub(crate) fn calendar_day_style(state: ItemState, is_hovered: bool, accent: Color) -> Style {
    if state.selected {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    } else if state.today {
        let mut s = Style::default()
            .fg(accent)
            .add_modifier(Modifier::REVERSED | Modifier::BOLD);
        if is_hovered {
            s = s.add_modifier(Modifier::UNDERLINED);
        }
        s
    } else if is_hovered {
        Style::default().add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pickdial::data::{ConfigOverrides, PickerConfig};
    use pickdial::panel::{FixedClock, ShowOptions};

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::new(y, m, day).unwrap()
    }

    fn open_panel(value: &str) -> CalendarPanel {
        let now = NaiveDate::from_ymd_opt(2024, 2, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut panel = CalendarPanel::new(&PickerConfig::default(), &ConfigOverrides::default())
            .with_clock(FixedClock(now));
        panel.show(ShowOptions::value(value));
        panel
    }

    fn screen() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    // ── calendar_day_style tests ──────────────────────────────────────────────

    #[test]
    fn test_style_selected() {
        let state = ItemState {
            selected: true,
            today: true,
        };
        let s = calendar_day_style(state, true, Color::Cyan);
        assert_eq!(s, Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD));
    }

    #[test]
    fn test_style_today() {
        let state = ItemState {
            selected: false,
            today: true,
        };
        let s = calendar_day_style(state, false, Color::Cyan);
        assert_eq!(
            s,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        );
    }

    #[test]
    fn test_style_hovered_plain() {
        let s = calendar_day_style(ItemState::default(), true, Color::Cyan);
        assert_eq!(s, Style::default().add_modifier(Modifier::UNDERLINED));
    }

    #[test]
    fn test_style_plain() {
        assert_eq!(calendar_day_style(ItemState::default(), false, Color::Cyan), Style::default());
    }

    // ── layout and hit testing ────────────────────────────────────────────────

    #[test]
    fn test_portrait_layout_is_centered() {
        let layout = CalendarLayout::compute(screen(), PanelLayout::Portrait);
        assert_eq!(layout.panel, Rect::new(27, 5, 25, 14));
        assert_eq!(layout.grid, Rect::new(29, 10, 21, 6));
        assert_eq!(layout.confirm.right(), layout.grid.right());
    }

    #[test]
    fn test_landscape_layout_is_wider() {
        let portrait = CalendarLayout::compute(screen(), PanelLayout::Portrait);
        let landscape = CalendarLayout::compute(screen(), PanelLayout::Landscape);
        assert!(landscape.panel.width > portrait.panel.width);
        assert!(landscape.grid.x > landscape.date_label.right());
    }

    #[test]
    fn test_hit_test_days_and_blanks() {
        let panel = open_panel("2024-2-29");
        let layout = CalendarLayout::compute(screen(), PanelLayout::Portrait);
        // 2024-02-01 is a Thursday: fifth column of the first row.
        assert_eq!(layout.hit_test(&panel, 41, 10), CalendarHit::Day(d(2024, 2, 1)));
        assert_eq!(layout.hit_test(&panel, 43, 10), CalendarHit::Day(d(2024, 2, 1)));
        assert_eq!(layout.hit_test(&panel, 29, 10), CalendarHit::BlankCell);
        assert_eq!(layout.hit_test(&panel, 29, 15), CalendarHit::BlankCell);
    }

    #[test]
    fn test_hit_test_chrome() {
        let panel = open_panel("2024-2-29");
        let layout = CalendarLayout::compute(screen(), PanelLayout::Portrait);
        assert_eq!(layout.hit_test(&panel, 0, 0), CalendarHit::Backdrop);
        assert_eq!(layout.hit_test(&panel, 29, 8), CalendarHit::PrevMonth);
        assert_eq!(layout.hit_test(&panel, 49, 8), CalendarHit::NextMonth);
        assert_eq!(layout.hit_test(&panel, 30, 6), CalendarHit::YearLabel);
        assert_eq!(layout.hit_test(&panel, 36, 6), CalendarHit::DateLabel);
        assert_eq!(layout.hit_test(&panel, 29, 17), CalendarHit::Today);
        assert_eq!(layout.hit_test(&panel, 38, 17), CalendarHit::Close);
        assert_eq!(layout.hit_test(&panel, 47, 17), CalendarHit::Confirm);
        assert_eq!(layout.hit_test(&panel, 28, 12), CalendarHit::Panel);
    }

    #[test]
    fn test_hit_test_year_entries() {
        let mut panel = open_panel("2024-2-29");
        panel.open_year_list();
        let layout = CalendarLayout::compute(screen(), PanelLayout::Portrait);
        let list = panel.year_list().unwrap();
        // 2024 sits at index 50; the viewport starts four rows above it.
        assert_eq!(first_visible_year(list), 46);
        assert_eq!(layout.hit_test(&panel, 35, 8), CalendarHit::YearEntry(2020));
        assert_eq!(layout.hit_test(&panel, 35, 12), CalendarHit::YearEntry(2024));
        assert_eq!(layout.hit_test(&panel, 29, 17), CalendarHit::Today);
    }

    #[test]
    fn test_shift_columns_rounds_to_cells() {
        assert_eq!(shift_columns(100.0), 21);
        assert_eq!(shift_columns(-50.0), -11);
        assert_eq!(shift_columns(0.0), 0);
    }

    fn draw(panel: &CalendarPanel, width: u16, height: u16) -> Option<CalendarLayout> {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut layout = None;
        terminal
            .draw(|f| layout = render_calendar(f, panel, Some(Duration::from_millis(100))))
            .unwrap();
        layout
    }

    #[test]
    fn test_render_in_small_terminal_draws_notice_only() {
        let panel = open_panel("2024-2-29");
        assert_eq!(draw(&panel, 30, 10), None);
        assert_eq!(draw(&panel, 24, 14), None);
        assert_eq!(draw(&panel, 25, 13), None);
    }

    #[test]
    fn test_render_at_exact_panel_size_during_slide() {
        let mut panel = open_panel("2024-2-29");
        let (width, height) = CalendarLayout::size(PanelLayout::Portrait);
        let ticket = panel.page(pickdial::panel::SlideDirection::Forward).unwrap();
        let layout = draw(&panel, width, height).unwrap();
        assert_eq!(layout.panel, Rect::new(0, 0, width, height));
        panel.complete_transition(ticket);
        assert!(draw(&panel, width, height).is_some());
    }
}
