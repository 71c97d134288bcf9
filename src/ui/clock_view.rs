use crate::ui::calendar_view::calendar_day_style;
use crate::ui::{accent_color, centered, contains, fits_or_notice};
use kurbo::Point;
use pickdial::calc::clock_geometry::DIAL_DIAMETER;
use pickdial::data::{Layout as PanelLayout, Meridiem, TimeFormat};
use pickdial::panel::{ClockHit, ClockPanel, DialKind};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Clear};

/// Terminal cells are roughly twice as tall as wide, so the dial is drawn
/// on a 29 x 15 cell surface.
const DIAL_COLUMNS: u16 = 29;
const DIAL_ROWS: u16 = 15;
const SIDE_WIDTH: u16 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockLayout {
    pub panel: Rect,
    pub hour_field: Rect,
    pub minute_field: Rect,
    pub am: Rect,
    pub pm: Rect,
    pub dial: Rect,
    pub now: Rect,
    pub close: Rect,
    pub confirm: Rect,
}

impl ClockLayout {
    /// Panel size in cells; smaller terminals get a notice instead.
    pub fn size(layout: PanelLayout) -> (u16, u16) {
        match layout {
            PanelLayout::Landscape => (SIDE_WIDTH + DIAL_COLUMNS + 4, DIAL_ROWS + 4),
            PanelLayout::Portrait => (DIAL_COLUMNS + 4, DIAL_ROWS + 6),
        }
    }

    pub fn compute(area: Rect, layout: PanelLayout) -> Self {
        let landscape = layout == PanelLayout::Landscape;
        let (width, height) = Self::size(layout);
        let panel = centered(area, width, height);
        let inner_x = panel.x + 1;
        let inner_y = panel.y + 1;
        let (header_x, header_y, meridiem_y, dial) = if landscape {
            (
                inner_x + 1,
                inner_y,
                inner_y + 2,
                Rect::new(inner_x + SIDE_WIDTH + 1, inner_y, DIAL_COLUMNS, DIAL_ROWS),
            )
        } else {
            (
                inner_x + 1,
                inner_y,
                inner_y,
                Rect::new(inner_x + 1, inner_y + 2, DIAL_COLUMNS, DIAL_ROWS),
            )
        };
        let (am_x, pm_x) = if landscape {
            (header_x, header_x + 3)
        } else {
            (header_x + 7, header_x + 10)
        };
        let buttons_y = dial.bottom() + 1;
        ClockLayout {
            panel,
            hour_field: Rect::new(header_x, header_y, 2, 1),
            minute_field: Rect::new(header_x + 3, header_y, 2, 1),
            am: Rect::new(am_x, meridiem_y, 2, 1),
            pm: Rect::new(pm_x, meridiem_y, 2, 1),
            dial,
            now: Rect::new(dial.x, buttons_y, 5, 1),
            close: Rect::new(dial.x + 6, buttons_y, 7, 1),
            confirm: Rect::new(dial.right() - 4, buttons_y, 4, 1),
        }
    }

    fn scale(&self) -> (f64, f64) {
        (
            DIAL_DIAMETER / self.dial.width.max(1) as f64,
            DIAL_DIAMETER / self.dial.height.max(1) as f64,
        )
    }

    /// Page position of the dial's top-left corner in dial units.
    pub fn dial_origin(&self) -> Point {
        let (sx, sy) = self.scale();
        Point::new(self.dial.x as f64 * sx, self.dial.y as f64 * sy)
    }

    /// Page position of the middle of a terminal cell, in dial units.
    pub fn page_point(&self, column: u16, row: u16) -> Point {
        let (sx, sy) = self.scale();
        Point::new((column as f64 + 0.5) * sx, (row as f64 + 0.5) * sy)
    }

    pub fn hit_test(&self, panel: &ClockPanel, column: u16, row: u16) -> ClockHit {
        let at = |rect: Rect| contains(rect, column, row);
        let ampm = panel
            .config()
            .is_some_and(|c| c.format == TimeFormat::AmPm);
        if !at(self.panel) {
            ClockHit::Backdrop
        } else if at(self.hour_field) {
            ClockHit::HourField
        } else if at(self.minute_field) {
            ClockHit::MinuteField
        } else if ampm && at(self.am) {
            ClockHit::Am
        } else if ampm && at(self.pm) {
            ClockHit::Pm
        } else if at(self.now) {
            ClockHit::Now
        } else if at(self.close) {
            ClockHit::Close
        } else if at(self.confirm) {
            ClockHit::Confirm
        } else if at(self.dial) {
            ClockHit::Dial(panel.active_dial().unwrap_or(DialKind::Hour))
        } else {
            ClockHit::Panel
        }
    }

    /// Cell at `offset` dial units from the dial center.
    fn cell_at(&self, dx: f64, dy: f64) -> (i32, i32) {
        let (sx, sy) = self.scale();
        let cx = self.dial.x as f64 + self.dial.width as f64 / 2.0;
        let cy = self.dial.y as f64 + self.dial.height as f64 / 2.0;
        ((cx + dx / sx).floor() as i32, (cy + dy / sy).floor() as i32)
    }
}

pub fn render_clock(f: &mut Frame, panel: &ClockPanel) -> Option<ClockLayout> {
    let config = panel.config()?;
    let (width, height) = ClockLayout::size(config.layout);
    if !fits_or_notice(f, width, height) {
        return None;
    }
    let layout = ClockLayout::compute(f.area(), config.layout);
    let accent = accent_color(&config.color);
    f.render_widget(Clear, layout.panel);
    f.render_widget(
        Block::bordered().border_style(Style::default().fg(accent)),
        layout.panel,
    );
    let buf = f.buffer_mut();
    draw_header(buf, &layout, panel, accent);
    let active = panel.active_dial().unwrap_or(DialKind::Hour);
    draw_pointer(buf, &layout, panel, active, accent);
    draw_ticks(buf, &layout, panel, active, accent);
    let button = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    buf.set_string(layout.now.x, layout.now.y, "[Now]", button);
    buf.set_string(layout.close.x, layout.close.y, "[Close]", button);
    buf.set_string(layout.confirm.x, layout.confirm.y, "[OK]", button);
    Some(layout)
}

fn field_style(active: bool, accent: Color) -> Style {
    if active {
        Style::default()
            .fg(accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

fn draw_header(buf: &mut Buffer, layout: &ClockLayout, panel: &ClockPanel, accent: Color) {
    let Some(display) = panel.display() else {
        return;
    };
    let active = panel.active_dial();
    buf.set_string(
        layout.hour_field.x,
        layout.hour_field.y,
        &display.hour,
        field_style(active == Some(DialKind::Hour), accent),
    );
    buf.set_string(layout.hour_field.x + 2, layout.hour_field.y, ":", Style::default());
    buf.set_string(
        layout.minute_field.x,
        layout.minute_field.y,
        &display.minute,
        field_style(active == Some(DialKind::Minute), accent),
    );
    if display.meridiem.is_some() {
        for (rect, meridiem) in [(layout.am, Meridiem::Am), (layout.pm, Meridiem::Pm)] {
            let state = panel.meridiem_state(meridiem);
            buf.set_string(
                rect.x,
                rect.y,
                meridiem.to_string(),
                calendar_day_style(state, false, accent),
            );
        }
    }
}

fn draw_pointer(
    buf: &mut Buffer,
    layout: &ClockLayout,
    panel: &ClockPanel,
    kind: DialKind,
    accent: Color,
) {
    let Some(pointer) = panel.pointer(kind) else {
        return;
    };
    let tip = (50.0 - pointer.shape.top_pct) / 100.0 * DIAL_DIAMETER;
    let theta = pointer.rotation.to_radians();
    let style = Style::default().fg(accent);
    let steps = 8;
    for step in 1..=steps {
        let r = tip * step as f64 / steps as f64;
        let (x, y) = layout.cell_at(r * theta.sin(), -r * theta.cos());
        if contains(layout.dial, x.max(0) as u16, y.max(0) as u16) {
            let glyph = if step == steps { "●" } else { "·" };
            buf.set_string(x as u16, y as u16, glyph, style);
        }
    }
    let (cx, cy) = layout.cell_at(0.0, 0.0);
    buf.set_string(cx as u16, cy as u16, "+", style);
}

fn draw_ticks(
    buf: &mut Buffer,
    layout: &ClockLayout,
    panel: &ClockPanel,
    kind: DialKind,
    accent: Color,
) {
    for tick in panel.ticks(kind) {
        let (x, y) = layout.cell_at(tick.offset.x, tick.offset.y);
        let x = x - tick.label.len() as i32 / 2;
        if x < 0 || y < 0 || !contains(layout.dial, x as u16, y as u16) {
            continue;
        }
        let mut style = calendar_day_style(tick.state, false, accent);
        if tick.inner && !tick.state.selected {
            style = style.add_modifier(Modifier::DIM);
        }
        buf.set_string(x as u16, y as u16, &tick.label, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pickdial::calc::clock_geometry::to_dial_space;
    use pickdial::data::{ConfigOverrides, PickerConfig};
    use pickdial::panel::{FixedClock, ShowOptions};

    fn open_panel(format: TimeFormat, value: &str) -> ClockPanel {
        let now = NaiveDate::from_ymd_opt(2024, 2, 10)
            .unwrap()
            .and_hms_opt(18, 45, 0)
            .unwrap();
        let defaults = PickerConfig {
            format,
            ..Default::default()
        };
        let mut panel =
            ClockPanel::new(&defaults, &ConfigOverrides::default()).with_clock(FixedClock(now));
        panel.show(ShowOptions::value(value));
        panel
    }

    fn screen() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_portrait_layout() {
        let layout = ClockLayout::compute(screen(), PanelLayout::Portrait);
        assert_eq!(layout.panel, Rect::new(23, 1, 33, 21));
        assert_eq!(layout.dial, Rect::new(25, 4, 29, 15));
        assert_eq!(layout.now.y, 20);
        assert_eq!(layout.confirm.right(), layout.dial.right());
    }

    #[test]
    fn test_landscape_layout_puts_fields_beside_dial() {
        let layout = ClockLayout::compute(screen(), PanelLayout::Landscape);
        assert!(layout.hour_field.right() < layout.dial.x);
        assert!(layout.am.right() < layout.dial.x);
        assert!(layout.now.bottom() <= layout.panel.bottom() - 1);
    }

    #[test]
    fn test_hit_test_fields_and_buttons() {
        let panel = open_panel(TimeFormat::H24, "9:05");
        let layout = ClockLayout::compute(screen(), PanelLayout::Portrait);
        assert_eq!(layout.hit_test(&panel, 0, 0), ClockHit::Backdrop);
        assert_eq!(layout.hit_test(&panel, 25, 2), ClockHit::HourField);
        assert_eq!(layout.hit_test(&panel, 28, 2), ClockHit::MinuteField);
        // am/pm only exist in 12-hour mode.
        assert_eq!(layout.hit_test(&panel, 32, 2), ClockHit::Panel);
        assert_eq!(layout.hit_test(&panel, 25, 20), ClockHit::Now);
        assert_eq!(layout.hit_test(&panel, 51, 20), ClockHit::Confirm);
        assert_eq!(layout.hit_test(&panel, 39, 11), ClockHit::Dial(DialKind::Hour));
    }

    #[test]
    fn test_hit_test_meridiem_in_ampm() {
        let panel = open_panel(TimeFormat::AmPm, "7:30 pm");
        let layout = ClockLayout::compute(screen(), PanelLayout::Portrait);
        assert_eq!(layout.hit_test(&panel, 32, 2), ClockHit::Am);
        assert_eq!(layout.hit_test(&panel, 35, 2), ClockHit::Pm);
    }

    #[test]
    fn test_page_points_land_inside_dial() {
        let layout = ClockLayout::compute(screen(), PanelLayout::Portrait);
        let origin = layout.dial_origin();
        for (column, row) in [(25, 4), (53, 18), (39, 11)] {
            let local = to_dial_space(layout.page_point(column, row), origin);
            assert!((0.0..DIAL_DIAMETER).contains(&local.x), "{:?}", local);
            assert!((0.0..DIAL_DIAMETER).contains(&local.y), "{:?}", local);
        }
    }

    #[test]
    fn test_cell_right_of_center_points_at_three() {
        let mut panel = open_panel(TimeFormat::H24, "9:05");
        let layout = ClockLayout::compute(screen(), PanelLayout::Portrait);
        panel.set_dial_origin(layout.dial_origin());
        panel.press_dial(DialKind::Hour, layout.page_point(layout.dial.x + 26, layout.dial.y + 7));
        assert_eq!(panel.value().as_deref(), Some("3:05"));
    }

    fn draw(panel: &ClockPanel, width: u16, height: u16) -> Option<ClockLayout> {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut layout = None;
        terminal.draw(|f| layout = render_clock(f, panel)).unwrap();
        layout
    }

    #[test]
    fn test_render_in_small_terminal_draws_notice_only() {
        let panel = open_panel(TimeFormat::AmPm, "7:30 pm");
        assert_eq!(draw(&panel, 40, 12), None);
        assert_eq!(draw(&panel, 32, 21), None);
    }

    #[test]
    fn test_render_at_exact_panel_size() {
        let panel = open_panel(TimeFormat::AmPm, "7:30 pm");
        let (width, height) = ClockLayout::size(PanelLayout::Portrait);
        let layout = draw(&panel, width, height).unwrap();
        assert_eq!(layout.panel, Rect::new(0, 0, width, height));
        assert!(layout.confirm.bottom() < height);
    }
}
