use crate::ui::Term;
use crate::ui::calendar_view::{CalendarLayout, render_calendar};
use crate::ui::clock_view::{ClockLayout, render_clock};
use anyhow::Result;
use chrono::{Duration as DateDelta, NaiveDate};
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use pickdial::data::{DateValue, Meridiem};
use pickdial::input::{PointerEvent, PointerPhase};
use pickdial::panel::transition::SLIDE_DURATION;
use pickdial::panel::{
    CalendarHit, CalendarPanel, ClockPanel, DialKind, PanelResponse, SlideDirection,
    TransitionTicket,
};
use ratatui::Frame;
use std::time::{Duration, Instant};
use tracing::debug;

/// Approximate pixel size of a terminal cell, so swipe thresholds keep
/// their meaning on the calendar grid.
const CELL_PIXELS: (f64, f64) = (8.0, 16.0);

pub enum Picker {
    Calendar(CalendarPanel),
    Clock(ClockPanel),
}

enum ViewLayout {
    Calendar(CalendarLayout),
    Clock(ClockLayout),
}

struct ActiveSlide {
    ticket: TransitionTicket,
    started: Instant,
}

pub struct App {
    picker: Picker,
    slide: Option<ActiveSlide>,
    layout: Option<ViewLayout>,
}

impl App {
    pub fn new(picker: Picker) -> Self {
        App {
            picker,
            slide: None,
            layout: None,
        }
    }

    pub fn is_open(&self) -> bool {
        match &self.picker {
            Picker::Calendar(panel) => panel.is_open(),
            Picker::Clock(panel) => panel.is_open(),
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        self.layout = match &mut self.picker {
            Picker::Calendar(panel) => {
                let elapsed = self.slide.as_ref().map(|s| s.started.elapsed());
                render_calendar(f, panel, elapsed).map(ViewLayout::Calendar)
            }
            Picker::Clock(panel) => {
                let layout = render_clock(f, panel);
                if let Some(layout) = &layout {
                    panel.set_dial_origin(layout.dial_origin());
                }
                layout.map(ViewLayout::Clock)
            }
        };
    }

    /// Completes the running slide once its duration has passed.
    pub fn tick(&mut self, now: Instant) {
        let finished = self
            .slide
            .as_ref()
            .is_some_and(|s| now.duration_since(s.started) >= SLIDE_DURATION);
        if !finished {
            return;
        }
        if let (Some(slide), Picker::Calendar(panel)) = (self.slide.take(), &mut self.picker) {
            panel.complete_transition(slide.ticket);
        }
    }

    fn adopt(&mut self, response: PanelResponse) {
        if let Some(ticket) = response.transition {
            self.slide = Some(ActiveSlide {
                ticket,
                started: Instant::now(),
            });
        }
    }

    /// Returns true when the picker should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            match &mut self.picker {
                Picker::Calendar(panel) => panel.close(),
                Picker::Clock(panel) => panel.close(),
            }
            return true;
        }
        let response = match &mut self.picker {
            Picker::Calendar(panel) => calendar_key(panel, code),
            Picker::Clock(panel) => {
                clock_key(panel, code);
                PanelResponse::default()
            }
        };
        self.adopt(response);
        !self.is_open()
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let phase = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerPhase::Press,
            MouseEventKind::Drag(MouseButton::Left) => PointerPhase::Move,
            MouseEventKind::Up(MouseButton::Left) => PointerPhase::Release,
            MouseEventKind::Moved => {
                self.hover(mouse.column, mouse.row);
                return;
            }
            _ => return,
        };
        let response = match (&mut self.picker, &self.layout) {
            (Picker::Calendar(panel), Some(ViewLayout::Calendar(layout))) => {
                let hit = layout.hit_test(panel, mouse.column, mouse.row);
                let mut event = PointerEvent::mouse(
                    phase,
                    mouse.column as f64 * CELL_PIXELS.0,
                    mouse.row as f64 * CELL_PIXELS.1,
                );
                panel.handle_pointer(hit, &mut event)
            }
            (Picker::Clock(panel), Some(ViewLayout::Clock(layout))) => {
                let hit = layout.hit_test(panel, mouse.column, mouse.row);
                let page = layout.page_point(mouse.column, mouse.row);
                let mut event = PointerEvent::mouse(phase, page.x, page.y);
                panel.handle_pointer(hit, &mut event)
            }
            _ => {
                debug!("mouse event with no panel on screen");
                PanelResponse::default()
            }
        };
        self.adopt(response);
    }

    fn hover(&mut self, column: u16, row: u16) {
        if let (Picker::Calendar(panel), Some(ViewLayout::Calendar(layout))) =
            (&mut self.picker, &self.layout)
        {
            match layout.hit_test(panel, column, row) {
                CalendarHit::Day(date) => panel.hover(Some(date)),
                _ => panel.hover(None),
            }
        }
    }
}

fn calendar_key(panel: &mut CalendarPanel, code: KeyCode) -> PanelResponse {
    let mut response = PanelResponse::default();
    let years_open = panel.year_list().is_some_and(|l| l.is_open());
    match code {
        KeyCode::Esc | KeyCode::Char('q') => {
            panel.close();
            response.closed = true;
        }
        KeyCode::Enter => {
            panel.confirm();
            response.closed = true;
        }
        KeyCode::Up | KeyCode::Char('k') if years_open => step_year(panel, -1),
        KeyCode::Down | KeyCode::Char('j') if years_open => step_year(panel, 1),
        KeyCode::Char('y') if years_open => panel.close_year_list(),
        KeyCode::Char('y') => panel.open_year_list(),
        KeyCode::Left | KeyCode::Char('h') => move_day(panel, -1),
        KeyCode::Right | KeyCode::Char('l') => move_day(panel, 1),
        KeyCode::Up | KeyCode::Char('k') => move_day(panel, -7),
        KeyCode::Down | KeyCode::Char('j') => move_day(panel, 7),
        KeyCode::Char('n') | KeyCode::PageDown => {
            response.transition = panel.page(SlideDirection::Forward);
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            response.transition = panel.page(SlideDirection::Backward);
        }
        KeyCode::Char('t') => response.transition = panel.jump_to_today(),
        _ => {}
    }
    response
}

fn step_year(panel: &mut CalendarPanel, delta: i32) {
    if let Some(cursor) = panel.cursor() {
        panel.choose_year(cursor.year.saturating_add(delta));
    }
}

/// Moves the selection by `days` within the displayed month.
fn move_day(panel: &mut CalendarPanel, days: i64) {
    let (Some(selected), Some(cursor)) = (panel.selected(), panel.cursor()) else {
        return;
    };
    let base = if selected.same_month(cursor.year, cursor.month) {
        selected.day()
    } else {
        1
    };
    let target = NaiveDate::from_ymd_opt(cursor.year, cursor.month, base)
        .and_then(|d| d.checked_add_signed(DateDelta::days(days)))
        .map(DateValue::from_naive);
    if let Some(date) = target.filter(|d| d.same_month(cursor.year, cursor.month)) {
        panel.select_day(date);
    }
}

fn clock_key(panel: &mut ClockPanel, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => panel.close(),
        KeyCode::Enter => panel.confirm(),
        KeyCode::Tab => {
            let next = match panel.active_dial() {
                Some(DialKind::Hour) => DialKind::Minute,
                _ => DialKind::Hour,
            };
            panel.switch_dial(next);
        }
        KeyCode::Left => panel.switch_dial(DialKind::Hour),
        KeyCode::Right => panel.switch_dial(DialKind::Minute),
        KeyCode::Up | KeyCode::Char('k') => panel.nudge(1),
        KeyCode::Down | KeyCode::Char('j') => panel.nudge(-1),
        KeyCode::Char('n') => panel.to_now(),
        KeyCode::Char('a') => panel.set_meridiem(Meridiem::Am),
        KeyCode::Char('p') => panel.set_meridiem(Meridiem::Pm),
        _ => {}
    }
}

pub fn run_app(terminal: &mut Term, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        app.tick(Instant::now());
        if !app.is_open() {
            break;
        }
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}
