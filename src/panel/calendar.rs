//! Date panel: a month grid with paging, a year list, and today jump.

use crate::calc::calendar_math::{add_months, month_layout};
use crate::data::{BindingId, ConfigOverrides, DateDisplay, DateValue, PickerConfig};
use crate::input::{
    GestureRecognizer, Highlighter, Intent, ItemMarks, ItemState, PointerEvent, PointerPhase,
    SelectionTracker,
};
use crate::panel::PanelResponse;
use crate::panel::shell::{Clock, PanelShell, ShowOptions};
use crate::panel::transition::{AnimationLock, SlideAnimation, SlideDirection, TransitionTicket};
use tracing::debug;

/// Years listed on each side of the current year.
pub const YEAR_SPAN: i32 = 50;

/// Gesture surfaces of the calendar panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalendarRegion {
    /// The month grid: taps and horizontal swipes.
    Grid,
    /// Buttons, labels and the year list: taps only.
    Chrome,
}

/// What a pointer landed on, as resolved by the host's hit testing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarHit {
    Day(DateValue),
    BlankCell,
    PrevMonth,
    NextMonth,
    Today,
    Close,
    Confirm,
    YearLabel,
    DateLabel,
    YearEntry(i32),
    Backdrop,
    Panel,
}

impl CalendarHit {
    pub fn region(&self) -> CalendarRegion {
        match self {
            CalendarHit::Day(_) | CalendarHit::BlankCell => CalendarRegion::Grid,
            _ => CalendarRegion::Chrome,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayCell {
    pub day: Option<u32>,
    pub state: ItemState,
}

/// One rendered month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    pub id: GridId,
    pub year: i32,
    pub month: u32,
    pub rows: Vec<[DayCell; 7]>,
}

impl MonthGrid {
    fn build(id: GridId, year: i32, month: u32, today: DateValue) -> Self {
        let today_day = today.same_month(year, month).then_some(today.day());
        let rows = month_layout(year, month)
            .into_iter()
            .map(|row| {
                row.map(|day| DayCell {
                    day,
                    state: ItemState {
                        selected: false,
                        today: day.is_some() && day == today_day,
                    },
                })
            })
            .collect();
        MonthGrid {
            id,
            year,
            month,
            rows,
        }
    }

    pub fn cell(&self, day: u32) -> Option<&DayCell> {
        self.rows.iter().flatten().find(|c| c.day == Some(day))
    }

    fn cell_for(&mut self, date: &DateValue) -> Option<&mut DayCell> {
        if !date.same_month(self.year, self.month) {
            return None;
        }
        self.rows
            .iter_mut()
            .flatten()
            .find(|c| c.day == Some(date.day()))
    }

    pub fn date(&self, day: u32) -> Option<DateValue> {
        DateValue::new(self.year, self.month, day).ok()
    }
}

/// Live month grids, oldest first. Two grids coexist only while a slide is
/// in flight.
#[derive(Debug, Default)]
pub struct GridStack {
    grids: Vec<MonthGrid>,
    issued: u64,
}

impl GridStack {
    fn push(&mut self, year: i32, month: u32, today: DateValue) -> GridId {
        self.issued += 1;
        let id = GridId(self.issued);
        self.grids.push(MonthGrid::build(id, year, month, today));
        id
    }

    fn replace(&mut self, year: i32, month: u32, today: DateValue) -> GridId {
        self.grids.clear();
        self.push(year, month, today)
    }

    fn remove(&mut self, id: GridId) -> bool {
        let before = self.grids.len();
        self.grids.retain(|g| g.id != id);
        self.grids.len() != before
    }

    pub fn grids(&self) -> &[MonthGrid] {
        &self.grids
    }

    pub fn top(&self) -> Option<&MonthGrid> {
        self.grids.last()
    }
}

impl Highlighter<DateValue> for GridStack {
    fn emphasize(&mut self, item: &DateValue) {
        for cell in self.grids.iter_mut().filter_map(|g| g.cell_for(item)) {
            cell.state.selected = true;
        }
    }

    fn revert(&mut self, item: &DateValue) {
        for cell in self.grids.iter_mut().filter_map(|g| g.cell_for(item)) {
            cell.state.selected = false;
        }
    }
}

/// The month the grid is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewCursor {
    pub year: i32,
    pub month: u32,
}

/// Scrollable list of years around the current one.
#[derive(Debug)]
pub struct YearList {
    open: bool,
    first: i32,
    years: SelectionTracker<i32>,
    marks: ItemMarks<i32>,
}

impl YearList {
    fn new(current_year: i32) -> Self {
        YearList {
            open: false,
            first: current_year - YEAR_SPAN,
            years: SelectionTracker::new(),
            marks: ItemMarks::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn contains(&self, year: i32) -> bool {
        self.index_of(year).is_some()
    }

    pub fn index_of(&self, year: i32) -> Option<usize> {
        let index = year - self.first;
        (0..2 * YEAR_SPAN).contains(&index).then_some(index as usize)
    }

    pub fn highlighted(&self) -> Option<i32> {
        self.years.current().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (i32, ItemState)> + '_ {
        (self.first..self.first + 2 * YEAR_SPAN).map(|y| (y, self.marks.state(&y)))
    }

    /// Scroll position that centers the highlighted year in `viewport`.
    pub fn scroll_offset(&self, viewport: f64, entry_height: f64) -> f64 {
        let Some(index) = self.highlighted().and_then(|y| self.index_of(y)) else {
            return 0.0;
        };
        (index as f64 * entry_height - viewport / 2.0 + entry_height / 2.0).max(0.0)
    }

    fn open_at(&mut self, year: i32) {
        self.open = true;
        if self.contains(year) {
            self.years.select(year, &mut self.marks);
        } else {
            self.years.clear(&mut self.marks);
        }
    }

    fn choose(&mut self, year: i32) {
        self.years.select(year, &mut self.marks);
        self.open = false;
    }
}

#[derive(Debug)]
struct PendingSlide {
    outgoing: Option<GridId>,
    animation: SlideAnimation,
}

#[derive(Debug)]
struct CalendarSession {
    config: PickerConfig,
    today: DateValue,
    selected: DateValue,
    cursor: ViewCursor,
    dates: SelectionTracker<DateValue>,
    years: YearList,
    hovered: Option<DateValue>,
}

#[derive(Debug)]
pub struct CalendarPanel {
    shell: PanelShell,
    session: Option<CalendarSession>,
    grids: GridStack,
    lock: AnimationLock,
    pending: Option<PendingSlide>,
    gestures: GestureRecognizer<CalendarRegion>,
    press: Option<CalendarHit>,
}

impl CalendarPanel {
    pub fn new(defaults: &PickerConfig, overrides: &ConfigOverrides) -> Self {
        let mut gestures = GestureRecognizer::new();
        gestures.attach(CalendarRegion::Grid, Intent::Tap);
        gestures.attach(CalendarRegion::Grid, Intent::SwipeLeft);
        gestures.attach(CalendarRegion::Grid, Intent::SwipeRight);
        gestures.attach(CalendarRegion::Chrome, Intent::Tap);
        CalendarPanel {
            shell: PanelShell::new(defaults, overrides),
            session: None,
            grids: GridStack::default(),
            lock: AnimationLock::default(),
            pending: None,
            gestures,
            press: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.shell = self.shell.with_clock(clock);
        self
    }

    pub fn shell(&self) -> &PanelShell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut PanelShell {
        &mut self.shell
    }

    /// Opens the panel for a bound field.
    pub fn focus(&mut self, id: BindingId) -> bool {
        if !self.shell.open_binding(id) {
            return false;
        }
        self.start_session();
        true
    }

    pub fn show(&mut self, options: ShowOptions) {
        self.shell.open_with(options);
        self.start_session();
    }

    fn start_session(&mut self) {
        let Some(shell_session) = self.shell.session() else {
            return;
        };
        let today = DateValue::from_naive(self.shell.now().date());
        let selected = DateValue::parse_or(&shell_session.value, today);
        let config = shell_session.config.clone();
        let cursor = ViewCursor {
            year: selected.year(),
            month: selected.month(),
        };
        self.grids.replace(cursor.year, cursor.month, today);
        let mut dates = SelectionTracker::new();
        dates.select(selected, &mut self.grids);
        self.press = None;
        debug!(value = %selected, %today, "calendar opened");
        self.session = Some(CalendarSession {
            config,
            today,
            selected,
            cursor,
            dates,
            years: YearList::new(today.year()),
            hovered: None,
        });
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> Option<&PickerConfig> {
        self.session.as_ref().map(|s| &s.config)
    }

    pub fn cursor(&self) -> Option<ViewCursor> {
        self.session.as_ref().map(|s| s.cursor)
    }

    pub fn selected(&self) -> Option<DateValue> {
        self.session.as_ref().map(|s| s.selected)
    }

    pub fn today(&self) -> Option<DateValue> {
        self.session.as_ref().map(|s| s.today)
    }

    pub fn hovered(&self) -> Option<DateValue> {
        self.session.as_ref().and_then(|s| s.hovered)
    }

    /// The `"Y-M-D"` value a confirm would deliver.
    pub fn value(&self) -> Option<String> {
        self.selected().map(|d| d.to_string())
    }

    pub fn display(&self) -> Option<DateDisplay> {
        self.session
            .as_ref()
            .map(|s| DateDisplay::of(&s.selected, s.config.simplify))
    }

    pub fn grids(&self) -> &[MonthGrid] {
        self.grids.grids()
    }

    pub fn year_list(&self) -> Option<&YearList> {
        self.session.as_ref().map(|s| &s.years)
    }

    pub fn is_animating(&self) -> bool {
        self.lock.is_held()
    }

    pub fn slide_animation(&self) -> Option<SlideAnimation> {
        self.pending.as_ref().map(|p| p.animation)
    }

    /// Grid leaving the view during the current slide, if it is still live.
    pub fn outgoing_grid(&self) -> Option<&MonthGrid> {
        let id = self.pending.as_ref()?.outgoing?;
        self.grids.grids().iter().find(|g| g.id == id)
    }

    /// Starts a one-month slide. Dropped while another slide holds the lock.
    pub fn page(&mut self, direction: SlideDirection) -> Option<TransitionTicket> {
        let cursor = self.session.as_ref()?.cursor;
        let Some((year, month)) = add_months(cursor.year, cursor.month, direction.months()) else {
            debug!(?direction, year = cursor.year, "slide past the last representable month");
            return None;
        };
        let Some(ticket) = self.lock.try_acquire() else {
            debug!(?direction, "slide dropped while another is in flight");
            return None;
        };
        Some(self.begin_slide(ticket, direction, ViewCursor { year, month }))
    }

    fn begin_slide(
        &mut self,
        ticket: TransitionTicket,
        direction: SlideDirection,
        target: ViewCursor,
    ) -> TransitionTicket {
        let outgoing = self.grids.top().map(|g| g.id);
        if let Some(session) = self.session.as_mut() {
            session.cursor = target;
            session.hovered = None;
            self.grids.push(target.year, target.month, session.today);
            if let Some(current) = session.dates.current().copied() {
                session.dates.select(current, &mut self.grids);
            }
        }
        debug!(?direction, year = target.year, month = target.month, "slide started");
        self.pending = Some(PendingSlide {
            outgoing,
            animation: SlideAnimation::new(direction),
        });
        ticket
    }

    /// Ends a slide: drops the outgoing grid if still present and releases
    /// the lock. Valid after close or re-render.
    pub fn complete_transition(&mut self, ticket: TransitionTicket) {
        let id = ticket.id();
        if !self.lock.release(ticket) {
            debug!(ticket = id, "stale transition ticket");
            return;
        }
        if let Some(outgoing) = self.pending.take().and_then(|p| p.outgoing) {
            self.grids.remove(outgoing);
        }
    }

    /// Selects today, sliding to its month when needed. The whole action is
    /// dropped while a slide is in flight.
    pub fn jump_to_today(&mut self) -> Option<TransitionTicket> {
        let (cursor, today) = {
            let session = self.session.as_ref()?;
            (session.cursor, session.today)
        };
        if self.lock.is_held() {
            debug!("today jump dropped while a slide is in flight");
            return None;
        }
        let target = ViewCursor {
            year: today.year(),
            month: today.month(),
        };
        let ticket = if cursor == target {
            None
        } else {
            let direction = if cursor < target {
                SlideDirection::Forward
            } else {
                SlideDirection::Backward
            };
            let ticket = self.lock.try_acquire()?;
            Some(self.begin_slide(ticket, direction, target))
        };
        self.commit_day(today);
        ticket
    }

    /// Commits a tapped day of the displayed month. Already-selected days
    /// and days of other months are ignored.
    pub fn select_day(&mut self, date: DateValue) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if !date.same_month(session.cursor.year, session.cursor.month)
            || session.dates.is_selected(&date)
        {
            return false;
        }
        self.commit_day(date);
        true
    }

    fn commit_day(&mut self, date: DateValue) {
        if let Some(session) = self.session.as_mut() {
            session.dates.select(date, &mut self.grids);
            session.selected = date;
            if session.hovered == Some(date) {
                session.hovered = None;
            }
            debug!(value = %date, "day selected");
        }
    }

    /// Hover emphasis for unselected cells of the displayed month.
    pub fn hover(&mut self, date: Option<DateValue>) {
        if let Some(session) = self.session.as_mut() {
            session.hovered = date.filter(|d| {
                d.same_month(session.cursor.year, session.cursor.month)
                    && !session.dates.is_selected(d)
            });
        }
    }

    pub fn open_year_list(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.years.open_at(session.cursor.year);
        }
    }

    pub fn close_year_list(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.years.open = false;
        }
    }

    /// Shows `year` with the current view month. The selection is kept.
    pub fn choose_year(&mut self, year: i32) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.years.is_open() || !session.years.contains(year) {
            return false;
        }
        session.years.choose(year);
        session.cursor.year = year;
        session.hovered = None;
        self.grids.replace(year, session.cursor.month, session.today);
        if let Some(current) = session.dates.current().copied() {
            session.dates.select(current, &mut self.grids);
        }
        debug!(year, "year chosen");
        true
    }

    pub fn close(&mut self) {
        self.shell.close();
        self.session = None;
        self.press = None;
    }

    /// Delivers the selected date and closes.
    pub fn confirm(&mut self) {
        let Some(value) = self.value() else {
            return;
        };
        self.shell.confirm(&value);
        self.session = None;
        self.press = None;
    }

    /// Routes one pointer event. A press picks the target for the whole
    /// press/move/release sequence.
    pub fn handle_pointer(&mut self, hit: CalendarHit, event: &mut PointerEvent) -> PanelResponse {
        let mut response = PanelResponse::default();
        if !self.is_open() {
            return response;
        }
        if event.phase == PointerPhase::Press {
            self.press = Some(hit);
        }
        let target = self.press.unwrap_or(hit);
        let gestures = self.gestures.dispatch(target.region(), event);
        if event.phase == PointerPhase::Release {
            self.press = None;
        }
        for gesture in gestures {
            match gesture.intent {
                Intent::Tap => self.tap(target, &mut response),
                Intent::SwipeLeft => response.adopt(self.page(SlideDirection::Forward)),
                Intent::SwipeRight => response.adopt(self.page(SlideDirection::Backward)),
            }
        }
        response
    }

    fn tap(&mut self, hit: CalendarHit, response: &mut PanelResponse) {
        match hit {
            CalendarHit::Day(date) => {
                self.select_day(date);
            }
            CalendarHit::BlankCell | CalendarHit::Panel => {}
            CalendarHit::PrevMonth => response.adopt(self.page(SlideDirection::Backward)),
            CalendarHit::NextMonth => response.adopt(self.page(SlideDirection::Forward)),
            CalendarHit::Today => response.adopt(self.jump_to_today()),
            CalendarHit::Close | CalendarHit::Backdrop => {
                self.close();
                response.closed = true;
            }
            CalendarHit::Confirm => {
                self.confirm();
                response.closed = true;
            }
            CalendarHit::YearLabel => self.open_year_list(),
            CalendarHit::DateLabel => self.close_year_list(),
            CalendarHit::YearEntry(year) => {
                self.choose_year(year);
            }
        }
    }
}
