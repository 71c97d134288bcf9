//! Time panel: hour and minute dials driven by pointer drags.

use crate::calc::clock_geometry::{
    HOUR_INTERVAL, HourRing, INNER_TICK_DIAMETER, MINUTE_INTERVAL, OUTER_TICK_DIAMETER,
    PointerShape, angle_to_time, dial_center, distance, hour_angle, minute_angle, resolve_hour,
    tick_offset, to_dial_space, xy_to_angle,
};
use crate::data::{BindingId, ConfigOverrides, Meridiem, PickerConfig, TimeFormat, TimeValue};
use crate::input::{
    GestureRecognizer, Intent, ItemMarks, ItemState, PointerEvent, PointerPhase, SelectionTracker,
};
use crate::panel::PanelResponse;
use crate::panel::shell::{Clock, PanelShell, ShowOptions};
use kurbo::{Point, Vec2};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialKind {
    Hour,
    Minute,
}

impl DialKind {
    pub fn interval(self) -> f64 {
        match self {
            DialKind::Hour => HOUR_INTERVAL,
            DialKind::Minute => MINUTE_INTERVAL,
        }
    }
}

/// What a pointer landed on, as resolved by the host's hit testing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockHit {
    Dial(DialKind),
    HourField,
    MinuteField,
    Am,
    Pm,
    Now,
    Close,
    Confirm,
    Backdrop,
    Panel,
}

const TAP_TARGETS: [ClockHit; 8] = [
    ClockHit::HourField,
    ClockHit::MinuteField,
    ClockHit::Am,
    ClockHit::Pm,
    ClockHit::Now,
    ClockHit::Close,
    ClockHit::Confirm,
    ClockHit::Backdrop,
];

/// A label on a dial face.
#[derive(Clone, Debug, PartialEq)]
pub struct TickView {
    pub value: u32,
    pub label: String,
    /// Position relative to the dial center.
    pub offset: Vec2,
    /// True for the 13–24 ring of a 24-hour dial.
    pub inner: bool,
    pub state: ItemState,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DialPointer {
    pub rotation: f64,
    pub shape: PointerShape,
}

/// Compact header fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeDisplay {
    pub hour: String,
    pub minute: String,
    pub meridiem: Option<Meridiem>,
}

#[derive(Debug)]
struct Dial {
    rotation: f64,
    ring: HourRing,
    ticks: SelectionTracker<u32>,
    marks: ItemMarks<u32>,
    armed: bool,
}

impl Dial {
    fn new() -> Self {
        Dial {
            rotation: 0.0,
            ring: HourRing::Standard,
            ticks: SelectionTracker::new(),
            marks: ItemMarks::new(),
            armed: false,
        }
    }
}

#[derive(Debug)]
struct ClockSession {
    config: PickerConfig,
    now: TimeValue,
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
    meridiems: SelectionTracker<Meridiem>,
    meridiem_marks: ItemMarks<Meridiem>,
    hour_dial: Dial,
    minute_dial: Dial,
    active: DialKind,
    distance: f64,
}

/// Hour as labeled on the dial: 24-hour midnight reads 24.
fn dial_hour(value: &TimeValue, format: TimeFormat) -> u32 {
    if format == TimeFormat::H24 && value.hour() == 0 {
        24
    } else {
        value.hour()
    }
}

impl ClockSession {
    fn new(config: PickerConfig, value: TimeValue, now: TimeValue) -> Self {
        let format = config.format;
        let mut session = ClockSession {
            config,
            now,
            hour: 12,
            minute: 0,
            meridiem: None,
            meridiems: SelectionTracker::new(),
            meridiem_marks: ItemMarks::new(),
            hour_dial: Dial::new(),
            minute_dial: Dial::new(),
            active: DialKind::Hour,
            distance: HourRing::Standard.nominal_distance(),
        };
        session.hour_dial.marks.mark_today(dial_hour(&now, format));
        if now.minute() % 5 == 0 {
            session.minute_dial.marks.mark_today(now.minute());
        }
        session.apply(value);
        session
    }

    fn apply(&mut self, value: TimeValue) {
        let format = self.config.format;
        self.set_hour(dial_hour(&value, format));
        self.set_minute(value.minute());
        if let Some(meridiem) = value.meridiem() {
            self.set_meridiem(meridiem);
        }
    }

    fn set_hour(&mut self, hour: u32) {
        let ring = if self.config.format == TimeFormat::H24 && hour > 12 {
            HourRing::Extended
        } else {
            HourRing::Standard
        };
        self.distance = ring.nominal_distance();
        self.point(DialKind::Hour, hour_angle(hour, HourRing::Standard));
    }

    fn set_minute(&mut self, minute: u32) {
        self.point(DialKind::Minute, minute_angle(minute));
    }

    fn set_meridiem(&mut self, meridiem: Meridiem) {
        self.meridiems.select(meridiem, &mut self.meridiem_marks);
        self.meridiem = Some(meridiem);
    }

    /// Rotates a dial to a quantized angle and updates its value and tick.
    fn point(&mut self, kind: DialKind, angle: f64) {
        match kind {
            DialKind::Hour => {
                let ring = match self.config.format {
                    TimeFormat::H24 => HourRing::for_distance(self.distance),
                    TimeFormat::AmPm => HourRing::Standard,
                };
                let (rotation, hour) = resolve_hour(angle, ring);
                let dial = &mut self.hour_dial;
                dial.rotation = rotation;
                dial.ring = ring;
                dial.ticks.select(hour, &mut dial.marks);
                self.hour = hour;
            }
            DialKind::Minute => {
                let minute = angle_to_time(angle, MINUTE_INTERVAL, false);
                let dial = &mut self.minute_dial;
                dial.rotation = angle;
                if minute % 5 == 0 {
                    dial.ticks.select(minute, &mut dial.marks);
                } else {
                    dial.ticks.clear(&mut dial.marks);
                }
                self.minute = minute;
            }
        }
    }

    fn dial(&self, kind: DialKind) -> &Dial {
        match kind {
            DialKind::Hour => &self.hour_dial,
            DialKind::Minute => &self.minute_dial,
        }
    }

    fn dial_mut(&mut self, kind: DialKind) -> &mut Dial {
        match kind {
            DialKind::Hour => &mut self.hour_dial,
            DialKind::Minute => &mut self.minute_dial,
        }
    }

    fn time_value(&self) -> TimeValue {
        let composed = match self.config.format {
            TimeFormat::H24 => TimeValue::h24(self.hour, self.minute),
            TimeFormat::AmPm => {
                TimeValue::ampm(self.hour, self.minute, self.meridiem.unwrap_or(Meridiem::Am))
            }
        };
        composed.unwrap_or(self.now)
    }
}

#[derive(Debug)]
pub struct ClockPanel {
    shell: PanelShell,
    session: Option<ClockSession>,
    pressed: bool,
    dial_origin: Point,
    gestures: GestureRecognizer<ClockHit>,
    press: Option<ClockHit>,
}

impl ClockPanel {
    pub fn new(defaults: &PickerConfig, overrides: &ConfigOverrides) -> Self {
        let mut gestures = GestureRecognizer::new();
        for target in TAP_TARGETS {
            gestures.attach(target, Intent::Tap);
        }
        ClockPanel {
            shell: PanelShell::new(defaults, overrides),
            session: None,
            pressed: false,
            dial_origin: Point::ZERO,
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

    /// Page position of the dial surface's top-left corner.
    pub fn set_dial_origin(&mut self, origin: Point) {
        self.dial_origin = origin;
    }

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
        let config = shell_session.config.clone();
        let clock = self.shell.now().time();
        let now = TimeValue::from_clock(clock, config.format);
        let value = TimeValue::parse_or(&shell_session.value, config.format, clock);
        debug!(%value, %now, "clock opened");
        self.session = Some(ClockSession::new(config, value, now));
        self.pressed = false;
        self.press = None;
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> Option<&PickerConfig> {
        self.session.as_ref().map(|s| &s.config)
    }

    pub fn active_dial(&self) -> Option<DialKind> {
        self.session.as_ref().map(|s| s.active)
    }

    pub fn switch_dial(&mut self, kind: DialKind) {
        if let Some(session) = self.session.as_mut() {
            session.active = kind;
        }
    }

    /// Steps the active dial by `delta` units, wrapping around the face.
    pub fn nudge(&mut self, delta: i32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.active {
            DialKind::Hour => {
                let span = match session.config.format {
                    TimeFormat::H24 => 24,
                    TimeFormat::AmPm => 12,
                };
                let hour = (session.hour as i32 - 1 + delta).rem_euclid(span) + 1;
                session.set_hour(hour as u32);
            }
            DialKind::Minute => {
                let minute = (session.minute as i32 + delta).rem_euclid(60);
                session.set_minute(minute as u32);
            }
        }
    }

    pub fn time_value(&self) -> Option<TimeValue> {
        self.session.as_ref().map(ClockSession::time_value)
    }

    /// `"H:MM"` or `"H:MM am|pm"`.
    pub fn value(&self) -> Option<String> {
        self.time_value().map(|t| t.to_string())
    }

    pub fn display(&self) -> Option<TimeDisplay> {
        let value = self.time_value()?;
        Some(TimeDisplay {
            hour: value.compact_hour(),
            minute: value.compact_minute(),
            meridiem: value.meridiem(),
        })
    }

    pub fn meridiem_state(&self, meridiem: Meridiem) -> ItemState {
        self.session
            .as_ref()
            .map(|s| s.meridiem_marks.state(&meridiem))
            .unwrap_or_default()
    }

    pub fn pointer(&self, kind: DialKind) -> Option<DialPointer> {
        let dial = self.session.as_ref()?.dial(kind);
        Some(DialPointer {
            rotation: dial.rotation,
            shape: dial.ring.pointer(),
        })
    }

    pub fn ticks(&self, kind: DialKind) -> Vec<TickView> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let marks = &session.dial(kind).marks;
        let view = |value: u32, label: String, index: u32, diameter: f64, inner: bool| TickView {
            value,
            label,
            offset: tick_offset(index, diameter),
            inner,
            state: marks.state(&value),
        };
        match kind {
            DialKind::Hour => {
                let mut ticks: Vec<_> = (1..=12)
                    .map(|i| view(i, i.to_string(), i, OUTER_TICK_DIAMETER, false))
                    .collect();
                if session.config.format == TimeFormat::H24 {
                    ticks.extend(
                        (1..=12).map(|i| view(i + 12, (i + 12).to_string(), i, INNER_TICK_DIAMETER, true)),
                    );
                }
                ticks
            }
            DialKind::Minute => (1..=12)
                .map(|i| {
                    let minute = (i * 5) % 60;
                    view(minute, format!("{:02}", minute), i, OUTER_TICK_DIAMETER, false)
                })
                .collect(),
        }
    }

    /// Starts a drag on the active dial.
    pub fn press_dial(&mut self, kind: DialKind, page: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.active != kind {
            debug!(?kind, "press on hidden dial ignored");
            return;
        }
        session.dial_mut(kind).armed = true;
        self.pressed = true;
        self.track(kind, page);
    }

    pub fn drag_dial(&mut self, kind: DialKind, page: Point) {
        let armed = self
            .session
            .as_ref()
            .is_some_and(|s| s.dial(kind).armed);
        if self.pressed && armed {
            self.track(kind, page);
        }
    }

    /// Ends a drag. Releasing the hour dial brings up the minute dial; a
    /// release the dial never saw a press for is ignored.
    pub fn release_dial(&mut self, kind: DialKind) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dial = session.dial_mut(kind);
        if !dial.armed {
            debug!(?kind, "stray release ignored");
            return;
        }
        dial.armed = false;
        self.pressed = false;
        if kind == DialKind::Hour {
            session.active = DialKind::Minute;
        }
    }

    fn track(&mut self, kind: DialKind, page: Point) {
        let origin = self.dial_origin;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let local = to_dial_space(page, origin);
        let center = dial_center();
        let Some(angle) = xy_to_angle(local, center, kind.interval()) else {
            debug!(?kind, "pointer on dial center ignored");
            return;
        };
        session.distance = distance(local, center);
        session.point(kind, angle);
    }

    /// Only meaningful in am/pm mode.
    pub fn set_meridiem(&mut self, meridiem: Meridiem) {
        if let Some(session) = self.session.as_mut() {
            if session.config.format == TimeFormat::AmPm {
                session.set_meridiem(meridiem);
            }
        }
    }

    /// Points both dials at the clock's current time.
    pub fn to_now(&mut self) {
        let clock = self.shell.now().time();
        if let Some(session) = self.session.as_mut() {
            let now = TimeValue::from_clock(clock, session.config.format);
            session.apply(now);
        }
    }

    pub fn close(&mut self) {
        self.shell.close();
        self.session = None;
        self.pressed = false;
        self.press = None;
    }

    pub fn confirm(&mut self) {
        let Some(value) = self.value() else {
            return;
        };
        self.shell.confirm(&value);
        self.session = None;
        self.pressed = false;
        self.press = None;
    }

    /// Routes one pointer event. A press captures the pointer for the rest
    /// of its sequence.
    pub fn handle_pointer(&mut self, hit: ClockHit, event: &mut PointerEvent) -> PanelResponse {
        let mut response = PanelResponse::default();
        if !self.is_open() {
            return response;
        }
        if event.phase == PointerPhase::Press {
            self.press = Some(hit);
        }
        let target = self.press.unwrap_or(hit);
        if event.phase == PointerPhase::Release {
            self.press = None;
        }
        if let ClockHit::Dial(kind) = target {
            event.stop_propagation();
            event.prevent_default();
            match (event.phase, event.position()) {
                (PointerPhase::Press, Some(page)) => self.press_dial(kind, page),
                (PointerPhase::Move, Some(page)) => self.drag_dial(kind, page),
                (PointerPhase::Release, _) => self.release_dial(kind),
                _ => {}
            }
            return response;
        }
        for gesture in self.gestures.dispatch(target, event) {
            if gesture.intent == Intent::Tap {
                self.tap(target, &mut response);
            }
        }
        response
    }

    fn tap(&mut self, hit: ClockHit, response: &mut PanelResponse) {
        match hit {
            ClockHit::HourField => self.switch_dial(DialKind::Hour),
            ClockHit::MinuteField => self.switch_dial(DialKind::Minute),
            ClockHit::Am => self.set_meridiem(Meridiem::Am),
            ClockHit::Pm => self.set_meridiem(Meridiem::Pm),
            ClockHit::Now => self.to_now(),
            ClockHit::Close | ClockHit::Backdrop => {
                self.close();
                response.closed = true;
            }
            ClockHit::Confirm => {
                self.confirm();
                response.closed = true;
            }
            ClockHit::Dial(_) | ClockHit::Panel => {}
        }
    }
}
