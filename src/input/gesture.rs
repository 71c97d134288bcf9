//! Tap and swipe classification over normalized mouse/touch sequences.
//!
//! Hosts feed every press/move/release for an attached target through
//! [`GestureRecognizer::dispatch`] and act on the returned [`Gesture`]s. Mouse
//! and touch input share one coordinate model: a mouse event carries its
//! client position, a touch event its touch-point list (the first point
//! counts, and a release usually carries none).

use kurbo::Point;

/// Minimum directional travel, in logical pixels, for a swipe.
pub const SWIPE_MIN_DISTANCE: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Tap,
    SwipeLeft,
    SwipeRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerSource {
    Mouse { client: Point },
    Touch { touches: Vec<Point> },
}

impl PointerSource {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerSource::Mouse { client } => Some(*client),
            PointerSource::Touch { touches } => touches.first().copied(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub source: PointerSource,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, source: PointerSource) -> Self {
        PointerEvent {
            phase,
            source,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        PointerEvent::new(
            phase,
            PointerSource::Mouse {
                client: Point::new(x, y),
            },
        )
    }

    pub fn touch(phase: PointerPhase, touches: Vec<Point>) -> Self {
        PointerEvent::new(phase, PointerSource::Touch { touches })
    }

    pub fn position(&self) -> Option<Point> {
        self.source.position()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A recognized intent on an attached target. `origin` is where the press began.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture<T> {
    pub target: T,
    pub intent: Intent,
    pub origin: Point,
}

#[derive(Clone, Copy, Debug, Default)]
struct TapState {
    start: Option<Point>,
    moved: bool,
}

impl TapState {
    fn feed(&mut self, phase: PointerPhase, position: Option<Point>) -> Option<Point> {
        match phase {
            PointerPhase::Press => {
                self.start = position;
                self.moved = false;
                None
            }
            PointerPhase::Move => {
                self.track(position);
                None
            }
            PointerPhase::Release => {
                self.track(position);
                let fired = if self.moved { None } else { self.start };
                *self = TapState::default();
                fired
            }
        }
    }

    fn track(&mut self, position: Option<Point>) {
        if let (Some(start), Some(p)) = (self.start, position) {
            if p != start {
                self.moved = true;
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct SwipeState {
    leftward: bool,
    min_distance: f64,
    start: Option<Point>,
    current: Point,
}

impl SwipeState {
    fn new(leftward: bool, min_distance: f64) -> Self {
        SwipeState {
            leftward,
            min_distance,
            start: None,
            current: Point::ZERO,
        }
    }

    fn feed(&mut self, phase: PointerPhase, position: Option<Point>) -> Option<Point> {
        match phase {
            PointerPhase::Press => {
                self.start = position;
                self.current = position.unwrap_or(Point::ZERO);
                None
            }
            PointerPhase::Move => {
                if let (Some(_), Some(p)) = (self.start, position) {
                    self.current = p;
                }
                None
            }
            PointerPhase::Release => {
                if let (Some(_), Some(p)) = (self.start, position) {
                    self.current = p;
                }
                let fired = self.start.filter(|start| self.recognizes(*start));
                self.start = None;
                self.current = Point::ZERO;
                fired
            }
        }
    }

    fn recognizes(&self, start: Point) -> bool {
        let dx = (start.x - self.current.x).abs();
        let dy = (start.y - self.current.y).abs();
        if dx <= dy {
            return false;
        }
        if self.leftward {
            start.x - self.current.x > self.min_distance
        } else {
            self.current.x - start.x > self.min_distance
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Detector {
    Tap(TapState),
    Swipe(SwipeState),
}

#[derive(Clone, Debug)]
struct Attachment<T> {
    target: T,
    intent: Intent,
    detector: Detector,
}

/// Per-target tap/swipe detectors.
#[derive(Clone, Debug)]
pub struct GestureRecognizer<T> {
    attachments: Vec<Attachment<T>>,
}

impl<T> Default for GestureRecognizer<T> {
    fn default() -> Self {
        GestureRecognizer {
            attachments: Vec::new(),
        }
    }
}

impl<T: Copy + PartialEq> GestureRecognizer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, target: T, intent: Intent) {
        self.attach_with_threshold(target, intent, SWIPE_MIN_DISTANCE);
    }

    /// Like [`attach`](Self::attach) with a custom swipe threshold (ignored for taps).
    pub fn attach_with_threshold(&mut self, target: T, intent: Intent, min_distance: f64) {
        let detector = match intent {
            Intent::Tap => Detector::Tap(TapState::default()),
            Intent::SwipeLeft => Detector::Swipe(SwipeState::new(true, min_distance)),
            Intent::SwipeRight => Detector::Swipe(SwipeState::new(false, min_distance)),
        };
        self.attachments.push(Attachment {
            target,
            intent,
            detector,
        });
    }

    pub fn detach(&mut self, target: T) {
        self.attachments.retain(|a| a.target != target);
    }

    pub fn is_attached(&self, target: T, intent: Intent) -> bool {
        self.attachments
            .iter()
            .any(|a| a.target == target && a.intent == intent)
    }

    /// Feeds one pointer event to every detector attached to `target`. Events
    /// reaching an attached target have propagation and default action
    /// suppressed.
    pub fn dispatch(&mut self, target: T, event: &mut PointerEvent) -> Vec<Gesture<T>> {
        let phase = event.phase;
        let position = event.position();
        let mut recognized = Vec::new();
        let mut reached = false;
        for attachment in self.attachments.iter_mut().filter(|a| a.target == target) {
            reached = true;
            let fired = match &mut attachment.detector {
                Detector::Tap(state) => state.feed(phase, position),
                Detector::Swipe(state) => state.feed(phase, position),
            };
            if let Some(origin) = fired {
                recognized.push(Gesture {
                    target,
                    intent: attachment.intent,
                    origin,
                });
            }
        }
        if reached {
            event.stop_propagation();
            event.prevent_default();
        }
        recognized
    }
}
