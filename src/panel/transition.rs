//! Month slide animation: direction, timing, and the lock that keeps at most
//! one slide in flight.

use std::time::Duration;

pub const SLIDE_DURATION: Duration = Duration::from_millis(450);
/// Control points of the slide's cubic-bezier easing curve.
pub const SLIDE_EASING: (f64, f64, f64, f64) = (0.23, 1.0, 0.32, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    /// Previous month; the incoming grid enters from the left.
    Backward,
    /// Next month; the incoming grid enters from the right.
    Forward,
}

impl SlideDirection {
    pub fn months(self) -> i32 {
        match self {
            SlideDirection::Backward => -1,
            SlideDirection::Forward => 1,
        }
    }

    /// Horizontal offsets, in percent of the grid width, as
    /// `(outgoing_from, outgoing_to, incoming_from, incoming_to)`.
    pub fn offsets(self) -> (f64, f64, f64, f64) {
        match self {
            SlideDirection::Forward => (0.0, -100.0, 100.0, 0.0),
            SlideDirection::Backward => (0.0, 100.0, -100.0, 0.0),
        }
    }
}

/// Describes one slide for a host that animates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideAnimation {
    pub direction: SlideDirection,
    pub duration: Duration,
    pub easing: (f64, f64, f64, f64),
}

impl SlideAnimation {
    pub fn new(direction: SlideDirection) -> Self {
        SlideAnimation {
            direction,
            duration: SLIDE_DURATION,
            easing: SLIDE_EASING,
        }
    }

    /// `(outgoing, incoming)` offsets in percent at `elapsed`.
    pub fn offsets_at(&self, elapsed: Duration) -> (f64, f64) {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        let eased = cubic_bezier(self.easing, progress);
        let (out_from, out_to, in_from, in_to) = self.direction.offsets();
        (
            out_from + (out_to - out_from) * eased,
            in_from + (in_to - in_from) * eased,
        )
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// Evaluates a CSS-style cubic-bezier timing function at `x` in `0..=1`.
fn cubic_bezier((x1, y1, x2, y2): (f64, f64, f64, f64), x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let curve = |a: f64, b: f64, t: f64| {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    };
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..40 {
        let mid = (lo + hi) / 2.0;
        if curve(x1, x2, mid) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    curve(y1, y2, (lo + hi) / 2.0)
}

/// Proof that a slide holds the lock. Only [`AnimationLock::release`] can
/// consume it, so the lock is released exactly once per slide.
#[must_use = "a slide holds the animation lock until its ticket is completed"]
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionTicket {
    id: u64,
}

impl TransitionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Default)]
pub struct AnimationLock {
    held: Option<u64>,
    issued: u64,
}

impl AnimationLock {
    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    pub fn try_acquire(&mut self) -> Option<TransitionTicket> {
        if self.held.is_some() {
            return None;
        }
        self.issued += 1;
        self.held = Some(self.issued);
        Some(TransitionTicket { id: self.issued })
    }

    /// Returns true when `ticket` was the current holder.
    pub fn release(&mut self, ticket: TransitionTicket) -> bool {
        if self.held == Some(ticket.id) {
            self.held = None;
            true
        } else {
            false
        }
    }
}
