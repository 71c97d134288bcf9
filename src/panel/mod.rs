pub mod calendar;
pub mod clock;
pub mod shell;
pub mod transition;

pub use calendar::{CalendarHit, CalendarPanel, CalendarRegion, MonthGrid, ViewCursor, YearList};
pub use clock::{ClockHit, ClockPanel, DialKind, TickView, TimeDisplay};
pub use shell::{Clock, FixedClock, HookEvent, PanelShell, ShowOptions, SystemClock};
pub use transition::{AnimationLock, SlideAnimation, SlideDirection, TransitionTicket};

/// What a pointer event did to a panel. A returned ticket must be handed
/// back through `complete_transition` once the host finishes the slide.
#[derive(Debug, Default)]
pub struct PanelResponse {
    pub transition: Option<TransitionTicket>,
    pub closed: bool,
}

impl PanelResponse {
    fn adopt(&mut self, ticket: Option<TransitionTicket>) {
        if ticket.is_some() {
            self.transition = ticket;
        }
    }
}
