use crate::cmd::{Confirmed, host, show_options};
use crate::ui::app::Picker;
use anyhow::Result;
use chrono::NaiveDateTime;
use pickdial::data::{ConfigOverrides, PickerConfig};
use pickdial::panel::{CalendarPanel, FixedClock};

/// Opens the calendar panel on `value` (or today) and prints the picked date.
pub fn run(
    value: Option<&str>,
    defaults: &PickerConfig,
    overrides: &ConfigOverrides,
    now: Option<NaiveDateTime>,
) -> Result<()> {
    let confirmed = Confirmed::default();
    let mut panel = CalendarPanel::new(defaults, overrides);
    if let Some(now) = now {
        panel = panel.with_clock(FixedClock(now));
    }
    panel.show(show_options(value, &confirmed));
    host(Picker::Calendar(panel), &confirmed)
}
