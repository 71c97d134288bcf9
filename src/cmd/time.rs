use crate::cmd::{Confirmed, host, show_options};
use crate::ui::app::Picker;
use anyhow::Result;
use chrono::NaiveDateTime;
use pickdial::data::{ConfigOverrides, PickerConfig};
use pickdial::panel::{ClockPanel, FixedClock};

/// Opens the clock panel on `value` (or the current time) and prints the
/// picked time.
pub fn run(
    value: Option<&str>,
    defaults: &PickerConfig,
    overrides: &ConfigOverrides,
    now: Option<NaiveDateTime>,
) -> Result<()> {
    let confirmed = Confirmed::default();
    let mut panel = ClockPanel::new(defaults, overrides);
    if let Some(now) = now {
        panel = panel.with_clock(FixedClock(now));
    }
    panel.show(show_options(value, &confirmed));
    host(Picker::Clock(panel), &confirmed)
}
