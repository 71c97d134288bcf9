use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};
use pickdial::calc::calendar_math::{is_valid, month_layout, month_name};

pub fn run(year: i32, month: u32, today: NaiveDate) -> Result<()> {
    write_month(year, month, today, &mut std::io::stdout())
}

/// Prints a month grid, Sunday first, with `*` after today's date.
pub(crate) fn write_month<W: std::io::Write>(
    year: i32,
    month: u32,
    today: NaiveDate,
    out: &mut W,
) -> Result<()> {
    if !(1..=12).contains(&month) {
        bail!("month must be between 1 and 12, got {}", month);
    }
    if !is_valid(year, month, 1) {
        bail!("year {} is outside the supported calendar range", year);
    }
    let title = format!("{} {}", month_name(month), year);
    writeln!(out, "{:^20}", title)?;
    writeln!(out, "Su Mo Tu We Th Fr Sa")?;
    let today_here = today.year() == year && today.month() == month;
    for row in month_layout(year, month) {
        let mut line = String::new();
        for cell in row {
            match cell {
                Some(day) => {
                    let marker = if today_here && today.day() == day { '*' } else { ' ' };
                    line.push_str(&format!("{:>2}{}", day, marker));
                }
                None => line.push_str("   "),
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
