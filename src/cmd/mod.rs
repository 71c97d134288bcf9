pub mod date;
pub mod init;
pub mod month;
pub mod time;

use crate::ui::app::{App, Picker, run_app};
use crate::ui::{install_panic_hook, restore_terminal, setup_terminal};
use anyhow::Result;
use pickdial::panel::ShowOptions;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tracing::info;

/// Receives the value passed to the confirm callback.
type Confirmed = Rc<RefCell<Option<String>>>;

fn show_options(value: Option<&str>, confirmed: &Confirmed) -> ShowOptions {
    let sink = Rc::clone(confirmed);
    ShowOptions::value(value.unwrap_or_default())
        .on_confirm(move |v| *sink.borrow_mut() = Some(v.to_string()))
}

/// Runs an opened picker in the terminal until it closes, then prints the
/// confirmed value.
fn host(picker: Picker, confirmed: &Confirmed) -> Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(picker);
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result?;
    write_confirmed(confirmed.borrow().as_deref(), &mut std::io::stdout())
}

pub(crate) fn write_confirmed<W: Write>(value: Option<&str>, out: &mut W) -> Result<()> {
    match value {
        Some(value) => writeln!(out, "{}", value)?,
        None => info!("picker closed without a value"),
    }
    Ok(())
}
