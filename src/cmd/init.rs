use anyhow::Result;
use pickdial::data::{Persistable, PickerSettings};
use pickdial::data::persistence::get_data_dir;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Settings initialized in {}", dir.display());
    Ok(())
}

/// Writes the default settings file into `dir`.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    PickerSettings::default().save_to(dir)
}
