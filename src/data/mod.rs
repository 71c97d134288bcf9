pub mod binding;
pub mod config;
pub mod date_value;
pub mod error;
pub mod persistence;
pub mod time_value;

pub use binding::{BindingId, FieldBinding, HookNames};
pub use config::{ConfigOverrides, Layout, PickerConfig, PickerSettings};
pub use date_value::{DateDisplay, DateValue};
pub use error::ValueError;
pub use persistence::Persistable;
pub use time_value::{Meridiem, TimeFormat, TimeValue};
