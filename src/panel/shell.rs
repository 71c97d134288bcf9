//! Behavior shared by the calendar and clock panels: configuration merging,
//! field bindings, named hooks, and the open/confirm/close session cycle.

use crate::data::{BindingId, ConfigOverrides, FieldBinding, PickerConfig};
use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Source of "now" for today/now marks and fallbacks.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookEvent<'a> {
    Select(&'a str),
    Show,
    Close,
}

pub type Hook = Box<dyn FnMut(HookEvent<'_>)>;
pub type ConfirmCallback = Box<dyn FnMut(&str)>;

/// Named methods a bound field can refer to by attribute.
#[derive(Default)]
pub struct HookRegistry {
    methods: HashMap<String, Hook>,
}

impl HookRegistry {
    pub fn register(&mut self, name: impl Into<String>, hook: Hook) {
        self.methods.insert(name.into(), hook);
    }

    /// Calls each named method. Names with no registered method are skipped.
    pub fn call_all(&mut self, names: &[String], event: HookEvent<'_>) {
        for name in names {
            match self.methods.get_mut(name) {
                Some(hook) => hook(event),
                None => debug!(hook = %name, "no method registered"),
            }
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.methods.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("methods", &names).finish()
    }
}

/// Programmatic open: no bound field, value and callback supplied directly.
#[derive(Default)]
pub struct ShowOptions {
    pub value: String,
    pub overrides: ConfigOverrides,
    pub on_confirm: Option<ConfirmCallback>,
}

impl ShowOptions {
    pub fn value(value: impl Into<String>) -> Self {
        ShowOptions {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn on_confirm(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_confirm = Some(Box::new(callback));
        self
    }
}

/// One open period of a panel.
pub struct Session {
    pub binding: Option<BindingId>,
    pub config: PickerConfig,
    pub value: String,
    on_confirm: Option<ConfirmCallback>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("binding", &self.binding)
            .field("config", &self.config)
            .field("value", &self.value)
            .field("on_confirm", &self.on_confirm.is_some())
            .finish()
    }
}

pub struct PanelShell {
    defaults: PickerConfig,
    bindings: Vec<FieldBinding>,
    hooks: HookRegistry,
    clock: Box<dyn Clock>,
    session: Option<Session>,
}

impl fmt::Debug for PanelShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelShell")
            .field("defaults", &self.defaults)
            .field("bindings", &self.bindings)
            .field("hooks", &self.hooks)
            .field("session", &self.session)
            .finish()
    }
}

impl PanelShell {
    /// `defaults` overlaid with the per-instance `overrides`.
    pub fn new(defaults: &PickerConfig, overrides: &ConfigOverrides) -> Self {
        PanelShell {
            defaults: defaults.merged(overrides),
            bindings: Vec::new(),
            hooks: HookRegistry::default(),
            clock: Box::new(SystemClock),
            session: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn defaults(&self) -> &PickerConfig {
        &self.defaults
    }

    pub fn add_binding(&mut self, binding: FieldBinding) -> BindingId {
        self.bindings.push(binding);
        BindingId(self.bindings.len() - 1)
    }

    pub fn add_bindings(&mut self, bindings: impl IntoIterator<Item = FieldBinding>) -> Vec<BindingId> {
        bindings.into_iter().map(|b| self.add_binding(b)).collect()
    }

    pub fn binding(&self, id: BindingId) -> Option<&FieldBinding> {
        self.bindings.get(id.0)
    }

    pub fn register_method(&mut self, name: impl Into<String>, hook: impl FnMut(HookEvent<'_>) + 'static) {
        self.hooks.register(name, Box::new(hook));
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Opens a session for a bound field. Returns false for an unknown id.
    pub fn open_binding(&mut self, id: BindingId) -> bool {
        let Some(binding) = self.bindings.get(id.0) else {
            debug!(?id, "focus on unknown binding");
            return false;
        };
        let session = Session {
            binding: Some(id),
            config: self.defaults.merged(&binding.overrides),
            value: binding.value.clone(),
            on_confirm: None,
        };
        let hooks = binding.hooks.on_show.clone();
        self.session = Some(session);
        self.hooks.call_all(&hooks, HookEvent::Show);
        true
    }

    pub fn open_with(&mut self, options: ShowOptions) {
        self.session = Some(Session {
            binding: None,
            config: self.defaults.merged(&options.overrides),
            value: options.value,
            on_confirm: options.on_confirm,
        });
    }

    /// Ends the session, firing the bound field's close hooks.
    pub fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        debug!(binding = ?session.binding, "panel closed");
        if let Some(binding) = session.binding.and_then(|id| self.bindings.get(id.0)) {
            let hooks = binding.hooks.on_close.clone();
            self.hooks.call_all(&hooks, HookEvent::Close);
        }
    }

    /// Delivers `value` to the bound field (and its select hooks) or to the
    /// programmatic callback, then closes.
    pub fn confirm(&mut self, value: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.value = value.to_string();
        debug!(binding = ?session.binding, value, "panel confirmed");
        match session.binding {
            Some(id) => {
                let hooks = match self.bindings.get_mut(id.0) {
                    Some(binding) => {
                        binding.value = value.to_string();
                        binding.hooks.on_select.clone()
                    }
                    None => Vec::new(),
                };
                self.hooks.call_all(&hooks, HookEvent::Select(value));
            }
            None => {
                if let Some(callback) = session.on_confirm.as_mut() {
                    callback(value);
                }
            }
        }
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HookNames, Layout};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn shell() -> PanelShell {
        PanelShell::new(&PickerConfig::default(), &ConfigOverrides::default())
    }

    fn recorder(shell: &mut PanelShell, name: &str) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let tag = name.to_string();
        shell.register_method(name, move |event| {
            sink.borrow_mut().push(format!("{}:{:?}", tag, event));
        });
        log
    }

    #[test]
    fn test_instance_overrides_merge_into_defaults() {
        let overrides = ConfigOverrides {
            layout: Some(Layout::Landscape),
            ..Default::default()
        };
        let shell = PanelShell::new(&PickerConfig::default(), &overrides);
        assert_eq!(shell.defaults().layout, Layout::Landscape);
    }

    #[test]
    fn test_binding_overrides_apply_per_session() {
        let mut shell = shell();
        let id = shell.add_binding(FieldBinding::new("").with_overrides(ConfigOverrides {
            color: Some("teal".to_string()),
            ..Default::default()
        }));
        assert!(shell.open_binding(id));
        assert_eq!(shell.session().unwrap().config.color, "teal");
        shell.close();
        assert_eq!(shell.defaults().color, PickerConfig::default().color);
    }

    #[test]
    fn test_confirm_writes_field_and_calls_hooks_then_closes() {
        let mut shell = shell();
        let log = recorder(&mut shell, "saved");
        let closed = recorder(&mut shell, "closed");
        let id = shell.add_binding(FieldBinding::new("2024-1-1").with_hooks(HookNames {
            on_select: vec!["saved".to_string(), "missing".to_string()],
            on_close: vec!["closed".to_string()],
            ..Default::default()
        }));
        shell.open_binding(id);
        shell.confirm("2024-2-29");
        assert_eq!(shell.binding(id).unwrap().value, "2024-2-29");
        assert_eq!(*log.borrow(), vec!["saved:Select(\"2024-2-29\")"]);
        assert_eq!(*closed.borrow(), vec!["closed:Close"]);
        assert!(!shell.is_open());
    }

    #[test]
    fn test_show_hook_fires_on_open() {
        let mut shell = shell();
        let log = recorder(&mut shell, "shown");
        let id = shell.add_binding(FieldBinding::new("").with_hooks(HookNames {
            on_show: vec!["shown".to_string()],
            ..Default::default()
        }));
        shell.open_binding(id);
        assert_eq!(*log.borrow(), vec!["shown:Show"]);
    }

    #[test]
    fn test_programmatic_confirm_callback() {
        let mut shell = shell();
        let got = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&got);
        shell.open_with(ShowOptions::value("9:30").on_confirm(move |v| *sink.borrow_mut() = v.to_string()));
        assert_eq!(shell.session().unwrap().binding, None);
        shell.confirm("10:45");
        assert_eq!(*got.borrow(), "10:45");
        assert!(!shell.is_open());
    }

    #[test]
    fn test_confirm_and_close_are_logged() {
        let mut shell = shell();
        let logs = crate::capture_logs(|| {
            shell.open_with(ShowOptions::value("9:30"));
            shell.confirm("10:45");
        });
        assert!(logs.contains("panel confirmed"));
        assert!(logs.contains("10:45"));
        assert!(logs.contains("panel closed"));
    }

    #[test]
    fn test_close_without_session_is_noop() {
        let mut shell = shell();
        shell.close();
        shell.confirm("x");
        assert!(!shell.is_open());
    }

    #[test]
    fn test_unknown_binding_does_not_open() {
        let mut shell = shell();
        assert!(!shell.open_binding(BindingId(4)));
        assert!(!shell.is_open());
    }

    #[test]
    fn test_add_bindings_returns_ids_in_order() {
        let mut shell = shell();
        let ids = shell.add_bindings(vec![FieldBinding::new("a"), FieldBinding::new("b")]);
        assert_eq!(ids.len(), 2);
        assert_eq!(shell.binding(ids[1]).unwrap().value, "b");
    }
}
