use crate::data::ConfigOverrides;
use std::collections::HashMap;

/// Attribute names that carry hook method names, in lookup order. Both the
/// plain and the `data-` spelling are honored and each one present is called.
const SELECT_ATTRS: [&str; 2] = ["on-select", "data-onselect"];
const SHOW_ATTRS: [&str; 2] = ["on-show", "data-onshow"];
const CLOSE_ATTRS: [&str; 2] = ["on-close", "data-onclose"];

/// Handle to a field registered with a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(pub(crate) usize);

/// Method names a bound field asks the panel to call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HookNames {
    pub on_select: Vec<String>,
    pub on_show: Vec<String>,
    pub on_close: Vec<String>,
}

impl HookNames {
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Self {
        let names = |keys: [&str; 2]| {
            keys.iter()
                .filter_map(|k| attributes.get(*k))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        };
        HookNames {
            on_select: names(SELECT_ATTRS),
            on_show: names(SHOW_ATTRS),
            on_close: names(CLOSE_ATTRS),
        }
    }
}

/// A text field that opens a panel on focus and receives the confirmed value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldBinding {
    pub value: String,
    pub overrides: ConfigOverrides,
    pub hooks: HookNames,
}

impl FieldBinding {
    pub fn new(value: impl Into<String>) -> Self {
        FieldBinding {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Builds a binding from the field's current value and string attributes.
    pub fn from_attributes(value: impl Into<String>, attributes: &HashMap<String, String>) -> Self {
        FieldBinding {
            value: value.into(),
            overrides: ConfigOverrides::from_attributes(attributes),
            hooks: HookNames::from_attributes(attributes),
        }
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_hooks(mut self, hooks: HookNames) -> Self {
        self.hooks = hooks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Layout;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_binding_reads_overrides_and_hooks() {
        let b = FieldBinding::from_attributes(
            "2024-2-29",
            &attrs(&[
                ("layout", "landscape"),
                ("on-select", "saveDate"),
                ("data-onselect", "audit"),
                ("on-close", " "),
            ]),
        );
        assert_eq!(b.value, "2024-2-29");
        assert_eq!(b.overrides.layout, Some(Layout::Landscape));
        assert_eq!(b.hooks.on_select, vec!["saveDate", "audit"]);
        assert!(b.hooks.on_show.is_empty());
        assert!(b.hooks.on_close.is_empty());
    }

    #[test]
    fn test_plain_binding_has_no_hooks() {
        let b = FieldBinding::new("9:30");
        assert_eq!(b.hooks, HookNames::default());
        assert!(b.overrides.is_empty());
    }
}
