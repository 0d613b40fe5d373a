//! Template placeholders reflecting device state into served pages.

use heapless::index_map::FnvIndexMap;

/// Placeholder for the CSS class of the on/off button.
pub const ON_OFF_BTN_STATE: &str = "ON_OFF_BTN_STATE";

/// Class value while all LEDs are on.
pub const BTN_ON: &str = "";

/// Class value while all LEDs are off.
pub const BTN_OFF: &str = "btn_off";

/// Receives placeholder values from the device.
pub trait TemplateSink {
    /// Sets the replacement text of `placeholder`.
    fn set_template(&mut self, placeholder: &'static str, value: &'static str);
}

/// In-memory placeholder table.
///
/// Lookups of unknown placeholders return the placeholder itself so the page
/// still renders.
#[derive(Debug, Clone)]
pub struct TemplateMap<const N: usize> {
    values: FnvIndexMap<&'static str, &'static str, N>,
}

impl<const N: usize> TemplateMap<N> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            values: FnvIndexMap::new(),
        }
    }

    /// Returns the value registered for `placeholder`.
    pub fn get(&self, placeholder: &str) -> Option<&'static str> {
        self.values.get(placeholder).copied()
    }

    /// Returns the replacement text for `placeholder`, or the placeholder.
    pub fn render<'a>(&self, placeholder: &'a str) -> &'a str {
        match self.get(placeholder) {
            Some(value) => value,
            None => {
                warn!("entry not registered in template mapping: {}", placeholder);
                placeholder
            }
        }
    }
}

impl<const N: usize> Default for TemplateMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TemplateSink for TemplateMap<N> {
    fn set_template(&mut self, placeholder: &'static str, value: &'static str) {
        if self.values.insert(placeholder, value).is_err() {
            error!("template mapping full, dropped {}", placeholder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_placeholder_renders_as_itself() {
        let map = TemplateMap::<4>::new();
        assert_eq!(map.render("MISSING"), "MISSING");
    }

    #[test]
    fn later_value_replaces_earlier_one() {
        let mut map = TemplateMap::<4>::new();
        map.set_template(ON_OFF_BTN_STATE, BTN_OFF);
        map.set_template(ON_OFF_BTN_STATE, BTN_ON);
        assert_eq!(map.get(ON_OFF_BTN_STATE), Some(BTN_ON));
        assert_eq!(map.render(ON_OFF_BTN_STATE), "");
    }
}
