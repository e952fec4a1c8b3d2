use std::rc::Rc;

use ratatui::layout::{Position, Rect};

use crate::element::{ElementCore, ElementShape, UiElement};
use crate::shared::{ElementId, MenuSharedHandle};

/// Key prefix that marks a config value as cosmetic.
pub const RESERVED_PREFIX: char = '_';

/// Effective key shared by every cosmetic value. Cosmetic values are never
/// persisted, so collisions on the sentinel are harmless.
pub const SENTINEL_KEY: &str = "_";

/// A configurable setting tied to a unique key.
///
/// The stored value is always a string; the typed views parse it on read and
/// serialize back through the same change-detection path on write. A config
/// value stays inert until the owning menu runs its init step: assignments
/// made during setup replace the value silently, while assignments after
/// init raise the shared unsaved-changes flag and queue a change event for
/// the menu.
pub struct ConfigValue {
    core: ElementCore,
    shared: MenuSharedHandle,
    id: ElementId,
    key: String,
    cosmetic: bool,
    value: String,
    default_value: String,
    /// Display/interaction-disable flag. Blocks interactive editing and
    /// description publishing, never programmatic setters.
    pub greyed_out: bool,
    held: bool,
    initialized: bool,
}

impl ConfigValue {
    /// Rectangular config value. Pass an empty key to make it cosmetic.
    pub fn new(shared: &MenuSharedHandle, area: Rect, key: &str, default_value: &str) -> Self {
        Self::with_shape(shared, ElementShape::Rect(area), key, default_value)
    }

    /// Circular config value. `pos` is the bottom-left anchor, not the center.
    pub fn circular(
        shared: &MenuSharedHandle,
        pos: Position,
        radius: u16,
        key: &str,
        default_value: &str,
    ) -> Self {
        Self::with_shape(shared, ElementShape::Circle { pos, radius }, key, default_value)
    }

    fn with_shape(
        shared: &MenuSharedHandle,
        shape: ElementShape,
        key: &str,
        default_value: &str,
    ) -> Self {
        let (key, cosmetic) = if key.is_empty() || key.starts_with(RESERVED_PREFIX) {
            (SENTINEL_KEY.to_string(), true)
        } else {
            (key.to_string(), false)
        };
        let id = shared.borrow_mut().allocate_id();

        ConfigValue {
            core: ElementCore::new(shape),
            shared: Rc::clone(shared),
            id,
            key,
            cosmetic,
            value: default_value.to_string(),
            default_value: default_value.to_string(),
            greyed_out: false,
            held: false,
            initialized: false,
        }
    }

    /// Effective key: the supplied key, or the sentinel for cosmetic values.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cosmetic values are excluded from persistence.
    pub fn is_cosmetic(&self) -> bool {
        self.cosmetic
    }

    /// Value the instance restores on [`UiElement::reset`].
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value through change detection.
    ///
    /// Equal assignments are a no-op. Unequal assignments before the menu's
    /// init step replace the value silently; afterwards they fire the change
    /// hook exactly once.
    pub fn set_value(&mut self, new_value: impl Into<String>) {
        let new_value = new_value.into();
        if self.value == new_value {
            return;
        }
        self.value = new_value;
        if self.initialized {
            self.on_change();
        }
    }

    /// Replace the value without change detection or notification.
    ///
    /// This is the injection point for host-driven corrective updates such
    /// as loading persisted values; it never marks the configuration dirty.
    pub fn force_value(&mut self, new_value: impl Into<String>) {
        self.value = new_value.into();
    }

    /// Integer view of the value. Unparsable strings read as `0`.
    pub fn value_int(&self) -> i64 {
        self.value.trim().parse().unwrap_or(0)
    }

    pub fn set_value_int(&mut self, value: i64) {
        self.set_value(value.to_string());
    }

    /// Floating-point view of the value. Unparsable strings read as `0.0`.
    pub fn value_float(&self) -> f64 {
        self.value.trim().parse().unwrap_or(0.0)
    }

    pub fn set_value_float(&mut self, value: f64) {
        self.set_value(value.to_string());
    }

    /// Boolean view: only the literal `"true"` reads as `true`.
    pub fn value_bool(&self) -> bool {
        self.value == "true"
    }

    pub fn set_value_bool(&mut self, value: bool) {
        self.set_value(if value { "true" } else { "false" });
    }

    pub fn held(&self) -> bool {
        self.held
    }

    /// Take or release the interaction freeze.
    ///
    /// While held, the hosting menu suspends input to sibling elements. The
    /// freeze token is owned: releasing only unfreezes the menu if this
    /// instance is the current holder.
    pub fn set_held(&mut self, held: bool) {
        if self.held == held {
            return;
        }
        self.held = held;
        let mut shared = self.shared.borrow_mut();
        if held {
            shared.freeze(self.id);
        } else {
            shared.unfreeze(self.id);
        }
    }

    /// Framework-driven init step. Until this runs, value assignments do not
    /// fire the change hook.
    pub fn init(&mut self) {
        self.initialized = true;
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.core.set_description(text);
    }

    /// Set by the host when the pointer or focus enters/leaves this value.
    pub fn set_show_description(&mut self, show: bool) {
        self.core.set_show_description(show);
    }
}

impl UiElement for ConfigValue {
    fn shape(&self) -> ElementShape {
        self.core.shape()
    }

    fn description(&self) -> &str {
        self.core.description()
    }

    fn reset(&mut self) {
        self.core.reset();
        let default_value = self.default_value.clone();
        self.set_value(default_value);
        self.set_held(false);
    }

    fn on_change(&mut self) {
        self.core.on_change();
        tracing::debug!("Config value changed: {} = {}", self.key, self.value);
        let mut shared = self.shared.borrow_mut();
        shared.mark_changed();
        shared.push_change(self.key.clone());
    }

    fn update(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        self.core.update(dt);
        if self.core.show_description() && !self.greyed_out {
            let description = self.core.description().to_string();
            self.shared.borrow_mut().set_description(description);
        }
    }

    fn graf_update(&mut self, dt: f32) {
        self.core.graf_update(dt);
    }
}
