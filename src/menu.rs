use crossterm::event::{KeyCode, KeyEvent};

use crate::element::UiElement;
use crate::error::{MenuError, MenuResult};
use crate::shared::MenuSharedHandle;
use crate::store::ValueStore;
use crate::value::ConfigValue;

/// Save-control label while no edits are pending.
pub const SAVE_LABEL_IDLE: &str = "SAVE";

/// Save-control label once a change event has been drained.
pub const SAVE_LABEL_PENDING: &str = "APPLY";

/// Editing state for the focused value.
struct EditState {
    index: usize,
    buffer: String,
}

/// Owning container for a tab's config values.
///
/// The menu enforces key uniqueness across its non-cosmetic values, runs the
/// framework init step, fans out per-frame updates, and drains change events
/// into its save-control label. Input follows the usual options-screen flow:
/// Up/Down move focus, Enter toggles a boolean value in place or opens an
/// edit buffer for anything else, Enter/Esc commit or cancel. While a buffer
/// is open the edited value holds the interaction freeze, so siblings see no
/// input until the edit ends.
pub struct Menu {
    shared: MenuSharedHandle,
    values: Vec<ConfigValue>,
    focus: usize,
    editing: Option<EditState>,
    save_label: &'static str,
    initialized: bool,
}

impl Menu {
    pub fn new(shared: &MenuSharedHandle) -> Self {
        Menu {
            shared: shared.clone(),
            values: Vec::new(),
            focus: 0,
            editing: None,
            save_label: SAVE_LABEL_IDLE,
            initialized: false,
        }
    }

    pub fn shared(&self) -> &MenuSharedHandle {
        &self.shared
    }

    /// Add a config value, rejecting duplicate non-cosmetic keys.
    ///
    /// Cosmetic values all share the sentinel key and may be added freely.
    pub fn add(&mut self, value: ConfigValue) -> MenuResult<()> {
        if !value.is_cosmetic()
            && self
                .values
                .iter()
                .any(|v| !v.is_cosmetic() && v.key() == value.key())
        {
            return Err(MenuError::DuplicateKey(value.key().to_string()));
        }
        self.values.push(value);
        Ok(())
    }

    /// Framework init step: flips every owned value live.
    ///
    /// Values assigned before this point (defaults, loaded state) never fire
    /// the change hook.
    pub fn init(&mut self) {
        for value in &mut self.values {
            value.init();
        }
        self.initialized = true;
        tracing::info!("Menu initialized with {} config values", self.values.len());
    }

    /// Per-frame update: fan out to every value, then drain change events
    /// into the save-control label.
    pub fn update(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        for value in &mut self.values {
            value.update(dt);
        }
        let changes = self.shared.borrow_mut().take_changes();
        if !changes.is_empty() {
            self.save_label = SAVE_LABEL_PENDING;
            for change in &changes {
                tracing::debug!("Pending change: {}", change.key);
            }
        }
    }

    pub fn graf_update(&mut self, dt: f32) {
        for value in &mut self.values {
            value.graf_update(dt);
        }
    }

    /// Restore every value to its default, cancelling any open edit first.
    pub fn reset(&mut self) {
        if let Some(edit) = self.editing.take() {
            self.values[edit.index].set_held(false);
        }
        for value in &mut self.values {
            value.reset();
        }
        tracing::info!("Menu reset to defaults");
    }

    /// Current label of the save control.
    pub fn save_label(&self) -> &str {
        self.save_label
    }

    /// Called by the host after persisting: returns the save control to idle
    /// and clears the unsaved-changes flag.
    pub fn mark_saved(&mut self) {
        self.save_label = SAVE_LABEL_IDLE;
        self.shared.borrow_mut().clear_changed();
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.iter().find(|v| v.key() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.values.iter_mut().find(|v| v.key() == key)
    }

    pub fn values(&self) -> &[ConfigValue] {
        &self.values
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> Option<&ConfigValue> {
        self.values.get(self.focus)
    }

    /// The open edit buffer, if any, for the host to render.
    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.buffer.as_str())
    }

    /// Inject persisted values without firing change hooks.
    pub fn load_from(&mut self, store: &ValueStore) {
        for value in &mut self.values {
            if value.is_cosmetic() {
                continue;
            }
            if let Some(stored) = store.get(value.key()) {
                value.force_value(stored);
                tracing::debug!("Loaded {} = {}", value.key(), stored);
            }
        }
    }

    /// Write every non-cosmetic `key -> value` pair into the store.
    pub fn save_into(&self, store: &mut ValueStore) {
        for value in self.values.iter().filter(|v| !v.is_cosmetic()) {
            store.set(value.key(), value.value());
        }
    }

    /// Route a key event into the menu. Returns whether it was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.initialized || self.values.is_empty() {
            return false;
        }

        if let Some(edit) = self.editing.take() {
            return self.handle_editing_key(key, edit);
        }

        // While some element holds the freeze, siblings receive no input.
        if self.shared.borrow().is_frozen() {
            return false;
        }

        match key.code {
            KeyCode::Up => {
                if self.focus > 0 {
                    self.focus -= 1;
                    true
                } else {
                    // At the first value, let the host take focus back
                    false
                }
            }
            KeyCode::Down => {
                if self.focus + 1 < self.values.len() {
                    self.focus += 1;
                }
                true
            }
            KeyCode::Enter => {
                let value = &mut self.values[self.focus];
                if value.greyed_out {
                    return true;
                }
                // Two-state values toggle in place; everything else opens
                // an edit buffer seeded with the current value.
                if matches!(value.value(), "true" | "false") {
                    let toggled = !value.value_bool();
                    value.set_value_bool(toggled);
                    tracing::info!("Toggled {}: {}", value.key(), toggled);
                } else {
                    let buffer = value.value().to_string();
                    value.set_held(true);
                    tracing::info!("Started editing {}", value.key());
                    self.editing = Some(EditState {
                        index: self.focus,
                        buffer,
                    });
                }
                true
            }
            _ => false,
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent, mut edit: EditState) -> bool {
        match key.code {
            KeyCode::Enter => {
                let value = &mut self.values[edit.index];
                value.set_value(edit.buffer);
                value.set_held(false);
                tracing::info!("Committed {} = {}", value.key(), value.value());
            }
            KeyCode::Esc => {
                let value = &mut self.values[edit.index];
                value.set_held(false);
                tracing::info!("Cancelled editing {}", value.key());
            }
            KeyCode::Up if is_numeric(&edit.buffer) => {
                nudge(&mut edit.buffer, 1);
                self.editing = Some(edit);
            }
            KeyCode::Down if is_numeric(&edit.buffer) => {
                nudge(&mut edit.buffer, -1);
                self.editing = Some(edit);
            }
            KeyCode::Backspace => {
                edit.buffer.pop();
                self.editing = Some(edit);
            }
            KeyCode::Char(c) => {
                edit.buffer.push(c);
                self.editing = Some(edit);
            }
            _ => {
                // Consume every other key while a buffer is open
                self.editing = Some(edit);
            }
        }
        true
    }
}

fn is_numeric(buffer: &str) -> bool {
    buffer.trim().parse::<i64>().is_ok()
}

fn nudge(buffer: &mut String, delta: i64) {
    if let Ok(value) = buffer.trim().parse::<i64>() {
        *buffer = value.saturating_add(delta).to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::MenuShared;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_menu() -> Menu {
        let shared = MenuShared::new_handle();
        let mut menu = Menu::new(&shared);
        menu.add(ConfigValue::new(&shared, Rect::new(0, 0, 24, 1), "volume", "50"))
            .unwrap();
        menu.add(ConfigValue::new(
            &shared,
            Rect::new(0, 1, 24, 1),
            "fullscreen",
            "false",
        ))
        .unwrap();
        menu.add(ConfigValue::new(&shared, Rect::new(0, 2, 24, 1), "", "decor"))
            .unwrap();
        menu.init();
        menu
    }

    #[test]
    fn test_add_rejects_duplicate_key() {
        let shared = MenuShared::new_handle();
        let mut menu = Menu::new(&shared);
        menu.add(ConfigValue::new(&shared, Rect::new(0, 0, 24, 1), "volume", "50"))
            .unwrap();

        let result = menu.add(ConfigValue::new(
            &shared,
            Rect::new(0, 1, 24, 1),
            "volume",
            "80",
        ));
        assert!(matches!(result, Err(MenuError::DuplicateKey(k)) if k == "volume"));
    }

    #[test]
    fn test_add_accepts_many_cosmetic_values() {
        let shared = MenuShared::new_handle();
        let mut menu = Menu::new(&shared);
        menu.add(ConfigValue::new(&shared, Rect::new(0, 0, 24, 1), "", "a"))
            .unwrap();
        menu.add(ConfigValue::new(&shared, Rect::new(0, 1, 24, 1), "_deco", "b"))
            .unwrap();
        assert_eq!(menu.values().len(), 2);
    }

    #[test]
    fn test_init_gates_change_notification() {
        let shared = MenuShared::new_handle();
        let mut menu = Menu::new(&shared);
        menu.add(ConfigValue::new(&shared, Rect::new(0, 0, 24, 1), "volume", "50"))
            .unwrap();

        menu.get_mut("volume").unwrap().set_value("30");
        menu.update(0.016);
        assert_eq!(menu.save_label(), SAVE_LABEL_IDLE);

        menu.init();
        menu.get_mut("volume").unwrap().set_value("60");
        menu.update(0.016);
        assert_eq!(menu.save_label(), SAVE_LABEL_PENDING);
    }

    #[test]
    fn test_update_relabels_save_control_on_change() {
        let mut menu = sample_menu();
        assert_eq!(menu.save_label(), SAVE_LABEL_IDLE);

        menu.get_mut("volume").unwrap().set_value_int(75);
        menu.update(0.016);

        assert_eq!(menu.save_label(), SAVE_LABEL_PENDING);
        assert!(menu.shared().borrow().config_changed());
    }

    #[test]
    fn test_mark_saved_returns_to_idle() {
        let mut menu = sample_menu();
        menu.get_mut("volume").unwrap().set_value_int(75);
        menu.update(0.016);

        menu.mark_saved();

        assert_eq!(menu.save_label(), SAVE_LABEL_IDLE);
        assert!(!menu.shared().borrow().config_changed());
    }

    #[test]
    fn test_load_from_does_not_mark_dirty() {
        let mut menu = sample_menu();
        let mut store = ValueStore::new();
        store.set("volume", "85");
        store.set("fullscreen", "true");

        menu.load_from(&store);
        menu.update(0.016);

        assert_eq!(menu.get("volume").unwrap().value(), "85");
        assert!(menu.get("fullscreen").unwrap().value_bool());
        assert_eq!(menu.save_label(), SAVE_LABEL_IDLE);
        assert!(!menu.shared().borrow().config_changed());
    }

    #[test]
    fn test_save_into_skips_cosmetic_values() {
        let menu = sample_menu();
        let mut store = ValueStore::new();

        menu.save_into(&mut store);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("volume"), Some("50"));
        assert_eq!(store.get("fullscreen"), Some("false"));
        assert_eq!(store.get("_"), None);
    }

    #[test]
    fn test_enter_toggles_boolean_value() {
        let mut menu = sample_menu();
        menu.handle_key(key(KeyCode::Down)); // focus fullscreen

        assert!(menu.handle_key(key(KeyCode::Enter)));
        assert!(menu.get("fullscreen").unwrap().value_bool());

        assert!(menu.handle_key(key(KeyCode::Enter)));
        assert!(!menu.get("fullscreen").unwrap().value_bool());
    }

    #[test]
    fn test_edit_commit_fires_change_once() {
        let mut menu = sample_menu();

        menu.handle_key(key(KeyCode::Enter)); // open buffer on "volume"
        menu.handle_key(key(KeyCode::Backspace));
        menu.handle_key(key(KeyCode::Backspace));
        menu.handle_key(key(KeyCode::Char('7')));
        menu.handle_key(key(KeyCode::Char('5')));
        menu.handle_key(key(KeyCode::Enter)); // commit

        assert_eq!(menu.get("volume").unwrap().value(), "75");

        menu.update(0.016);
        assert_eq!(menu.save_label(), SAVE_LABEL_PENDING);
        assert!(menu.shared().borrow().config_changed());
    }

    #[test]
    fn test_edit_cancel_leaves_value_untouched() {
        let mut menu = sample_menu();

        menu.handle_key(key(KeyCode::Enter));
        menu.handle_key(key(KeyCode::Char('9')));
        menu.handle_key(key(KeyCode::Esc));

        assert_eq!(menu.get("volume").unwrap().value(), "50");
        menu.update(0.016);
        assert_eq!(menu.save_label(), SAVE_LABEL_IDLE);
    }

    #[test]
    fn test_editing_holds_the_freeze() {
        let mut menu = sample_menu();

        menu.handle_key(key(KeyCode::Enter));
        assert!(menu.shared().borrow().is_frozen());
        assert!(menu.get("volume").unwrap().held());

        menu.handle_key(key(KeyCode::Enter));
        assert!(!menu.shared().borrow().is_frozen());
        assert!(!menu.get("volume").unwrap().held());
    }

    #[test]
    fn test_numeric_buffer_nudges_with_arrows() {
        let mut menu = sample_menu();

        menu.handle_key(key(KeyCode::Enter));
        menu.handle_key(key(KeyCode::Up));
        menu.handle_key(key(KeyCode::Up));
        menu.handle_key(key(KeyCode::Down));
        assert_eq!(menu.edit_buffer(), Some("51"));

        menu.handle_key(key(KeyCode::Enter));
        assert_eq!(menu.get("volume").unwrap().value_int(), 51);
    }

    #[test]
    fn test_frozen_menu_blocks_navigation() {
        let mut menu = sample_menu();
        menu.get_mut("fullscreen").unwrap().set_held(true);

        assert!(!menu.handle_key(key(KeyCode::Down)));
        assert_eq!(menu.focus(), 0);
    }

    #[test]
    fn test_greyed_out_value_refuses_editing() {
        let mut menu = sample_menu();
        menu.get_mut("volume").unwrap().greyed_out = true;

        assert!(menu.handle_key(key(KeyCode::Enter)));
        assert!(menu.edit_buffer().is_none());
        assert_eq!(menu.get("volume").unwrap().value(), "50");
    }

    #[test]
    fn test_up_at_first_value_bubbles_to_host() {
        let mut menu = sample_menu();
        assert!(!menu.handle_key(key(KeyCode::Up)));

        menu.handle_key(key(KeyCode::Down));
        assert!(menu.handle_key(key(KeyCode::Up)));
        assert_eq!(menu.focus(), 0);
    }

    #[test]
    fn test_reset_restores_defaults_and_cancels_edit() {
        let mut menu = sample_menu();
        menu.get_mut("volume").unwrap().set_value_int(90);
        menu.handle_key(key(KeyCode::Down));
        menu.handle_key(key(KeyCode::Down)); // focus the cosmetic value
        menu.handle_key(key(KeyCode::Enter)); // open its edit buffer

        menu.reset();

        assert_eq!(menu.get("volume").unwrap().value(), "50");
        assert!(menu.edit_buffer().is_none());
        assert!(!menu.shared().borrow().is_frozen());
    }

    #[test]
    fn test_keys_ignored_before_init() {
        let shared = MenuShared::new_handle();
        let mut menu = Menu::new(&shared);
        menu.add(ConfigValue::new(&shared, Rect::new(0, 0, 24, 1), "volume", "50"))
            .unwrap();

        assert!(!menu.handle_key(key(KeyCode::Enter)));
        assert!(menu.edit_buffer().is_none());
    }
}
