use std::cell::RefCell;
use std::rc::Rc;

/// Identity of an element within one menu session.
///
/// Allocated by [`MenuShared`] at construction time. Cosmetic config values
/// all share the sentinel key, so the freeze token is tracked by id rather
/// than by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u32);

/// A value-change notification drained by the owning menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Effective key of the value that changed (the sentinel for cosmetic ones).
    pub key: String,
}

/// Shared state of one menu session.
///
/// Replaces the ambient process-wide flags of a classic options screen with
/// an explicitly owned object handed to every element at construction.
/// Writer discipline per field:
///
/// - `config_changed`: raised by any value's change hook, cleared by the
///   menu after a successful save.
/// - freeze token: owned by at most one held element at a time; releasing is
///   a no-op unless the releasing element owns it.
/// - `description`: last writer in the update pass wins; read by the host's
///   status surface after the pass.
#[derive(Debug, Default)]
pub struct MenuShared {
    config_changed: bool,
    freeze_owner: Option<ElementId>,
    description: String,
    pending: Vec<ChangeEvent>,
    next_id: u32,
}

/// Handle passed into every element at construction.
///
/// The menu layer is single-threaded and frame-driven, so a plain
/// `Rc<RefCell<_>>` is sufficient; no borrow is ever held across a frame.
pub type MenuSharedHandle = Rc<RefCell<MenuShared>>;

impl MenuShared {
    pub fn new_handle() -> MenuSharedHandle {
        Rc::new(RefCell::new(MenuShared::default()))
    }

    pub(crate) fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Whether any persisted value differs from its last-saved state.
    pub fn config_changed(&self) -> bool {
        self.config_changed
    }

    pub(crate) fn mark_changed(&mut self) {
        self.config_changed = true;
    }

    pub(crate) fn clear_changed(&mut self) {
        self.config_changed = false;
    }

    /// Whether input to sibling elements is currently suspended.
    pub fn is_frozen(&self) -> bool {
        self.freeze_owner.is_some()
    }

    pub(crate) fn freeze(&mut self, owner: ElementId) {
        if let Some(prev) = self.freeze_owner {
            if prev != owner {
                tracing::warn!("Freeze token moved from {:?} to {:?}", prev, owner);
            }
        }
        self.freeze_owner = Some(owner);
    }

    /// Release the freeze only if `owner` actually holds it.
    pub(crate) fn unfreeze(&mut self, owner: ElementId) {
        if self.freeze_owner == Some(owner) {
            self.freeze_owner = None;
        }
    }

    /// Description of the element last highlighted during the update pass.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    pub(crate) fn push_change(&mut self, key: impl Into<String>) {
        self.pending.push(ChangeEvent { key: key.into() });
    }

    pub(crate) fn take_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }
}
