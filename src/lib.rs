//! Configurable-value layer for frame-driven options menus.
//!
//! Every setting is a [`ConfigValue`]: a unique key bound to a string-backed
//! value with typed int/float/bool views, change tracking that feeds the
//! owning [`Menu`]'s save control, an interaction-freeze lock, and a
//! reset-to-default lifecycle. Shared menu state lives in an explicitly
//! owned [`MenuShared`] handed to every element at construction.

pub mod element;
pub mod error;
pub mod menu;
pub mod shared;
pub mod store;
pub mod value;

pub use element::{ElementCore, ElementShape, UiElement};
pub use error::{MenuError, MenuResult, StoreError};
pub use menu::{Menu, SAVE_LABEL_IDLE, SAVE_LABEL_PENDING};
pub use shared::{ChangeEvent, ElementId, MenuShared, MenuSharedHandle};
pub use store::{store_path, ValueStore};
pub use value::{ConfigValue, RESERVED_PREFIX, SENTINEL_KEY};
