//! Type-safe settings stored in a [KeyValueStore](crate::KeyValueStore).
//!
//! Every setting lives under a storage key of the form `global_{category}_{field}` or
//! `user_{userId}_{category}_{field}`. The naming scheme is shared with the other clients reading
//! the same data directory, so category and field names must not change.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use vaultkeep_state::{register_setting_key, settings::Setting, KeyValueStore, MemoryStore};
//!
//! register_setting_key!(const ACCESS_TOKEN: String = user("token", "accessToken"));
//!
//! let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
//! let setting = Setting::for_user(store, ACCESS_TOKEN, "9f4c");
//! assert_eq!(setting.storage_key(), "user_9f4c_token_accessToken");
//!
//! setting.update("eyJ...".to_owned())?;
//! assert_eq!(setting.get()?, Some("eyJ...".to_owned()));
//!
//! setting.delete()?;
//! assert_eq!(setting.get()?, None);
//! # Ok::<(), vaultkeep_state::settings::SettingsError>(())
//! ```

mod key;
mod setting;

pub use key::{Key, Scope};
pub use setting::{Setting, SettingsError};
