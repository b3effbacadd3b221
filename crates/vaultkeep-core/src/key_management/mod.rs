//! Key management
//!
//! The key hierarchy, from password to vault key:
//!
//! ```text
//! password ──KDF──▶ master key ──HKDF──▶ stretched key ──unwrap──▶ vault key
//!                                                                   │
//!                          session key (token) ◀──wrap─────────────┘
//! ```
//!
//! Only the server-wrapped and session-wrapped forms of the vault key are ever persisted.

mod accounts;
pub use accounts::{AccountInfo, ACCOUNTS, ACTIVE_ACCOUNT_ID};
mod key_hierarchy;
pub use key_hierarchy::{KeyHierarchyError, KeyHierarchyManager, UnlockParameters, VaultStatus};
mod protected_store;
pub use protected_store::{ProtectedBlobStore, ProtectedStoreError, PROTECTED_PREFIX};
mod session;
pub use session::{SessionToken, VaultKeyHandle};
