//! Type-safe keys for settings storage.

use std::marker::PhantomData;

/// Register a type-safe settings key.
///
/// This macro is the primary way to create settings keys. It associates a storage category and
/// field with a value type at compile time, either for the whole installation (`global`) or for a
/// single account (`user`).
///
/// # Example
/// ```rust
/// use vaultkeep_state::register_setting_key;
///
/// register_setting_key!(
///     /// Id of the account commands act on.
///     pub const ACTIVE_ACCOUNT: String = global("account", "activeAccountId")
/// );
/// register_setting_key!(pub const ACCESS_TOKEN: String = user("token", "accessToken"));
/// ```
#[macro_export]
macro_rules! register_setting_key {
    ($(#[$meta:meta])* $vis:vis const $name:ident: $ty:ty = global($category:literal, $field:literal)) => {
        $(#[$meta])*
        $vis const $name: $crate::settings::Key<$ty> =
            $crate::settings::Key::new($crate::settings::Scope::Global, $category, $field);
    };
    ($(#[$meta:meta])* $vis:vis const $name:ident: $ty:ty = user($category:literal, $field:literal)) => {
        $(#[$meta])*
        $vis const $name: $crate::settings::Key<$ty> =
            $crate::settings::Key::new($crate::settings::Scope::User, $category, $field);
    };
}

/// Who a setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Shared by every account in the data directory.
    Global,
    /// Owned by a single account, the storage key embeds the user id.
    User,
}

/// Type-safe key for settings storage.
///
/// Use the [`register_setting_key!`](crate::register_setting_key) macro to create keys.
#[derive(Debug)]
pub struct Key<T> {
    scope: Scope,
    category: &'static str,
    field: &'static str,
    _marker: PhantomData<fn() -> T>,
}

// Derived impls would require `T: Clone`.
impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Key<T> {}

impl<T> Key<T> {
    #[doc(hidden)]
    pub const fn new(scope: Scope, category: &'static str, field: &'static str) -> Self {
        Self {
            scope,
            category,
            field,
            _marker: PhantomData,
        }
    }

    #[allow(missing_docs)]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Storage key for a global setting.
    pub(crate) fn global_name(&self) -> String {
        format!("global_{}_{}", self.category, self.field)
    }

    /// Storage key for a user setting.
    pub(crate) fn user_name(&self, user_id: &str) -> String {
        format!("user_{}_{}_{}", user_id, self.category, self.field)
    }
}
