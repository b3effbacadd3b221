use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use vaultkeep_crypto::{CryptoError, Kdf, MasterKey, SymmetricCryptoKey};
use vaultkeep_state::{
    settings::{Setting, SettingsError},
    KeyValueStore, StoreError,
};
use zeroize::Zeroizing;

use super::{
    accounts::{
        AccountInfo, ACCESS_TOKEN, ACCOUNTS, ACTIVE_ACCOUNT_ID, EXPIRES_ON, KDF_CONFIG,
        MASTER_KEY_ENCRYPTED_USER_KEY, REFRESH_TOKEN,
    },
    ProtectedBlobStore, ProtectedStoreError, SessionToken, VaultKeyHandle,
};
use crate::auth::LoginData;

/// Suffix of the protected entry holding the session-wrapped vault key.
const VAULT_AUTO_SUFFIX: &str = "_vault_auto";

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum KeyHierarchyError {
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("session expired — unlock again")]
    SessionExpiredOrInvalid,
    #[error("not logged in")]
    NotLoggedIn,
    /// The active account lacks a stored entry that login always writes.
    #[error("account {0} has no stored {1}, log in again")]
    MissingEntry(Uuid, &'static str),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ProtectedStoreError> for KeyHierarchyError {
    fn from(e: ProtectedStoreError) -> Self {
        match e {
            ProtectedStoreError::Store(e) => Self::Store(e),
            ProtectedStoreError::Crypto(e) => Self::Crypto(e),
        }
    }
}

/// Lock state of the active account.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultStatus {
    /// No active account.
    LoggedOut,
    /// Logged in, but the supplied session token (if any) doesn't unlock the vault.
    Locked {
        #[allow(missing_docs)]
        user_id: Uuid,
        #[allow(missing_docs)]
        email: String,
    },
    /// The supplied session token resolves to the vault key.
    Unlocked {
        #[allow(missing_docs)]
        user_id: Uuid,
        #[allow(missing_docs)]
        email: String,
    },
}

/// What a caller needs to derive the [MasterKey] of the active account before calling
/// [KeyHierarchyManager::unlock].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockParameters {
    pub user_id: Uuid,
    pub email: String,
    pub kdf: Kdf,
}

/// Moves the active account between the logged out, unlocked and locked states.
///
/// The manager holds no key material between calls. Session keys only exist inside the
/// [SessionToken] returned to the caller, and are passed back explicitly on every call that
/// needs the vault key.
pub struct KeyHierarchyManager {
    store: Arc<dyn KeyValueStore>,
    protected: ProtectedBlobStore,
}

impl KeyHierarchyManager {
    #[allow(missing_docs)]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            protected: ProtectedBlobStore::new(store.clone()),
            store,
        }
    }

    /// Log in with a password derived [MasterKey] and the server's identity response.
    ///
    /// Unwraps the vault key, re-wraps it under a freshly generated session key and makes the
    /// account active. The returned token is the only copy of the session key.
    #[instrument(skip_all, fields(user_id = %login.profile.user_id))]
    pub fn login(
        &self,
        master_key: &MasterKey,
        login: &LoginData,
    ) -> Result<SessionToken, KeyHierarchyError> {
        let user_key = unwrap_user_key(master_key, login)?;
        let user_id = login.profile.user_id;
        let user = user_id.to_string();

        let accounts = Setting::global(self.store.clone(), ACCOUNTS);
        let mut registry = accounts.get()?.unwrap_or_default();
        registry.insert(
            user_id,
            AccountInfo {
                email: login.profile.email.clone(),
                email_verified: login.profile.email_verified,
                name: login.profile.name.clone(),
            },
        );
        accounts.update(registry)?;

        Setting::for_user(self.store.clone(), ACCESS_TOKEN, &user)
            .update(login.tokens.access_token.clone())?;
        let refresh = Setting::for_user(self.store.clone(), REFRESH_TOKEN, &user);
        match &login.tokens.refresh_token {
            Some(token) => refresh.update(token.clone())?,
            None => refresh.delete()?,
        }
        Setting::for_user(self.store.clone(), EXPIRES_ON, &user)
            .update(login.tokens.expires_on)?;
        Setting::for_user(self.store.clone(), KDF_CONFIG, &user).update(login.kdf.clone())?;
        Setting::for_user(self.store.clone(), MASTER_KEY_ENCRYPTED_USER_KEY, &user)
            .update(login.user_key.clone())?;
        Setting::global(self.store.clone(), ACTIVE_ACCOUNT_ID).update(user_id)?;

        let token = self.wrap_for_session(user_id, &user_key)?;

        info!("logged in");
        Ok(token)
    }

    /// Unlock the already logged in active account, issuing a new session token.
    ///
    /// Every token issued before for this account stops resolving.
    #[instrument(skip_all)]
    pub fn unlock(&self, master_key: &MasterKey) -> Result<SessionToken, KeyHierarchyError> {
        let user_id = self.require_active_user()?;
        let user = user_id.to_string();

        let wrapped = Setting::for_user(self.store.clone(), MASTER_KEY_ENCRYPTED_USER_KEY, &user)
            .get()?
            .ok_or(KeyHierarchyError::MissingEntry(user_id, "vault key"))?;

        let user_key = master_key
            .decrypt_user_key(&wrapped)
            .map_err(map_unwrap_error)?;

        let token = self.wrap_for_session(user_id, &user_key)?;

        info!(%user_id, "unlocked");
        Ok(token)
    }

    /// Resolve a session token to the vault key of the active account.
    ///
    /// A token that is malformed, was issued before the latest login or unlock, or belongs to an
    /// account that has since logged out fails with [KeyHierarchyError::SessionExpiredOrInvalid].
    #[instrument(skip_all)]
    pub fn resolve(&self, token: &SessionToken) -> Result<VaultKeyHandle, KeyHierarchyError> {
        let session_key = token.to_key().map_err(|e| {
            debug!(%e, "session token could not be decoded");
            KeyHierarchyError::SessionExpiredOrInvalid
        })?;

        let user_id = self.require_active_user()?;

        let mut plaintext = match self.protected.get(&vault_auto_suffix(user_id), &session_key) {
            Ok(Some(plaintext)) => Zeroizing::new(plaintext),
            Ok(None) => {
                debug!(%user_id, "no session wrapped vault key stored");
                return Err(KeyHierarchyError::SessionExpiredOrInvalid);
            }
            Err(ProtectedStoreError::Crypto(e)) => {
                debug!(%user_id, %e, "session wrapped vault key did not decrypt");
                return Err(KeyHierarchyError::SessionExpiredOrInvalid);
            }
            Err(ProtectedStoreError::Store(e)) => return Err(e.into()),
        };

        let vault_key = SymmetricCryptoKey::try_from(plaintext.as_mut_slice()).map_err(|e| {
            warn!(%user_id, %e, "session wrapped vault key has an invalid layout");
            KeyHierarchyError::SessionExpiredOrInvalid
        })?;

        Ok(VaultKeyHandle::new(vault_key))
    }

    /// Lock the vault.
    ///
    /// Locking is the caller discarding its session token, nothing stored changes. The next
    /// [KeyHierarchyManager::unlock] invalidates any copy of the token left behind.
    #[instrument(skip_all)]
    pub fn lock(&self) {
        debug!("lock requested, the session token is discarded by the caller");
    }

    /// Log out the active account, erasing everything stored for it.
    #[instrument(skip_all)]
    pub fn logout(&self) -> Result<(), KeyHierarchyError> {
        let user_id = self.require_active_user()?;
        let user = user_id.to_string();

        Setting::for_user(self.store.clone(), ACCESS_TOKEN, &user).delete()?;
        Setting::for_user(self.store.clone(), REFRESH_TOKEN, &user).delete()?;
        Setting::for_user(self.store.clone(), EXPIRES_ON, &user).delete()?;
        Setting::for_user(self.store.clone(), KDF_CONFIG, &user).delete()?;
        Setting::for_user(self.store.clone(), MASTER_KEY_ENCRYPTED_USER_KEY, &user).delete()?;

        let accounts = Setting::global(self.store.clone(), ACCOUNTS);
        if let Some(mut registry) = accounts.get()? {
            registry.remove(&user_id);
            if registry.is_empty() {
                accounts.delete()?;
            } else {
                accounts.update(registry)?;
            }
        }
        Setting::global(self.store.clone(), ACTIVE_ACCOUNT_ID).delete()?;

        // Flushes all of the above together with the protected entry.
        self.protected.remove(&vault_auto_suffix(user_id))?;

        info!(%user_id, "logged out");
        Ok(())
    }

    /// Lock state of the active account, as seen with `token`.
    #[instrument(skip_all)]
    pub fn status(&self, token: Option<&SessionToken>) -> Result<VaultStatus, KeyHierarchyError> {
        let Some(user_id) = self.active_user_id()? else {
            return Ok(VaultStatus::LoggedOut);
        };
        let email = self.account(user_id)?.map(|a| a.email).unwrap_or_default();

        let unlocked = match token {
            Some(token) => match self.resolve(token) {
                Ok(_) => true,
                Err(KeyHierarchyError::SessionExpiredOrInvalid) => false,
                Err(e) => return Err(e),
            },
            None => false,
        };

        Ok(if unlocked {
            VaultStatus::Unlocked { user_id, email }
        } else {
            VaultStatus::Locked { user_id, email }
        })
    }

    /// The stored KDF configuration and email of the active account.
    pub fn kdf_for_unlock(&self) -> Result<UnlockParameters, KeyHierarchyError> {
        let user_id = self.require_active_user()?;

        let kdf = Setting::for_user(self.store.clone(), KDF_CONFIG, &user_id.to_string())
            .get()?
            .ok_or(KeyHierarchyError::MissingEntry(user_id, "KDF config"))?;
        let email = self
            .account(user_id)?
            .map(|a| a.email)
            .ok_or(KeyHierarchyError::MissingEntry(user_id, "account entry"))?;

        Ok(UnlockParameters {
            user_id,
            email,
            kdf,
        })
    }

    /// The id of the active account, if any.
    pub fn active_user_id(&self) -> Result<Option<Uuid>, KeyHierarchyError> {
        Ok(Setting::global(self.store.clone(), ACTIVE_ACCOUNT_ID).get()?)
    }

    fn require_active_user(&self) -> Result<Uuid, KeyHierarchyError> {
        self.active_user_id()?.ok_or(KeyHierarchyError::NotLoggedIn)
    }

    fn account(&self, user_id: Uuid) -> Result<Option<AccountInfo>, KeyHierarchyError> {
        Ok(Setting::global(self.store.clone(), ACCOUNTS)
            .get()?
            .and_then(|mut registry| registry.remove(&user_id)))
    }

    /// Wrap the vault key under a new session key, replacing the previous protected entry.
    fn wrap_for_session(
        &self,
        user_id: Uuid,
        user_key: &SymmetricCryptoKey,
    ) -> Result<SessionToken, KeyHierarchyError> {
        let session_key = SymmetricCryptoKey::generate();
        let encoded = Zeroizing::new(user_key.to_encoded());

        self.protected
            .set(&vault_auto_suffix(user_id), &encoded, &session_key)?;

        Ok(SessionToken::from_key(&session_key))
    }
}

fn vault_auto_suffix(user_id: Uuid) -> String {
    format!("{user_id}{VAULT_AUTO_SUFFIX}")
}

fn unwrap_user_key(
    master_key: &MasterKey,
    login: &LoginData,
) -> Result<SymmetricCryptoKey, KeyHierarchyError> {
    master_key
        .decrypt_user_key(&login.user_key)
        .map_err(map_unwrap_error)
}

fn map_unwrap_error(e: CryptoError) -> KeyHierarchyError {
    match e {
        CryptoError::AuthenticationFailed => KeyHierarchyError::IncorrectPassword,
        e => KeyHierarchyError::Crypto(e),
    }
}
