use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vaultkeep_crypto::{EncString, Kdf};
use vaultkeep_state::register_setting_key;

/// Registry entry for an account that has logged in on this device.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[allow(missing_docs)]
    pub email: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub email_verified: bool,
    /// Display name, when the identity server provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

register_setting_key!(
    /// Every account that has logged in on this device, by user id.
    pub const ACCOUNTS: BTreeMap<Uuid, AccountInfo> = global("account", "accounts")
);
register_setting_key!(
    /// The account commands act on. Absent when logged out.
    pub const ACTIVE_ACCOUNT_ID: Uuid = global("account", "activeAccountId")
);

register_setting_key!(pub(crate) const ACCESS_TOKEN: String = user("token", "accessToken"));
register_setting_key!(pub(crate) const REFRESH_TOKEN: String = user("token", "refreshToken"));
register_setting_key!(pub(crate) const EXPIRES_ON: i64 = user("token", "expiresOn"));
register_setting_key!(pub(crate) const KDF_CONFIG: Kdf = user("kdfConfig", "kdfConfig"));
register_setting_key!(pub(crate) const MASTER_KEY_ENCRYPTED_USER_KEY: EncString = user("masterPassword", "masterKeyEncryptedUserKey"));
