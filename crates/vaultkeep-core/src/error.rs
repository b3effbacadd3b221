use thiserror::Error;

/// A server response or stored record lacked a field vaultkeep cannot do without.
///
/// Holds the expression that was checked, e.g. `raw.ciphers`.
#[derive(Debug, Error)]
#[error("missing field `{0}`")]
pub struct MissingFieldError(pub &'static str);

/// Unwrap an `Option`, returning [MissingFieldError] from the enclosing function when it is
/// `None`. The error is converted with `.into()` so any error type implementing
/// `From<MissingFieldError>` works.
#[macro_export]
macro_rules! require {
    ($field:expr) => {
        match $field {
            Some(value) => value,
            None => return Err($crate::MissingFieldError(stringify!($field)).into()),
        }
    };
}
