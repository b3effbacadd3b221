//! Encrypted string types
//!
//! [EncString] is the envelope every encrypted value in a vault or local store is carried in.
//! It has a text representation used in vault records and a compact binary representation
//! used for the protected local storage entry.

mod symmetric;

use base64::{engine::general_purpose::STANDARD, Engine};
pub use symmetric::EncString;

use crate::error::{EncStringParseError, Result};

/// Split an encrypted string into its type and base64 parts.
///
/// `"2.aaa|bbb|ccc"` becomes `("2", ["aaa", "bbb", "ccc"])`.
fn split_enc_string(s: &str) -> Result<(&str, Vec<&str>), EncStringParseError> {
    let (header, body) = s.split_once('.').ok_or(EncStringParseError::NoType)?;
    Ok((header, body.split('|').collect()))
}

fn check_length(buf: &[u8], expected: usize) -> Result<(), EncStringParseError> {
    if buf.len() < expected {
        return Err(EncStringParseError::BufferTooShort {
            minimum: expected,
            got: buf.len(),
        });
    }
    Ok(())
}

fn from_b64_vec(s: &str) -> Result<Vec<u8>, EncStringParseError> {
    Ok(STANDARD.decode(s)?)
}

fn from_b64<const N: usize>(s: &str) -> Result<[u8; N], EncStringParseError> {
    let vec = from_b64_vec(s)?;
    let got = vec.len();
    vec.try_into()
        .map_err(|_| EncStringParseError::InvalidLength { expected: N, got })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_enc_string() {
        let (header, parts) = split_enc_string("2.aaa|bbb|ccc").unwrap();
        assert_eq!(header, "2");
        assert_eq!(parts, vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_split_enc_string_without_type() {
        assert!(matches!(
            split_enc_string("aaa|bbb|ccc"),
            Err(EncStringParseError::NoType)
        ));
    }

    #[test]
    fn test_from_b64_wrong_length() {
        let result = from_b64::<16>("AAAA");
        assert!(matches!(
            result,
            Err(EncStringParseError::InvalidLength {
                expected: 16,
                got: 3
            })
        ));
    }

    #[test]
    fn test_check_length() {
        assert!(check_length(&[0u8; 49], 49).is_ok());
        assert!(matches!(
            check_length(&[0u8; 10], 49),
            Err(EncStringParseError::BufferTooShort {
                minimum: 49,
                got: 10
            })
        ));
    }
}
