//! Credential wrapper that never prints its contents.

use std::fmt;

use zeroize::Zeroizing;

/// A credential such as an API key or access token.
///
/// The value is wiped from memory on drop and redacted from `Debug` output.
///
/// # Examples
/// ```
/// use devassist::domain::Secret;
///
/// let key = Secret::new("sk-live-123");
/// assert_eq!(format!("{key:?}"), "Secret(****)");
/// assert_eq!(key.expose(), "sk-live-123");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Wrap a credential, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(Zeroizing::new(value.trim().to_owned()))
    }

    /// Borrow the raw credential for an outbound call.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Whether a credential has been set.
    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            f.write_str("Secret(****)")
        } else {
            f.write_str("Secret(<unset>)")
        }
    }
}
