//! Error types for signature verification and client registry loading.

use thiserror::Error;

/// Why a request failed authentication.
///
/// Callers at the HTTP boundary should not echo which of `UnknownClient` and
/// `SignatureMismatch` happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No secret is registered for the claimed client id.
    #[error("unknown client")]
    UnknownClient,

    /// The signature is not lowercase/uppercase hex of a SHA-256 MAC.
    #[error("malformed signature")]
    MalformedSignature,

    /// The signature is well-formed but does not match the parameters.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The secret could not be used as an HMAC key.
    #[error("invalid signing secret")]
    InvalidSecret,
}

/// Problems in the `id:secret,...` client list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An entry is not of the form `id:secret`.
    #[error("malformed client entry #{0}: expected `id:secret`")]
    MalformedEntry(usize),

    /// Client id is empty.
    #[error("client entry #{0} has an empty id")]
    EmptyId(usize),

    /// Secret is empty.
    #[error("client `{0}` has an empty secret")]
    EmptySecret(String),

    /// Client id registered twice.
    #[error("client `{0}` is registered more than once")]
    Duplicate(String),

    /// No clients at all; every request would be rejected.
    #[error("no clients registered")]
    Empty,
}
