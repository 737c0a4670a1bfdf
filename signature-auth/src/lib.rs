//! Request signing for the public API.
//!
//! A client signs its request parameters with a shared secret:
//!
//! ```text
//! signature = lowercase_hex(HMAC_SHA256(secret, canonical_encode(params)))
//! ```
//!
//! where `canonical_encode` sorts parameters by key and form-encodes them the
//! same way Python's `urllib.parse.urlencode` does (see [`canonical`]).
//!
//! ```
//! use std::collections::BTreeMap;
//! use signature_auth::{ClientRegistry, SignatureAuthenticator, sign};
//!
//! let registry = ClientRegistry::parse("client_1:F3VU4rFXzt7Rp").unwrap();
//! let auth = SignatureAuthenticator::new(registry);
//!
//! let params = BTreeMap::from([("client_id".to_string(), "client_1".to_string())]);
//! let sig = sign(b"F3VU4rFXzt7Rp", &params).unwrap();
//! assert!(auth.verify("client_1", &sig, &params));
//! ```

pub mod authenticator;
pub mod canonical;
pub mod errors;

pub use authenticator::{ClientRegistry, SignatureAuthenticator, sign};
pub use canonical::canonical_encode;
pub use errors::{AuthError, RegistryError};
