//! Client registry and HMAC-SHA256 signature verification.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::{
    canonical::canonical_encode,
    errors::{AuthError, RegistryError},
};

type HmacSha256 = Hmac<Sha256>;

/// Length of a SHA-256 MAC in bytes.
const MAC_LEN: usize = 32;

/// Computes `hex(HMAC-SHA256(secret, canonical_encode(params)))`.
pub fn sign(secret: &[u8], params: &BTreeMap<String, String>) -> Result<String, AuthError> {
    let mac = keyed_mac(secret, params)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn keyed_mac(secret: &[u8], params: &BTreeMap<String, String>) -> Result<HmacSha256, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::InvalidSecret)?;
    mac.update(canonical_encode(params).as_bytes());
    Ok(mac)
}

/// Immutable set of registered clients (`client_id → secret`).
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Vec<u8>>,
}

impl ClientRegistry {
    /// Parses `id:secret[,id:secret...]`. Whitespace around entries is ignored.
    ///
    /// ```
    /// use signature_auth::ClientRegistry;
    ///
    /// let r = ClientRegistry::parse("client_1:abc, client_2:xyz").unwrap();
    /// assert_eq!(r.len(), 2);
    /// assert!(ClientRegistry::parse("client_1").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let mut clients = HashMap::new();
        for (i, entry) in raw.split(',').map(str::trim).enumerate() {
            if entry.is_empty() {
                continue;
            }
            let (id, secret) = entry
                .split_once(':')
                .ok_or(RegistryError::MalformedEntry(i + 1))?;
            let (id, secret) = (id.trim(), secret.trim());
            if id.is_empty() {
                return Err(RegistryError::EmptyId(i + 1));
            }
            if secret.is_empty() {
                return Err(RegistryError::EmptySecret(id.to_string()));
            }
            if clients
                .insert(id.to_string(), secret.as_bytes().to_vec())
                .is_some()
            {
                return Err(RegistryError::Duplicate(id.to_string()));
            }
        }
        if clients.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { clients })
    }

    /// Builds a registry from explicit pairs (tests, tooling).
    pub fn from_pairs<I, K, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: AsRef<[u8]>,
    {
        Self {
            clients: pairs
                .into_iter()
                .map(|(k, s)| (k.into(), s.as_ref().to_vec()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn secret(&self, client_id: &str) -> Option<&[u8]> {
        self.clients.get(client_id).map(Vec::as_slice)
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.clients.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ClientRegistry")
            .field("clients", &ids)
            .finish()
    }
}

/// Verifies detached request signatures against the registry.
///
/// Pure: no I/O, no interior state. Unknown clients always fail, there is no
/// default secret.
#[derive(Debug, Clone)]
pub struct SignatureAuthenticator {
    registry: ClientRegistry,
}

impl SignatureAuthenticator {
    pub fn new(registry: ClientRegistry) -> Self {
        Self { registry }
    }

    /// `true` iff `signature` is the MAC of `params` under `client_id`'s secret.
    pub fn verify(
        &self,
        client_id: &str,
        signature: &str,
        params: &BTreeMap<String, String>,
    ) -> bool {
        self.authenticate(client_id, signature, params).is_ok()
    }

    /// Like [`SignatureAuthenticator::verify`], but says why verification failed.
    ///
    /// The MAC comparison is constant-time (`Mac::verify_slice`).
    pub fn authenticate(
        &self,
        client_id: &str,
        signature: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(), AuthError> {
        let secret = self.registry.secret(client_id).ok_or_else(|| {
            debug!(client_id, "rejecting request from unknown client");
            AuthError::UnknownClient
        })?;

        let claimed = hex::decode(signature.trim()).map_err(|_| AuthError::MalformedSignature)?;
        if claimed.len() != MAC_LEN {
            return Err(AuthError::MalformedSignature);
        }

        keyed_mac(secret, params)?
            .verify_slice(&claimed)
            .map_err(|_| {
                debug!(client_id, "signature mismatch");
                AuthError::SignatureMismatch
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "F3VU4rFXzt7Rp";

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn auth() -> SignatureAuthenticator {
        SignatureAuthenticator::new(ClientRegistry::from_pairs([("client_1", SECRET)]))
    }

    // Signatures produced by the existing Python clients
    // (`hmac.new(token, urlencode(params), sha256).hexdigest()`).

    #[test]
    fn matches_python_signer_for_query_request() {
        let p = params(&[
            ("client_id", "client_1"),
            ("query", "Сколько вы хотите получать?"),
        ]);
        let sig = sign(SECRET.as_bytes(), &p).unwrap();
        assert_eq!(
            sig,
            "377d017c37a49fc1a2db1c512a83f7b599ccfae3420769761ea1578c4341053b"
        );
        assert!(auth().verify("client_1", &sig, &p));
    }

    #[test]
    fn matches_python_signer_for_upload_request() {
        let p = params(&[("client_id", "client_1")]);
        assert_eq!(
            sign(SECRET.as_bytes(), &p).unwrap(),
            "e433fd1430ffe969f691c07c8961dffea7b00558e3dd3b9ad9a44380aa768ba5"
        );
    }

    #[test]
    fn matches_python_signer_for_reserved_characters() {
        let p = params(&[("a", "x y*~+&=/")]);
        assert_eq!(
            sign(b"k", &p).unwrap(),
            "caca7e0b4ce4d4e8d20e4db1c98ca1222733148a474f15e65be405b08bec963e"
        );
    }

    #[test]
    fn unknown_client_fails_closed() {
        let p = params(&[("client_id", "ghost")]);
        let sig = sign(SECRET.as_bytes(), &p).unwrap();
        assert_eq!(
            auth().authenticate("ghost", &sig, &p),
            Err(AuthError::UnknownClient)
        );
    }

    #[test]
    fn garbage_signature_is_malformed_not_a_panic() {
        let p = params(&[("client_id", "client_1")]);
        let odd_length = "0".repeat(63);
        for bad in ["", "zz", "abc", "deadbeef", odd_length.as_str()] {
            assert_eq!(
                auth().authenticate("client_1", bad, &p),
                Err(AuthError::MalformedSignature),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn extra_or_missing_parameter_breaks_signature() {
        let signed = params(&[("client_id", "client_1"), ("query", "hi")]);
        let sig = sign(SECRET.as_bytes(), &signed).unwrap();

        let extra = params(&[("client_id", "client_1"), ("query", "hi"), ("x", "1")]);
        let missing = params(&[("client_id", "client_1")]);

        assert_eq!(
            auth().authenticate("client_1", &sig, &extra),
            Err(AuthError::SignatureMismatch)
        );
        assert_eq!(
            auth().authenticate("client_1", &sig, &missing),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let p = params(&[("client_id", "client_1")]);
        let sig = sign(SECRET.as_bytes(), &p).unwrap().to_uppercase();
        assert!(auth().verify("client_1", &sig, &p));
    }

    #[test]
    fn registry_parse_rejects_bad_lists() {
        assert_eq!(
            ClientRegistry::parse("a:1,b").unwrap_err(),
            RegistryError::MalformedEntry(2)
        );
        assert_eq!(
            ClientRegistry::parse(":x").unwrap_err(),
            RegistryError::EmptyId(1)
        );
        assert_eq!(
            ClientRegistry::parse("a: ").unwrap_err(),
            RegistryError::EmptySecret("a".into())
        );
        assert_eq!(
            ClientRegistry::parse("a:1,a:2").unwrap_err(),
            RegistryError::Duplicate("a".into())
        );
        assert_eq!(ClientRegistry::parse(" , ").unwrap_err(), RegistryError::Empty);
    }

    #[test]
    fn registry_debug_hides_secrets() {
        let r = ClientRegistry::parse("client_1:F3VU4rFXzt7Rp").unwrap();
        let shown = format!("{r:?}");
        assert!(shown.contains("client_1"));
        assert!(!shown.contains(SECRET));
    }
}
