use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request payload for `POST /{persona}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AskRequest {
    pub client_id: String,
    /// Natural language question.
    pub query: String,
    /// Hex HMAC-SHA256 over `client_id` and `query`.
    pub signature: String,
}

impl AskRequest {
    /// Parameters covered by the signature.
    pub fn signed_params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("client_id".to_string(), self.client_id.clone()),
            ("query".to_string(), self.query.clone()),
        ])
    }
}

/// Response payload for `POST /{persona}`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Model answer, or the fallback text when answering failed.
    pub answer: String,
}
