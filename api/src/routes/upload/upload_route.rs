//! POST /upload_file — stores a signed multipart upload under `UPLOAD_DIR`.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use signature_auth::SignatureAuthenticator;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::upload::upload_response::UploadResponse,
};

#[derive(Default)]
struct UploadForm {
    client_id: Option<String>,
    signature: Option<String>,
    file: Option<(Option<String>, Bytes)>,
    authenticated: bool,
}

impl UploadForm {
    /// Verifies the signature once both credentials are known; a no-op before
    /// that and after a successful check.
    fn try_authenticate(&mut self, auth: &SignatureAuthenticator) -> AppResult<()> {
        if self.authenticated {
            return Ok(());
        }
        let (Some(client_id), Some(signature)) = (&self.client_id, &self.signature) else {
            return Ok(());
        };
        let params = BTreeMap::from([("client_id".to_string(), client_id.clone())]);
        auth.authenticate(client_id, signature, &params)
            .inspect_err(|e| warn!(%client_id, reason = %e, "upload rejected"))?;
        self.authenticated = true;
        Ok(())
    }
}

/// Handler: POST /upload_file
///
/// Multipart fields: `file`, `client_id`, `signature` (signed params: `client_id`).
/// When the credentials precede `file`, a bad signature is rejected before the
/// file part is read. Otherwise the file is buffered (at most `UPLOAD_MAX_BYTES`)
/// and nothing is written until the signature checks out.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/upload_file \
///   -F client_id=client_1 -F signature=<hex> -F file=@cv.pdf
/// ```
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let form = read_form(multipart?, &state.authenticator).await?;

    let client_id = form
        .client_id
        .ok_or_else(|| AppError::Validation("missing field `client_id`".into()))?;
    if form.signature.is_none() {
        return Err(AppError::Validation("missing field `signature`".into()));
    }
    let (file_name, bytes) = form
        .file
        .ok_or_else(|| AppError::Validation("missing field `file`".into()))?;
    if !form.authenticated {
        return Err(AppError::Unauthorized);
    }

    let path = store_upload(&state.config.upload_dir, file_name.as_deref(), &bytes)
        .await
        .map_err(|e| {
            error!(error = %e, dir = %state.config.upload_dir.display(), "failed to store upload");
            AppError::UploadFailed
        })?;

    info!(%client_id, path = %path.display(), bytes = bytes.len(), "upload stored");
    Ok(Json(UploadResponse {
        upload_file_path: path.display().to_string(),
    }))
}

async fn read_form(
    mut multipart: Multipart,
    auth: &SignatureAuthenticator,
) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("client_id") if form.client_id.is_none() => {
                form.client_id = Some(field.text().await?);
                form.try_authenticate(auth)?;
            }
            Some("signature") if form.signature.is_none() => {
                form.signature = Some(field.text().await?);
                form.try_authenticate(auth)?;
            }
            Some("file") if form.file.is_none() => {
                let file_name = field.file_name().map(str::to_string);
                form.file = Some((file_name, field.bytes().await?));
            }
            Some(dup @ ("client_id" | "signature" | "file")) => {
                return Err(AppError::Validation(format!("duplicate field `{dup}`")));
            }
            Some(other) => {
                return Err(AppError::Validation(format!("unknown field `{other}`")));
            }
            None => return Err(AppError::Validation("unnamed multipart field".into())),
        }
    }
    Ok(form)
}

/// Writes `<uuid>_<basename>` into `dir` and returns the full path.
async fn store_upload(
    dir: &Path,
    file_name: Option<&str>,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}_{}", Uuid::new_v4(), safe_basename(file_name)));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Last path component; characters other than letters, digits and `._-`
/// become `_`. Falls back to `upload` when nothing usable is left.
fn safe_basename(file_name: Option<&str>) -> String {
    let base = file_name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
