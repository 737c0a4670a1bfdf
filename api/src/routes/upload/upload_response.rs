use serde::Serialize;

/// Response payload for `POST /upload_file`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Where the file was stored on the server.
    pub upload_file_path: String,
}
