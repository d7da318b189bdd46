use std::{path::Path, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{Field, MultipartRejection},
    },
    routing::post,
};
use log::{debug, info, warn};
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    config::UploadConfig,
    services::{
        entities::CheckResponse,
        errors::{Error, Result},
    },
};

/// Name of the multipart field carrying the audio file
pub const FILE_FIELD: &str = "file";

/// Shared upload settings handed to [`check`]
pub type UploadState = Arc<UploadConfig>;

/// Router serving `POST /check`, limited to `upload.max_bytes` per request
pub fn router(upload: UploadConfig) -> Router {
    let max_bytes = upload.max_bytes;
    Router::new()
        .route("/check", post(check))
        .layer(DefaultBodyLimit::max(max_bytes))
        .with_state(Arc::new(upload))
}

/// Accept an uploaded audio file and report whether it is copyrighted.
///
/// The file is stored for a future matcher; the verdict is always "not copyrighted".
pub async fn check(
    State(upload): State<UploadState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<CheckResponse>> {
    let mut multipart = multipart.map_err(|e| Error::InvalidRequest(e.body_text()))?;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| Error::InvalidRequest("Field `file` is not a file upload".into()))?;
        let path = upload
            .path_for(&filename)
            .ok_or_else(|| Error::InvalidRequest(format!("Invalid filename {filename:?}")))?;

        let written = store_field(&mut field, &path).await?;
        info!("Stored upload {filename:?} ({written} bytes) at {path:?}");

        return Ok(Json(CheckResponse {
            status: "ok".to_string(),
            copyrighted: false,
            filename,
        }));
    }

    Err(Error::InvalidRequest(format!("Field required: {FILE_FIELD}")))
}

// Stream a multipart field to disk. A partially written file is removed on failure.
async fn store_field(field: &mut Field<'_>, path: &Path) -> Result<u64> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    let mut file = fs::File::create(path).await?;

    let result = async {
        let mut written = 0u64;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok::<_, Error>(written)
    }
    .await;

    if result.is_err() {
        drop(file);
        if let Err(e) = fs::remove_file(path).await {
            warn!("Failed to remove partial upload {path:?}: {e}");
        }
    }
    result
}
