use std::path::Path;

use common::error_code::{BackendError, ExternalServiceError};
use tracing::{debug, warn};
use uuid::Uuid;

/// Write an uploaded payment proof under `dir` and return its path.
pub async fn save_payment_image(dir: &str, user_id: &str, data: &[u8]) -> Result<String, BackendError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ExternalServiceError::FileStorage(e.to_string()))?;
    let file_name = format!("{}-{}", user_id, Uuid::new_v4());
    let path = Path::new(dir).join(file_name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| ExternalServiceError::FileStorage(e.to_string()))?;
    let path = path.to_string_lossy().into_owned();
    debug!("payment image stored at {}", path);
    Ok(path)
}

/// Pass `res` through, deleting the stored image when the upload could not be completed.
pub async fn keep_payment_image_if<T>(
    path: &str,
    res: Result<T, BackendError>,
) -> Result<T, BackendError> {
    if res.is_err() {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("remove orphaned payment image {} failed: {}", path, e);
        }
    }
    res
}
