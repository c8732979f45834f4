use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::validation::ResumeUpload;

/// Object key for an uploaded resume: `resumes/<email-slug>/<uuid>`.
pub fn resume_key(email: &str, id: Uuid) -> String {
    let slug: String = email
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("resumes/{slug}/{id}")
}

/// Uploads the decoded resume and returns its object key.
pub async fn store_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    email: &str,
    upload: ResumeUpload,
) -> Result<String, AppError> {
    let key = resume_key(email, Uuid::new_v4());
    let size = upload.bytes.len();

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(upload.bytes))
        .content_type(upload.mime_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    info!("Stored resume ({size} bytes) at s3://{bucket}/{key}");
    Ok(key)
}
