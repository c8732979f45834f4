use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::errors::AppError;
use crate::models::profile::UserData;

/// Largest accepted resume upload, after base64 decoding.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// Request-body cap for audit submissions: a maximal resume in base64
/// plus 1 MiB for the rest of the profile JSON.
pub const MAX_AUDIT_BODY_BYTES: usize = (MAX_RESUME_BYTES + 2) / 3 * 4 + 1024 * 1024;

pub const ALLOWED_RESUME_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Decoded resume upload ready for object storage.
#[derive(Debug, PartialEq)]
pub struct ResumeUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Rejects profiles the scoring formula or the auditor cannot work with.
pub fn validate_profile(profile: &UserData) -> Result<(), AppError> {
    if profile.target_role.trim().is_empty() {
        return Err(AppError::Validation("targetRole cannot be empty".to_string()));
    }

    if !profile.gpa.is_finite() || !(0.0..=10.0).contains(&profile.gpa) {
        return Err(AppError::Validation(format!(
            "gpa must be between 0 and 10, got {}",
            profile.gpa
        )));
    }

    if let Some(loc) = &profile.location {
        if !(-90.0..=90.0).contains(&loc.latitude) || !(-180.0..=180.0).contains(&loc.longitude) {
            return Err(AppError::Validation(format!(
                "location out of range: ({}, {})",
                loc.latitude, loc.longitude
            )));
        }
    }

    decode_resume(profile)?;
    Ok(())
}

/// Decodes the inline resume, if any.
///
/// The base64 payload and its mime type travel together: one without the
/// other is a validation error.
pub fn decode_resume(profile: &UserData) -> Result<Option<ResumeUpload>, AppError> {
    let data = profile.resume_base64.as_deref().filter(|d| !d.is_empty());
    let mime = profile.resume_mime_type.as_deref().filter(|m| !m.is_empty());

    let (data, mime) = match (data, mime) {
        (None, None) => return Ok(None),
        (Some(_), None) => {
            return Err(AppError::Validation(
                "resumeMimeType is required when resumeBase64 is present".to_string(),
            ))
        }
        // A stored profile keeps the mime type after the payload moved to storage.
        (None, Some(_)) => return Ok(None),
        (Some(data), Some(mime)) => (data, mime),
    };

    if !profile.resume_uploaded {
        return Err(AppError::Validation(
            "resumeUploaded must be true when a resume is attached".to_string(),
        ));
    }

    if !ALLOWED_RESUME_MIME_TYPES.contains(&mime) {
        return Err(AppError::Validation(format!(
            "Unsupported resume type '{mime}'"
        )));
    }

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::Validation(format!("resumeBase64 is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Resume file is empty".to_string()));
    }
    if bytes.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(format!(
            "Resume exceeds {} MiB",
            MAX_RESUME_BYTES / (1024 * 1024)
        )));
    }

    Ok(Some(ResumeUpload {
        bytes,
        mime_type: mime.to_string(),
    }))
}

/// Trims list entries, drops blanks and collapses case-insensitive duplicates
/// (first spelling wins).
pub fn normalize_profile(mut profile: UserData) -> UserData {
    profile.target_role = profile.target_role.trim().to_string();
    profile.linkedin_url = profile.linkedin_url.trim().to_string();
    profile.github_url = profile.github_url.trim().to_string();
    profile.skills = dedup_entries(profile.skills);
    profile.coursera_courses = dedup_entries(profile.coursera_courses);
    profile.leadership_types = dedup_entries(profile.leadership_types);
    profile.experience_roles = dedup_entries(profile.experience_roles);
    profile
}

fn dedup_entries(entries: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(entries.len());
    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        result.push(trimmed.to_string());
    }
    result
}
