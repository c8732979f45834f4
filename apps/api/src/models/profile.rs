use serde::{Deserialize, Serialize};

use crate::catalog::CAREER_ROLES;

/// Approximate position supplied by the client; steers opportunity search
/// towards local listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Profile data collected by the onboarding form.
///
/// `resume_base64` only travels inbound: the audit pipeline moves the decoded
/// bytes to object storage and records `resume_storage_key` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects_count: u32,
    #[serde(default)]
    pub internships_count: u32,
    #[serde(default)]
    pub certifications_count: u32,
    #[serde(default)]
    pub coursera_courses: Vec<String>,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub linkedin_summary: String,
    #[serde(default)]
    pub github_url: String,
    pub gpa: f64,
    #[serde(default)]
    pub leadership_types: Vec<String>,
    #[serde(default)]
    pub experience_roles: Vec<String>,
    #[serde(default)]
    pub resume_uploaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_storage_key: Option<String>,
    pub target_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
}

impl Default for UserData {
    /// Mirrors the onboarding form's initial state.
    fn default() -> Self {
        Self {
            skills: vec![],
            projects_count: 0,
            internships_count: 0,
            certifications_count: 0,
            coursera_courses: vec![],
            linkedin_url: String::new(),
            linkedin_summary: String::new(),
            github_url: String::new(),
            gpa: 8.5,
            leadership_types: vec![],
            experience_roles: vec![],
            resume_uploaded: false,
            resume_base64: None,
            resume_mime_type: None,
            resume_storage_key: None,
            target_role: CAREER_ROLES[0].to_string(),
            location: None,
        }
    }
}

impl UserData {
    /// Returns the inline resume payload when both halves are present.
    pub fn inline_resume(&self) -> Option<(&str, &str)> {
        match (&self.resume_base64, &self.resume_mime_type) {
            (Some(data), Some(mime)) if !data.is_empty() => Some((data.as_str(), mime.as_str())),
            _ => None,
        }
    }

    /// Copy suitable for persistence: the raw upload is dropped.
    pub fn without_inline_resume(&self) -> Self {
        Self {
            resume_base64: None,
            ..self.clone()
        }
    }
}
