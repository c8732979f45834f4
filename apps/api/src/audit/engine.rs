//! Audit engine: pluggable, trait-based profile auditor.
//!
//! Default: `GeminiAuditor` (structured output + search grounding).
//! Tests substitute stub auditors through the same trait.
//!
//! `AppState` holds an `Arc<dyn ProfileAuditor>`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::audit::prompts::{
    audit_response_schema, build_audit_prompt, build_audit_system, RADAR_DIMENSIONS,
};
use crate::audit::scoring::{compute_score, AiQualityScores};
use crate::errors::AppError;
use crate::llm_client::{CallOptions, Content, LlmClient, Part};
use crate::models::analysis::{AnalysisResult, Course, GroundingLink, RadarData, RoadmapItem};
use crate::models::opportunity::{CareerOpportunity, OpportunityType};
use crate::models::profile::UserData;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Everything the model returns for one audit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditOutput {
    pub verdict: String,
    pub linkedin_insight: String,
    pub github_insight: String,
    pub resume_insight: String,
    pub linkedin_bio_edit: String,
    pub resume_edits: Vec<String>,
    pub github_action_items: Vec<String>,
    pub missing_skills: Vec<String>,
    pub salary_range: String,
    pub roadmap: Vec<RoadmapItem>,
    pub recommended_courses: Vec<Course>,
    pub linkedin_quality_score: f64,
    pub github_quality_score: f64,
    pub resume_quality_score: f64,
    pub linkedin_verified: bool,
    pub github_verified: bool,
    pub generated_opportunities: Vec<CareerOpportunity>,
    pub radar_data: RadarData,
    pub grounding_links: Vec<GroundingLink>,
}

impl AuditOutput {
    pub fn quality_scores(&self) -> AiQualityScores {
        AiQualityScores {
            linkedin: self.linkedin_quality_score,
            github: self.github_quality_score,
            resume: self.resume_quality_score,
        }
    }

    /// Clamps quality scores to 0–10 and squares up the radar series.
    pub fn sanitized(mut self) -> Self {
        let clamped = self.quality_scores().clamped();
        self.linkedin_quality_score = clamped.linkedin;
        self.github_quality_score = clamped.github;
        self.resume_quality_score = clamped.resume;
        self.radar_data = self.radar_data.normalized();
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ProfileAuditor: Send + Sync {
    async fn audit(&self, profile: &UserData) -> Result<AuditOutput, AppError>;
}

/// Auditor backed by the generative-AI vendor.
pub struct GeminiAuditor {
    llm: LlmClient,
    schema: Value,
}

impl GeminiAuditor {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            schema: audit_response_schema(),
        }
    }
}

#[async_trait]
impl ProfileAuditor for GeminiAuditor {
    async fn audit(&self, profile: &UserData) -> Result<AuditOutput, AppError> {
        let system = build_audit_system(profile);

        let mut parts = vec![Part::text(build_audit_prompt(profile))];
        if let Some((data, mime)) = profile.inline_resume() {
            parts.push(Part::inline(mime, data));
        }

        let options = CallOptions::default()
            .with_system(&system)
            .with_json_schema(&self.schema)
            .with_google_search();

        let response = self
            .llm
            .call(&[Content::user(parts)], options)
            .await
            .map_err(|e| AppError::Llm(format!("Profile audit failed: {e}")))?;

        let mut output: AuditOutput = response
            .json()
            .map_err(|e| AppError::Llm(format!("Profile audit returned malformed JSON: {e}")))?;
        output.grounding_links = response.grounding_links();

        Ok(output)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs the auditor, degrading to `fallback_audit` when the vendor call fails.
/// The user always gets a result; only the AI-derived parts are generic.
pub async fn run_audit(auditor: &dyn ProfileAuditor, profile: &UserData) -> AuditOutput {
    match auditor.audit(profile).await {
        Ok(output) => {
            info!(
                "AI audit complete for role '{}': {} opportunities, {} grounding links",
                profile.target_role,
                output.generated_opportunities.len(),
                output.grounding_links.len()
            );
            output.sanitized()
        }
        Err(e) => {
            warn!("AI audit failed, using standard protocol fallback: {e}");
            fallback_audit(profile)
        }
    }
}

/// Canned audit used when the model is unavailable.
pub fn fallback_audit(profile: &UserData) -> AuditOutput {
    AuditOutput {
        verdict: "Profile synchronized. Analysis complete using standard protocols.".into(),
        linkedin_insight: "Standard professional branding.".into(),
        github_insight: "Technical portfolio referenced.".into(),
        resume_insight: "Resume check skipped.".into(),
        linkedin_bio_edit: "Tech-focused professional dedicated to scalable solutions.".into(),
        resume_edits: vec!["Add quantifiable results.".into()],
        github_action_items: vec!["Optimize project documentation.".into()],
        missing_skills: vec!["Cloud Architecture".into()],
        salary_range: "6 - 12 LPA".into(),
        roadmap: vec![RoadmapItem {
            month: "Month 1".into(),
            task: "Portfolio Build".into(),
            impact: "+10 pts".into(),
        }],
        recommended_courses: vec![Course {
            title: "Industry Specialization".into(),
            platform: "Coursera".into(),
            url: "https://www.coursera.org".into(),
            reason: "Fills critical gap".into(),
        }],
        linkedin_quality_score: 5.0,
        github_quality_score: 5.0,
        resume_quality_score: 5.0,
        linkedin_verified: false,
        github_verified: false,
        generated_opportunities: vec![CareerOpportunity {
            id: 1,
            role: format!("{} Intern", profile.target_role),
            company: "TechNova".into(),
            opportunity_type: OpportunityType::Internship,
            min_score_req: 30.0,
            skills_req: vec!["Core Technicals".into()],
            description: "Work on cutting edge projects.".into(),
            source_url: "https://www.linkedin.com/jobs".into(),
            location_info: None,
        }],
        radar_data: RadarData {
            labels: RADAR_DIMENSIONS.iter().map(|d| d.to_string()).collect(),
            values: vec![60.0, 70.0, 50.0, 40.0, 65.0],
        },
        grounding_links: vec![],
    }
}

/// Merges the deterministic score with the model's critique.
pub fn build_analysis(profile: &UserData, audit: AuditOutput) -> AnalysisResult {
    let score = compute_score(profile, audit.quality_scores());

    AnalysisResult {
        score,
        radar_data: audit.radar_data,
        verdict: audit.verdict,
        linkedin_insight: audit.linkedin_insight,
        github_insight: audit.github_insight,
        resume_insight: audit.resume_insight,
        linkedin_bio_edit: audit.linkedin_bio_edit,
        resume_edits: audit.resume_edits,
        github_action_items: audit.github_action_items,
        missing_skills: audit.missing_skills,
        salary_range: audit.salary_range,
        roadmap: audit.roadmap,
        recommended_courses: audit.recommended_courses,
        linkedin_verified: audit.linkedin_verified,
        github_verified: audit.github_verified,
        generated_opportunities: audit.generated_opportunities,
        grounding_links: audit.grounding_links,
    }
}
