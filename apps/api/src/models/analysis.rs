use serde::{Deserialize, Serialize};

use crate::models::opportunity::CareerOpportunity;

/// Per-category points from the deterministic readiness formula.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub skills: f64,
    pub projects: f64,
    pub internships: f64,
    pub coursera: f64,
    pub linkedin: f64,
    pub github: f64,
    pub resume: f64,
    pub academics: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

impl RadarData {
    /// Pairs labels with values (dropping the unmatched tail) and clamps
    /// each value to 0–100.
    pub fn normalized(self) -> Self {
        let len = self.labels.len().min(self.values.len());
        let labels = self.labels.into_iter().take(len).collect();
        let values = self
            .values
            .into_iter()
            .take(len)
            .map(|v| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 })
            .collect();
        Self { labels, values }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub month: String,
    pub task: String,
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub platform: String,
    pub url: String,
    pub reason: String,
}

/// A web source the model cited while searching for live listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingLink {
    pub title: String,
    pub uri: String,
}

/// The merged audit: deterministic score plus everything the model returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: ScoreBreakdown,
    pub radar_data: RadarData,
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
    pub linkedin_verified: bool,
    pub github_verified: bool,
    pub generated_opportunities: Vec<CareerOpportunity>,
    #[serde(default)]
    pub grounding_links: Vec<GroundingLink>,
}

impl AnalysisResult {
    /// Salary range as displayed on the dashboard, always in rupees.
    pub fn formatted_salary(&self) -> String {
        if self.salary_range.contains('₹') {
            self.salary_range.clone()
        } else {
            format!("₹{}", self.salary_range)
        }
    }

    pub fn find_opportunity(&self, id: i64) -> Option<&CareerOpportunity> {
        self.generated_opportunities.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radar_normalized_truncates_and_clamps() {
        let radar = RadarData {
            labels: vec!["Technical".into(), "Academic".into(), "Leadership".into()],
            values: vec![120.0, -5.0],
        }
        .normalized();
        assert_eq!(radar.labels.len(), 2);
        assert_eq!(radar.values, vec![100.0, 0.0]);
    }

    #[test]
    fn test_radar_normalized_replaces_nan() {
        let radar = RadarData {
            labels: vec!["Technical".into()],
            values: vec![f64::NAN],
        }
        .normalized();
        assert_eq!(radar.values, vec![0.0]);
    }
}
