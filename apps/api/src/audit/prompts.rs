// Audit LLM prompt templates and response schema.

use serde_json::{json, Value};

use crate::llm_client::prompts::{skills_phrase, JSON_ONLY_INSTRUCTION};
use crate::models::profile::UserData;

/// Radar chart axes, in display order.
pub const RADAR_DIMENSIONS: [&str; 5] = [
    "Technical",
    "Academic",
    "Leadership",
    "Digital Brand",
    "Market Value",
];

/// User-supplied text (role, city) is interpolated once; it is never
/// rescanned for placeholders.
pub fn build_audit_system(profile: &UserData) -> String {
    let radar = RADAR_DIMENSIONS
        .iter()
        .map(|d| format!("\"{d}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a high-speed Executive Career Engine.
Analyze the candidate for the \"{target_role}\" role instantly.
{location_context}

PROTOCOLS:
1. BIO: Rewrite LinkedIn Bio.
2. RESUME: 3 punchy bullet edits.
3. GITHUB: 3 technical fixes.
4. LIVE MARKET: Find 10 REAL, ACTIVE job/internship URLs. Use Google Search tool.
5. SKILLS: Find 3 REAL Coursera/Udemy courses for gaps.
6. RADAR: Generate 5 scores (0-100) for dimensions: [{radar}].
7. QUALITY: Rate the LinkedIn presence, GitHub portfolio and resume from 0 to 10.

{JSON_ONLY_INSTRUCTION}",
        target_role = profile.target_role,
        location_context = location_context(profile),
    )
}

fn location_context(profile: &UserData) -> String {
    match &profile.location {
        Some(loc) => {
            let city = loc
                .city
                .as_deref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default();
            format!(
                "The user is located near Lat: {}, Lng: {}{}. Prioritize local opportunities.",
                loc.latitude, loc.longitude, city
            )
        }
        None => String::new(),
    }
}

pub fn build_audit_prompt(profile: &UserData) -> String {
    let mut prompt = format!(
        "Target: {}\nSkills: {}\nGPA: {}\nProjects: {}\nExperience: {}",
        profile.target_role,
        skills_phrase(&profile.skills, usize::MAX),
        profile.gpa,
        profile.projects_count,
        profile.experience_roles.join(", "),
    );
    if !profile.linkedin_url.is_empty() {
        prompt.push_str(&format!("\nLinkedIn: {}", profile.linkedin_url));
    }
    if !profile.linkedin_summary.trim().is_empty() {
        prompt.push_str(&format!("\nLinkedIn Summary: {}", profile.linkedin_summary.trim()));
    }
    if !profile.github_url.is_empty() {
        prompt.push_str(&format!("\nGitHub: {}", profile.github_url));
    }
    prompt
}

/// Response schema in the vendor's OpenAPI subset. Mirrors `AuditOutput`.
pub fn audit_response_schema() -> Value {
    let string_array = json!({ "type": "ARRAY", "items": { "type": "STRING" } });

    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": { "type": "STRING" },
            "linkedinInsight": { "type": "STRING" },
            "githubInsight": { "type": "STRING" },
            "resumeInsight": { "type": "STRING" },
            "linkedinBioEdit": { "type": "STRING" },
            "resumeEdits": string_array,
            "githubActionItems": string_array,
            "missingSkills": string_array,
            "salaryRange": { "type": "STRING" },
            "linkedinVerified": { "type": "BOOLEAN" },
            "githubVerified": { "type": "BOOLEAN" },
            "radarData": {
                "type": "OBJECT",
                "properties": {
                    "labels": string_array,
                    "values": { "type": "ARRAY", "items": { "type": "NUMBER" } }
                },
                "required": ["labels", "values"]
            },
            "generatedOpportunities": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "NUMBER" },
                        "role": { "type": "STRING" },
                        "company": { "type": "STRING" },
                        "type": { "type": "STRING" },
                        "minScoreReq": { "type": "NUMBER" },
                        "skillsReq": string_array,
                        "description": { "type": "STRING" },
                        "sourceUrl": { "type": "STRING" },
                        "locationInfo": { "type": "STRING" }
                    },
                    "required": ["id", "role", "company", "type", "minScoreReq", "skillsReq", "description", "sourceUrl"]
                }
            },
            "recommendedCourses": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "platform": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["title", "platform", "url", "reason"]
                }
            },
            "roadmap": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "month": { "type": "STRING" },
                        "task": { "type": "STRING" },
                        "impact": { "type": "STRING" }
                    },
                    "required": ["month", "task", "impact"]
                }
            },
            "linkedinQualityScore": { "type": "NUMBER" },
            "githubQualityScore": { "type": "NUMBER" },
            "resumeQualityScore": { "type": "NUMBER" }
        },
        "required": [
            "verdict", "linkedinInsight", "githubInsight", "resumeInsight", "linkedinBioEdit",
            "resumeEdits", "githubActionItems", "missingSkills", "salaryRange",
            "linkedinVerified", "githubVerified", "generatedOpportunities", "recommendedCourses",
            "roadmap", "linkedinQualityScore", "githubQualityScore", "resumeQualityScore", "radarData"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::GeoLocation;

    #[test]
    fn test_system_names_target_role_and_radar_axes() {
        let profile = UserData {
            target_role: "Cloud Architect".into(),
            ..Default::default()
        };
        let system = build_audit_system(&profile);
        assert!(system.contains("\"Cloud Architect\" role"));
        assert!(system.contains("\"Digital Brand\""));
        assert!(!system.contains("Prioritize local"));
        assert!(!system.contains('{'));
    }

    #[test]
    fn test_system_does_not_expand_placeholders_in_user_text() {
        let profile = UserData {
            target_role: "{location_context} {json_only}".into(),
            location: Some(GeoLocation {
                latitude: 1.0,
                longitude: 2.0,
                city: Some("{target_role}".into()),
            }),
            ..Default::default()
        };
        let system = build_audit_system(&profile);
        assert!(system.contains("\"{location_context} {json_only}\" role"));
        assert!(system.contains("Lng: 2 ({target_role})"));
        assert_eq!(system.matches(JSON_ONLY_INSTRUCTION).count(), 1);
        assert_eq!(system.matches("Prioritize local opportunities").count(), 1);
    }

    #[test]
    fn test_system_includes_location_context() {
        let profile = UserData {
            location: Some(GeoLocation {
                latitude: 12.97,
                longitude: 77.59,
                city: Some("Bengaluru".into()),
            }),
            ..Default::default()
        };
        let system = build_audit_system(&profile);
        assert!(system.contains("Lat: 12.97, Lng: 77.59 (Bengaluru)"));
        assert!(system.contains("Prioritize local opportunities"));
    }

    #[test]
    fn test_prompt_lists_profile_facts() {
        let profile = UserData {
            skills: vec!["Rust".into(), "Kafka".into()],
            gpa: 9.1,
            projects_count: 3,
            experience_roles: vec!["Research Assistant".into()],
            github_url: "https://github.com/dev".into(),
            ..Default::default()
        };
        let prompt = build_audit_prompt(&profile);
        assert!(prompt.contains("Skills: Rust, Kafka"));
        assert!(prompt.contains("GPA: 9.1"));
        assert!(prompt.contains("Projects: 3"));
        assert!(prompt.contains("Experience: Research Assistant"));
        assert!(prompt.contains("GitHub: https://github.com/dev"));
        assert!(!prompt.contains("LinkedIn"));
    }

    #[test]
    fn test_schema_requires_quality_scores() {
        let schema = audit_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required.len(), 18);
        assert!(required.contains(&"resumeQualityScore"));
        assert_eq!(
            schema["properties"]["generatedOpportunities"]["items"]["properties"]["type"]["type"],
            "STRING"
        );
    }
}
