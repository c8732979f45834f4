// Coaching prompt templates: pitch, interview prep, mentor chat and speech.

use crate::llm_client::prompts::{skills_phrase, BREVITY_INSTRUCTION};
use crate::models::opportunity::CareerOpportunity;
use crate::models::profile::UserData;

/// Greeting shown before the user has sent anything.
pub const WELCOME_MESSAGE: &str =
    "Welcome to SkillSync! I am your Career Mentor. How can I help you optimize your readiness today?";

/// Bot reply when the vendor call fails mid-conversation.
pub const CHAT_ERROR_REPLY: &str = "I encountered a connection error. Please try again!";

pub const PITCH_ERROR_FALLBACK: &str = "Enthusiastic to apply for this position.";
pub const PITCH_EMPTY_FALLBACK: &str = "I am highly interested in this role.";

pub const PREP_ERROR_FALLBACK: &str =
    "Focus on your project experience and core fundamental concepts.";
pub const PREP_EMPTY_FALLBACK: &str = "Preparation content unavailable.";

/// Prebuilt voice used for the spoken verdict.
pub const VERDICT_VOICE: &str = "Kore";

pub fn build_mentor_system() -> String {
    format!(
        "You are the \"SkillSync Career Mentor\". {BREVITY_INSTRUCTION}\n\
         RULES: Career/SkillSync topics ONLY. Redirect everything else instantly."
    )
}

pub fn build_pitch_prompt(opportunity: &CareerOpportunity, profile: &UserData, total: u32) -> String {
    format!(
        "Quickly draft a 50-word pitch for {} at {}. Candidate score: {}/100. Mention specific skills like {}.",
        opportunity.role,
        opportunity.company,
        total,
        skills_phrase(&profile.skills, 2)
    )
}

pub fn build_prep_prompt(opportunity: &CareerOpportunity, profile: &UserData) -> String {
    format!(
        "As an expert interviewer at {}, provide 3 specific technical/behavioral interview questions \
         for the {} position tailored to a candidate with skills: {}. Include 1 \"pro tip\" for each.",
        opportunity.company,
        opportunity.role,
        skills_phrase(&profile.skills, usize::MAX)
    )
}

pub fn build_speech_prompt(verdict: &str) -> String {
    format!("Say clearly and quickly: {verdict}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::opportunity::OpportunityType;

    fn opportunity() -> CareerOpportunity {
        CareerOpportunity {
            id: 4,
            role: "Platform Engineer".into(),
            company: "Initech".into(),
            opportunity_type: OpportunityType::FullTime,
            min_score_req: 55.0,
            skills_req: vec!["Kubernetes".into()],
            description: String::new(),
            source_url: "https://initech.example/jobs/4".into(),
            location_info: None,
        }
    }

    fn profile() -> UserData {
        UserData {
            skills: vec!["Rust".into(), "Kubernetes".into(), "Terraform".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_pitch_prompt_uses_first_two_skills() {
        let prompt = build_pitch_prompt(&opportunity(), &profile(), 72);
        assert_eq!(
            prompt,
            "Quickly draft a 50-word pitch for Platform Engineer at Initech. \
             Candidate score: 72/100. Mention specific skills like Rust, Kubernetes."
        );
    }

    #[test]
    fn test_prep_prompt_lists_all_skills() {
        let prompt = build_prep_prompt(&opportunity(), &profile());
        assert!(prompt.starts_with("As an expert interviewer at Initech"));
        assert!(prompt.contains("for the Platform Engineer position"));
        assert!(prompt.contains("skills: Rust, Kubernetes, Terraform."));
        assert!(prompt.ends_with("Include 1 \"pro tip\" for each."));
    }

    #[test]
    fn test_mentor_system_restricts_topics() {
        let system = build_mentor_system();
        assert!(system.contains("\"SkillSync Career Mentor\""));
        assert!(system.contains("Fast, punchy responses only."));
        assert!(system.contains("Career/SkillSync topics ONLY"));
    }

    #[test]
    fn test_speech_prompt() {
        assert_eq!(build_speech_prompt("Strong."), "Say clearly and quickly: Strong.");
    }
}
