//! Onboarding catalog: the target roles and milestone badges the profile
//! form offers.

pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const CAREER_ROLES: &[&str] = &[
    "Software Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Engineer",
    "Mobile App Developer",
    "Data Scientist",
    "AI/ML Engineer",
    "DevOps Engineer",
    "Cybersecurity Analyst",
    "Cloud Architect",
    "Product Manager",
    "UX/UI Designer",
    "Data Engineer",
    "QA Automation Engineer",
    "Embedded Systems Engineer",
    "Blockchain Developer",
    "Game Developer",
    "AR/VR Developer",
    "Site Reliability Engineer (SRE)",
    "Business Analyst",
    "Solutions Architect",
    "Technical Writer",
    "Digital Marketer",
    "Financial Analyst",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneCategory {
    Professional,
    Leadership,
    Academic,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Milestone {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub category: MilestoneCategory,
}

const fn milestone(
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    category: MilestoneCategory,
) -> Milestone {
    Milestone {
        id,
        label,
        icon,
        category,
    }
}

pub const MILESTONE_LIBRARY: &[Milestone] = &[
    milestone("freelance", "Freelance Developer", "code", MilestoneCategory::Professional),
    milestone("intern", "Corporate Intern", "corporate_fare", MilestoneCategory::Professional),
    milestone("hackathon", "Hackathon Finalist", "emoji_events", MilestoneCategory::Professional),
    milestone("opensource", "Open Source Contributor", "hub", MilestoneCategory::Professional),
    milestone("parttime", "Part-time Employee", "work", MilestoneCategory::Professional),
    milestone("workshop", "Workshop Facilitator", "groups", MilestoneCategory::Professional),
    milestone("founder", "Entrepreneurial Founder", "rocket_launch", MilestoneCategory::Leadership),
    milestone("club", "Academic Club Lead", "leaderboard", MilestoneCategory::Leadership),
    milestone("volunteer", "Volunteer Coordinator", "volunteer_activism", MilestoneCategory::Leadership),
    milestone("sports", "Sports Team Captain", "sports_soccer", MilestoneCategory::Leadership),
    milestone("pro_org", "Professional Org Chair", "account_balance", MilestoneCategory::Leadership),
    milestone("community", "Community Organizer", "public", MilestoneCategory::Leadership),
    milestone("research", "Research Assistant", "science", MilestoneCategory::Academic),
    milestone("teaching", "Teaching Assistant", "school", MilestoneCategory::Academic),
    milestone("tutor", "Tech Tutor", "menu_book", MilestoneCategory::Academic),
    milestone("fellow", "Academic Fellow", "workspace_premium", MilestoneCategory::Academic),
];

pub fn milestones_in(category: Option<MilestoneCategory>) -> Vec<Milestone> {
    MILESTONE_LIBRARY
        .iter()
        .filter(|m| category.map_or(true, |c| m.category == c))
        .copied()
        .collect()
}

/// Labels selected on the milestone board, split the way the scoring
/// formula consumes them.
#[derive(Debug, Default, PartialEq)]
pub struct MilestoneSelection {
    pub experience_roles: Vec<String>,
    pub leadership_types: Vec<String>,
}

/// Resolves milestone ids into labels. Leadership milestones feed
/// `leadership_types`; professional and academic ones feed `experience_roles`.
pub fn apply_milestones(ids: &[String]) -> Result<MilestoneSelection, AppError> {
    let mut selection = MilestoneSelection::default();

    for id in ids {
        let milestone = MILESTONE_LIBRARY
            .iter()
            .find(|m| m.id == id.trim())
            .ok_or_else(|| AppError::Validation(format!("Unknown milestone '{id}'")))?;

        let bucket = match milestone.category {
            MilestoneCategory::Leadership => &mut selection.leadership_types,
            _ => &mut selection.experience_roles,
        };
        if !bucket.iter().any(|l| l == milestone.label) {
            bucket.push(milestone.label.to_string());
        }
    }

    Ok(selection)
}
