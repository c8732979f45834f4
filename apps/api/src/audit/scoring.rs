//! Deterministic readiness formula.
//!
//! Point tallies come from the profile form; the LinkedIn, GitHub and resume
//! categories blend in quality scores (0–10) supplied by the AI audit. Every
//! category is capped, and the caps sum to exactly 100.

use serde::{Deserialize, Serialize};

use crate::models::analysis::ScoreBreakdown;
use crate::models::profile::UserData;

pub const MAX_SKILL_POINTS: f64 = 10.0;
pub const MAX_PROJECT_POINTS: f64 = 10.0;
pub const MAX_COURSERA_POINTS: f64 = 10.0;
pub const MAX_INTERNSHIP_POINTS: f64 = 15.0;
pub const MAX_ACADEMIC_POINTS: f64 = 10.0;
pub const MAX_LINKEDIN_POINTS: f64 = 15.0;
pub const MAX_GITHUB_POINTS: f64 = 15.0;
pub const MAX_RESUME_POINTS: f64 = 15.0;

/// Upper bound of an AI quality score.
pub const MAX_QUALITY_SCORE: f64 = 10.0;

const LINKEDIN_PRESENCE_POINTS: f64 = 5.0;
const GITHUB_PRESENCE_POINTS: f64 = 5.0;

/// Quality scores the model assigns to the candidate's public footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AiQualityScores {
    pub linkedin: f64,
    pub github: f64,
    pub resume: f64,
}

impl AiQualityScores {
    pub fn clamped(self) -> Self {
        Self {
            linkedin: clamp_quality(self.linkedin),
            github: clamp_quality(self.github),
            resume: clamp_quality(self.resume),
        }
    }
}

/// Clamps a model-supplied quality score to `0..=10`; NaN and infinities become 0.
pub fn clamp_quality(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, MAX_QUALITY_SCORE)
    } else {
        0.0
    }
}

/// GPA on a 10-point scale mapped to 0–4 academic points.
pub fn gpa_points(gpa: f64) -> f64 {
    match gpa {
        g if g >= 9.5 => 4.0,
        g if g >= 8.5 => 3.0,
        g if g >= 7.5 => 2.0,
        g if g >= 6.5 => 1.0,
        _ => 0.0,
    }
}

/// Computes the readiness breakdown for a profile.
///
/// `total` is the rounded sum of the capped categories, so it never exceeds 100.
pub fn compute_score(profile: &UserData, ai: AiQualityScores) -> ScoreBreakdown {
    let ai = ai.clamped();

    let skills = (profile.skills.len() as f64 * 2.0).min(MAX_SKILL_POINTS);
    let projects = (profile.projects_count as f64 * 5.0).min(MAX_PROJECT_POINTS);
    let coursera = (profile.coursera_courses.len() as f64 * 5.0).min(MAX_COURSERA_POINTS);
    let internships = (profile.internships_count as f64 * 7.5).min(MAX_INTERNSHIP_POINTS);

    let academics = (gpa_points(profile.gpa)
        + (profile.experience_roles.len() as f64).min(3.0)
        + (profile.leadership_types.len() as f64 * 1.5).min(3.0))
    .min(MAX_ACADEMIC_POINTS);

    let linkedin_presence = if profile.linkedin_url.contains("linkedin.com") {
        LINKEDIN_PRESENCE_POINTS
    } else {
        0.0
    };
    let linkedin = (linkedin_presence + ai.linkedin).min(MAX_LINKEDIN_POINTS);

    let github_presence = if profile.github_url.contains("github.com") {
        GITHUB_PRESENCE_POINTS
    } else {
        0.0
    };
    let github = (github_presence + ai.github).min(MAX_GITHUB_POINTS);

    let resume = if profile.resume_uploaded {
        (ai.resume * 1.5).min(MAX_RESUME_POINTS)
    } else {
        0.0
    };

    let sum = skills + projects + coursera + internships + academics + linkedin + github + resume;

    ScoreBreakdown {
        total: sum.round() as u32,
        skills,
        projects,
        internships,
        coursera,
        linkedin,
        github,
        resume,
        academics,
    }
}

/// Coarse label for the composite score, shown beside the dashboard gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessBand {
    Elite,
    Competitive,
    Developing,
    Emerging,
}

impl ReadinessBand {
    pub fn for_total(total: u32) -> Self {
        match total {
            t if t >= 80 => ReadinessBand::Elite,
            t if t >= 60 => ReadinessBand::Competitive,
            t if t >= 40 => ReadinessBand::Developing,
            _ => ReadinessBand::Emerging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("skill-{i}")).collect()
    }

    fn empty_profile() -> UserData {
        UserData {
            gpa: 0.0,
            ..Default::default()
        }
    }

    fn full_profile() -> UserData {
        UserData {
            skills: skills(8),
            projects_count: 4,
            internships_count: 3,
            coursera_courses: skills(3),
            linkedin_url: "https://www.linkedin.com/in/dev".into(),
            github_url: "https://github.com/dev".into(),
            gpa: 9.8,
            leadership_types: skills(2),
            experience_roles: skills(4),
            resume_uploaded: true,
            ..Default::default()
        }
    }

    const PERFECT_AI: AiQualityScores = AiQualityScores {
        linkedin: 10.0,
        github: 10.0,
        resume: 10.0,
    };

    #[test]
    fn test_empty_profile_scores_zero() {
        let score = compute_score(&empty_profile(), AiQualityScores::default());
        assert_eq!(score.total, 0);
        assert_eq!(score, ScoreBreakdown::default());
    }

    #[test]
    fn test_maxed_profile_scores_one_hundred() {
        let score = compute_score(&full_profile(), PERFECT_AI);
        assert_eq!(score.skills, MAX_SKILL_POINTS);
        assert_eq!(score.projects, MAX_PROJECT_POINTS);
        assert_eq!(score.coursera, MAX_COURSERA_POINTS);
        assert_eq!(score.internships, MAX_INTERNSHIP_POINTS);
        assert_eq!(score.academics, MAX_ACADEMIC_POINTS);
        assert_eq!(score.linkedin, MAX_LINKEDIN_POINTS);
        assert_eq!(score.github, MAX_GITHUB_POINTS);
        assert_eq!(score.resume, MAX_RESUME_POINTS);
        assert_eq!(score.total, 100);
    }

    #[test]
    fn test_worked_example() {
        let profile = UserData {
            skills: skills(3),
            projects_count: 1,
            internships_count: 1,
            coursera_courses: skills(1),
            linkedin_url: "https://linkedin.com/in/asha".into(),
            github_url: "https://github.com/asha".into(),
            gpa: 8.7,
            leadership_types: skills(1),
            experience_roles: skills(2),
            resume_uploaded: true,
            ..Default::default()
        };
        let ai = AiQualityScores {
            linkedin: 7.0,
            github: 4.0,
            resume: 6.0,
        };
        let score = compute_score(&profile, ai);
        assert_eq!(score.skills, 6.0);
        assert_eq!(score.projects, 5.0);
        assert_eq!(score.coursera, 5.0);
        assert_eq!(score.internships, 7.5);
        // gpa 3 + roles 2 + leadership 1.5
        assert_eq!(score.academics, 6.5);
        assert_eq!(score.linkedin, 12.0);
        assert_eq!(score.github, 9.0);
        assert_eq!(score.resume, 9.0);
        assert_eq!(score.total, 60);
    }

    #[test]
    fn test_total_rounds_half_up() {
        let profile = UserData {
            internships_count: 1,
            ..empty_profile()
        };
        assert_eq!(compute_score(&profile, AiQualityScores::default()).total, 8);
    }

    #[test]
    fn test_gpa_thresholds() {
        assert_eq!(gpa_points(10.0), 4.0);
        assert_eq!(gpa_points(9.5), 4.0);
        assert_eq!(gpa_points(9.49), 3.0);
        assert_eq!(gpa_points(8.5), 3.0);
        assert_eq!(gpa_points(7.5), 2.0);
        assert_eq!(gpa_points(6.5), 1.0);
        assert_eq!(gpa_points(6.49), 0.0);
        assert_eq!(gpa_points(0.0), 0.0);
    }

    #[test]
    fn test_academics_capped_at_ten() {
        let profile = UserData {
            gpa: 9.9,
            experience_roles: skills(10),
            leadership_types: skills(10),
            ..empty_profile()
        };
        // 4 + 3 + 3
        assert_eq!(compute_score(&profile, AiQualityScores::default()).academics, 10.0);
    }

    #[test]
    fn test_resume_ignored_when_not_uploaded() {
        let profile = UserData {
            resume_uploaded: false,
            ..empty_profile()
        };
        assert_eq!(compute_score(&profile, PERFECT_AI).resume, 0.0);
    }

    #[test]
    fn test_links_score_ai_quality_without_valid_url() {
        let profile = UserData {
            linkedin_url: "https://example.com/me".into(),
            github_url: "gitlab.com/me".into(),
            ..empty_profile()
        };
        let score = compute_score(&profile, PERFECT_AI);
        assert_eq!(score.linkedin, 10.0);
        assert_eq!(score.github, 10.0);
    }

    #[test]
    fn test_ai_scores_clamped_before_use() {
        let profile = UserData {
            linkedin_url: "https://linkedin.com/in/x".into(),
            resume_uploaded: true,
            ..empty_profile()
        };
        let ai = AiQualityScores {
            linkedin: 42.0,
            github: -8.0,
            resume: f64::NAN,
        };
        let score = compute_score(&profile, ai);
        assert_eq!(score.linkedin, 15.0);
        assert_eq!(score.github, 0.0);
        assert_eq!(score.resume, 0.0);
    }

    #[test]
    fn test_total_monotonic_in_counts() {
        let mut previous = 0;
        for n in 0..12u32 {
            let profile = UserData {
                skills: skills(n as usize),
                projects_count: n,
                internships_count: n,
                coursera_courses: skills(n as usize),
                experience_roles: skills(n as usize),
                leadership_types: skills(n as usize),
                ..empty_profile()
            };
            let total = compute_score(&profile, AiQualityScores::default()).total;
            assert!(total >= previous, "total dropped at n={n}: {total} < {previous}");
            assert!(total <= 100);
            previous = total;
        }
    }

    #[test]
    fn test_total_monotonic_in_ai_scores() {
        let profile = full_profile();
        let mut previous = 0;
        for step in 0..=24 {
            let q = step as f64 * 0.5;
            let ai = AiQualityScores {
                linkedin: q,
                github: q,
                resume: q,
            };
            let total = compute_score(&profile, ai).total;
            assert!(total >= previous);
            previous = total;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_readiness_bands() {
        assert_eq!(ReadinessBand::for_total(100), ReadinessBand::Elite);
        assert_eq!(ReadinessBand::for_total(80), ReadinessBand::Elite);
        assert_eq!(ReadinessBand::for_total(79), ReadinessBand::Competitive);
        assert_eq!(ReadinessBand::for_total(40), ReadinessBand::Developing);
        assert_eq!(ReadinessBand::for_total(0), ReadinessBand::Emerging);
    }
}
