use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpportunityType {
    Internship,
    #[serde(rename = "Full-time")]
    FullTime,
    Contract,
    /// Anything else the model invents ("Part-time", "Freelance", ...).
    #[serde(other)]
    Other,
}

/// An AI-generated listing presented in the swipe deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerOpportunity {
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub id: i64,
    pub role: String,
    pub company: String,
    #[serde(rename = "type")]
    pub opportunity_type: OpportunityType,
    #[serde(default)]
    pub min_score_req: f64,
    #[serde(default)]
    pub skills_req: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_info: Option<String>,
}

/// Model output types ids as JSON numbers, which may arrive as `3` or `3.0`.
fn deserialize_numeric_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid opportunity id {number}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_time_and_float_id() {
        let json = r#"{"id":4.0,"role":"Backend Engineer","company":"Acme","type":"Full-time",
            "minScoreReq":55,"skillsReq":["Go"],"description":"d","sourceUrl":"https://acme.io/jobs/4"}"#;
        let opp: CareerOpportunity = serde_json::from_str(json).unwrap();
        assert_eq!(opp.id, 4);
        assert_eq!(opp.opportunity_type, OpportunityType::FullTime);
        assert!(opp.location_info.is_none());
    }

    #[test]
    fn test_unknown_type_falls_back_to_other() {
        let json = r#"{"id":1,"role":"r","company":"c","type":"Part-time"}"#;
        let opp: CareerOpportunity = serde_json::from_str(json).unwrap();
        assert_eq!(opp.opportunity_type, OpportunityType::Other);
    }

    #[test]
    fn test_serializes_type_field_name() {
        let opp = CareerOpportunity {
            id: 7,
            role: "Intern".into(),
            company: "TechNova".into(),
            opportunity_type: OpportunityType::Internship,
            min_score_req: 30.0,
            skills_req: vec![],
            description: String::new(),
            source_url: String::new(),
            location_info: None,
        };
        let value = serde_json::to_value(&opp).unwrap();
        assert_eq!(value["type"], "Internship");
        assert_eq!(value["minScoreReq"], 30.0);
    }
}
