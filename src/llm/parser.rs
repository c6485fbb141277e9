use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::models::{BattleInsights, ProfileAnalysis};

const BATTLE_POINTS: usize = 3;
const MIN_ANALYSIS_ITEMS: usize = 3;
const MIN_ANALYSIS_ITEM_CHARS: usize = 10;

/// Parses a battle narrative. Code fences are stripped; anything else around the
/// JSON object is rejected.
pub fn parse_battle_insights(response: &str) -> Result<BattleInsights> {
    let insights: BattleInsights = parse_strict(&strip_code_fences(response))?;

    for (field, points) in [
        ("winningFactors", &insights.winning_factors),
        ("improvementAreas", &insights.improvement_areas),
    ] {
        if points.len() != BATTLE_POINTS {
            return Err(Error::ParseError(format!(
                "{} must have {} entries, got {}",
                field,
                BATTLE_POINTS,
                points.len()
            )));
        }
        if points.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::ParseError(format!("{} contains a blank entry", field)));
        }
    }

    Ok(insights)
}

pub fn parse_profile_analysis(response: &str) -> Result<ProfileAnalysis> {
    let cleaned = strip_code_fences(response).replace(['\u{201C}', '\u{201D}'], "\"");
    let analysis: ProfileAnalysis = parse_strict(&cleaned)?;

    let invalid: Vec<&str> = analysis
        .sections()
        .iter()
        .filter(|(_, items)| {
            items.len() < MIN_ANALYSIS_ITEMS
                || items
                    .iter()
                    .any(|item| item.chars().count() < MIN_ANALYSIS_ITEM_CHARS)
        })
        .map(|(name, _)| *name)
        .collect();

    if !invalid.is_empty() {
        return Err(Error::ParseError(format!(
            "Invalid arrays: {}",
            invalid.join(", ")
        )));
    }

    let salary = analysis.salary_range;
    if salary.min <= 0.0 || salary.max <= 0.0 || salary.min >= salary.max {
        return Err(Error::ParseError(format!(
            "Invalid salary range: {} - {}",
            salary.min, salary.max
        )));
    }

    Ok(analysis)
}

fn parse_strict<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| Error::ParseError(format!("Failed to parse LLM response: {}", e)))
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "winningFactors": ["More repositories", "Recent commits", "Three organizations"],
        "improvementAreas": ["Add a bio", "Commit weekly", "Try a second language"]
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let insights = parse_battle_insights(VALID).unwrap();
        assert_eq!(insights.winning_factors.len(), 3);
        assert_eq!(insights.improvement_areas[0], "Add a bio");
    }

    #[test]
    fn test_parse_fenced_json() {
        let input = format!("```json\n{}\n```\n", VALID);
        assert!(parse_battle_insights(&input).is_ok());

        let input = format!("```\n{}\n```", VALID);
        assert!(parse_battle_insights(&input).is_ok());
    }

    #[test]
    fn test_prose_wrapper_is_rejected() {
        let input = format!("Here is the analysis you asked for:\n{}", VALID);
        let err = parse_battle_insights(&input).unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let two = r#"{"winningFactors": ["a", "b"], "improvementAreas": ["c", "d", "e"]}"#;
        assert!(parse_battle_insights(two).is_err());

        let blank = r#"{"winningFactors": ["a", " ", "b"], "improvementAreas": ["c", "d", "e"]}"#;
        assert!(parse_battle_insights(blank).is_err());

        let missing = r#"{"winningFactors": ["a", "b", "c"]}"#;
        assert!(parse_battle_insights(missing).is_err());
    }

    fn analysis_json(salary_min: u32, salary_max: u32) -> String {
        format!(
            r#"{{
                "strengths": ["Strong Rust expertise", "Consistent commit cadence", "Well documented crates"],
                "weaknesses": ["Few frontend projects", "Sparse test coverage", "Little issue triage"],
                "skillGaps": ["Kubernetes orchestration", "GraphQL API design", "Cloud-native tooling"],
                "recommendations": ["Ship a web frontend", "Add integration tests", "Join a CNCF project"],
                "salaryRange": {{ "min": {}, "max": {} }}
            }}"#,
            salary_min, salary_max
        )
    }

    #[test]
    fn test_parse_profile_analysis() {
        let analysis = parse_profile_analysis(&analysis_json(90000, 140000)).unwrap();
        assert_eq!(analysis.skill_gaps.len(), 3);
        assert_eq!(analysis.salary_range.max, 140000.0);
    }

    #[test]
    fn test_profile_analysis_accepts_smart_quotes() {
        let input = analysis_json(90000, 140000).replace("\"strengths\"", "\u{201C}strengths\u{201D}");
        assert!(parse_profile_analysis(&input).is_ok());
    }

    #[test]
    fn test_profile_analysis_rejects_inverted_salary() {
        let err = parse_profile_analysis(&analysis_json(150000, 90000)).unwrap_err();
        assert!(err.to_string().contains("salary"));
    }

    #[test]
    fn test_profile_analysis_rejects_short_items() {
        let input = analysis_json(90000, 140000).replace("Strong Rust expertise", "Rust");
        let err = parse_profile_analysis(&input).unwrap_err();
        assert!(err.to_string().contains("strengths"));
    }
}
