//! Final assembly of the caller-visible result.
//!
//! Ordering contract: synthetic recommendations first, then normalized ones,
//! each group in its own original order. Narrative fields prefer the model's
//! output and fall back to templated, profile-derived text.

use serde_json::Value;

use crate::types::{CareerOption, Recommendation, RecommendationResult, UserProfile};

/// Merge the normalized and synthetic recommendation sets into one ordered,
/// fully populated result.
pub fn assemble_result(
    raw: Option<&Value>,
    profile: &UserProfile,
    normalized: Vec<Recommendation>,
    synthetic: Vec<Recommendation>,
    new_options: Vec<CareerOption>,
) -> RecommendationResult {
    let mut recommendations = synthetic;
    recommendations.extend(normalized);

    let profile_summary = raw
        .and_then(|r| narrative_string(r, "profileSummary"))
        .unwrap_or_else(|| templated_profile_summary(profile));

    let overall_insights = raw
        .and_then(|r| narrative_strings(r, "overallInsights"))
        .unwrap_or_else(|| templated_insights(profile));

    let career_path_suggestions = raw
        .and_then(|r| narrative_strings(r, "careerPathSuggestions"))
        .unwrap_or_else(|| templated_path_suggestions(profile));

    RecommendationResult {
        recommendations,
        profile_summary,
        overall_insights,
        career_path_suggestions,
        new_options_created: new_options,
        used_fallback: false,
    }
}

pub(crate) fn templated_profile_summary(profile: &UserProfile) -> String {
    format!(
        "A student interested in {} with strengths in {}, working toward {}.",
        join_or(&profile.interests, "exploring career directions"),
        join_or(&profile.skills, "developing new skills"),
        join_or(&profile.career_goals, "clarifying long-term goals"),
    )
}

pub(crate) fn templated_insights(profile: &UserProfile) -> Vec<String> {
    vec![
        format!(
            "Your interests in {} map onto several of the recommended fields.",
            join_or(&profile.interests, "the areas you listed")
        ),
        "Compare the suggested options against your preference weights before committing."
            .to_string(),
    ]
}

pub(crate) fn templated_path_suggestions(profile: &UserProfile) -> Vec<String> {
    let mut suggestions: Vec<String> = profile
        .career_goals
        .iter()
        .filter(|g| !g.trim().is_empty())
        .map(|goal| format!("Work toward '{}' via the highest-scoring option.", goal.trim()))
        .collect();
    if suggestions.is_empty() {
        suggestions.push("Pick one recommended option and plan the first semester around it.".to_string());
    }
    suggestions
}

fn narrative_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn narrative_strings(raw: &Value, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = raw
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn join_or(values: &[String], fallback: &str) -> String {
    let joined = values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}
