//! Deterministic, network-free fallback recommender.
//!
//! This is the pipeline's terminal safety net: it cannot fail, touches no
//! network, and produces a fully populated result whenever any earlier stage
//! reports a failure (or the profile never qualified for a model call).

use crate::engine::assemble::{
    templated_insights, templated_path_suggestions, templated_profile_summary,
};
use crate::types::{CareerOption, Recommendation, RecommendationResult, UserProfile};

const TOP_SCORE: f64 = 90.0;
const SCORE_STEP: f64 = 3.0;
const SCORE_FLOOR: f64 = 75.0;
const MAX_RESULTS: usize = 5;
const MIN_KEYWORD_MATCHES: usize = 3;

/// Rank the catalog by keyword overlap with the profile and emit a complete
/// result. If fewer than three options match any interest or skill, the full
/// catalog is used so small or mismatched catalogs still yield output.
pub fn fallback_recommendations(
    profile: &UserProfile,
    catalog: &[CareerOption],
) -> RecommendationResult {
    let terms: Vec<String> = profile
        .interests
        .iter()
        .chain(profile.skills.iter())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let matched: Vec<&CareerOption> = catalog
        .iter()
        .filter(|option| {
            let name = option.name.to_lowercase();
            let description = option.description.to_lowercase();
            terms
                .iter()
                .any(|t| name.contains(t) || description.contains(t))
        })
        .collect();

    let pool: Vec<&CareerOption> = if matched.len() < MIN_KEYWORD_MATCHES {
        catalog.iter().collect()
    } else {
        matched
    };

    let recommendations: Vec<Recommendation> = pool
        .into_iter()
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(position, option)| build_recommendation(position, option, profile))
        .collect();

    RecommendationResult {
        recommendations,
        profile_summary: templated_profile_summary(profile),
        overall_insights: templated_insights(profile),
        career_path_suggestions: templated_path_suggestions(profile),
        new_options_created: Vec::new(),
        used_fallback: true,
    }
}

fn build_recommendation(
    position: usize,
    option: &CareerOption,
    profile: &UserProfile,
) -> Recommendation {
    let score = (TOP_SCORE - SCORE_STEP * position as f64).max(SCORE_FLOOR);

    let interests = if profile.interests.is_empty() {
        "your profile".to_string()
    } else {
        profile.interests.join(", ")
    };

    Recommendation {
        option_id: option.id,
        option_name: option.name.clone(),
        match_score: score,
        reasoning: format!(
            "{} overlaps with {} based on its name and description.",
            option.name, interests
        ),
        key_alignments: if profile.skills.is_empty() {
            vec![format!("Relevance to {}", interests)]
        } else {
            profile.skills.iter().take(3).cloned().collect()
        },
        suggested_path: format!(
            "Start with introductory material on {} and talk to people in the field.",
            option.name
        ),
        potential_challenges: vec![format!(
            "You will need to verify that {} matches your day-to-day expectations.",
            option.name
        )],
        next_steps: vec![
            format!("Read role descriptions for {}.", option.name),
            "Identify one concrete skill to build this month.".to_string(),
        ],
        is_synthetic: false,
    }
}
