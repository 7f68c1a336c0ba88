//! Synthesis of new, request-scoped options for uncovered interests.
//!
//! Strictly additive and optional: a second reasoning call is attempted and
//! any failure along the way degrades to zero new options without affecting
//! the primary recommendation set. Synthetic ids live in a reserved range
//! disjoint from catalog ids; nothing is persisted back to the catalog.

use serde_json::Value;
use tracing::warn;

use crate::engine::extract::extract_json_object;
use crate::engine::prompt::build_synthesis_prompt;
use crate::llm_provider::LlmProvider;
use crate::types::{CareerOption, Recommendation, UserProfile};

/// First id handed to a synthetic option. Catalog loaders are expected to
/// keep persistent ids below this range.
pub const SYNTHETIC_ID_BASE: u32 = 1000;

/// Fixed score for synthetic recommendations; they exist precisely because
/// they match a stated interest the catalog missed.
pub const SYNTHETIC_MATCH_SCORE: f64 = 98.0;

/// Ask the backend for new option definitions covering the gap interests.
/// Returns an empty list on any failure.
pub async fn synthesize_options(
    provider: &dyn LlmProvider,
    profile: &UserProfile,
    gaps: &[String],
) -> Vec<CareerOption> {
    if gaps.is_empty() {
        return Vec::new();
    }

    let prompt = build_synthesis_prompt(profile, gaps);
    let raw_text = match provider.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(stage = e.stage(), error = %e, "option synthesis call failed");
            return Vec::new();
        }
    };

    let raw = match extract_json_object(&raw_text) {
        Ok(value) => value,
        Err(e) => {
            warn!(stage = e.stage(), error = %e, "option synthesis output unusable");
            return Vec::new();
        }
    };

    parse_new_options(&raw, gaps)
}

/// Build the recommendations for freshly synthesized options. These are
/// prepended to the final ordering by the assembler.
pub fn synthetic_recommendations(
    profile: &UserProfile,
    options: &[CareerOption],
) -> Vec<Recommendation> {
    options
        .iter()
        .map(|option| Recommendation {
            option_id: option.id,
            option_name: option.name.clone(),
            match_score: SYNTHETIC_MATCH_SCORE,
            reasoning: format!(
                "{} was created specifically to match interests of yours that no \
                 existing option covered.",
                option.name
            ),
            key_alignments: profile
                .interests
                .iter()
                .filter(|i| !i.trim().is_empty())
                .take(3)
                .cloned()
                .collect(),
            suggested_path: format!(
                "This is an emerging direction; start by researching {} roles and the \
                 skills they list.",
                option.name
            ),
            potential_challenges: vec![
                "Emerging fields have fewer established entry paths.".to_string(),
            ],
            next_steps: vec![
                format!("Find practitioners working in {}.", option.name),
                "Validate demand in your target region.".to_string(),
            ],
            is_synthetic: true,
        })
        .collect()
}

fn parse_new_options(raw: &Value, gaps: &[String]) -> Vec<CareerOption> {
    let entries = match raw.get("newOptions").and_then(Value::as_array) {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            warn!("option synthesis output has no newOptions array");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), entry))
        })
        .enumerate()
        .map(|(index, (name, entry))| CareerOption {
            id: SYNTHETIC_ID_BASE + index as u32,
            name,
            category: string_or(entry, "category", "Emerging Fields"),
            description: entry
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("A field covering interests such as {}.", gaps.join(", "))
                }),
            salary_range: string_or(entry, "salaryRange", "Varies"),
            outlook: string_or(entry, "outlook", "Positive"),
            growth_rate: string_or(entry, "growthRate", "Growing"),
            skills: string_vec(entry, "skills"),
            career_paths: string_vec(entry, "careerPaths"),
            market_demand: None,
            work_life_balance: None,
        })
        .collect()
}

fn string_or(entry: &Value, key: &str, default: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn string_vec(entry: &Value, key: &str) -> Vec<String> {
    entry
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
