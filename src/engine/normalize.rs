//! Normalization of extracted model output into typed recommendations.
//!
//! The model is asked to reference catalog ids, but the reference is treated
//! as untrusted: every entry is re-resolved against the catalog, scores are
//! coerced and clamped, and every narrative field is backfilled with
//! profile-referencing text. A recommendation always ends up pointing at an
//! option that exists; entries are repaired, never discarded.

use serde_json::Value;
use tracing::debug;

use crate::error::EngineError;
use crate::types::{CareerOption, Recommendation, UserProfile};

/// Score assigned when the model omits or mangles `matchScore`.
pub const DEFAULT_MATCH_SCORE: f64 = 85.0;

/// Cap on catalog-backed recommendations, matching what the prompt asks for.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Map raw extracted entries onto catalog-backed recommendations.
///
/// Fails with `Normalization` only when the object has no `recommendations`
/// array at all or the array is empty; both are routed to the fallback
/// recommender by the pipeline.
pub fn normalize_recommendations(
    raw: &Value,
    profile: &UserProfile,
    catalog: &[CareerOption],
) -> Result<Vec<Recommendation>, EngineError> {
    if catalog.is_empty() {
        return Err(EngineError::Normalization(
            "cannot normalize against an empty catalog".to_string(),
        ));
    }

    let entries = raw
        .get("recommendations")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            EngineError::Normalization("response has no recommendations array".to_string())
        })?;

    if entries.is_empty() {
        return Err(EngineError::Normalization(
            "recommendations array is empty".to_string(),
        ));
    }

    let normalized = entries
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .enumerate()
        .map(|(index, entry)| {
            let option = resolve_option(entry, index, catalog);
            build_recommendation(entry, option, profile)
        })
        .collect();

    Ok(normalized)
}

/// Resolve a raw entry to a catalog option. Resolution order: exact id match,
/// bidirectional case-insensitive name containment, same positional index,
/// first catalog entry. The last step cannot fail because the caller has
/// already rejected empty catalogs.
fn resolve_option<'a>(entry: &Value, index: usize, catalog: &'a [CareerOption]) -> &'a CareerOption {
    if let Some(id) = entry_option_id(entry) {
        if let Some(option) = catalog.iter().find(|o| o.id == id) {
            return option;
        }
    }

    if let Some(name) = entry.get("optionName").and_then(Value::as_str) {
        let needle = name.trim().to_lowercase();
        if !needle.is_empty() {
            if let Some(option) = catalog.iter().find(|o| {
                let hay = o.name.to_lowercase();
                hay.contains(&needle) || needle.contains(&hay)
            }) {
                return option;
            }
        }
    }

    if let Some(option) = catalog.get(index) {
        debug!(index, "recommendation resolved by positional index");
        return option;
    }

    debug!(index, "recommendation resolved to first catalog entry");
    &catalog[0]
}

// Model outputs carry ids as numbers or strings; accept both.
fn entry_option_id(entry: &Value) -> Option<u32> {
    let value = entry.get("optionId")?;
    if let Some(id) = value.as_u64() {
        return u32::try_from(id).ok();
    }
    if let Some(f) = value.as_f64() {
        if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
            return Some(f as u32);
        }
    }
    value.as_str()?.trim().parse::<u32>().ok()
}

fn build_recommendation(
    entry: &Value,
    option: &CareerOption,
    profile: &UserProfile,
) -> Recommendation {
    let match_score = entry
        .get("matchScore")
        .and_then(coerce_number)
        .unwrap_or(DEFAULT_MATCH_SCORE)
        .clamp(0.0, 100.0);

    let interests = join_or(&profile.interests, "your stated interests");

    let reasoning = non_empty_string(entry, "reasoning").unwrap_or_else(|| {
        format!(
            "{} aligns with your interests in {}.",
            option.name, interests
        )
    });

    let key_alignments = non_empty_string_vec(entry, "keyAlignments").unwrap_or_else(|| {
        let mut alignments: Vec<String> = profile
            .interests
            .iter()
            .chain(profile.skills.iter())
            .filter(|s| !s.trim().is_empty())
            .take(3)
            .cloned()
            .collect();
        if alignments.is_empty() {
            alignments.push(format!("General fit with {}", option.name));
        }
        alignments
    });

    let suggested_path = non_empty_string(entry, "suggestedPath").unwrap_or_else(|| {
        format!(
            "Explore {} through coursework, projects, and conversations with practitioners.",
            option.name
        )
    });

    let potential_challenges = non_empty_string_vec(entry, "potentialChallenges")
        .unwrap_or_else(|| {
            vec![format!(
                "Building depth in {} takes sustained effort.",
                option.name
            )]
        });

    let next_steps = non_empty_string_vec(entry, "nextSteps").unwrap_or_else(|| {
        vec![
            format!("Research day-to-day work in {}.", option.name),
            format!("Strengthen skills such as {}.", join_or(&option.skills, "the fundamentals")),
        ]
    });

    Recommendation {
        option_id: option.id,
        option_name: option.name.clone(),
        match_score,
        reasoning,
        key_alignments,
        suggested_path,
        potential_challenges,
        next_steps,
        is_synthetic: false,
    }
}

// Non-finite parses ("NaN", "inf") would survive clamping, so they are
// rejected here and the default score applies instead.
fn coerce_number(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_f64().filter(|n| n.is_finite()) {
        return Some(n);
    }
    value
        .as_str()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn non_empty_string(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_empty_string_vec(entry: &Value, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = entry
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
