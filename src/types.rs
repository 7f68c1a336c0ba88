//! Core domain types shared across the recommendation pipeline.
//!
//! All wire-facing types serialize with camelCase field names so the JSON
//! shape matches the schema the reasoning backend is instructed to emit.

use serde::{Deserialize, Serialize};

/// One recommendable entity from the catalog (or synthesized at request time).
///
/// Catalog options are immutable once loaded; `id` is unique within a loaded
/// catalog and, together with synthetic options, within a single invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerOption {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub salary_range: String,
    pub outlook: String,
    pub growth_rate: String,
    pub skills: Vec<String>,
    pub career_paths: Vec<String>,
    /// Market demand index, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_demand: Option<u8>,
    /// Work/life balance index, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_life_balance: Option<u8>,
}

/// Per-request user profile. Read-only input; never persisted by this crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub career_goals: Vec<String>,
    #[serde(default)]
    pub preferences: ProfilePreferences,
}

impl UserProfile {
    /// Compact digest for log context. Deliberately counts-only so profile
    /// contents do not leak into log aggregation.
    pub fn digest(&self) -> String {
        format!(
            "{} interests / {} skills / {} goals",
            self.interests.len(),
            self.skills.len(),
            self.career_goals.len()
        )
    }
}

/// The four preference weights, each 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePreferences {
    pub job_market: u8,
    pub salary: u8,
    pub work_life_balance: u8,
    pub growth: u8,
}

impl Default for ProfilePreferences {
    fn default() -> Self {
        Self {
            job_market: 50,
            salary: 50,
            work_life_balance: 50,
            growth: 50,
        }
    }
}

/// A single scored recommendation referencing exactly one resolvable option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub option_id: u32,
    pub option_name: String,
    /// Always within 0..=100 after normalization.
    pub match_score: f64,
    pub reasoning: String,
    pub key_alignments: Vec<String>,
    pub suggested_path: String,
    pub potential_challenges: Vec<String>,
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub is_synthetic: bool,
}

/// Terminal, caller-visible artifact. Always fully populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    pub profile_summary: String,
    pub overall_insights: Vec<String>,
    pub career_path_suggestions: Vec<String>,
    pub new_options_created: Vec<CareerOption>,
    /// Internal quality marker: true when the deterministic fallback produced
    /// this result. Not part of the serialized schema.
    #[serde(skip)]
    pub used_fallback: bool,
}

/// Outcome of profile validation. `ok: false` carries user-facing error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}
