//! Recommendation engine: the pipeline orchestrator and public API.
//!
//! Control flow: profile validation, prompt build, one reasoning call, JSON
//! extraction, normalization, coverage analysis, optional synthesis call,
//! assembly. Any failure at or after the reasoning call diverts to the
//! deterministic fallback recommender; the caller always receives a complete
//! result and never an error.
//!
//! Each invocation is fully isolated: the engine holds only the injected
//! provider and configuration, so concurrent invocations are safe without
//! locking and nothing is cached across requests.

pub mod assemble;
pub mod coverage;
pub mod extract;
pub mod fallback;
pub mod normalize;
pub mod profile;
pub mod prompt;
pub mod synthesis;

use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::llm_provider::{LlmProvider, LlmProviderFactory};
use crate::types::{CareerOption, RecommendationResult, UserProfile, ValidationReport};

pub use profile::validate_profile;

pub struct RecommendationEngine {
    provider: Box<dyn LlmProvider>,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Build an engine with an explicitly injected provider. Preferred in
    /// tests and anywhere the caller manages configuration itself.
    pub fn new(provider: Box<dyn LlmProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Build an engine from the environment. Fails fast with a
    /// `Configuration` error when the selected backend has no usable
    /// credentials; this is the only fatal failure class and it happens
    /// here, at startup, never per request.
    pub fn from_env() -> Result<Self, EngineError> {
        let config = EngineConfig::from_env()?;
        let provider = LlmProviderFactory::create_provider(config.llm.clone())?;
        Ok(Self { provider, config })
    }

    /// Check a profile for minimum completeness. Meant to run before
    /// `get_recommendations` so obviously incomplete input is rejected with
    /// user-facing text before any cost is incurred.
    pub fn validate_profile(&self, profile: &UserProfile) -> ValidationReport {
        profile::validate_profile(profile)
    }

    /// Produce recommendations for a profile against a catalog snapshot.
    ///
    /// Never fails: every failure past this point resolves to the
    /// deterministic fallback, and the returned result always satisfies the
    /// schema invariants. Degraded quality is observable only via
    /// `used_fallback`.
    pub async fn get_recommendations(
        &self,
        profile: &UserProfile,
        catalog: &[CareerOption],
    ) -> RecommendationResult {
        let request_id = Uuid::new_v4();

        let report = profile::validate_profile(profile);
        if !report.ok {
            warn!(
                %request_id,
                profile = %profile.digest(),
                errors = report.errors.len(),
                "incomplete profile; skipping reasoning call"
            );
            return fallback::fallback_recommendations(profile, catalog);
        }

        if catalog.is_empty() {
            warn!(%request_id, "empty catalog; nothing to reason over");
            return fallback::fallback_recommendations(profile, catalog);
        }

        match self.run_reasoned_pipeline(profile, catalog).await {
            Ok(result) => {
                info!(
                    %request_id,
                    recommendations = result.recommendations.len(),
                    synthesized = result.new_options_created.len(),
                    "recommendation pipeline completed"
                );
                result
            }
            Err(e) => {
                warn!(
                    %request_id,
                    stage = e.stage(),
                    profile = %profile.digest(),
                    error = %e,
                    "pipeline failed; using fallback recommender"
                );
                fallback::fallback_recommendations(profile, catalog)
            }
        }
    }

    /// Like `get_recommendations`, but bounded by a caller-supplied deadline
    /// covering the whole pipeline. On expiry the engine short-circuits to
    /// the fallback recommender instead of waiting out the backend.
    pub async fn get_recommendations_with_timeout(
        &self,
        profile: &UserProfile,
        catalog: &[CareerOption],
        deadline: Duration,
    ) -> RecommendationResult {
        match tokio::time::timeout(deadline, self.get_recommendations(profile, catalog)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    profile = %profile.digest(),
                    deadline_ms = deadline.as_millis() as u64,
                    "pipeline deadline expired; using fallback recommender"
                );
                fallback::fallback_recommendations(profile, catalog)
            }
        }
    }

    /// The happy path: at most two sequential backend calls (the synthesis
    /// prompt depends on the coverage result of the first response, so they
    /// cannot run concurrently).
    async fn run_reasoned_pipeline(
        &self,
        profile: &UserProfile,
        catalog: &[CareerOption],
    ) -> Result<RecommendationResult, EngineError> {
        let prompt_text = prompt::build_recommendation_prompt(profile, catalog);
        let raw_text = self.provider.complete(&prompt_text).await?;
        let raw = extract::extract_json_object(&raw_text)?;
        let normalized = normalize::normalize_recommendations(&raw, profile, catalog)?;

        let gaps = coverage::find_coverage_gaps(profile, catalog);
        let (synthetic_recs, new_options) = if coverage::should_synthesize(&normalized, &gaps) {
            info!(gaps = gaps.len(), "catalog under-serves profile; synthesizing options");
            let options =
                synthesis::synthesize_options(self.provider.as_ref(), profile, &gaps).await;
            let recs = synthesis::synthetic_recommendations(profile, &options);
            (recs, options)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(assemble::assemble_result(
            Some(&raw),
            profile,
            normalized,
            synthetic_recs,
            new_options,
        ))
    }

    /// Provider identity, for diagnostics.
    pub fn provider_info(&self) -> crate::llm_provider::LlmProviderInfo {
        self.provider.get_info()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
