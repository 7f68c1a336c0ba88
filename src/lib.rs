//! career-advisor: an AI-orchestrated recommendation engine.
//!
//! Given a user profile and a read-only catalog of career options, the
//! engine produces a small, ranked set of recommendations while tolerating
//! an unreliable, free-text-returning reasoning backend. The public API
//! never surfaces a raw failure: every degraded path resolves to a
//! deterministic, network-free fallback that satisfies the same schema
//! invariants as the reasoned path.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use career_advisor::{RecommendationEngine, UserProfile};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     // Fails fast here if the backend is not configured.
//!     let engine = RecommendationEngine::from_env().expect("backend configured");
//!
//!     let profile = UserProfile {
//!         interests: vec!["Data Science".to_string()],
//!         skills: vec!["Python".to_string()],
//!         career_goals: vec!["High Salary".to_string()],
//!         ..Default::default()
//!     };
//!
//!     let report = engine.validate_profile(&profile);
//!     assert!(report.ok);
//!
//!     // Never fails; degraded quality is visible only via `used_fallback`.
//!     let result = engine.get_recommendations(&profile, &[]).await;
//!     println!("{}", result.recommendations.len());
//! });
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod llm_provider;
pub mod types;

pub use catalog::CatalogStore;
pub use config::EngineConfig;
pub use engine::{validate_profile, RecommendationEngine};
pub use error::EngineError;
pub use llm_provider::{
    AnthropicLlmProvider, LlmProvider, LlmProviderConfig, LlmProviderFactory, LlmProviderInfo,
    LlmProviderType, OpenAILlmProvider, StubLlmProvider,
};
pub use types::{
    CareerOption, ProfilePreferences, Recommendation, RecommendationResult, UserProfile,
    ValidationReport,
};
