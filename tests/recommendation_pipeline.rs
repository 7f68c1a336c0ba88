//! End-to-end pipeline tests: reasoned path, every recovery path, the
//! synthesis path, and the schema invariants the caller relies on.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use career_advisor::engine::synthesis::SYNTHETIC_ID_BASE;
use career_advisor::{
    CareerOption, EngineConfig, EngineError, LlmProvider, LlmProviderInfo, ProfilePreferences,
    RecommendationEngine, RecommendationResult, StubLlmProvider, UserProfile,
};

/// Serves a scripted sequence of responses, one per `complete` call.
/// The call counter is shared so tests can observe it after the provider
/// has been moved into the engine.
struct ScriptedProvider {
    responses: Mutex<Vec<String>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(EngineError::Reasoning("script exhausted".to_string()));
        }
        Ok(responses.remove(0))
    }

    fn get_info(&self) -> LlmProviderInfo {
        LlmProviderInfo {
            name: "Scripted".to_string(),
            version: "test".to_string(),
            model: "scripted".to_string(),
            capabilities: vec![],
        }
    }
}

struct FailingProvider {
    calls: Arc<AtomicUsize>,
}

impl FailingProvider {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::Reasoning("simulated outage".to_string()))
    }

    fn get_info(&self) -> LlmProviderInfo {
        LlmProviderInfo {
            name: "Failing".to_string(),
            version: "test".to_string(),
            model: "failing".to_string(),
            capabilities: vec![],
        }
    }
}

/// Stalls longer than any test deadline.
struct SlowProvider;

#[async_trait]
impl LlmProvider for SlowProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, EngineError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("{}".to_string())
    }

    fn get_info(&self) -> LlmProviderInfo {
        LlmProviderInfo {
            name: "Slow".to_string(),
            version: "test".to_string(),
            model: "slow".to_string(),
            capabilities: vec![],
        }
    }
}

fn option(id: u32, name: &str, description: &str) -> CareerOption {
    CareerOption {
        id,
        name: name.to_string(),
        category: "Technology".to_string(),
        description: description.to_string(),
        salary_range: "$80k-$120k".to_string(),
        outlook: "Good".to_string(),
        growth_rate: "10%".to_string(),
        skills: vec!["Analysis".to_string()],
        career_paths: vec!["Senior".to_string()],
        market_demand: Some(70),
        work_life_balance: Some(60),
    }
}

fn catalog() -> Vec<CareerOption> {
    vec![
        option(1, "Data Science", "statistics, machine learning, modeling"),
        option(2, "UX Design", "user research and interface design"),
        option(3, "Cybersecurity", "defensive security and incident response"),
    ]
}

fn profile() -> UserProfile {
    UserProfile {
        interests: vec!["Data Science".to_string()],
        skills: vec!["Python".to_string()],
        career_goals: vec!["High Salary".to_string()],
        preferences: ProfilePreferences::default(),
    }
}

fn engine_with(provider: Box<dyn LlmProvider>) -> RecommendationEngine {
    RecommendationEngine::new(provider, EngineConfig::stub())
}

fn assert_schema_invariants(result: &RecommendationResult, catalog: &[CareerOption]) {
    assert!(!result.recommendations.is_empty());
    for rec in &result.recommendations {
        assert!(rec.match_score >= 0.0 && rec.match_score <= 100.0);
        let in_catalog = catalog.iter().filter(|o| o.id == rec.option_id).count();
        let in_new = result
            .new_options_created
            .iter()
            .filter(|o| o.id == rec.option_id)
            .count();
        assert_eq!(
            in_catalog + in_new,
            1,
            "optionId {} must resolve to exactly one option",
            rec.option_id
        );
        assert!(!rec.reasoning.is_empty());
        assert!(!rec.key_alignments.is_empty());
        assert!(!rec.next_steps.is_empty());
    }
    assert!(!result.profile_summary.is_empty());
    assert!(!result.overall_insights.is_empty());
    assert!(!result.career_path_suggestions.is_empty());
}

fn reasoned_response() -> String {
    format!(
        "Here you go!\n```json\n{}\n```",
        json!({
            "recommendations": [
                {"optionId": 1, "matchScore": 94, "reasoning": "Direct interest match."},
                {"optionId": 3, "matchScore": 81}
            ],
            "profileSummary": "Technically minded student.",
            "overallInsights": ["Analytics-heavy profile."],
            "careerPathSuggestions": ["Aim for a data internship."]
        })
    )
}

#[tokio::test]
async fn reasoned_path_produces_normalized_result() {
    let provider = ScriptedProvider::new(vec![reasoned_response()]);
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert!(!result.used_fallback);
    assert_eq!(result.recommendations.len(), 2);
    assert_eq!(result.recommendations[0].option_id, 1);
    assert_eq!(result.recommendations[0].match_score, 94.0);
    assert_eq!(result.profile_summary, "Technically minded student.");
    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn backend_failure_diverts_to_fallback() {
    let engine = engine_with(Box::new(FailingProvider::new()));
    let catalog = catalog();

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert!(result.used_fallback);
    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn single_option_catalog_fallback_matches_contract() {
    // A one-entry catalog with a failing backend must yield exactly one
    // recommendation, optionId 1, scored 90.
    let engine = engine_with(Box::new(FailingProvider::new()));
    let catalog = vec![option(1, "Data Science", "statistics")];

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert!(result.used_fallback);
    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(result.recommendations[0].option_id, 1);
    assert_eq!(result.recommendations[0].match_score, 90.0);
}

#[tokio::test]
async fn unparsable_output_diverts_to_fallback() {
    let provider = ScriptedProvider::new(vec![
        "I'm sorry, I can't help with recommendations today.".to_string(),
    ]);
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert!(result.used_fallback);
    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn empty_recommendations_array_diverts_to_fallback() {
    // Extraction succeeds, normalization rejects the empty array, and the
    // pipeline falls back.
    let provider = ScriptedProvider::new(vec![
        "Sure! ```json\n{\"recommendations\":[]}\n```".to_string(),
    ]);
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert!(result.used_fallback);
    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn incomplete_profile_never_reaches_the_backend() {
    let provider = FailingProvider::new();
    let calls = provider.call_counter();
    let engine = engine_with(Box::new(provider));

    let mut incomplete = profile();
    incomplete.interests.clear();

    let report = engine.validate_profile(&incomplete);
    assert!(!report.ok);
    assert!(!report.errors.is_empty());

    let result = engine.get_recommendations(&incomplete, &catalog()).await;
    assert!(result.used_fallback);
    // The provider was never called.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn synthesis_path_prepends_marked_recommendations() {
    // Low scores plus an uncovered interest trigger the synthesis gate.
    let first = format!(
        "```json\n{}\n```",
        json!({
            "recommendations": [
                {"optionId": 1, "matchScore": 82},
                {"optionId": 2, "matchScore": 78},
                {"optionId": 3, "matchScore": 75}
            ]
        })
    );
    let second = json!({
        "newOptions": [{
            "name": "Marine Robotics Engineer",
            "category": "Engineering",
            "description": "Underwater autonomous systems.",
            "salaryRange": "$90k-$140k",
            "outlook": "Strong",
            "growthRate": "18%",
            "skills": ["Robotics", "Control theory"],
            "careerPaths": ["Research", "Industry"]
        }]
    })
    .to_string();

    let provider = ScriptedProvider::new(vec![first, second]);
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let mut user = profile();
    user.interests.push("Marine Robotics".to_string());

    let result = engine.get_recommendations(&user, &catalog).await;

    assert!(!result.used_fallback);
    assert_eq!(result.new_options_created.len(), 1);
    assert!(result.new_options_created[0].id >= SYNTHETIC_ID_BASE);

    let first_rec = &result.recommendations[0];
    assert!(first_rec.is_synthetic);
    assert_eq!(first_rec.match_score, 98.0);
    assert_eq!(first_rec.option_id, result.new_options_created[0].id);

    // Catalog-backed recommendations follow, in their original order.
    let tail_ids: Vec<u32> = result.recommendations[1..]
        .iter()
        .map(|r| r.option_id)
        .collect();
    assert_eq!(tail_ids, vec![1, 2, 3]);
    assert!(result.recommendations[1..].iter().all(|r| !r.is_synthetic));

    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn synthesis_failure_keeps_primary_recommendations() {
    // First call succeeds with thin results; second call (synthesis) fails.
    let first = format!(
        "```json\n{}\n```",
        json!({
            "recommendations": [{"optionId": 1, "matchScore": 80}]
        })
    );
    let provider = ScriptedProvider::new(vec![first]); // script exhausts on call 2
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let mut user = profile();
    user.interests.push("Marine Robotics".to_string());

    let result = engine.get_recommendations(&user, &catalog).await;

    // Synthesis failure is doubly soft: no new options, primary set intact.
    assert!(!result.used_fallback);
    assert!(result.new_options_created.is_empty());
    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(result.recommendations[0].option_id, 1);
}

#[tokio::test]
async fn strong_results_skip_synthesis_entirely() {
    // Three entries with one score above 90 close the synthesis gate even
    // though a gap interest exists.
    let strong = format!(
        "```json\n{}\n```",
        json!({
            "recommendations": [
                {"optionId": 1, "matchScore": 94},
                {"optionId": 2, "matchScore": 88},
                {"optionId": 3, "matchScore": 85}
            ]
        })
    );
    let provider = ScriptedProvider::new(vec![strong]);
    let calls = provider.call_counter();
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let mut user = profile();
    user.interests.push("Marine Robotics".to_string()); // gap exists

    let result = engine.get_recommendations(&user, &catalog).await;

    assert!(result.new_options_created.is_empty());
    assert!(result.recommendations.iter().all(|r| !r.is_synthetic));
    // Only the primary call happened.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn deadline_expiry_short_circuits_to_fallback() {
    let engine = engine_with(Box::new(SlowProvider));
    let catalog = catalog();

    let result = engine
        .get_recommendations_with_timeout(&profile(), &catalog, Duration::from_millis(50))
        .await;

    assert!(result.used_fallback);
    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn stub_provider_drives_the_full_reasoned_path() {
    let config = EngineConfig::stub();
    let provider = Box::new(StubLlmProvider::new(config.llm.clone()));
    let engine = RecommendationEngine::new(provider, config);
    let catalog = catalog();

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert!(!result.used_fallback);
    assert!(result.recommendations.len() >= 3);
    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn recommendation_serializes_to_documented_schema() {
    let provider = ScriptedProvider::new(vec![reasoned_response()]);
    let engine = engine_with(Box::new(provider));

    let result = engine.get_recommendations(&profile(), &catalog()).await;
    let value = serde_json::to_value(&result).unwrap();

    assert!(value["recommendations"][0]["optionId"].is_number());
    assert!(value["recommendations"][0]["matchScore"].is_number());
    assert!(value["recommendations"][0]["isSynthetic"].is_boolean());
    assert!(value["profileSummary"].is_string());
    assert!(value["newOptionsCreated"].is_array());
    assert!(value.get("usedFallback").is_none());

    // Round-trips back into the typed result.
    let back: RecommendationResult = serde_json::from_value(value).unwrap();
    assert_eq!(back.recommendations.len(), result.recommendations.len());
}

#[tokio::test]
async fn non_finite_scores_never_reach_the_caller() {
    let response = format!(
        "```json\n{}\n```",
        json!({
            "recommendations": [{"optionId": 1, "matchScore": "NaN"}]
        })
    );
    let provider = ScriptedProvider::new(vec![response]);
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert!(!result.used_fallback);
    assert!(result.recommendations[0].match_score.is_finite());
    assert_schema_invariants(&result, &catalog);
}

#[tokio::test]
async fn recommendations_always_reference_resolvable_options() {
    // Model references ids that do not exist; the normalizer must repair
    // every entry rather than discard it.
    let response = format!(
        "```json\n{}\n```",
        json!({
            "recommendations": [
                {"optionId": 999, "optionName": "Nonexistent"},
                {"optionId": 888, "optionName": "ux design lead"}
            ]
        })
    );
    let provider = ScriptedProvider::new(vec![response]);
    let engine = engine_with(Box::new(provider));
    let catalog = catalog();

    let result = engine.get_recommendations(&profile(), &catalog).await;

    assert_eq!(result.recommendations.len(), 2);
    assert_schema_invariants(&result, &catalog);
    // Second entry resolved by bidirectional name containment.
    assert_eq!(result.recommendations[1].option_id, 2);
}
