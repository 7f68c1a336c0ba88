//! Coverage analysis: which stated interests the catalog under-serves.

use itertools::Itertools;

use crate::types::{CareerOption, Recommendation, UserProfile};

/// Return the profile interests with no matching catalog option.
///
/// An interest is covered iff some option's name or description contains it
/// (case-insensitive substring) or vice versa. Duplicate interests are
/// collapsed case-insensitively; original casing is preserved in the result.
pub fn find_coverage_gaps(profile: &UserProfile, catalog: &[CareerOption]) -> Vec<String> {
    profile
        .interests
        .iter()
        .filter(|interest| !interest.trim().is_empty())
        .unique_by(|interest| interest.trim().to_lowercase())
        .filter(|interest| {
            let needle = interest.trim().to_lowercase();
            !catalog.iter().any(|option| {
                let name = option.name.to_lowercase();
                let description = option.description.to_lowercase();
                name.contains(&needle)
                    || description.contains(&needle)
                    || needle.contains(&name)
                    || needle.contains(&description)
            })
        })
        .map(|interest| interest.trim().to_string())
        .collect()
}

/// Synthesis gate: attempt synthesis iff the normalized set is thin (fewer
/// than 3 entries, or no score above 90) AND at least one gap exists. Avoids
/// synthesizing when the catalog already serves the user well.
pub fn should_synthesize(recommendations: &[Recommendation], gaps: &[String]) -> bool {
    let thin = recommendations.len() < 3
        || !recommendations.iter().any(|r| r.match_score > 90.0);
    thin && !gaps.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: u32, name: &str, description: &str) -> CareerOption {
        CareerOption {
            id,
            name: name.to_string(),
            category: "Technology".to_string(),
            description: description.to_string(),
            salary_range: "$80k".to_string(),
            outlook: "Good".to_string(),
            growth_rate: "5%".to_string(),
            skills: vec![],
            career_paths: vec![],
            market_demand: None,
            work_life_balance: None,
        }
    }

    fn profile_with(interests: &[&str]) -> UserProfile {
        UserProfile {
            interests: interests.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn rec(score: f64) -> Recommendation {
        Recommendation {
            option_id: 1,
            option_name: "X".to_string(),
            match_score: score,
            reasoning: "r".to_string(),
            key_alignments: vec![],
            suggested_path: "p".to_string(),
            potential_challenges: vec![],
            next_steps: vec![],
            is_synthetic: false,
        }
    }

    #[test]
    fn covered_interests_are_not_gaps() {
        let catalog = vec![option(1, "Data Science", "statistics and machine learning")];
        let gaps = find_coverage_gaps(&profile_with(&["data science", "Machine Learning"]), &catalog);
        assert!(gaps.is_empty());
    }

    #[test]
    fn uncovered_interest_is_reported_with_original_casing() {
        let catalog = vec![option(1, "Data Science", "statistics")];
        let gaps = find_coverage_gaps(&profile_with(&["Marine Biology"]), &catalog);
        assert_eq!(gaps, vec!["Marine Biology".to_string()]);
    }

    #[test]
    fn duplicate_interests_collapse() {
        let catalog = vec![option(1, "Data Science", "statistics")];
        let gaps = find_coverage_gaps(&profile_with(&["Art", "art", " ART "]), &catalog);
        assert_eq!(gaps.len(), 1);
    }

    #[test]
    fn containment_is_bidirectional() {
        // Interest string contains the option name.
        let catalog = vec![option(1, "Design", "visual work")];
        let gaps = find_coverage_gaps(&profile_with(&["Industrial Design Engineering"]), &catalog);
        assert!(gaps.is_empty());
    }

    #[test]
    fn gate_requires_both_thin_results_and_gaps() {
        let gaps = vec!["Something".to_string()];
        let strong = vec![rec(95.0), rec(80.0), rec(70.0)];
        let thin_count = vec![rec(95.0)];
        let low_scores = vec![rec(88.0), rec(85.0), rec(80.0)];

        assert!(!should_synthesize(&strong, &gaps));
        assert!(should_synthesize(&thin_count, &gaps));
        assert!(should_synthesize(&low_scores, &gaps));
        assert!(!should_synthesize(&thin_count, &[]));
    }

    #[test]
    fn score_exactly_90_counts_as_thin() {
        let gaps = vec!["Something".to_string()];
        let recs = vec![rec(90.0), rec(90.0), rec(90.0)];
        assert!(should_synthesize(&recs, &gaps));
    }
}
