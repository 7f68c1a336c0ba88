//! Prompt construction for the reasoning backend.
//!
//! Both builders are pure functions: identical input yields a byte-identical
//! prompt. The catalog slice is bounded to keep token cost predictable.

use std::fmt::Write;

use crate::types::{CareerOption, UserProfile};

/// Upper bound on catalog entries rendered into a prompt.
pub const MAX_CATALOG_PROMPT_ENTRIES: usize = 25;

/// Render the primary recommendation request: a bounded slice of the catalog,
/// the profile, and an explicit instruction to return a single JSON object
/// selecting only from the listed option ids.
pub fn build_recommendation_prompt(profile: &UserProfile, catalog: &[CareerOption]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a career advisor. Recommend the best career options for a student \
         based on their profile.\n\nAvailable career options:\n\n",
    );

    for option in catalog.iter().take(MAX_CATALOG_PROMPT_ENTRIES) {
        let _ = writeln!(prompt, "Option {}: {}", option.id, option.name);
        let _ = writeln!(prompt, "  Category: {}", option.category);
        let _ = writeln!(prompt, "  Description: {}", option.description);
        let _ = writeln!(
            prompt,
            "  Salary: {} | Outlook: {} | Growth: {}",
            option.salary_range, option.outlook, option.growth_rate
        );
        let _ = writeln!(prompt, "  Skills: {}", option.skills.join(", "));
        let _ = writeln!(prompt, "  Career paths: {}", option.career_paths.join(", "));
        prompt.push('\n');
    }

    let _ = writeln!(prompt, "Student profile:");
    let _ = writeln!(prompt, "  Interests: {}", profile.interests.join(", "));
    let _ = writeln!(prompt, "  Skills: {}", profile.skills.join(", "));
    let _ = writeln!(prompt, "  Career goals: {}", profile.career_goals.join(", "));
    let _ = writeln!(
        prompt,
        "  Preference weights (0-100): job market {}, salary {}, work/life balance {}, growth {}",
        profile.preferences.job_market,
        profile.preferences.salary,
        profile.preferences.work_life_balance,
        profile.preferences.growth
    );

    prompt.push_str(
        r#"
Select 3 to 5 options ONLY from the option ids listed above. Respond with a
single JSON object matching this schema, and nothing else:

{
  "recommendations": [
    {
      "optionId": <id from the list above>,
      "optionName": "<name>",
      "matchScore": <number between 60 and 98>,
      "reasoning": "<why this option fits the profile>",
      "keyAlignments": ["<alignment>", ...],
      "suggestedPath": "<how to get started>",
      "potentialChallenges": ["<challenge>", ...],
      "nextSteps": ["<step>", ...]
    }
  ],
  "profileSummary": "<one-paragraph summary of the student>",
  "overallInsights": ["<insight>", ...],
  "careerPathSuggestions": ["<suggestion>", ...]
}
"#,
    );

    prompt
}

/// Render the secondary synthesis request for interests the catalog does not
/// cover. The marker phrase "new career option definitions" routes the stub
/// provider; real backends just follow the instruction.
pub fn build_synthesis_prompt(profile: &UserProfile, gaps: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a career advisor. Produce new career option definitions for interests \
         that no existing option covers.\n\n",
    );
    let _ = writeln!(prompt, "Uncovered interests: {}", gaps.join(", "));
    let _ = writeln!(
        prompt,
        "Student skills: {} | Career goals: {}",
        profile.skills.join(", "),
        profile.career_goals.join(", ")
    );

    prompt.push_str(
        r#"
Define one option per uncovered interest. Respond with a single JSON object
matching this schema, and nothing else:

{
  "newOptions": [
    {
      "name": "<option name>",
      "category": "<category>",
      "description": "<what the role involves>",
      "salaryRange": "<range>",
      "outlook": "<outlook>",
      "growthRate": "<rate>",
      "skills": ["<skill>", ...],
      "careerPaths": ["<path>", ...]
    }
  ]
}
"#,
    );

    prompt
}
