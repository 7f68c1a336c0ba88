//! Profile validation: the only gate observable before any cost is incurred.

use crate::types::{UserProfile, ValidationReport};

/// Check a profile for minimum completeness. Returns `ok: false` with
/// user-facing error text when any of interests, skills, or career goals is
/// empty; callers must block the downstream pipeline on a failed report so
/// no network call is attempted.
pub fn validate_profile(profile: &UserProfile) -> ValidationReport {
    let mut errors = Vec::new();

    if !has_content(&profile.interests) {
        errors.push("Please add at least one interest to your profile".to_string());
    }
    if !has_content(&profile.skills) {
        errors.push("Please add at least one skill to your profile".to_string());
    }
    if !has_content(&profile.career_goals) {
        errors.push("Please add at least one career goal to your profile".to_string());
    }

    ValidationReport {
        ok: errors.is_empty(),
        errors,
    }
}

// Whitespace-only entries do not count as content.
fn has_content(values: &[String]) -> bool {
    values.iter().any(|v| !v.trim().is_empty())
}
