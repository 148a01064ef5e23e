//! Patient directory
//!
//! Finds roster entries whose name appears inside free text.

use crate::catalog::Patient;

/// Roster entries whose given name, family name or full name occurs in
/// `text`, case-insensitively. Roster order is kept.
pub fn match_candidates(roster: &[Patient], text: &str) -> Vec<Patient> {
    let haystack = text.to_lowercase();

    roster
        .iter()
        .filter(|patient| {
            [
                patient.given_name.to_lowercase(),
                patient.family_name.to_lowercase(),
                patient.full_name().to_lowercase(),
            ]
            .iter()
            .any(|needle| !needle.is_empty() && haystack.contains(needle.as_str()))
        })
        .cloned()
        .collect()
}
