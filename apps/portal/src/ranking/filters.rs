//! Filter Parser: turns the recruiter's raw form fields into token sets and the
//! request forwarded to the ranking service.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Anything outside letters (including accented vowels), digits, `+`, `#` and `.` separates
/// description tokens, so `c++`, `c#` and `node.js` survive intact.
static DESCRIPTION_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zá-ú0-9+#.]+").expect("valid separator pattern"));

/// The recruiter's current search criteria, exactly as typed.
///
/// `min_experience`, `gender`, `cities_raw` and `max_distance_km` are forwarded to the
/// ranking service and never re-applied locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterQuery {
    #[serde(alias = "requiredSkills")]
    pub required_skills_raw: String,
    #[serde(alias = "preferredSkills")]
    pub preferred_skills_raw: String,
    #[serde(alias = "jobDescription")]
    pub job_description: String,
    #[serde(alias = "minExperience")]
    pub min_experience: Option<f64>,
    pub gender: String,
    #[serde(alias = "cities")]
    pub cities_raw: String,
    /// Kept as text: an empty field means "no limit".
    #[serde(alias = "maxDistanceKm")]
    pub max_distance_km: String,
}

/// Normalized token sets derived from a [`FilterQuery`]. Recomputed on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFilters {
    pub required: HashSet<String>,
    pub preferred: HashSet<String>,
    pub description: Vec<String>,
    /// Token counts before set collapse; used as the denominator of match indicators.
    pub required_total: usize,
    pub preferred_total: usize,
}

/// `POST /ranking` request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRequest {
    pub job_description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub min_experience: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub cities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance_km: Option<f64>,
}

/// Splits a comma-separated field into lower-cased, trimmed, non-empty tokens.
pub fn parse_tokens(raw: &str) -> Vec<String> {
    split_list(raw).map(str::to_lowercase).collect()
}

/// Splits free text into lower-cased tokens on runs of separator characters.
pub fn tokenize_description(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    DESCRIPTION_SEPARATOR
        .split(&lowered)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-split, trimmed, empties dropped, original casing kept.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl FilterQuery {
    pub fn parse(&self) -> ParsedFilters {
        let required = parse_tokens(&self.required_skills_raw);
        let preferred = parse_tokens(&self.preferred_skills_raw);
        ParsedFilters {
            required_total: required.len(),
            preferred_total: preferred.len(),
            required: required.into_iter().collect(),
            preferred: preferred.into_iter().collect(),
            description: tokenize_description(&self.job_description),
        }
    }

    /// Builds the body sent to the ranking service. Skills and cities keep the casing the
    /// recruiter typed; matching on the backend is its own concern.
    pub fn to_request(&self) -> RankingRequest {
        let gender = self.gender.trim();
        RankingRequest {
            job_description: self.job_description.clone(),
            required_skills: split_list(&self.required_skills_raw).map(str::to_string).collect(),
            preferred_skills: split_list(&self.preferred_skills_raw).map(str::to_string).collect(),
            min_experience: self.min_experience.filter(|v| v.is_finite()).unwrap_or(0.0),
            gender: (!gender.is_empty()).then(|| gender.to_string()),
            cities: split_list(&self.cities_raw).map(str::to_string).collect(),
            max_distance_km: self.max_distance_km.trim().parse::<f64>().ok(),
        }
    }

    pub fn min_experience_or_zero(&self) -> f64 {
        self.min_experience.unwrap_or(0.0)
    }
}
