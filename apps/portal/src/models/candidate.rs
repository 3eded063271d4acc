use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A pre-scored candidate as returned by the ranking service.
///
/// Absent or `null` optional fields are resolved to their defaults while deserializing,
/// so nothing downstream needs to re-check for missing skills, education or reasons.
/// The record is never mutated after it is received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, deserialize_with = "opaque_id")]
    pub cv_id: String,
    #[serde(default, deserialize_with = "opaque_id")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Expected in [0, 10]; not clamped.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_years: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasons: MatchReasons,
}

/// Backend-computed match counts. Trusted as-is; the client never recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReasons {
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_matches: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_matches: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_description_matches: u32,
    #[serde(rename = "experienceOK", default, deserialize_with = "null_as_default")]
    pub experience_ok: bool,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

/// `POST /ranking` response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
}

/// Treats an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifiers are opaque: the backend may send them as strings or numbers.
pub(crate) fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {other}"
        ))),
    }
}

#[cfg(test)]
pub(crate) fn make_candidate(name: &str, score: f64, experience_years: f64) -> Candidate {
    Candidate {
        cv_id: format!("cv-{name}"),
        user_id: format!("user-{name}"),
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        score,
        experience_years,
        skills: vec![],
        education: vec![],
        city: None,
        gender: None,
        reasons: MatchReasons::default(),
    }
}
