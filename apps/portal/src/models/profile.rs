use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::candidate::{null_as_default, MatchReasons};

/// Public profile of a candidate user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl UserProfile {
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// One stored CV version. `parsed_data` is the backend's analysis output, passed through
/// untouched for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cv {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stored_filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parsed_data: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_years: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classification_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_primary: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// All versions of a candidate's CV within one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvCategory {
    pub name: String,
    #[serde(default)]
    pub primary_cv: Option<Cv>,
    #[serde(default)]
    pub latest_cv: Option<Cv>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub versions: Vec<Cv>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedCv {
    pub cv: Cv,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasons: MatchReasons,
}

/// `GET /candidates/:id` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfileData {
    pub user: UserProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<CvCategory>,
    #[serde(default)]
    pub recommended_cv: Option<RecommendedCv>,
}
