use serde::Serialize;

use crate::backend::ProfileQuery;
use crate::models::profile::{CandidateProfileData, Cv, CvCategory, RecommendedCv, UserProfile};
use crate::ranking::classifier::{classify_skills, count_matches, SkillTag};
use crate::ranking::filters::{FilterQuery, ParsedFilters};

/// A CV with its skills labelled against the filters the profile was opened with.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedCv {
    #[serde(flatten)]
    pub cv: Cv,
    pub skill_tags: Vec<SkillTag>,
    pub required_matches: usize,
    pub preferred_matches: usize,
    pub is_recommended: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedCategory {
    pub name: String,
    pub primary_cv: Option<AnnotatedCv>,
    pub latest_cv: Option<AnnotatedCv>,
    pub versions: Vec<AnnotatedCv>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: UserProfile,
    pub has_coordinates: bool,
    pub recommended_cv: Option<RecommendedCv>,
    /// Category opened first: the recommended CV's, else the first one listed.
    pub active_category: Option<String>,
    pub categories: Vec<AnnotatedCategory>,
}

/// Profile labels only know required and preferred; the job description is forwarded to
/// the backend but does not tag skills here.
pub fn profile_filters(query: &ProfileQuery) -> ParsedFilters {
    FilterQuery {
        required_skills_raw: query.required.clone(),
        preferred_skills_raw: query.preferred.clone(),
        ..Default::default()
    }
    .parse()
}

pub fn active_category(data: &CandidateProfileData) -> Option<String> {
    data.recommended_cv
        .as_ref()
        .map(|rec| rec.cv.category.clone())
        .filter(|category| !category.is_empty())
        .or_else(|| data.categories.first().map(|c| c.name.clone()))
}

pub fn annotate_profile(data: CandidateProfileData, query: &ProfileQuery) -> ProfileView {
    let filters = profile_filters(query);
    let active_category = active_category(&data);
    let recommended_id = data.recommended_cv.as_ref().map(|rec| rec.cv.id);

    let annotate = |cv: Cv| {
        let (required_matches, preferred_matches) = count_matches(&cv.skills, &filters);
        AnnotatedCv {
            skill_tags: classify_skills(&cv.skills, &filters),
            required_matches,
            preferred_matches,
            is_recommended: recommended_id == Some(cv.id),
            cv,
        }
    };

    let categories = data
        .categories
        .into_iter()
        .map(|category: CvCategory| AnnotatedCategory {
            name: category.name,
            primary_cv: category.primary_cv.map(annotate),
            latest_cv: category.latest_cv.map(annotate),
            versions: category.versions.into_iter().map(annotate).collect(),
        })
        .collect();

    ProfileView {
        has_coordinates: data.user.has_coordinates(),
        user: data.user,
        recommended_cv: data.recommended_cv,
        active_category,
        categories,
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> CandidateProfileData {
    serde_json::from_str(
        r#"{
            "user": {"id": 3, "full_name": "Ana Pérez", "email": "ana@example.com", "city": "Rosario"},
            "categories": [
                {"name": "it",
                 "primaryCv": {"id": 10, "category": "it", "skills": ["Rust", "Docker", "SQL"], "is_primary": true},
                 "latestCv": {"id": 11, "category": "it", "skills": ["Rust"]},
                 "versions": [{"id": 11, "category": "it"}, {"id": 10, "category": "it"}]},
                {"name": "data",
                 "primaryCv": null,
                 "latestCv": {"id": 20, "category": "data", "skills": ["Python"]},
                 "versions": [{"id": 20, "category": "data"}]}
            ],
            "recommendedCv": {"cv": {"id": 20, "category": "data"}, "reasons": {"requiredMatches": 1}}
        }"#,
    )
    .unwrap()
}
