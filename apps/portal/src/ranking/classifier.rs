//! Skill Classifier: display labels for a candidate's skills against the active filters.
//!
//! Labels never feed back into sorting or the backend's match counts; they are cheap
//! enough to recompute on every render.

use serde::Serialize;

use crate::ranking::filters::ParsedFilters;

/// Maximum number of skill tags rendered per candidate card.
pub const VISIBLE_SKILL_TAGS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLabel {
    Required,
    Preferred,
    /// The skill contains one of the job-description tokens.
    Matched,
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillTag {
    pub skill: String,
    pub label: SkillLabel,
}

/// The tags shown on a candidate card plus how many skills were left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillTags {
    pub tags: Vec<SkillTag>,
    pub hidden: usize,
}

/// First match wins: required, then preferred, then description substring.
pub fn classify_skill(skill: &str, filters: &ParsedFilters) -> SkillLabel {
    let lowered = skill.to_lowercase();
    if filters.required.contains(&lowered) {
        SkillLabel::Required
    } else if filters.preferred.contains(&lowered) {
        SkillLabel::Preferred
    } else if filters
        .description
        .iter()
        .any(|token| lowered.contains(token.as_str()))
    {
        SkillLabel::Matched
    } else {
        SkillLabel::Unmatched
    }
}

pub fn classify_skills(skills: &[String], filters: &ParsedFilters) -> Vec<SkillTag> {
    skills
        .iter()
        .map(|skill| SkillTag {
            skill: skill.clone(),
            label: classify_skill(skill, filters),
        })
        .collect()
}

/// Classifies only the first `limit` skills, reporting the rest as hidden.
pub fn visible_skill_tags(skills: &[String], filters: &ParsedFilters, limit: usize) -> SkillTags {
    let shown = skills.len().min(limit);
    SkillTags {
        tags: classify_skills(&skills[..shown], filters),
        hidden: skills.len() - shown,
    }
}

/// Counts required and preferred hits in a skill list. A skill counts once, for the
/// higher-priority set it belongs to.
pub fn count_matches(skills: &[String], filters: &ParsedFilters) -> (usize, usize) {
    skills.iter().fold((0, 0), |(req, pref), skill| {
        let lowered = skill.to_lowercase();
        if filters.required.contains(&lowered) {
            (req + 1, pref)
        } else if filters.preferred.contains(&lowered) {
            (req, pref + 1)
        } else {
            (req, pref)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::filters::FilterQuery;

    fn filters() -> ParsedFilters {
        FilterQuery {
            required_skills_raw: "node".to_string(),
            preferred_skills_raw: "docker".to_string(),
            job_description: "senior backend".to_string(),
            ..Default::default()
        }
        .parse()
    }

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_required_wins_case_insensitively() {
        assert_eq!(classify_skill("Node", &filters()), SkillLabel::Required);
    }

    #[test]
    fn test_preferred_label() {
        assert_eq!(classify_skill("Docker", &filters()), SkillLabel::Preferred);
    }

    #[test]
    fn test_description_substring_is_matched() {
        assert_eq!(classify_skill("Backend-Lead", &filters()), SkillLabel::Matched);
    }

    #[test]
    fn test_unrelated_skill_is_unmatched() {
        assert_eq!(classify_skill("Excel", &filters()), SkillLabel::Unmatched);
    }

    #[test]
    fn test_required_takes_priority_over_preferred() {
        let parsed = FilterQuery {
            required_skills_raw: "go".to_string(),
            preferred_skills_raw: "go".to_string(),
            ..Default::default()
        }
        .parse();
        assert_eq!(classify_skill("GO", &parsed), SkillLabel::Required);
    }

    #[test]
    fn test_no_filters_leaves_everything_unmatched() {
        let parsed = ParsedFilters::default();
        assert_eq!(classify_skill("Rust", &parsed), SkillLabel::Unmatched);
    }

    #[test]
    fn test_visible_tags_are_capped() {
        let list: Vec<String> = (0..11).map(|i| format!("skill{i}")).collect();
        let tags = visible_skill_tags(&list, &filters(), VISIBLE_SKILL_TAGS);
        assert_eq!(tags.tags.len(), 8);
        assert_eq!(tags.hidden, 3);
        assert_eq!(tags.tags[0].skill, "skill0");
    }

    #[test]
    fn test_visible_tags_short_list_hides_nothing() {
        let tags = visible_skill_tags(&skills(&["Node", "Excel"]), &filters(), VISIBLE_SKILL_TAGS);
        assert_eq!(tags.hidden, 0);
        assert_eq!(tags.tags[0].label, SkillLabel::Required);
        assert_eq!(tags.tags[1].label, SkillLabel::Unmatched);
    }

    #[test]
    fn test_count_matches() {
        let list = skills(&["Node", "docker", "Excel", "NODE"]);
        assert_eq!(count_matches(&list, &filters()), (2, 1));
    }
}
