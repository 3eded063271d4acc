use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Score,
    Experience,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Ordering of the result list. Defaults to score, descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Returns a new, stably sorted sequence. Candidates with equal keys keep the order the
/// ranking service returned them in.
pub fn sort_candidates(candidates: &[Candidate], spec: SortSpec) -> Vec<Candidate> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare_by_key(a, b, spec.key);
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

fn compare_by_key(a: &Candidate, b: &Candidate, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => compare_numbers(a.score, b.score),
        SortKey::Experience => compare_numbers(a.experience_years, b.experience_years),
        SortKey::Name => compare_names(&a.full_name, &b.full_name),
    }
}

/// Numeric comparison where `-0.0` ties with `0.0`.
fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Collation for display names: accents and case only break ties, so "Álvaro" sorts
/// next to "Alvaro" instead of after "Zoe".
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::make_candidate;

    fn names(list: &[Candidate]) -> Vec<&str> {
        list.iter().map(|c| c.full_name.as_str()).collect()
    }

    #[test]
    fn test_default_spec_is_score_desc() {
        let spec = SortSpec::default();
        assert_eq!(spec.key, SortKey::Score);
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn test_score_desc() {
        let input = vec![
            make_candidate("A", 5.0, 1.0),
            make_candidate("B", 9.0, 1.0),
            make_candidate("C", 7.0, 1.0),
        ];
        let sorted = sort_candidates(&input, SortSpec::default());
        assert_eq!(names(&sorted), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_experience_asc() {
        let input = vec![
            make_candidate("A", 5.0, 10.0),
            make_candidate("B", 5.0, 2.0),
            make_candidate("C", 5.0, 4.5),
        ];
        let spec = SortSpec {
            key: SortKey::Experience,
            direction: SortDirection::Asc,
        };
        assert_eq!(names(&sort_candidates(&input, spec)), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order_in_both_directions() {
        let input = vec![
            make_candidate("First", 8.0, 1.0),
            make_candidate("Second", 8.0, 2.0),
            make_candidate("Low", 3.0, 3.0),
            make_candidate("Third", 8.0, 4.0),
        ];
        let desc = sort_candidates(&input, SortSpec::default());
        assert_eq!(names(&desc), vec!["First", "Second", "Third", "Low"]);

        let asc = sort_candidates(
            &input,
            SortSpec {
                key: SortKey::Score,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(names(&asc), vec!["Low", "First", "Second", "Third"]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let input = vec![
            make_candidate("Plain", 0.0, 0.0),
            make_candidate("Signed", -0.0, -0.0),
        ];
        for key in [SortKey::Score, SortKey::Experience] {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let sorted = sort_candidates(&input, SortSpec { key, direction });
                assert_eq!(names(&sorted), vec!["Plain", "Signed"]);
            }
        }
    }

    #[test]
    fn test_sort_is_a_permutation_and_input_untouched() {
        let input = vec![
            make_candidate("A", 1.0, 1.0),
            make_candidate("B", 3.0, 1.0),
            make_candidate("C", 2.0, 1.0),
        ];
        let before = input.clone();
        let sorted = sort_candidates(&input, SortSpec::default());
        assert_eq!(input, before);
        assert_eq!(sorted.len(), input.len());
        for c in &input {
            assert!(sorted.contains(c));
        }
    }

    #[test]
    fn test_name_sort_is_accent_and_case_insensitive() {
        let input = vec![
            make_candidate("zoe", 1.0, 1.0),
            make_candidate("Álvaro", 1.0, 1.0),
            make_candidate("bruno", 1.0, 1.0),
            make_candidate("Alba", 1.0, 1.0),
        ];
        let asc = SortSpec {
            key: SortKey::Name,
            direction: SortDirection::Asc,
        };
        assert_eq!(
            names(&sort_candidates(&input, asc)),
            vec!["Alba", "Álvaro", "bruno", "zoe"]
        );

        let desc = SortSpec {
            key: SortKey::Name,
            direction: SortDirection::Desc,
        };
        assert_eq!(
            names(&sort_candidates(&input, desc)),
            vec!["zoe", "bruno", "Álvaro", "Alba"]
        );
    }

    #[test]
    fn test_compare_names_ties_on_accent() {
        assert_eq!(compare_names("Jose", "José"), Ordering::Less);
        assert_eq!(compare_names("ana", "ana"), Ordering::Equal);
    }
}
