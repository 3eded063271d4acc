//! Summary statistics over a whole result set (never a single page).

use std::collections::HashMap;

use serde::Serialize;

use crate::models::candidate::Candidate;

const TOP_SKILLS: usize = 10;
const TOP_LOCATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

/// Derived, read-only summary. Computed fresh from the current result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total_candidates: usize,
    pub avg_score: f64,
    pub avg_experience: f64,
    pub unique_skills: usize,
    /// Occurrences per skill, in its original casing, ordered by first appearance.
    pub skill_frequency: Vec<FrequencyEntry>,
    pub top_skills: Vec<FrequencyEntry>,
    pub experience_ranges: Vec<Bucket>,
    pub location_distribution: Vec<FrequencyEntry>,
    pub top_locations: Vec<FrequencyEntry>,
    pub score_quality: Vec<Bucket>,
}

/// Computes every analytics panel. On an empty set all counts, averages and percentages
/// are zero rather than NaN.
pub fn aggregate(candidates: &[Candidate]) -> AggregateStats {
    let total = candidates.len();

    let avg_score = mean(candidates.iter().map(|c| c.score), total);
    let avg_experience = mean(candidates.iter().map(|c| c.experience_years), total);

    let skill_frequency = count_in_order(
        candidates.iter().flat_map(|c| c.skills.iter().map(String::as_str)),
        total,
    );
    let location_distribution = count_in_order(
        candidates
            .iter()
            .filter_map(|c| c.city.as_deref())
            .filter(|city| !city.is_empty()),
        total,
    );

    let experience_rules: [(&'static str, fn(&Candidate) -> bool); 4] = [
        ("0-2 años", |c| c.experience_years <= 2.0),
        ("3-5 años", |c| c.experience_years > 2.0 && c.experience_years <= 5.0),
        ("6-10 años", |c| c.experience_years > 5.0 && c.experience_years <= 10.0),
        ("10+ años", |c| c.experience_years > 10.0),
    ];
    let quality_rules: [(&'static str, fn(&Candidate) -> bool); 3] = [
        ("Score ≥ 8.0", |c| c.score >= 8.0),
        ("Score 6.0 - 7.9", |c| c.score >= 6.0 && c.score < 8.0),
        ("Score < 6.0", |c| c.score < 6.0),
    ];
    let experience_ranges = buckets(candidates, &experience_rules);
    let score_quality = buckets(candidates, &quality_rules);

    AggregateStats {
        total_candidates: total,
        avg_score,
        avg_experience,
        unique_skills: skill_frequency.len(),
        top_skills: top_n(&skill_frequency, TOP_SKILLS),
        top_locations: top_n(&location_distribution, TOP_LOCATIONS),
        skill_frequency,
        experience_ranges,
        location_distribution,
        score_quality,
    }
}

/// `count / total * 100`, or 0 when there is nothing to divide by.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn mean(values: impl Iterator<Item = f64>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    values.sum::<f64>() / total as f64
}

fn count_in_order<'a>(values: impl Iterator<Item = &'a str>, total: usize) -> Vec<FrequencyEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts
        .into_iter()
        .map(|(value, count)| FrequencyEntry {
            value: value.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Highest counts first; the stable sort keeps first-appearance order among ties.
fn top_n(entries: &[FrequencyEntry], n: usize) -> Vec<FrequencyEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(n);
    sorted
}

fn buckets(
    candidates: &[Candidate],
    rules: &[(&'static str, fn(&Candidate) -> bool)],
) -> Vec<Bucket> {
    rules
        .iter()
        .map(|&(label, rule)| {
            let count = candidates.iter().filter(|c| rule(c)).count();
            Bucket {
                label,
                count,
                percentage: percentage(count, candidates.len()),
            }
        })
        .collect()
}
