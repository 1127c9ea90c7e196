// Grouped means and the derived chart views.
//
// Everything here is a pure function from the proportion matrix to a
// chart-ready shape. The grouping key is always the curriculum — one
// (bundesland, stufe) pair — and every downstream view averages curriculum
// vectors, never raw sentences, so large curricula don't dominate.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::proportions::ProportionMatrix;
use crate::data::models::SchoolLevel;

/// Mean topic proportions of one curriculum.
#[derive(Debug, Clone)]
pub struct GroupMean {
    pub bundesland: String,
    pub stufe: SchoolLevel,
    /// One mean per column of the proportion matrix, residual last
    pub means: Vec<f64>,
    /// Sentences that went into the mean
    pub sentences: usize,
}

/// The per-curriculum means — the base every chart view derives from.
#[derive(Debug, Clone)]
pub struct CurriculumMeans {
    pub labels: Vec<String>,
    /// Sorted by (bundesland, stufe)
    pub groups: Vec<GroupMean>,
}

/// One slice of a distribution pie.
#[derive(Debug, Clone, Serialize)]
pub struct TopicShare {
    pub label: String,
    pub share: f64,
}

/// One row of the level-focus view, in percent.
#[derive(Debug, Clone, Serialize)]
pub struct LevelFocusRow {
    pub topic: String,
    pub sek1: f64,
    pub sek2: f64,
    /// sek1 − sek2: positive topics lean towards Sekundarstufe I
    pub diff: f64,
}

/// One spoke of the radar view, raw proportions.
#[derive(Debug, Clone, Serialize)]
pub struct RadarRow {
    pub topic: String,
    pub sek1: f64,
    pub sek2: f64,
}

/// Which curricula the region matrix covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSelection {
    Single(SchoolLevel),
    /// Both levels averaged — restricted to regions that have both
    Combined,
}

/// The heatmap input: regions × topics, percent, residual dropped.
#[derive(Debug, Clone, Serialize)]
pub struct RegionMatrix {
    pub topics: Vec<String>,
    pub regions: Vec<String>,
    /// values[i][j] = percent share of topics[j] in regions[i]
    pub values: Vec<Vec<f64>>,
}

/// Group rows by curriculum and average each topic column.
///
/// A region that lacks one of the two levels simply has no group for it.
pub fn curriculum_means(matrix: &ProportionMatrix) -> CurriculumMeans {
    let width = matrix.width();
    let mut acc: BTreeMap<(String, SchoolLevel), (Vec<f64>, usize)> = BTreeMap::new();

    for row in &matrix.rows {
        let entry = acc
            .entry((row.bundesland.clone(), row.stufe))
            .or_insert_with(|| (vec![0.0; width], 0));
        for (sum, p) in entry.0.iter_mut().zip(&row.props) {
            *sum += p;
        }
        entry.1 += 1;
    }

    let groups = acc
        .into_iter()
        .map(|((bundesland, stufe), (sums, n))| GroupMean {
            bundesland,
            stufe,
            means: sums.iter().map(|s| s / n as f64).collect(),
            sentences: n,
        })
        .collect();

    CurriculumMeans {
        labels: matrix.labels.clone(),
        groups,
    }
}

impl CurriculumMeans {
    /// Regions that have curricula at both levels, sorted.
    pub fn complete_regions(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, BTreeSet<SchoolLevel>> = BTreeMap::new();
        for group in &self.groups {
            seen.entry(&group.bundesland).or_default().insert(group.stufe);
        }
        seen.into_iter()
            .filter(|(_, levels)| levels.len() == SchoolLevel::ALL.len())
            .map(|(region, _)| region.to_string())
            .collect()
    }
}

/// Element-wise mean over a set of curriculum vectors.
/// None when the set is empty — the caller decides what absence means.
fn mean_over<'a>(groups: impl Iterator<Item = &'a GroupMean>, width: usize) -> Option<Vec<f64>> {
    let mut sums = vec![0.0; width];
    let mut n = 0usize;
    for group in groups {
        for (sum, m) in sums.iter_mut().zip(&group.means) {
            *sum += m;
        }
        n += 1;
    }
    if n == 0 {
        return None;
    }
    for sum in &mut sums {
        *sum /= n as f64;
    }
    Some(sums)
}

/// Mean topic distribution across all curricula (total pie).
pub fn overall_distribution(means: &CurriculumMeans) -> Vec<TopicShare> {
    let Some(values) = mean_over(means.groups.iter(), means.labels.len()) else {
        return Vec::new();
    };
    to_shares(&means.labels, &values)
}

/// Mean topic distribution across the curricula of one level.
pub fn level_distribution(means: &CurriculumMeans, level: SchoolLevel) -> Vec<TopicShare> {
    let groups = means.groups.iter().filter(|g| g.stufe == level);
    let Some(values) = mean_over(groups, means.labels.len()) else {
        return Vec::new();
    };
    to_shares(&means.labels, &values)
}

/// How the topic focus shifts between the levels, in percent.
///
/// Restricted to regions with both levels so the comparison isn't skewed
/// by regions that only publish one curriculum. Sorted by diff ascending:
/// Sek II topics first, Sek I topics last.
pub fn level_focus(means: &CurriculumMeans) -> Vec<LevelFocusRow> {
    let Some((sek1, sek2)) = per_level_means(means) else {
        return Vec::new();
    };

    let mut rows: Vec<LevelFocusRow> = means
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let sek1 = sek1[i] * 100.0;
            let sek2 = sek2[i] * 100.0;
            LevelFocusRow {
                topic: label.clone(),
                sek1,
                sek2,
                diff: sek1 - sek2,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.diff.partial_cmp(&b.diff).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

/// Radar view: per-level means with the residual dropped, topics ordered
/// by overall prominence descending.
pub fn level_radar(means: &CurriculumMeans) -> Vec<RadarRow> {
    let Some((sek1, sek2)) = per_level_means(means) else {
        return Vec::new();
    };

    // Last column is the residual — not a topic, so not a spoke.
    let n_topics = means.labels.len().saturating_sub(1);

    let mut rows: Vec<RadarRow> = means.labels[..n_topics]
        .iter()
        .enumerate()
        .map(|(i, label)| RadarRow {
            topic: label.clone(),
            sek1: sek1[i],
            sek2: sek2[i],
        })
        .collect();

    rows.sort_by(|a, b| {
        let mean_a = a.sek1 + a.sek2;
        let mean_b = b.sek1 + b.sek2;
        mean_b.partial_cmp(&mean_a).unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

/// Per-level mean vectors over the complete regions only.
fn per_level_means(means: &CurriculumMeans) -> Option<(Vec<f64>, Vec<f64>)> {
    let complete = means.complete_regions();
    let width = means.labels.len();

    let of_level = |level: SchoolLevel| {
        mean_over(
            means
                .groups
                .iter()
                .filter(|g| g.stufe == level && complete.contains(&g.bundesland)),
            width,
        )
    };

    Some((of_level(SchoolLevel::SekI)?, of_level(SchoolLevel::SekII)?))
}

/// The regions × topics heatmap, percent, residual dropped.
pub fn region_matrix(means: &CurriculumMeans, selection: LevelSelection) -> RegionMatrix {
    // Residual column is dropped — the heatmap compares assigned topics.
    let n_topics = means.labels.len().saturating_sub(1);
    let topics: Vec<String> = means.labels[..n_topics].to_vec();

    let regions: Vec<String> = match selection {
        LevelSelection::Single(level) => {
            let set: BTreeSet<&str> = means
                .groups
                .iter()
                .filter(|g| g.stufe == level)
                .map(|g| g.bundesland.as_str())
                .collect();
            set.into_iter().map(String::from).collect()
        }
        LevelSelection::Combined => means.complete_regions(),
    };

    let values = regions
        .iter()
        .map(|region| {
            let groups = means.groups.iter().filter(|g| {
                g.bundesland == *region
                    && match selection {
                        LevelSelection::Single(level) => g.stufe == level,
                        LevelSelection::Combined => true,
                    }
            });
            let row = mean_over(groups, means.labels.len()).unwrap_or_else(|| vec![0.0; means.labels.len()]);
            row[..n_topics].iter().map(|v| v * 100.0).collect()
        })
        .collect();

    RegionMatrix {
        topics,
        regions,
        values,
    }
}

fn to_shares(labels: &[String], values: &[f64]) -> Vec<TopicShare> {
    labels
        .iter()
        .zip(values)
        .map(|(label, share)| TopicShare {
            label: label.clone(),
            share: *share,
        })
        .collect()
}
