//! Derived statistics for the tracker and diary pages
//!
//! Everything here is computed on demand from the document; nothing is
//! persisted. Growth numbers come from the measurement history, diary
//! numbers from the entry list, and the stage distribution from the
//! tracked plants themselves.

use std::collections::{BTreeMap, HashSet};

use crate::model::{DiaryEntry, Measurement, Plant, Stage};

/// Growth summary for one tracked plant
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthStats {
    /// Latest known height in cm (newest measurement, falling back to
    /// the plant record itself)
    pub current_height: Option<f64>,
    /// Height gained between the first and last measurement, in cm
    pub total_growth: f64,
    /// Average growth in cm per day over the measured span
    pub avg_growth_per_day: f64,
    /// Days between the first and last measurement
    pub days_tracked: i64,
    /// Number of measurements on record
    pub measurements: usize,
    /// Stage from the newest measurement, falling back to the plant
    pub current_stage: Stage,
}

/// Compute growth statistics for one plant from its measurement history
///
/// Measurements are taken in any order; they are sorted by date here.
/// With fewer than two height readings the growth figures are zero.
pub fn growth_stats(plant: &Plant, measurements: &[&Measurement]) -> GrowthStats {
    let mut sorted: Vec<&Measurement> = measurements.to_vec();
    sorted.sort_by_key(|m| m.date);

    let heights: Vec<(&Measurement, f64)> = sorted
        .iter()
        .filter_map(|m| m.height.map(|h| (*m, h)))
        .collect();

    let current_height = heights
        .last()
        .map(|(_, h)| *h)
        .or(plant.height);
    let current_stage = sorted.last().map(|m| m.stage).unwrap_or(plant.stage);

    let (total_growth, avg_growth_per_day, days_tracked) = match (heights.first(), heights.last()) {
        (Some((first, first_h)), Some((last, last_h))) if heights.len() > 1 => {
            let growth = last_h - first_h;
            let days = (last.date - first.date).num_days();
            let avg = if days > 0 { growth / days as f64 } else { 0.0 };
            (growth, avg, days)
        }
        _ => (0.0, 0.0, 0),
    };

    GrowthStats {
        current_height,
        total_growth,
        avg_growth_per_day,
        days_tracked,
        measurements: sorted.len(),
        current_stage,
    }
}

/// Diary-wide summary numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryStats {
    /// Total entries
    pub entries: usize,
    /// Total photos across all entries
    pub photos: usize,
    /// Distinct plants with at least one entry
    pub plants_documented: usize,
    /// Distinct tags in use
    pub tags_used: usize,
}

/// Compute diary statistics from the full entry list
pub fn diary_stats(entries: &[DiaryEntry]) -> DiaryStats {
    let plants: HashSet<u64> = entries.iter().filter_map(|e| e.plant_id).collect();
    let tags: HashSet<&str> = entries
        .iter()
        .flat_map(|e| e.tags.iter().map(String::as_str))
        .collect();

    DiaryStats {
        entries: entries.len(),
        photos: entries.iter().map(|e| e.photos.len()).sum(),
        plants_documented: plants.len(),
        tags_used: tags.len(),
    }
}

/// Count tracked plants per growth stage
pub fn stage_distribution(plants: &[Plant]) -> BTreeMap<Stage, usize> {
    let mut distribution = BTreeMap::new();
    for plant in plants {
        *distribution.entry(plant.stage).or_insert(0) += 1;
    }
    distribution
}
