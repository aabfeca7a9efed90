//! Local maxima search with height and distance constraints

use serde::{Deserialize, Serialize};

use crate::config::PeakPriority;

/// A local maximum of a 1-D signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Sample index (midpoint for flat tops)
    pub index: usize,
    /// Signal value at `index`
    pub height: f64,
}

/// Find peaks of `data` at least `min_height` tall and `min_distance` apart
///
/// A peak is a sample strictly greater than its left neighbour and followed,
/// possibly after a flat run of equal samples, by a smaller one. Flat tops
/// report their midpoint. The first and last samples are never peaks.
///
/// Peaks closer than `min_distance` are resolved according to `priority`.
/// The result is ordered by index.
pub fn find_peaks(
    data: &[f64],
    min_height: f64,
    min_distance: usize,
    priority: PeakPriority,
) -> Vec<Peak> {
    let candidates: Vec<Peak> = local_maxima(data)
        .into_iter()
        .map(|index| Peak {
            index,
            height: data[index],
        })
        .filter(|peak| peak.height >= min_height)
        .collect();

    if min_distance <= 1 {
        return candidates;
    }

    match priority {
        PeakPriority::FirstInScan => suppress_in_scan_order(candidates, min_distance),
        PeakPriority::Tallest => suppress_by_height(candidates, min_distance),
    }
}

/// Indices of all local maxima, flat tops reduced to their midpoint
fn local_maxima(data: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if data.len() < 3 {
        return maxima;
    }

    let last = data.len() - 1;
    let mut i = 1;
    while i < last {
        if data[i - 1] < data[i] {
            let mut ahead = i + 1;
            while ahead < last && data[ahead] == data[i] {
                ahead += 1;
            }
            if data[ahead] < data[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

fn suppress_in_scan_order(candidates: Vec<Peak>, min_distance: usize) -> Vec<Peak> {
    let mut kept: Vec<Peak> = Vec::with_capacity(candidates.len());
    for peak in candidates {
        match kept.last() {
            Some(previous) if peak.index - previous.index < min_distance => {}
            _ => kept.push(peak),
        }
    }
    kept
}

fn suppress_by_height(candidates: Vec<Peak>, min_distance: usize) -> Vec<Peak> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    // Stable sort; among equal heights the later peak is visited first
    order.sort_by(|&a, &b| {
        candidates[a]
            .height
            .partial_cmp(&candidates[b].height)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = vec![true; candidates.len()];
    for &current in order.iter().rev() {
        if !keep[current] {
            continue;
        }
        let index = candidates[current].index;

        let mut k = current;
        while k > 0 && index - candidates[k - 1].index < min_distance {
            k -= 1;
            keep[k] = false;
        }
        let mut k = current + 1;
        while k < candidates.len() && candidates[k].index - index < min_distance {
            keep[k] = false;
            k += 1;
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(peak, kept)| kept.then_some(peak))
        .collect()
}
