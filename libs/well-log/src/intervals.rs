//! Valid value intervals
//!
//! A curve is plotted as one polyline per maximal run of valid values, so
//! gaps (NaN, infinities, non-positive values on log scale) break the line.

/// Inclusive index range `[start, stop]` of valid values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidInterval {
    pub start: usize,
    pub stop: usize,
}

impl ValidInterval {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Number of samples covered, never zero
    pub fn sample_count(&self) -> usize {
        self.stop - self.start + 1
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.stop
    }
}

fn is_valid(value: f64, log_scale: bool) -> bool {
    value.is_finite() && (!log_scale || value > 0.0)
}

/// Maximal runs of valid values
pub fn valid_value_intervals(values: &[f64], log_scale: bool) -> Vec<ValidInterval> {
    let mut intervals = Vec::new();
    let mut run_start = None;

    for (index, value) in values.iter().enumerate() {
        match (is_valid(*value, log_scale), run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(start)) => {
                intervals.push(ValidInterval::new(start, index - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        intervals.push(ValidInterval::new(start, values.len() - 1));
    }
    intervals
}

/// Split runs of an extraction curve where the well leaves the grid
///
/// Extraction samples come in (enter cell, exit cell) pairs. Within a run
/// the gap between the exit of one pair and the entry of the next is
/// checked; a gap above `tolerance` ends the interval. Pairing starts at
/// the first odd index of the run.
pub fn split_at_depth_gaps(
    intervals: &[ValidInterval],
    measured_depths: &[f64],
    tolerance: f64,
) -> Vec<ValidInterval> {
    let mut split = Vec::with_capacity(intervals.len());

    for interval in intervals {
        if interval.start == interval.stop {
            split.push(*interval);
            continue;
        }

        let mut interval_start = interval.start;
        let mut index = if interval.start % 2 == 0 {
            interval.start + 1
        } else {
            interval.start
        };
        while index < interval.stop {
            if (measured_depths[index + 1] - measured_depths[index]).abs() > tolerance {
                split.push(ValidInterval::new(interval_start, index));
                interval_start = index + 1;
            }
            index += 2;
        }
        if interval_start <= interval.stop {
            split.push(ValidInterval::new(interval_start, interval.stop));
        }
    }
    split
}

/// Start and stop of each interval within the concatenated per-interval arrays
pub fn polyline_start_stop_indices(intervals: &[ValidInterval]) -> Vec<(usize, usize)> {
    let mut offset = 0;
    intervals
        .iter()
        .map(|interval| {
            let range = (offset, offset + interval.sample_count() - 1);
            offset += interval.sample_count();
            range
        })
        .collect()
}

/// Concatenate the values covered by `intervals`
pub fn values_by_intervals(values: &[f64], intervals: &[ValidInterval]) -> Vec<f64> {
    intervals
        .iter()
        .flat_map(|interval| values[interval.indices()].iter().copied())
        .collect()
}
