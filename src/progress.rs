/*!
 * Remaining-time estimation for translation runs.
 *
 * The estimator works in units (one chunk-translation call each). When a
 * session is resumed, units completed by previous runs are excluded from the
 * pace calculation: only work done in this run tells us how fast this run is
 * going.
 */

use std::time::{Duration, Instant};

/// Projects remaining time from elapsed time and completed units
#[derive(Debug, Clone)]
pub struct EtaEstimator {
    /// When this run started
    started: Instant,

    /// Total units across the whole session (all runs)
    total_units: usize,

    /// Units already done before this run started; nonzero only on resume
    initial_completed_units: usize,

    /// Units completed so far, including the initial ones
    completed_units: usize,
}

impl EtaEstimator {
    /// Create an estimator for a run starting now
    pub fn new(total_units: usize, initial_completed_units: usize) -> Self {
        Self {
            started: Instant::now(),
            total_units,
            initial_completed_units,
            completed_units: initial_completed_units,
        }
    }

    /// Record one completed unit
    pub fn record_unit(&mut self) {
        self.completed_units += 1;
    }

    pub fn completed_units(&self) -> usize {
        self.completed_units
    }

    pub fn total_units(&self) -> usize {
        self.total_units
    }

    /// Current remaining-time estimate, if one can be produced.
    ///
    /// No estimate exists until at least one unit has completed in this run,
    /// or when the projection lands at a second or less.
    pub fn estimate(&self) -> Option<Duration> {
        self.estimate_with_elapsed(self.started.elapsed())
    }

    // Split out so tests can inject a known elapsed time.
    fn estimate_with_elapsed(&self, elapsed: Duration) -> Option<Duration> {
        let completed_in_run = self
            .completed_units
            .saturating_sub(self.initial_completed_units);
        if completed_in_run == 0 {
            return None;
        }

        let remaining_units = self.total_units.saturating_sub(self.completed_units);
        let eta = Duration::from_secs_f64(
            elapsed.as_secs_f64() * remaining_units as f64 / completed_in_run as f64,
        );

        if eta.as_millis() > 1000 {
            Some(eta)
        } else {
            None
        }
    }

    /// Render an estimate as `Nh Nm Ns`, omitting zero units. Seconds always
    /// render when hours and minutes are both zero.
    pub fn format_eta(eta: Duration) -> String {
        let total_seconds = (eta.as_millis() as f64 / 1000.0).round() as u64;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        let mut out = String::new();
        if hours > 0 {
            out.push_str(&format!("{}h ", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}m ", minutes));
        }
        if seconds > 0 || (hours == 0 && minutes == 0) {
            out.push_str(&format!("{}s", seconds));
        }
        out.trim_end().to_string()
    }
}
