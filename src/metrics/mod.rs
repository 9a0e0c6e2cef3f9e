// Metrics module - Prometheus-compatible metrics tracking
// Provides counters and duration percentiles for observability

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Metrics struct tracks counters and durations for Prometheus export
/// Thread-safe via atomic operations and mutexes
pub struct Metrics {
    // Request counter
    request_count: AtomicU64,

    // Status code counters (e.g., 200, 400, 500)
    status_counts: Mutex<HashMap<u16, u64>>,

    // Applied transformation counters by command label
    command_counts: Mutex<HashMap<&'static str, u64>>,

    // Pipeline duration tracking (stored in microseconds)
    durations: Mutex<Vec<u64>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            status_counts: Mutex::new(HashMap::new()),
            command_counts: Mutex::new(HashMap::new()),
            durations: Mutex::new(Vec::new()),
        }
    }

    /// Increment the total request count
    pub fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment counter for a specific HTTP status code
    pub fn increment_status_count(&self, status_code: u16) {
        if let Ok(mut counts) = self.status_counts.lock() {
            *counts.entry(status_code).or_insert(0) += 1;
        }
    }

    /// Increment counter for an applied transformation command
    pub fn increment_command_count(&self, label: &'static str) {
        if let Ok(mut counts) = self.command_counts.lock() {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    /// Record a pipeline duration in microseconds
    pub fn record_duration(&self, duration_us: u64) {
        if let Ok(mut durations) = self.durations.lock() {
            durations.push(duration_us);
        }
    }

    /// Get current request count (for testing)
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Get count for specific status code (for testing)
    pub fn get_status_count(&self, status_code: u16) -> u64 {
        self.status_counts
            .lock()
            .ok()
            .and_then(|counts| counts.get(&status_code).copied())
            .unwrap_or(0)
    }

    /// Compute a percentile over sorted duration samples
    fn percentile(sorted: &[u64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let rank = (p * (sorted.len() - 1) as f64).round() as usize;
        sorted[rank.min(sorted.len() - 1)] as f64
    }

    /// Export all metrics in Prometheus text exposition format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP http_requests_total Total number of HTTP requests received\n");
        output.push_str("# TYPE http_requests_total counter\n");
        output.push_str(&format!(
            "http_requests_total {}\n",
            self.request_count.load(Ordering::Relaxed)
        ));

        output.push_str("\n# HELP http_requests_by_status_total HTTP requests by status code\n");
        output.push_str("# TYPE http_requests_by_status_total counter\n");
        if let Ok(counts) = self.status_counts.lock() {
            for (status, count) in counts.iter() {
                output.push_str(&format!(
                    "http_requests_by_status_total{{status=\"{}\"}} {}\n",
                    status, count
                ));
            }
        }

        output.push_str("\n# HELP transform_commands_total Transformation commands applied\n");
        output.push_str("# TYPE transform_commands_total counter\n");
        if let Ok(counts) = self.command_counts.lock() {
            for (command, count) in counts.iter() {
                output.push_str(&format!(
                    "transform_commands_total{{command=\"{}\"}} {}\n",
                    command, count
                ));
            }
        }

        output.push_str(
            "\n# HELP transform_duration_microseconds Pipeline duration percentiles\n",
        );
        output.push_str("# TYPE transform_duration_microseconds gauge\n");
        if let Ok(durations) = self.durations.lock() {
            let mut sorted = durations.clone();
            sorted.sort_unstable();
            for (quantile, p) in [("0.5", 0.5), ("0.9", 0.9), ("0.95", 0.95), ("0.99", 0.99)] {
                output.push_str(&format!(
                    "transform_duration_microseconds{{quantile=\"{}\"}} {}\n",
                    quantile,
                    Self::percentile(&sorted, p)
                ));
            }
        }

        output
    }
}
