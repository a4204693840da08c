use std::time::Duration;

/// Outcome counters of one collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectionStats {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    /// Symbols with no candle at the sample time
    pub empty: usize,
    /// Rows newly inserted into crypto_prices
    pub total_records: usize,
    pub elapsed: Duration,
}

impl CollectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of symbols that were stored successfully.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            empty = self.empty,
            total_records = self.total_records,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "✅ Collection finished"
        );
    }
}
