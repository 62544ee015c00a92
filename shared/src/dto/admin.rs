use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate query statistics from pg_stat_statements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryStatsSummary {
    pub total_queries: i64,
    pub total_exec_ms: f64,
    pub mean_exec_ms: f64,
    /// Shared-buffer cache hit ratio in 0.0..=1.0
    pub cache_hit_ratio: f64,
    pub captured_at: DateTime<Utc>,
}

/// One normalized query from the slow-query report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlowQuery {
    pub query: String,
    pub calls: i64,
    pub total_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    pub rows: i64,
}

/// Filters applied to the slow-query report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SlowQueryFilters {
    pub min_mean_ms: f64,
    pub min_calls: i64,
    pub limit: u32,
}

impl Default for SlowQueryFilters {
    fn default() -> Self {
        Self {
            min_mean_ms: 10.0,
            min_calls: 5,
            limit: 25,
        }
    }
}

/// Per-table statistics from pg_stat_user_tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableStats {
    pub schema: String,
    pub table: String,
    pub live_tuples: i64,
    pub dead_tuples: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_vacuum: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_autovacuum: Option<DateTime<Utc>>,
    pub size_bytes: i64,
}

impl TableStats {
    /// Fraction of dead tuples relative to all tuples, 0.0 when the table is empty
    pub fn dead_ratio(&self) -> f64 {
        let total = self.live_tuples + self.dead_tuples;
        if total == 0 {
            return 0.0;
        }
        self.dead_tuples as f64 / total as f64
    }
}

/// Request to vacuum a single table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VacuumRequest {
    pub table: String,
    /// VACUUM FULL rewrites the table and takes an exclusive lock
    pub full: bool,
}

/// Result of a completed vacuum run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VacuumOutcome {
    pub table: String,
    pub full: bool,
    pub duration_ms: i64,
    pub dead_tuples_before: i64,
    pub dead_tuples_after: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_ratio() {
        let stats = TableStats {
            schema: "public".to_string(),
            table: "posts".to_string(),
            live_tuples: 900,
            dead_tuples: 100,
            last_vacuum: None,
            last_autovacuum: None,
            size_bytes: 8192,
        };
        assert!((stats.dead_ratio() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_dead_ratio_empty_table() {
        let stats = TableStats {
            schema: "public".to_string(),
            table: "empty".to_string(),
            live_tuples: 0,
            dead_tuples: 0,
            last_vacuum: None,
            last_autovacuum: None,
            size_bytes: 0,
        };
        assert_eq!(stats.dead_ratio(), 0.0);
    }
}
