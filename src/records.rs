//! Best-runs board
//!
//! Completed runs ranked by fewest deaths, then fastest time.
//! Persisted to LocalStorage, keeps the top 10.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub const MAX_RECORDS: usize = 10;

/// One completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub deaths: u32,
    /// Simulated play time of the whole run
    pub time_ms: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl RunRecord {
    /// Ranking order: better runs sort first
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.deaths
            .cmp(&other.deaths)
            .then(self.time_ms.total_cmp(&other.time_ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestRuns {
    pub entries: Vec<RunRecord>,
}

impl BestRuns {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "treasure_run_records";

    pub fn new() -> Self {
        Self::default()
    }

    /// Rank (1-based) a run would get, or None if it would not make the board.
    /// Ties go below existing entries.
    pub fn potential_rank(&self, deaths: u32, time_ms: f64) -> Option<usize> {
        let candidate = RunRecord {
            deaths,
            time_ms,
            timestamp: 0.0,
        };
        let pos = self
            .entries
            .iter()
            .position(|e| candidate.rank_cmp(e) == Ordering::Less)
            .unwrap_or(self.entries.len());
        (pos < MAX_RECORDS).then_some(pos + 1)
    }

    /// Insert a completed run. Returns its rank, or None if it didn't qualify.
    pub fn add_run(&mut self, deaths: u32, time_ms: f64, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(deaths, time_ms)?;
        self.entries.insert(
            rank - 1,
            RunRecord {
                deaths,
                time_ms,
                timestamp,
            },
        );
        self.entries.truncate(MAX_RECORDS);
        Some(rank)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::platform::storage::load::<BestRuns>(Self::STORAGE_KEY) {
            Some(mut runs) => {
                runs.entries.sort_by(RunRecord::rank_cmp);
                runs.entries.truncate(MAX_RECORDS);
                log::info!("Loaded {} best runs", runs.entries.len());
                runs
            }
            None => Self::new(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        crate::platform::storage::save(Self::STORAGE_KEY, self);
        log::info!("Best runs saved ({} entries)", self.entries.len());
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

/// `m:ss.t` for the HUD and the records list
pub fn format_time(time_ms: f64) -> String {
    let tenths = (time_ms.max(0.0) / 100.0).floor() as u64;
    let minutes = tenths / 600;
    let seconds = (tenths / 10) % 60;
    format!("{}:{:02}.{}", minutes, seconds, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewer_deaths_beats_faster_time() {
        let mut runs = BestRuns::new();
        assert_eq!(runs.add_run(3, 60_000.0, 1.0), Some(1));
        assert_eq!(runs.add_run(1, 120_000.0, 2.0), Some(1));
        assert_eq!(runs.add_run(1, 90_000.0, 3.0), Some(1));
        let order: Vec<_> = runs.entries.iter().map(|e| (e.deaths, e.time_ms)).collect();
        assert_eq!(order, vec![(1, 90_000.0), (1, 120_000.0), (3, 60_000.0)]);
        assert_eq!(runs.entries.first().map(|b| b.timestamp), Some(3.0));
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut runs = BestRuns::new();
        runs.add_run(2, 50_000.0, 1.0);
        assert_eq!(runs.add_run(2, 50_000.0, 2.0), Some(2));
    }

    #[test]
    fn test_board_is_capped() {
        let mut runs = BestRuns::new();
        for i in 0..MAX_RECORDS as u32 {
            runs.add_run(i, 1000.0, 0.0);
        }
        assert_eq!(runs.potential_rank(50, 1.0), None);
        assert_eq!(runs.add_run(50, 1.0, 0.0), None);
        assert_eq!(runs.add_run(0, 500.0, 0.0), Some(1));
        assert_eq!(runs.entries.len(), MAX_RECORDS);
        assert_eq!(runs.entries.last().map(|e| e.deaths), Some(8));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.0");
        assert_eq!(format_time(61_250.0), "1:01.2");
        assert_eq!(format_time(599_999.0), "9:59.9");
    }
}
