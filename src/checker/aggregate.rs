// src/checker/aggregate.rs
// =============================================================================
// Summaries and ordering for a finished result set.
//
// - Summary: how many results per status, plus the health score
//   (percentage of results that are ok, rounded)
// - sort_by_severity: most actionable first, stable for equal statuses
// =============================================================================

use serde::Serialize;

use super::result::{ScanResult, Status};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub ok: usize,
    pub redirect: usize,
    pub broken: usize,
    pub risky: usize,
    pub timeout: usize,
    pub unreachable: usize,
    pub unknown: usize,
    pub invalid: usize,
    /// 0..=100
    pub health_score: u8,
}

impl Summary {
    pub fn from_results(results: &[ScanResult]) -> Self {
        // Start from all-zero counts, then bump one counter per result
        let mut summary = Summary {
            total: results.len(),
            health_score: health_score(results),
            ..Default::default()
        };
        for result in results {
            *summary.count_mut(result.status) += 1;
        }
        summary
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Ok => self.ok,
            Status::Redirect => self.redirect,
            Status::Broken => self.broken,
            Status::Risky => self.risky,
            Status::Timeout => self.timeout,
            Status::Unreachable => self.unreachable,
            Status::Unknown => self.unknown,
            Status::Invalid => self.invalid,
        }
    }

    /// Everything that is not ok
    pub fn issues(&self) -> usize {
        // ok can never exceed total, so this cannot underflow
        self.total - self.ok
    }

    // Same mapping as count(), but hands out the counter itself
    fn count_mut(&mut self, status: Status) -> &mut usize {
        match status {
            Status::Ok => &mut self.ok,
            Status::Redirect => &mut self.redirect,
            Status::Broken => &mut self.broken,
            Status::Risky => &mut self.risky,
            Status::Timeout => &mut self.timeout,
            Status::Unreachable => &mut self.unreachable,
            Status::Unknown => &mut self.unknown,
            Status::Invalid => &mut self.invalid,
        }
    }
}

/// round(100 * ok / total), 0 for an empty set
pub fn health_score(results: &[ScanResult]) -> u8 {
    let total = results.len();
    if total == 0 {
        return 0;
    }
    let ok = results.iter().filter(|r| r.is_ok()).count();
    // Integer round-half-up of 100 * ok / total
    ((200 * ok + total) / (2 * total)) as u8
}

/// Stable sort: risky, broken, redirect, ok, timeout, unreachable, unknown, invalid
pub fn sort_by_severity(results: &mut [ScanResult]) {
    // sort_by_key is a stable sort: equal statuses keep their input order
    results.sort_by_key(|r| r.status.severity());
}

/// Owned version of `sort_by_severity`
pub fn sorted_by_severity(mut results: Vec<ScanResult>) -> Vec<ScanResult> {
    sort_by_severity(&mut results);
    results
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why (200 * ok + total) / (2 * total)?
//    - Integer division always rounds down
//    - Adding half the divisor first turns that into round-half-up
//    - Doubling both sides keeps "half the divisor" an integer
//
// 2. sort vs sort_unstable
//    - sort / sort_by_key keep equal elements in their original order
//    - sort_unstable is a bit faster but may shuffle ties
//    - The report relies on ties staying in scan order
// -----------------------------------------------------------------------------
