//! Suite reports, as Go-style benchmark lines or JSON.

use serde::Serialize;

use crate::adapters::AdapterKind;
use crate::driver::Measurement;
use crate::error::HarnessError;
use crate::fixture::Scenario;

/// Result state of one entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Timed and every dispatch matched.
    Ok,
    /// Timed, but some dispatches missed; the numbers are not routing cost.
    Invalid,
    /// Gate passed; nothing was timed.
    Verified,
    /// Aborted before timing.
    Failed,
}

/// One (adapter, scenario) entry point.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    /// e.g. `Benchmark_matchit_single_route_serve_GET`.
    pub name: String,
    pub adapter: AdapterKind,
    pub scenario: Scenario,
    pub status: EntryStatus,
    pub iterations: u64,
    pub ns_per_op: f64,
    /// `None` when allocations were not being counted.
    pub allocs_per_op: Option<f64>,
    pub bytes_per_op: Option<f64>,
    pub unmatched: u64,
    pub error: Option<String>,
}

impl EntryReport {
    fn base(adapter: AdapterKind, scenario: Scenario, status: EntryStatus) -> Self {
        Self {
            name: format!("Benchmark_{}_{}", adapter.name(), scenario.name()),
            adapter,
            scenario,
            status,
            iterations: 0,
            ns_per_op: 0.0,
            allocs_per_op: None,
            bytes_per_op: None,
            unmatched: 0,
            error: None,
        }
    }

    pub fn completed(
        adapter: AdapterKind,
        scenario: Scenario,
        measurement: &Measurement,
        counting_allocations: bool,
    ) -> Self {
        let status = if measurement.is_valid() {
            EntryStatus::Ok
        } else {
            EntryStatus::Invalid
        };

        Self {
            iterations: measurement.iterations,
            ns_per_op: measurement.time_per_iter(),
            allocs_per_op: counting_allocations.then(|| measurement.allocations_per_iter()),
            bytes_per_op: counting_allocations.then(|| measurement.bytes_per_iter()),
            unmatched: measurement.unmatched,
            ..Self::base(adapter, scenario, status)
        }
    }

    pub fn verified(adapter: AdapterKind, scenario: Scenario) -> Self {
        Self::base(adapter, scenario, EntryStatus::Verified)
    }

    pub fn failed(adapter: AdapterKind, scenario: Scenario, error: &HarnessError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::base(adapter, scenario, EntryStatus::Failed)
        }
    }

    /// Whether this entry makes the run unsuccessful.
    pub fn is_failure(&self) -> bool {
        matches!(self.status, EntryStatus::Failed | EntryStatus::Invalid)
    }

    fn render_line(&self) -> String {
        match self.status {
            EntryStatus::Ok | EntryStatus::Invalid => {
                let mut line = format!(
                    "{:<48} {:>10} {:>12.2} ns/op",
                    self.name, self.iterations, self.ns_per_op
                );
                match (self.bytes_per_op, self.allocs_per_op) {
                    (Some(bytes), Some(allocs)) => line.push_str(&format!(
                        " {:>8.0} B/op {:>6.0} allocs/op",
                        bytes, allocs
                    )),
                    _ => line.push_str("        - B/op      - allocs/op"),
                }
                if self.status == EntryStatus::Invalid {
                    line.push_str(&format!("  INVALID ({} unmatched)", self.unmatched));
                }
                line
            }
            EntryStatus::Verified => format!("{:<48} verified", self.name),
            EntryStatus::Failed => format!(
                "{:<48} FAILED {}",
                self.name,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// All entry points of one suite run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    /// Whether allocation figures were measured.
    pub counting_allocations: bool,
    pub entries: Vec<EntryReport>,
}

impl SuiteReport {
    pub fn new(counting_allocations: bool) -> Self {
        Self {
            counting_allocations,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: EntryReport) {
        self.entries.push(entry);
    }

    /// Number of failed or invalid entries.
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.is_failure()).count()
    }

    pub fn get(&self, adapter: AdapterKind, scenario: Scenario) -> Option<&EntryReport> {
        self.entries
            .iter()
            .find(|e| e.adapter == adapter && e.scenario == scenario)
    }

    /// One line per entry, `go test -bench` style.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.render_line());
            out.push('\n');
        }
        if self.failures() > 0 {
            out.push_str(&format!("FAIL ({} of {} entries)\n", self.failures(), self.entries.len()));
        } else {
            out.push_str("PASS\n");
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
