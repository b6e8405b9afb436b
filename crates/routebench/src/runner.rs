//! Suite runner: one entry point per (adapter, scenario).
//!
//! Each entry gets its own router instance and fixture. Errors raised while
//! building or checking an entry are recorded against that entry only; the
//! rest of the suite keeps going.

use std::time::Instant;

use routebench_telemetry::{
    log_entry_completed, log_entry_failed, log_entry_mounted, log_entry_verified, log_suite_finished,
    log_suite_started,
};

use crate::adapter::mount;
use crate::adapters::AdapterKind;
use crate::alloc;
use crate::config::HarnessConfig;
use crate::driver::{Driver, Measurement};
use crate::error::HarnessError;
use crate::fixture::{Fixture, Scenario};
use crate::report::{EntryReport, SuiteReport};
use crate::route::RouteTable;

/// Run every selected entry point and collect the results.
pub fn run_suite(config: &HarnessConfig) -> SuiteReport {
    let counting = alloc::is_counting();
    let started = Instant::now();

    log_suite_started!(
        adapters = config.adapters.len(),
        scenarios = config.scenarios.len(),
        iterations = config.iterations,
        counting_allocations = counting,
        "starting benchmark suite"
    );

    // Parsed once; a bad custom table fails every multi-route entry the same way.
    let custom_table = config.routes.as_ref().map(RouteTable::parse);

    let mut report = SuiteReport::new(counting);
    for &adapter in &config.adapters {
        for &scenario in &config.scenarios {
            let entry = match run_entry(adapter, scenario, config, custom_table.as_ref()) {
                Ok(Some(measurement)) => {
                    log_entry_completed!(
                        adapter = adapter.name(),
                        scenario = scenario.name(),
                        iterations = measurement.iterations,
                        ns_per_op = measurement.time_per_iter(),
                        allocs_per_op = measurement.allocations_per_iter(),
                        unmatched = measurement.unmatched,
                        "entry completed"
                    );
                    EntryReport::completed(adapter, scenario, &measurement, counting)
                }
                Ok(None) => EntryReport::verified(adapter, scenario),
                Err(err) => {
                    log_entry_failed!(
                        adapter = adapter.name(),
                        scenario = scenario.name(),
                        code = err.code(),
                        error = %err,
                        "entry failed"
                    );
                    EntryReport::failed(adapter, scenario, &err)
                }
            };
            report.push(entry);
        }
    }

    log_suite_finished!(
        entries = report.entries.len(),
        failures = report.failures(),
        duration_ms = started.elapsed().as_millis() as u64,
        "benchmark suite finished"
    );

    report
}

/// Build, gate and (unless `verify_only`) time one entry point.
///
/// Returns `None` when only the gate was run.
pub fn run_entry(
    kind: AdapterKind,
    scenario: Scenario,
    config: &HarnessConfig,
    custom_table: Option<&Result<RouteTable, HarnessError>>,
) -> Result<Option<Measurement>, HarnessError> {
    let fixture = build_fixture(scenario, config, custom_table)?;

    let mut adapter = kind.create();
    mount(adapter.as_mut(), fixture.table())?;
    log_entry_mounted!(
        adapter = kind.name(),
        scenario = scenario.name(),
        routes = fixture.table().len(),
        "routes registered"
    );

    let driver = Driver::new(adapter.as_ref(), &fixture);
    if !adapter.is_baseline() {
        driver.verify()?;
        log_entry_verified!(adapter = kind.name(), scenario = scenario.name(), "gate passed");
    }

    if config.verify_only {
        return Ok(None);
    }

    driver.warm_up(config.warmup_iterations);
    Ok(Some(driver.run(config.iterations)))
}

fn build_fixture(
    scenario: Scenario,
    config: &HarnessConfig,
    custom_table: Option<&Result<RouteTable, HarnessError>>,
) -> Result<Fixture, HarnessError> {
    let table = match scenario {
        Scenario::MultiRoute => custom_table
            .map(|parsed| parsed.as_ref().map_err(Clone::clone))
            .transpose()?,
        Scenario::SingleGet | Scenario::SinglePost => None,
    };

    let fixture = scenario.fixture(table)?;
    Ok(match config.query.as_deref() {
        Some(query) if !query.is_empty() => fixture.with_query(query),
        _ => fixture,
    })
}
