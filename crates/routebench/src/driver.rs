//! The timed loop.
//!
//! A [`Driver`] borrows an adapter that already has every route registered,
//! so construction cost never reaches the clock. Everything the loop touches
//! (request, sink, step list) is created before the clock starts and reused
//! by reference; any allocation measured comes from the router.

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::adapter::{Dispatch, RouterAdapter};
use crate::alloc::AllocSnapshot;
use crate::error::HarnessError;
use crate::fixture::Fixture;
use crate::method::Method;
use crate::sink::{NullSink, RecordingSink};

/// Totals of one timed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub iterations: u64,
    pub elapsed: Duration,
    pub allocations: u64,
    pub allocated_bytes: u64,
    /// Dispatches that did not end in a matched handler.
    pub unmatched: u64,
    /// Body bytes the handlers wrote.
    pub sink_bytes: u64,
}

impl Measurement {
    /// Nanoseconds per iteration.
    pub fn time_per_iter(&self) -> f64 {
        per_iter(self.elapsed.as_nanos() as f64, self.iterations)
    }

    pub fn allocations_per_iter(&self) -> f64 {
        per_iter(self.allocations as f64, self.iterations)
    }

    pub fn bytes_per_iter(&self) -> f64 {
        per_iter(self.allocated_bytes as f64, self.iterations)
    }

    /// A run with any unmatched dispatch measured something other than
    /// routing and must not be reported as a result.
    pub fn is_valid(&self) -> bool {
        self.unmatched == 0
    }

    /// Elapsed time, or `None` if the run is not valid.
    pub fn valid_elapsed(&self) -> Option<Duration> {
        self.is_valid().then_some(self.elapsed)
    }
}

fn per_iter(total: f64, iterations: u64) -> f64 {
    if iterations == 0 {
        0.0
    } else {
        total / iterations as f64
    }
}

/// One dispatch recorded by [`Driver::replay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub iteration: u64,
    /// Index into the fixture's steps.
    pub step: usize,
    pub method: Method,
    pub target: String,
    /// Carries the table index of the route that actually answered.
    pub outcome: Dispatch,
    /// What the handler wrote.
    pub body: String,
}

/// Runs a fixture's requests through one adapter.
pub struct Driver<'a, A: RouterAdapter + ?Sized> {
    adapter: &'a A,
    fixture: &'a Fixture,
}

impl<'a, A: RouterAdapter + ?Sized> Driver<'a, A> {
    pub fn new(adapter: &'a A, fixture: &'a Fixture) -> Self {
        Self { adapter, fixture }
    }

    /// Run `iterations` dispatches and return the totals.
    ///
    /// The clock and the allocation counter are read immediately around the
    /// loop. When the fixture cycles, iteration `i` retargets the request to
    /// step `i % steps.len()`.
    pub fn run(&self, iterations: u64) -> Measurement {
        let steps = self.fixture.steps();
        let mut request = self.fixture.request();
        let mut sink = NullSink::new();
        let mut unmatched = 0u64;

        let allocs_before = AllocSnapshot::now();
        let start = Instant::now();

        if self.fixture.is_cycle() {
            let mut index = 0;
            for _ in 0..iterations {
                let step = &steps[index];
                request.retarget(step.method, &step.path);
                let outcome = self.adapter.dispatch(black_box(&request), &mut sink);
                unmatched += u64::from(!outcome.is_match());

                index += 1;
                if index == steps.len() {
                    index = 0;
                }
            }
        } else {
            for _ in 0..iterations {
                let outcome = self.adapter.dispatch(black_box(&request), &mut sink);
                unmatched += u64::from(!outcome.is_match());
            }
        }

        let elapsed = start.elapsed();
        let allocs = AllocSnapshot::now().since(allocs_before);

        Measurement {
            iterations,
            elapsed,
            allocations: allocs.allocations,
            allocated_bytes: allocs.bytes,
            unmatched,
            sink_bytes: black_box(sink).bytes_written(),
        }
    }

    /// Untimed iterations to settle caches and branch predictors.
    pub fn warm_up(&self, iterations: u64) {
        if iterations > 0 {
            black_box(self.run(iterations));
        }
    }

    /// Dispatch `iterations` requests in the same order as [`Driver::run`],
    /// recording what each handler wrote.
    pub fn replay(&self, iterations: u64) -> Vec<Observation> {
        let steps = self.fixture.steps();
        let mut request = self.fixture.request();
        let mut sink = RecordingSink::new();
        let cycle = self.fixture.is_cycle();

        (0..iterations)
            .map(|iteration| {
                let index = if cycle {
                    (iteration % steps.len() as u64) as usize
                } else {
                    0
                };
                if cycle {
                    let step = &steps[index];
                    request.retarget(step.method, &step.path);
                }

                sink.reset();
                let outcome = self.adapter.dispatch(&request, &mut sink);
                Observation {
                    iteration,
                    step: index,
                    method: request.method(),
                    target: request.target().to_string(),
                    outcome,
                    body: sink.body_str(),
                }
            })
            .collect()
    }

    /// Check every step once: step `i` must be answered by the handler of
    /// table entry `i` and write the expected capture. Timing numbers are
    /// meaningless until this passes.
    pub fn verify(&self) -> Result<(), HarnessError> {
        let steps = self.fixture.steps();

        for observation in self.replay(steps.len() as u64) {
            let step = &steps[observation.step];
            if observation.outcome.route() == Some(step.route) && observation.body == step.expected {
                continue;
            }

            let actual = match observation.outcome.route() {
                Some(route) => format!("'{}' from route {}", observation.body, route),
                None => format!("{:?}", observation.outcome),
            };
            return Err(HarnessError::RouteMismatch {
                router: self.adapter.name(),
                method: observation.method.to_string(),
                target: observation.target,
                expected: format!("'{}' from route {}", step.expected, step.route),
                actual,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Handler, RouterAdapter};
    use crate::fixture::Scenario;
    use crate::pattern::PatternSyntax;
    use crate::request::SyntheticRequest;
    use crate::sink::ResponseSink;

    /// Answers every request with its own path and never captures params.
    struct EchoAdapter;

    impl RouterAdapter for EchoAdapter {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn syntax(&self) -> PatternSyntax {
            PatternSyntax::Colon
        }

        fn register(&mut self, _: Method, _: &str, _: Handler) -> Result<(), HarnessError> {
            Ok(())
        }

        fn dispatch(&self, request: &SyntheticRequest, sink: &mut dyn ResponseSink) -> Dispatch {
            if request.path() == "/missing" {
                return Dispatch::NotFound;
            }
            sink.write_str(request.path());
            Dispatch::Matched { route: 0 }
        }
    }

    #[test]
    fn run_counts_iterations_and_bytes() {
        let fixture = Scenario::SingleGet.fixture(None).unwrap();
        let measurement = Driver::new(&EchoAdapter, &fixture).run(100);

        assert_eq!(measurement.iterations, 100);
        assert_eq!(measurement.unmatched, 0);
        assert_eq!(measurement.sink_bytes, 100 * "/user/index".len() as u64);
        assert!(measurement.is_valid());
    }

    #[test]
    fn replay_cycles_through_steps() {
        let fixture = Scenario::MultiRoute.fixture(None).unwrap();
        let observations = Driver::new(&EchoAdapter, &fixture).replay(25);

        assert_eq!(observations.len(), 25);
        for observation in &observations {
            let step = &fixture.steps()[observation.step];
            assert_eq!(observation.step, (observation.iteration % 10) as usize);
            assert_eq!(observation.method, step.method);
            assert_eq!(observation.body, step.path);
        }
    }

    #[test]
    fn verify_reports_wrong_capture() {
        let fixture = Scenario::SingleGet.fixture(None).unwrap();
        let err = Driver::new(&EchoAdapter, &fixture).verify().unwrap_err();

        assert_eq!(
            err,
            HarnessError::RouteMismatch {
                router: "echo",
                method: "GET".into(),
                target: "/user/index".into(),
                expected: "'index' from route 0".into(),
                actual: "'/user/index' from route 0".into(),
            }
        );
    }

    #[test]
    fn unmatched_dispatch_invalidates_run() {
        let fixture = crate::fixture::Fixture::single(crate::route::Route::new(Method::Get, "/missing").unwrap());
        let driver = Driver::new(&EchoAdapter, &fixture);

        let measurement = driver.run(10);
        assert_eq!(measurement.unmatched, 10);
        assert!(!measurement.is_valid());

        let err = driver.verify().unwrap_err();
        assert!(err.to_string().contains("NotFound"), "{err}");
    }

    #[test]
    fn per_iteration_figures() {
        let measurement = Measurement {
            iterations: 4,
            elapsed: Duration::from_nanos(100),
            allocations: 8,
            allocated_bytes: 256,
            unmatched: 0,
            sink_bytes: 0,
        };

        assert_eq!(measurement.time_per_iter(), 25.0);
        assert_eq!(measurement.allocations_per_iter(), 2.0);
        assert_eq!(measurement.bytes_per_iter(), 64.0);

        let empty = Measurement {
            iterations: 0,
            ..measurement
        };
        assert_eq!(empty.time_per_iter(), 0.0);
    }

    #[test]
    fn unmatched_runs_have_no_valid_elapsed() {
        let valid = Measurement {
            iterations: 10,
            elapsed: Duration::from_nanos(500),
            allocations: 0,
            allocated_bytes: 0,
            unmatched: 0,
            sink_bytes: 0,
        };
        assert_eq!(valid.valid_elapsed(), Some(Duration::from_nanos(500)));

        let invalid = Measurement { unmatched: 1, ..valid };
        assert_eq!(invalid.valid_elapsed(), None);

        let fixture = crate::fixture::Fixture::single(crate::route::Route::new(Method::Get, "/missing").unwrap());
        assert_eq!(Driver::new(&EchoAdapter, &fixture).run(5).valid_elapsed(), None);
    }
}
