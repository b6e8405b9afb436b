//! Driver behavior with the counting allocator installed.

use routebench::adapter::{Capture, Params};
use routebench::alloc::{self, AllocSnapshot, CountingAllocator};
use routebench::pattern::PatternSyntax;
use routebench::{
    mount, run_suite, AdapterKind, Dispatch, Driver, Handler, HarnessConfig, HarnessError, Method, NullSink,
    ResponseSink, Route, RouteTable, RouterAdapter, Scenario, SyntheticRequest,
};

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn mounted(kind: AdapterKind, table: &RouteTable) -> Box<dyn RouterAdapter> {
    let mut adapter = kind.create();
    mount(adapter.as_mut(), table).unwrap();
    adapter
}

#[test]
fn allocator_is_installed() {
    assert!(alloc::is_counting());

    let before = AllocSnapshot::now();
    let v: Vec<u8> = Vec::with_capacity(100);
    let delta = AllocSnapshot::now().since(before);
    drop(v);

    assert_eq!(delta.allocations, 1);
    assert!(delta.bytes >= 100);
}

#[test]
fn driver_and_sink_allocate_nothing() {
    for scenario in Scenario::ALL {
        let fixture = scenario.fixture(None).unwrap().with_query("lang=en");
        let adapter = mounted(AdapterKind::Noop, fixture.table());

        let measurement = Driver::new(adapter.as_ref(), &fixture).run(10_000);

        assert_eq!(measurement.allocations, 0, "{scenario}");
        assert_eq!(measurement.allocated_bytes, 0, "{scenario}");
        assert!(measurement.is_valid());
    }
}

#[test]
fn null_sink_writes_do_not_allocate() {
    let mut sink = NullSink::new();
    let name = http::header::CONTENT_TYPE;
    let value = http::HeaderValue::from_static("text/plain");

    let before = AllocSnapshot::now();
    sink.write_status(http::StatusCode::OK);
    sink.write_header(&name, &value);
    let written = sink.write_str("index");
    let delta = AllocSnapshot::now().since(before);

    assert_eq!(written, 5);
    assert_eq!(delta, AllocSnapshot::default());
}

#[test]
fn cycle_follows_table_order() {
    let fixture = Scenario::MultiRoute.fixture(None).unwrap();
    let len = fixture.steps().len() as u64;

    for kind in [AdapterKind::Trie, AdapterKind::Matchit, AdapterKind::Recognizer] {
        let adapter = mounted(kind, fixture.table());
        let observations = Driver::new(adapter.as_ref(), &fixture).replay(3 * len + 2);

        for observation in &observations {
            let index = (observation.iteration % len) as usize;
            let step = &fixture.steps()[index];
            let route = &fixture.table().routes()[index];

            assert_eq!(observation.step, index);
            assert_eq!(observation.method, route.method);
            assert_eq!(observation.target, step.path);
            assert_eq!(
                observation.outcome,
                Dispatch::Matched { route: index },
                "{kind} {}",
                observation.target
            );
            assert_eq!(observation.body, step.expected, "{kind} {}", observation.target);
        }
    }
}

#[test]
fn repeated_runs_behave_identically() {
    let fixture = Scenario::MultiRoute.fixture(None).unwrap();

    for kind in AdapterKind::ALL {
        let adapter = mounted(kind, fixture.table());
        let driver = Driver::new(adapter.as_ref(), &fixture);

        assert_eq!(driver.replay(25), driver.replay(25), "{kind}");

        let first = driver.run(1_000);
        let second = driver.run(1_000);
        assert_eq!(first.unmatched, second.unmatched, "{kind}");
        assert_eq!(first.sink_bytes, second.sink_bytes, "{kind}");
        assert_eq!(first.allocations, second.allocations, "{kind}");
    }
}

#[test]
fn unsupported_method_fails_construction_every_time() {
    for _ in 0..2 {
        assert_eq!(
            "BREW /user/:id".parse::<Route>(),
            Err(HarnessError::UnsupportedMethod("BREW".to_string()))
        );
        assert!(matches!(
            "get /user/:id".parse::<Method>(),
            Err(HarnessError::UnsupportedMethod(_))
        ));
    }

    let config = HarnessConfig::new()
        .with_iterations(10)
        .with_warmup_iterations(0)
        .with_adapters([AdapterKind::Matchit])
        .with_scenarios([Scenario::MultiRoute])
        .with_routes(["GET /a/:id", "BREW /b/:id"]);

    let first = run_suite(&config);
    let second = run_suite(&config);
    let error = |report: &routebench::SuiteReport| report.entries[0].error.clone();

    assert_eq!(first.failures(), 1);
    assert_eq!(error(&first), error(&second));
    assert!(error(&first).unwrap().starts_with("E2001"));
}

#[test]
fn suite_reports_allocation_figures() {
    let config = HarnessConfig::new()
        .with_iterations(100)
        .with_warmup_iterations(10)
        .with_adapters([AdapterKind::Noop])
        .with_scenarios([Scenario::SingleGet]);

    let report = run_suite(&config);

    assert!(report.counting_allocations);
    assert_eq!(report.entries[0].allocs_per_op, Some(0.0));
    assert_eq!(report.entries[0].bytes_per_op, Some(0.0));
}

/// Answers every `/user/<id>/...` request with the `/user/:id` handler.
/// Captures still look right for most of the built-in table.
#[derive(Default)]
struct FirstRouteWins {
    by_id: Option<Handler>,
    list: Option<Handler>,
}

struct SecondSegment<'a>(&'a str);

impl Params for SecondSegment<'_> {
    fn get(&self, name: &str) -> Option<&str> {
        (name == "id").then(|| self.0.split('/').nth(2)).flatten()
    }
}

impl RouterAdapter for FirstRouteWins {
    fn name(&self) -> &'static str {
        "first-route-wins"
    }

    fn syntax(&self) -> PatternSyntax {
        PatternSyntax::Colon
    }

    fn register(&mut self, _method: Method, pattern: &str, handler: Handler) -> Result<(), HarnessError> {
        match pattern {
            "/user/:id" => self.by_id = Some(handler),
            "/user" => self.list = Some(handler),
            _ => {}
        }
        Ok(())
    }

    fn dispatch(&self, request: &SyntheticRequest, sink: &mut dyn ResponseSink) -> Dispatch {
        let path = request.path();
        let handler = if path == "/user" { &self.list } else { &self.by_id };
        match handler {
            Some(handler) => handler.serve(&SecondSegment(path), request, sink),
            None => Dispatch::NotFound,
        }
    }
}

#[test]
fn gate_rejects_router_that_picks_the_wrong_route() {
    let fixture = Scenario::MultiRoute.fixture(None).unwrap();
    let mut adapter = FirstRouteWins::default();
    mount(&mut adapter, fixture.table()).unwrap();

    assert_eq!(
        adapter.by_id.as_ref().map(Handler::capture),
        Some(&Capture::Param("id".to_string()))
    );

    let driver = Driver::new(&adapter, &fixture);

    // The capture alone cannot tell: step 1 writes "42" either way.
    let observations = driver.replay(2);
    assert_eq!(observations[1].body, fixture.steps()[1].expected);
    assert_eq!(observations[1].outcome, Dispatch::Matched { route: 0 });

    assert_eq!(
        driver.verify(),
        Err(HarnessError::RouteMismatch {
            router: "first-route-wins",
            method: "GET".to_string(),
            target: "/user/42/name/doe".to_string(),
            expected: "'42' from route 1".to_string(),
            actual: "'42' from route 0".to_string(),
        })
    );
}
