//! Fixture builder: route tables plus the requests that exercise them.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::adapter::Capture;
use crate::error::HarnessError;
use crate::method::Method;
use crate::pattern::sample_value;
use crate::request::SyntheticRequest;
use crate::route::{Route, RouteTable};

/// Smallest table accepted by [`Fixture::multi`].
pub const MIN_MULTI_ROUTES: usize = 8;

/// Body sent by the single-route POST scenario.
pub const POST_BODY: &str = "primary_index";

/// One benchmark scenario per entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// `GET /user/:name` with `/user/index`.
    SingleGet,
    /// `POST /user/:name` with `/user/index` and a body.
    SinglePost,
    /// Cycle through a table of at least eight routes.
    MultiRoute,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::SingleGet, Scenario::SinglePost, Scenario::MultiRoute];

    /// Benchmark name suffix.
    pub fn name(self) -> &'static str {
        match self {
            Scenario::SingleGet => "single_route_serve_GET",
            Scenario::SinglePost => "single_route_serve_POST",
            Scenario::MultiRoute => "multiple_routes_serve",
        }
    }

    /// Build this scenario's fixture. `table` replaces the built-in
    /// multi-route table and is ignored by the single-route scenarios.
    pub fn fixture(self, table: Option<&RouteTable>) -> Result<Fixture, HarnessError> {
        match self {
            Scenario::SingleGet => Fixture::single_get(),
            Scenario::SinglePost => Fixture::single_post(),
            Scenario::MultiRoute => match table {
                Some(table) => Fixture::multi(table.clone()),
                None => Fixture::multi(RouteTable::user_api()),
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One request of a fixture's cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Index of the route this request targets.
    pub route: usize,
    pub method: Method,
    /// Concrete path, without query string.
    pub path: String,
    /// What the matched handler must write.
    pub expected: String,
}

/// Routes to register plus the request cycle that exercises them.
#[derive(Debug, Clone)]
pub struct Fixture {
    table: RouteTable,
    steps: Vec<Step>,
    query: String,
    body: Bytes,
}

impl Fixture {
    /// One route, one request matching it exactly.
    pub fn single(route: Route) -> Self {
        let table = RouteTable::new(vec![route]).expect("one route has no duplicates");
        Self::from_table(table)
    }

    /// `GET /user/:name`, requested as `/user/index`.
    pub fn single_get() -> Result<Self, HarnessError> {
        Ok(Self::single(Route::new(Method::Get, "/user/:name")?))
    }

    /// `POST /user/:name`, requested as `/user/index` with [`POST_BODY`].
    pub fn single_post() -> Result<Self, HarnessError> {
        Ok(Self::single(Route::new(Method::Post, "/user/:name")?).with_body(POST_BODY))
    }

    /// A table of at least [`MIN_MULTI_ROUTES`] routes with one request per
    /// route, cycled in table order.
    pub fn multi(table: RouteTable) -> Result<Self, HarnessError> {
        if table.len() < MIN_MULTI_ROUTES {
            return Err(HarnessError::TableTooSmall {
                len: table.len(),
                min: MIN_MULTI_ROUTES,
            });
        }
        Ok(Self::from_table(table))
    }

    fn from_table(table: RouteTable) -> Self {
        let mut fixture = Self {
            table,
            steps: Vec::new(),
            query: String::new(),
            body: Bytes::new(),
        };
        fixture.rebuild_steps();
        fixture
    }

    /// Append a query string to every request target.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = query.strip_prefix('?').unwrap_or(&query).to_string();
        self.rebuild_steps();
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    fn rebuild_steps(&mut self) {
        let query = self.query.as_str();
        self.steps = self
            .table
            .iter()
            .enumerate()
            .map(|(index, route)| {
                let path = route.pattern.instantiate();
                let expected = match Capture::for_pattern(&route.pattern) {
                    Capture::Param(name) => sample_value(&name).into_owned(),
                    Capture::RawTarget if query.is_empty() => path.clone(),
                    Capture::RawTarget => format!("{path}?{query}"),
                };
                Step {
                    route: index,
                    method: route.method,
                    path,
                    expected,
                }
            })
            .collect();
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether requests must be retargeted between iterations.
    pub fn is_cycle(&self) -> bool {
        self.steps.len() > 1
    }

    pub fn query(&self) -> Option<&str> {
        (!self.query.is_empty()).then_some(self.query.as_str())
    }

    /// The reusable request, aimed at the first step and sized for every
    /// other step.
    pub fn request(&self) -> SyntheticRequest {
        let first = &self.steps[0];
        let target = match self.query() {
            Some(query) => format!("{}?{query}", first.path),
            None => first.path.clone(),
        };

        let mut request = SyntheticRequest::new(first.method, &target).with_body(self.body.clone());
        let longest = self.steps.iter().map(|s| s.path.len()).max().unwrap_or(0);
        request.reserve_path(longest);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_get_captures_index() {
        let fixture = Scenario::SingleGet.fixture(None).unwrap();
        assert!(!fixture.is_cycle());

        let step = &fixture.steps()[0];
        assert_eq!(step.method, Method::Get);
        assert_eq!(step.path, "/user/index");
        assert_eq!(step.expected, "index");
    }

    #[test]
    fn single_post_carries_body() {
        let fixture = Scenario::SinglePost.fixture(None).unwrap();
        let request = fixture.request();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "/user/index");
        assert_eq!(request.body().as_ref(), POST_BODY.as_bytes());
        assert_eq!(fixture.steps()[0].expected, "index");
    }

    #[test]
    fn multi_route_steps_follow_table() {
        let fixture = Scenario::MultiRoute.fixture(None).unwrap();
        assert_eq!(fixture.steps().len(), 10);

        let expected: Vec<(&str, &str)> = fixture
            .steps()
            .iter()
            .map(|s| (s.path.as_str(), s.expected.as_str()))
            .collect();
        assert_eq!(expected[0], ("/user/42", "42"));
        assert_eq!(expected[1], ("/user/42/name/doe", "42"));
        assert_eq!(expected[5], ("/user", "/user"));
        assert_eq!(expected[6], ("/user/42/address/de", "42"));

        for (i, step) in fixture.steps().iter().enumerate() {
            assert_eq!(step.route, i);
            assert_eq!(step.method, fixture.table().routes()[i].method);
        }
    }

    #[test]
    fn raw_target_expectation_includes_query() {
        let fixture = Scenario::MultiRoute.fixture(None).unwrap().with_query("?lang=en");
        assert_eq!(fixture.query(), Some("lang=en"));
        assert_eq!(fixture.steps()[5].expected, "/user?lang=en");
        assert_eq!(fixture.steps()[0].expected, "42");
        assert_eq!(fixture.request().target(), "/user/42?lang=en");
    }

    #[test]
    fn multi_rejects_small_tables() {
        let table = RouteTable::parse(["GET /a", "GET /b/:id"]).unwrap();
        assert_eq!(
            Fixture::multi(table).unwrap_err(),
            HarnessError::TableTooSmall { len: 2, min: MIN_MULTI_ROUTES }
        );
    }

    #[test]
    fn custom_table_replaces_builtin() {
        let lines: Vec<String> = (0..8).map(|i| format!("GET /item{i}/:name")).collect();
        let table = RouteTable::parse(&lines).unwrap();
        let fixture = Scenario::MultiRoute.fixture(Some(&table)).unwrap();

        assert_eq!(fixture.steps().len(), 8);
        assert_eq!(fixture.steps()[3].path, "/item3/index");
    }
}
