//! The uniform register/dispatch contract every router under test is
//! wrapped into.

use serde::Serialize;

use crate::error::HarnessError;
use crate::method::Method;
use crate::pattern::{Pattern, PatternSyntax};
use crate::request::SyntheticRequest;
use crate::route::{Route, RouteTable};
use crate::sink::ResponseSink;

/// Lookup of captured path parameters by name.
///
/// Each adapter implements this over its router's native parameter type.
pub trait Params {
    fn get(&self, name: &str) -> Option<&str>;
}

/// A router with no captured parameters.
impl Params for () {
    fn get(&self, _name: &str) -> Option<&str> {
        None
    }
}

/// What a route's handler writes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// The value of this parameter.
    Param(String),
    /// The raw request target, for routes without parameters.
    RawTarget,
}

impl Capture {
    /// `name` if the pattern has it, else its first parameter, else the raw
    /// target.
    pub fn for_pattern(pattern: &Pattern) -> Self {
        if pattern.params().any(|p| p == "name") {
            return Capture::Param("name".to_string());
        }
        match pattern.params().next() {
            Some(first) => Capture::Param(first.to_string()),
            None => Capture::RawTarget,
        }
    }
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// A handler ran; `route` is its index in the mounted table.
    Matched { route: usize },
    NotFound,
    MethodNotAllowed,
    /// A route matched but did not capture the parameter its handler reads.
    MissingParam,
}

impl Dispatch {
    pub fn is_match(self) -> bool {
        matches!(self, Dispatch::Matched { .. })
    }

    /// Table index of the route that handled the request.
    pub fn route(self) -> Option<usize> {
        match self {
            Dispatch::Matched { route } => Some(route),
            _ => None,
        }
    }
}

/// The handler registered for every route.
///
/// Writes the captured value and nothing else, and reports which table
/// entry it was registered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    route: usize,
    capture: Capture,
}

impl Handler {
    pub fn new(route: usize, capture: Capture) -> Self {
        Self { route, capture }
    }

    /// Handler for entry `index` of a route table.
    pub fn for_route(index: usize, route: &Route) -> Self {
        Self::new(index, Capture::for_pattern(&route.pattern))
    }

    pub fn route(&self) -> usize {
        self.route
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    #[inline]
    pub fn serve<P: Params + ?Sized>(
        &self,
        params: &P,
        request: &SyntheticRequest,
        sink: &mut dyn ResponseSink,
    ) -> Dispatch {
        match &self.capture {
            Capture::Param(name) => match params.get(name) {
                Some(value) => {
                    sink.write_str(value);
                    Dispatch::Matched { route: self.route }
                }
                None => Dispatch::MissingParam,
            },
            Capture::RawTarget => {
                sink.write_str(request.target());
                Dispatch::Matched { route: self.route }
            }
        }
    }
}

/// One router under test.
///
/// Registration happens once, before timing; `dispatch` is the only call
/// inside the timed loop.
pub trait RouterAdapter {
    /// Short name used in benchmark ids.
    fn name(&self) -> &'static str;

    /// Placeholder syntax `register` expects.
    fn syntax(&self) -> PatternSyntax;

    /// Register `handler` under `method` and a pattern already rendered in
    /// [`RouterAdapter::syntax`].
    fn register(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), HarnessError>;

    /// Route `request` and run the matched handler against `sink`.
    fn dispatch(&self, request: &SyntheticRequest, sink: &mut dyn ResponseSink) -> Dispatch;

    /// Baselines do no routing, so their output is not checked.
    fn is_baseline(&self) -> bool {
        false
    }
}

/// Register every route of `table`, translated to the adapter's syntax.
/// Handlers carry their table index.
pub fn mount<A: RouterAdapter + ?Sized>(adapter: &mut A, table: &RouteTable) -> Result<(), HarnessError> {
    let syntax = adapter.syntax();
    for (index, route) in table.iter().enumerate() {
        let native = route.pattern.render(syntax);
        adapter.register(route.method, &native, Handler::for_route(index, route))?;
    }
    Ok(())
}

/// One slot per [`Method`], for routers that only match paths.
#[derive(Debug)]
pub struct MethodTable<T> {
    slots: [Option<T>; Method::COUNT],
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, method: Method) -> Option<&T> {
        self.slots[method.index()].as_ref()
    }

    pub fn get_or_insert_with(&mut self, method: Method, f: impl FnOnce() -> T) -> &mut T {
        self.slots[method.index()].get_or_insert_with(f)
    }

    /// Occupied slots other than `method`.
    pub fn others(&self, method: Method) -> impl Iterator<Item = &T> + '_ {
        Method::ALL
            .into_iter()
            .filter(move |m| *m != method)
            .filter_map(|m| self.get(m))
    }
}
