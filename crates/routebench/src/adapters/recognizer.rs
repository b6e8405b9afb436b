use std::collections::HashSet;

use route_recognizer::Router;

use crate::adapter::{Dispatch, Handler, MethodTable, Params, RouterAdapter};
use crate::error::HarnessError;
use crate::method::Method;
use crate::pattern::PatternSyntax;
use crate::request::SyntheticRequest;
use crate::sink::ResponseSink;

impl Params for route_recognizer::Params {
    fn get(&self, name: &str) -> Option<&str> {
        self.find(name)
    }
}

/// `route-recognizer` NFAs, one per method.
#[derive(Default)]
pub struct RecognizerAdapter {
    routes: MethodTable<Router<Handler>>,
    /// Registered patterns with param names erased, per method.
    shapes: MethodTable<HashSet<String>>,
}

impl RecognizerAdapter {
    pub const NAME: &'static str = "recognizer";

    pub fn new() -> Self {
        Self::default()
    }
}

impl RouterAdapter for RecognizerAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn syntax(&self) -> PatternSyntax {
        PatternSyntax::Colon
    }

    /// `route-recognizer` lets a later route shadow an earlier one of the
    /// same shape; such routes are rejected here.
    fn register(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), HarnessError> {
        if !self.shapes.get_or_insert_with(method, HashSet::new).insert(shape(pattern)) {
            return Err(HarnessError::Registration {
                router: Self::NAME,
                method: method.to_string(),
                pattern: pattern.to_string(),
                reason: "conflicts with an existing route of the same shape".to_string(),
            });
        }

        self.routes
            .get_or_insert_with(method, Router::new)
            .add(pattern, handler);
        Ok(())
    }

    fn dispatch(&self, request: &SyntheticRequest, sink: &mut dyn ResponseSink) -> Dispatch {
        let method = request.method();
        let path = request.path();

        if let Some(Ok(matched)) = self.routes.get(method).map(|router| router.recognize(path)) {
            return matched.handler().serve(matched.params(), request, sink);
        }

        if self.routes.others(method).any(|router| router.recognize(path).is_ok()) {
            Dispatch::MethodNotAllowed
        } else {
            Dispatch::NotFound
        }
    }
}

/// `pattern` with every `:name` segment reduced to `:`.
fn shape(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| if segment.starts_with(':') { ":" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}
