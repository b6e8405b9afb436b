use routebench_trie::{RouteMatch, Router};

use crate::adapter::{Dispatch, Handler, Params, RouterAdapter};
use crate::error::HarnessError;
use crate::method::Method;
use crate::pattern::PatternSyntax;
use crate::request::SyntheticRequest;
use crate::sink::ResponseSink;

impl Params for routebench_trie::Params<'_, '_> {
    fn get(&self, name: &str) -> Option<&str> {
        routebench_trie::Params::get(self, name)
    }
}

/// The workspace prefix trie. Methods are part of the trie itself.
#[derive(Debug, Default)]
pub struct TrieAdapter {
    router: Router<Handler>,
}

impl TrieAdapter {
    pub const NAME: &'static str = "trie";

    pub fn new() -> Self {
        Self::default()
    }
}

impl RouterAdapter for TrieAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn syntax(&self) -> PatternSyntax {
        PatternSyntax::Brace
    }

    fn register(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), HarnessError> {
        self.router
            .insert(pattern, method.to_http(), handler)
            .map_err(|e| HarnessError::Registration {
                router: Self::NAME,
                method: method.to_string(),
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    fn dispatch(&self, request: &SyntheticRequest, sink: &mut dyn ResponseSink) -> Dispatch {
        match self.router.lookup(request.path(), &request.method().to_http()) {
            RouteMatch::Found { value, params } => value.serve(&params, request, sink),
            RouteMatch::MethodNotAllowed { .. } => Dispatch::MethodNotAllowed,
            RouteMatch::NotFound => Dispatch::NotFound,
        }
    }
}
