use crate::adapter::{Dispatch, Handler, MethodTable, Params, RouterAdapter};
use crate::error::HarnessError;
use crate::method::Method;
use crate::pattern::PatternSyntax;
use crate::request::SyntheticRequest;
use crate::sink::ResponseSink;

impl Params for matchit::Params<'_, '_> {
    fn get(&self, name: &str) -> Option<&str> {
        matchit::Params::get(self, name)
    }
}

/// `matchit` radix trees, one per method.
#[derive(Default)]
pub struct MatchitAdapter {
    routes: MethodTable<matchit::Router<Handler>>,
}

impl MatchitAdapter {
    pub const NAME: &'static str = "matchit";

    pub fn new() -> Self {
        Self::default()
    }
}

impl RouterAdapter for MatchitAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn syntax(&self) -> PatternSyntax {
        PatternSyntax::Brace
    }

    fn register(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), HarnessError> {
        self.routes
            .get_or_insert_with(method, matchit::Router::new)
            .insert(pattern, handler)
            .map_err(|e| HarnessError::Registration {
                router: Self::NAME,
                method: method.to_string(),
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    fn dispatch(&self, request: &SyntheticRequest, sink: &mut dyn ResponseSink) -> Dispatch {
        let method = request.method();
        let path = request.path();

        if let Some(Ok(matched)) = self.routes.get(method).map(|router| router.at(path)) {
            return matched.value.serve(&matched.params, request, sink);
        }

        if self.routes.others(method).any(|router| router.at(path).is_ok()) {
            Dispatch::MethodNotAllowed
        } else {
            Dispatch::NotFound
        }
    }
}
