use crate::adapter::{Dispatch, Handler, RouterAdapter};
use crate::error::HarnessError;
use crate::method::Method;
use crate::pattern::PatternSyntax;
use crate::request::SyntheticRequest;
use crate::sink::ResponseSink;

/// Accepts every route and routes nothing.
///
/// Its measurements are the floor set by the driver and sink alone.
#[derive(Debug, Default)]
pub struct NoopAdapter {
    registered: usize,
}

impl NoopAdapter {
    pub const NAME: &'static str = "noop";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered(&self) -> usize {
        self.registered
    }
}

impl RouterAdapter for NoopAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn syntax(&self) -> PatternSyntax {
        PatternSyntax::Colon
    }

    fn register(&mut self, _method: Method, _pattern: &str, _handler: Handler) -> Result<(), HarnessError> {
        self.registered += 1;
        Ok(())
    }

    /// Always credits the first route; baselines are never checked.
    #[inline]
    fn dispatch(&self, _request: &SyntheticRequest, _sink: &mut dyn ResponseSink) -> Dispatch {
        Dispatch::Matched { route: 0 }
    }

    fn is_baseline(&self) -> bool {
        true
    }
}
