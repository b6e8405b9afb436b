use bytes::Bytes;

use crate::method::Method;

/// A request value reused across every iteration of a benchmark.
///
/// The target buffer is sized up front; retargeting overwrites it in place
/// and keeps the query string, so the timed loop never reallocates it.
#[derive(Debug, Clone)]
pub struct SyntheticRequest {
    method: Method,
    /// `path` or `path?query`.
    target: String,
    path_len: usize,
    query: String,
    body: Bytes,
}

impl SyntheticRequest {
    /// Build a request from a method and a target such as `/user/index?x=1`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        let mut request = Self {
            method,
            target: String::new(),
            path_len: 0,
            query: query.to_string(),
            body: Bytes::new(),
        };
        request.retarget(method, path);
        request
    }

    /// Attach a body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Make sure retargeting to any path up to `max_path_len` bytes will not
    /// grow the target buffer.
    pub fn reserve_path(&mut self, max_path_len: usize) {
        let needed = max_path_len + 1 + self.query.len();
        if self.target.capacity() < needed {
            self.target.reserve(needed - self.target.len());
        }
    }

    /// Overwrite method and path in place, preserving the query string.
    pub fn retarget(&mut self, method: Method, path: &str) {
        self.method = method;
        self.target.clear();
        self.target.push_str(path);
        self.path_len = path.len();
        if !self.query.is_empty() {
            self.target.push('?');
            self.target.push_str(&self.query);
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        &self.target[..self.path_len]
    }

    pub fn query(&self) -> Option<&str> {
        (!self.query.is_empty()).then_some(self.query.as_str())
    }

    /// Raw request target: path plus `?query` when present.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Capacity of the target buffer, for allocation checks.
    pub fn target_capacity(&self) -> usize {
        self.target.capacity()
    }
}
