//! Response sinks handed to route handlers.

use http::{HeaderName, HeaderValue, StatusCode};

/// The write surface a handler needs.
///
/// Writes cannot fail; every write reports the number of bytes taken.
pub trait ResponseSink {
    fn write_status(&mut self, status: StatusCode);

    fn write_header(&mut self, name: &HeaderName, value: &HeaderValue);

    fn write(&mut self, bytes: &[u8]) -> usize;

    fn write_str(&mut self, s: &str) -> usize {
        self.write(s.as_bytes())
    }
}

/// Discards everything. Used inside the timed loop.
///
/// Holds a single counter so the optimizer cannot drop handler writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    bytes: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body bytes written since creation.
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl ResponseSink for NullSink {
    #[inline]
    fn write_status(&mut self, _status: StatusCode) {}

    #[inline]
    fn write_header(&mut self, _name: &HeaderName, _value: &HeaderValue) {}

    #[inline]
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.bytes = self.bytes.wrapping_add(bytes.len() as u64);
        bytes.len()
    }
}

/// Keeps the last response. Only used outside the timed loop.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    status: Option<StatusCode>,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Vec<u8>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous response.
    pub fn reset(&mut self) {
        self.status = None;
        self.headers.clear();
        self.body.clear();
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text; handlers only ever write UTF-8.
    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl ResponseSink for RecordingSink {
    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write_header(&mut self, name: &HeaderName, value: &HeaderValue) {
        self.headers.push((name.clone(), value.clone()));
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        self.body.extend_from_slice(bytes);
        bytes.len()
    }
}
