//! Comparative micro-benchmark harness for HTTP request routers.
//!
//! Every router under test is wrapped in a [`RouterAdapter`], registered with
//! the same route table, checked by a correctness gate and then timed by a
//! [`Driver`] that dispatches pre-built synthetic requests into a response
//! sink that discards everything. Per-iteration time and heap allocations
//! are attributed to the router alone.
//!
//! # Example
//!
//! ```ignore
//! use routebench::{run_suite, HarnessConfig};
//!
//! let report = run_suite(&HarnessConfig::new().with_iterations(10_000));
//! print!("{}", report.render_text());
//! ```

pub mod adapter;
pub mod adapters;
pub mod alloc;
pub mod config;
pub mod driver;
pub mod error;
pub mod fixture;
pub mod method;
pub mod pattern;
pub mod report;
pub mod request;
pub mod route;
pub mod runner;
pub mod sink;

pub use adapter::{mount, Dispatch, Handler, RouterAdapter};
pub use adapters::AdapterKind;
pub use config::HarnessConfig;
pub use driver::{Driver, Measurement};
pub use error::HarnessError;
pub use fixture::{Fixture, Scenario};
pub use method::Method;
pub use report::{EntryReport, EntryStatus, SuiteReport};
pub use request::SyntheticRequest;
pub use route::{Route, RouteTable};
pub use runner::{run_entry, run_suite};
pub use sink::{NullSink, RecordingSink, ResponseSink};
