//! Adapters for the routers under test.

mod matchit;
mod noop;
mod recognizer;
mod trie;

use std::fmt;

use serde::Serialize;

use crate::adapter::RouterAdapter;

pub use self::matchit::MatchitAdapter;
pub use self::noop::NoopAdapter;
pub use self::recognizer::RecognizerAdapter;
pub use self::trie::TrieAdapter;

/// Every adapter the harness can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// In-workspace prefix trie (`routebench-trie`).
    Trie,
    /// `matchit` radix tree, one tree per method.
    Matchit,
    /// `route-recognizer` NFA, one recognizer per method.
    Recognizer,
    /// Baseline that routes nothing.
    Noop,
}

impl AdapterKind {
    pub const ALL: [AdapterKind; 4] = [
        AdapterKind::Trie,
        AdapterKind::Matchit,
        AdapterKind::Recognizer,
        AdapterKind::Noop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AdapterKind::Trie => TrieAdapter::NAME,
            AdapterKind::Matchit => MatchitAdapter::NAME,
            AdapterKind::Recognizer => RecognizerAdapter::NAME,
            AdapterKind::Noop => NoopAdapter::NAME,
        }
    }

    /// A fresh adapter with no routes registered.
    pub fn create(self) -> Box<dyn RouterAdapter> {
        match self {
            AdapterKind::Trie => Box::new(TrieAdapter::new()),
            AdapterKind::Matchit => Box::new(MatchitAdapter::new()),
            AdapterKind::Recognizer => Box::new(RecognizerAdapter::new()),
            AdapterKind::Noop => Box::new(NoopAdapter::new()),
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
