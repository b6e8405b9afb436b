use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::Range;

use http::Method;
use thiserror::Error;

/// The routing trie. Maps HTTP paths + methods to route values.
#[derive(Debug)]
pub struct Router<T> {
    root: Node<T>,
}

/// A single node in the prefix trie.
#[derive(Debug)]
struct Node<T> {
    /// Static children keyed by segment name.
    static_children: HashMap<String, Node<T>>,
    /// Parameter child (at most one per node, shared by every param name).
    param_child: Option<Box<Node<T>>>,
    /// Method-to-route mapping at this terminal node.
    methods: HashMap<Method, Leaf<T>>,
}

/// A registered route at a terminal node.
#[derive(Debug)]
struct Leaf<T> {
    value: T,
    /// Param names of this route, in segment order.
    names: Vec<String>,
}

/// Errors raised while inserting a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The same template shape is already registered for this method.
    #[error("route '{template}' conflicts with an existing {method} route")]
    Conflict { template: String, method: Method },

    /// A segment is neither static nor a well-formed `{name}`.
    #[error("invalid segment '{segment}' in route '{template}'")]
    InvalidSegment { template: String, segment: String },

    /// A param name appears twice in one template.
    #[error("duplicate parameter '{name}' in route '{template}'")]
    DuplicateParam { template: String, name: String },
}

/// Captured path parameters of a matched route.
///
/// Values are slices of the normalized request path, looked up by the names
/// the matched route was registered with.
#[derive(Debug)]
pub struct Params<'r, 'p> {
    names: &'r [String],
    path: Cow<'p, str>,
    spans: Vec<Range<usize>>,
}

impl Params<'_, '_> {
    /// Value of the parameter called `name`, if the route declares it.
    pub fn get(&self, name: &str) -> Option<&str> {
        let index = self.names.iter().position(|n| n == name)?;
        self.spans.get(index).map(|span| &self.path[span.clone()])
    }

    /// Iterate `(name, value)` pairs in segment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.names
            .iter()
            .zip(&self.spans)
            .map(|(name, span)| (name.as_str(), &self.path[span.clone()]))
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// The result of a route lookup.
#[derive(Debug)]
pub enum RouteMatch<'r, 'p, T> {
    /// Matched a path and method.
    Found { value: &'r T, params: Params<'r, 'p> },
    /// Path matched but method is not allowed.
    MethodNotAllowed { allowed: Vec<Method> },
    /// No path matched.
    NotFound,
}

/// A parsed template segment.
#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Static(&'a str),
    Param(&'a str),
}

impl<'a> Segment<'a> {
    fn param_name(&self) -> Option<&'a str> {
        match *self {
            Segment::Static(_) => None,
            Segment::Param(name) => Some(name),
        }
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            static_children: HashMap::new(),
            param_child: None,
            methods: HashMap::new(),
        }
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
        }
    }
}

impl<T> Router<T> {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route into the trie.
    ///
    /// `template` is a path like "/users/{id}/orders". Routes sharing a
    /// param position may name it differently; each route keeps its own
    /// names.
    pub fn insert(&mut self, template: &str, method: Method, value: T) -> Result<(), InsertError> {
        let segments = parse_template(template)?;

        let mut names: Vec<String> = Vec::new();
        for name in segments.iter().filter_map(Segment::param_name) {
            if names.iter().any(|n| n == name) {
                return Err(InsertError::DuplicateParam {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }
            names.push(name.to_string());
        }

        let node = self.traverse_or_create(&segments);
        match node.methods.entry(method) {
            Entry::Occupied(existing) => Err(InsertError::Conflict {
                template: template.to_string(),
                method: existing.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Leaf { value, names });
                Ok(())
            }
        }
    }

    /// Look up a request path (not a template) and method.
    pub fn lookup<'r, 'p>(&'r self, path: &'p str, method: &Method) -> RouteMatch<'r, 'p, T> {
        let normalized = normalize_path(path);
        let segments = segment_spans(&normalized);

        let mut spans = Vec::with_capacity(segments.len());
        let Some(node) = traverse_and_match(&self.root, &normalized, &segments, &mut spans) else {
            return RouteMatch::NotFound;
        };

        match node.methods.get(method) {
            Some(leaf) => RouteMatch::Found {
                value: &leaf.value,
                params: Params {
                    names: &leaf.names,
                    path: normalized,
                    spans,
                },
            },
            None => {
                let mut allowed: Vec<Method> = node.methods.keys().cloned().collect();
                allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                RouteMatch::MethodNotAllowed { allowed }
            }
        }
    }

    /// Traverse or create nodes for a parsed template.
    fn traverse_or_create(&mut self, segments: &[Segment<'_>]) -> &mut Node<T> {
        let mut current = &mut self.root;

        for segment in segments {
            current = match *segment {
                Segment::Static(name) => current.static_children.entry(name.to_string()).or_default(),
                Segment::Param(_) => &mut **current.param_child.get_or_insert_with(Box::default),
            };
        }

        current
    }
}

/// Match request segments against the trie, recording the span of every
/// captured value. Only nodes holding at least one route count as a match.
fn traverse_and_match<'r, T>(
    node: &'r Node<T>,
    path: &str,
    segments: &[Range<usize>],
    spans: &mut Vec<Range<usize>>,
) -> Option<&'r Node<T>> {
    let Some((first, remaining)) = segments.split_first() else {
        return (!node.methods.is_empty()).then_some(node);
    };

    // Static children take precedence (most specific match).
    if let Some(child) = node.static_children.get(&path[first.clone()]) {
        if let Some(found) = traverse_and_match(child, path, remaining, spans) {
            return Some(found);
        }
    }

    if let Some(child) = &node.param_child {
        spans.push(first.clone());
        if let Some(found) = traverse_and_match(child, path, remaining, spans) {
            return Some(found);
        }
        spans.pop();
    }

    None
}

/// Parse a path template into segments.
fn parse_template(template: &str) -> Result<Vec<Segment<'_>>, InsertError> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| parse_segment(template, s))
        .collect()
}

fn parse_segment<'a>(template: &str, segment: &'a str) -> Result<Segment<'a>, InsertError> {
    let invalid = || InsertError::InvalidSegment {
        template: template.to_string(),
        segment: segment.to_string(),
    };

    let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        if segment.contains(['{', '}']) {
            return Err(invalid());
        }
        return Ok(Segment::Static(segment));
    };

    if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(invalid());
    }

    Ok(Segment::Param(inner))
}

/// Byte ranges of the non-empty segments of `path`.
fn segment_spans(path: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;

    for (i, byte) in path.bytes().enumerate() {
        if byte == b'/' {
            if i > start {
                spans.push(start..i);
            }
            start = i + 1;
        }
    }
    if start < path.len() {
        spans.push(start..path.len());
    }

    spans
}

/// Normalize a request path: strip trailing slashes, collapse double slashes.
///
/// Already-normalized paths are returned borrowed.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let clean = !path.is_empty()
        && !path.contains("//")
        && !(path.len() > 1 && path.ends_with('/'));
    if clean {
        return Cow::Borrowed(path);
    }

    let mut normalized = String::with_capacity(path.len());
    let mut prev_slash = false;

    for ch in path.chars() {
        if ch == '/' {
            if !prev_slash {
                normalized.push('/');
            }
            prev_slash = true;
        } else {
            normalized.push(ch);
            prev_slash = false;
        }
    }

    // Strip trailing slash (but keep root "/")
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(normalized)
    }
}
