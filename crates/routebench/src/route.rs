//! Routes and route tables.

use std::fmt;
use std::str::FromStr;

use crate::error::HarnessError;
use crate::method::Method;
use crate::pattern::Pattern;

/// A method plus a canonical `:name` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub pattern: Pattern,
}

impl Route {
    pub fn new(method: Method, pattern: &str) -> Result<Self, HarnessError> {
        Ok(Self {
            method,
            pattern: Pattern::parse(pattern)?,
        })
    }
}

impl FromStr for Route {
    type Err = HarnessError;

    /// Parse `"GET /user/:id"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(method), Some(pattern), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(HarnessError::InvalidRoute(s.to_string()));
        };

        Route::new(method.parse()?, pattern)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

/// An ordered, immutable list of routes.
///
/// Order is registration order, which is what routers that break ties by
/// insertion see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table, rejecting duplicate (method, pattern) pairs.
    pub fn new(routes: Vec<Route>) -> Result<Self, HarnessError> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].contains(route) {
                return Err(HarnessError::InvalidRoute(format!("{route} (duplicate)")));
            }
        }
        Ok(Self { routes })
    }

    /// Parse a table from `"METHOD /pattern"` lines.
    pub fn parse<I, S>(lines: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let routes = lines
            .into_iter()
            .map(|line| line.as_ref().parse())
            .collect::<Result<Vec<Route>, _>>()?;
        Self::new(routes)
    }

    /// The ten-route user API table used by the multi-route scenario.
    pub fn user_api() -> Self {
        const ROUTES: [(Method, &str); 10] = [
            (Method::Get, "/user/:id"),
            (Method::Get, "/user/:id/name/:lastname"),
            (Method::Get, "/user/:id/age"),
            (Method::Get, "/user/:id/sex"),
            (Method::Post, "/user/:id/address/:zip"),
            (Method::Get, "/user"),
            (Method::Delete, "/user/:id/address/:country"),
            (Method::Get, "/user/:id/height"),
            (Method::Post, "/user/:id/phone"),
            (Method::Get, "/user/:id/weight"),
        ];

        let routes = ROUTES
            .iter()
            .map(|&(method, pattern)| Route {
                method,
                pattern: Pattern::parse(pattern).expect("built-in patterns are canonical"),
            })
            .collect();
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
