//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the compiled route table
//! - Look up the endpoint for a method + path
//! - Return the matched endpoint or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap keyed on (method, first path segment)
//! - Explicit NoMatch rather than silent default

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;

use crate::api::resources::Resource;
use crate::routing::matcher::{normalize_segments, route_key};

/// Every operation the gateway can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Root,
    Health,
    Info,
    Stats,
    List(Resource),
    Create(Resource),
}

impl Endpoint {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> String {
        match self {
            Endpoint::Root => "root".to_string(),
            Endpoint::Health => "health".to_string(),
            Endpoint::Info => "info".to_string(),
            Endpoint::Stats => "stats".to_string(),
            Endpoint::List(r) => format!("list_{}", r.segment()),
            Endpoint::Create(r) => format!("create_{}", r.segment()),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Immutable (method, path) → endpoint table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<(Method, String), Endpoint>,
}

impl RouteTable {
    /// An empty table. Use [`RouteTable::standard`] for the gateway's routes.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// The full gateway surface.
    pub fn standard() -> Self {
        let mut table = Self::new()
            .with(Method::GET, "", Endpoint::Root)
            .with(Method::GET, "health", Endpoint::Health)
            .with(Method::GET, "info", Endpoint::Info)
            .with(Method::GET, "stats", Endpoint::Stats);

        for resource in Resource::ALL {
            table = table
                .with(Method::GET, resource.segment(), Endpoint::List(resource))
                .with(Method::POST, resource.segment(), Endpoint::Create(resource));
        }

        table
    }

    /// Register a route. Later registrations for the same key win.
    pub fn with(mut self, method: Method, path: &str, endpoint: Endpoint) -> Self {
        self.routes.insert((method, path.to_string()), endpoint);
        self
    }

    /// Resolve a raw request path.
    pub fn match_path(&self, method: &Method, path: &str) -> Option<Endpoint> {
        self.lookup(method, &normalize_segments(path))
    }

    /// Resolve already-normalized segments.
    pub fn lookup(&self, method: &Method, segments: &[&str]) -> Option<Endpoint> {
        self.routes
            .get(&(method.clone(), route_key(segments).to_string()))
            .copied()
    }

    /// All registered routes, sorted for stable output.
    pub fn routes(&self) -> Vec<(Method, String, Endpoint)> {
        let mut routes: Vec<_> = self
            .routes
            .iter()
            .map(|((m, p), e)| (m.clone(), p.clone(), *e))
            .collect();
        routes.sort_by(|a, b| (&a.1, a.0.as_str()).cmp(&(&b.1, b.0.as_str())));
        routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
