//! Provisioning settings
//!
//! Every fixed value the compiler and pipeline rely on (backend placement,
//! template locations, table names, snippet priorities, MIME fallback)
//! lives here as a named field rather than an embedded literal, so tests
//! and alternative deployments can override them.

use std::path::PathBuf;

use serde::Serialize;

/// Settings consumed by the compiler and the provisioning pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Name of the routes table in the generated artifact
    pub routes_table: String,
    /// Name of the content-type table in the generated artifact
    pub content_types_table: String,
    /// MIME type used when a route's extension is not in the registry
    pub default_content_type: String,

    /// Name of the placeholder backend. The platform requires at least one
    /// backend per service even though the static site never dispatches to
    /// it.
    pub backend_name: String,
    /// Placeholder backend address (loopback)
    pub backend_address: String,
    /// Placeholder backend port
    pub backend_port: u16,

    /// Path to the primary routing snippet template, read verbatim
    pub main_snippet_path: PathBuf,
    /// Path to the access-control snippet template, read verbatim
    pub access_snippet_path: PathBuf,

    /// Snippet name for the compiled site content (dynamic)
    pub content_snippet_name: String,
    /// Snippet name for the primary routing snippet
    pub main_snippet_name: String,
    /// Snippet name for the access-control snippet
    pub access_snippet_name: String,

    /// Priority of the access-control snippet. Lower priorities
    /// initialize first; access control must be in place before anything
    /// else runs.
    pub access_snippet_priority: u32,
    /// Priority of the primary routing snippet (after access control)
    pub main_snippet_priority: u32,
    /// Priority of the dynamic content snippet (last, once the routing
    /// logic that reads the tables is in place)
    pub content_snippet_priority: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            routes_table: "routes".into(),
            content_types_table: "content_types".into(),
            default_content_type: "application/octet-stream".into(),
            backend_name: "placeholder-backend".into(),
            backend_address: "127.0.0.1".into(),
            backend_port: 80,
            main_snippet_path: PathBuf::from("vcl/main.vcl"),
            access_snippet_path: PathBuf::from("vcl/access_control.vcl"),
            content_snippet_name: "site".into(),
            main_snippet_name: "main.vcl".into(),
            access_snippet_name: "access_control.vcl".into(),
            access_snippet_priority: 1,
            main_snippet_priority: 2,
            content_snippet_priority: 3,
        }
    }
}
