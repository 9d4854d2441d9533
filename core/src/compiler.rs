//! Content table compiler
//!
//! Turns a site directory into the text artifact the edge runtime parses:
//! one table mapping routes to percent-encoded file content, one mapping
//! routes to content types, concatenated with a newline.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::settings::Settings;
use crate::vcl;
use crate::walker;

/// A compiled site: the two route tables plus their serialized form.
#[derive(Debug, Clone)]
pub struct CompiledSite {
    /// Route → percent-encoded content, in walk order
    pub routes: Vec<(String, String)>,
    /// Route → `"<mime>; charset=utf8"`, same route set and order
    pub content_types: Vec<(String, String)>,
    /// The serialized artifact uploaded as dynamic-snippet content
    pub artifact: String,
}

/// Compiles the directory at `root` into a [`CompiledSite`].
///
/// File content is treated as a raw byte sequence and percent-encoded
/// byte-wise, so binary or non-UTF8 files are handled deterministically
/// and percent-decoding recovers the exact original bytes. Content types
/// are inferred from the route's file extension; unknown extensions fall
/// back to `settings.default_content_type`.
///
/// Both tables are built from the same route set in the same pass, so
/// their key sets are always identical.
pub fn compile(root: &Path, settings: &Settings) -> Result<CompiledSite> {
    let files = walker::walk(root)?;
    debug!(root = %root.display(), files = files.len(), "compiling site directory");

    let mut routes = Vec::with_capacity(files.len());
    let mut content_types = Vec::with_capacity(files.len());
    for file in &files {
        let route = route_for(root, file);
        let content = std::fs::read(file)?;
        routes.push((route.clone(), vcl::encode_content(&content)));
        content_types.push((route, content_type_for(file, settings)));
    }

    let artifact = format!(
        "{}\n{}",
        vcl::render_table(
            &settings.routes_table,
            routes.iter().map(|(r, c)| (r.as_str(), c.as_str())),
        ),
        vcl::render_table(
            &settings.content_types_table,
            content_types.iter().map(|(r, c)| (r.as_str(), c.as_str())),
        ),
    );

    Ok(CompiledSite {
        routes,
        content_types,
        artifact,
    })
}

/// Derives the route for `file`: `/` + the path relative to `root`, with
/// forward-slash separators regardless of host OS path conventions.
fn route_for(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut route = String::from("/");
    for (i, component) in relative.components().enumerate() {
        if i > 0 {
            route.push('/');
        }
        route.push_str(&component.as_os_str().to_string_lossy());
    }
    route
}

fn content_type_for(file: &Path, settings: &Settings) -> String {
    match mime_guess::from_path(file).first_raw() {
        Some(mime) => format!("{mime}; charset=utf8"),
        None => format!("{}; charset=utf8", settings.default_content_type),
    }
}
