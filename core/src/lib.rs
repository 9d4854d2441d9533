//! edgepress-core - Static website provisioning for edge-compute platforms
//!
//! This crate compiles a local directory tree into VCL table literals
//! (route → content, route → content-type) and drives a Fastly-style
//! provisioning API through the ordered sequence of steps needed to stand
//! up a static website:
//!
//! create service → register domains → register placeholder backend →
//! upload static snippets → upload compiled content as a dynamic snippet →
//! validate → activate
//!
//! Updates to an already-provisioned site replace the dynamic content
//! snippet in place, without a new service version.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod compiler;
pub mod error;
pub mod pipeline;
pub mod settings;
pub mod vcl;
pub mod walker;

pub use client::ApiClient;
pub use compiler::{compile, CompiledSite};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, ProvisionPlan, ServiceRecord};
pub use settings::Settings;
