//! Provisioning pipeline
//!
//! Create → Domains → Backend → Static snippets → Content snippet →
//! Validate+Activate
//!
//! Explicit state machine, one state per remote step, advanced strictly in
//! order with no parallelism. Any stage failure is terminal for the run:
//! the failing stage is reported and nothing done by earlier stages is
//! rolled back; a failed create leaves manual cleanup to the operator.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::client::{ApiClient, NewBackend, NewSnippet};
use crate::compiler;
use crate::error::Result;
use crate::settings::Settings;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Create the service and obtain its newest version
    CreateService,
    /// Register each requested domain, one call per domain
    RegisterDomains,
    /// Register the fixed placeholder backend
    RegisterBackend,
    /// Upload the static routing (and optional access-control) snippets
    UploadStaticSnippets,
    /// Compile the site directory and upload it as a dynamic snippet
    UploadContentSnippet,
    /// Validate the version, then activate it
    ValidateAndActivate,
}

impl Stage {
    /// The stage that follows this one, or `None` at the end.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::CreateService => Some(Self::RegisterDomains),
            Self::RegisterDomains => Some(Self::RegisterBackend),
            Self::RegisterBackend => Some(Self::UploadStaticSnippets),
            Self::UploadStaticSnippets => Some(Self::UploadContentSnippet),
            Self::UploadContentSnippet => Some(Self::ValidateAndActivate),
            Self::ValidateAndActivate => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateService => "create-service",
            Self::RegisterDomains => "register-domains",
            Self::RegisterBackend => "register-backend",
            Self::UploadStaticSnippets => "upload-static-snippets",
            Self::UploadContentSnippet => "upload-content-snippet",
            Self::ValidateAndActivate => "validate-and-activate",
        };
        write!(f, "{s}")
    }
}

/// What to provision: inputs of the `create` operation.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    /// Service name, as searchable in the platform console
    pub name: String,
    /// Domain names to register, one registration call each
    pub domains: Vec<String>,
    /// Whether to upload the access-control snippet
    pub access_control: bool,
    /// Site directory to compile and upload
    pub directory: PathBuf,
}

/// Transient in-memory view of the remote service built up during one
/// pipeline run. Never persisted locally; the operator records
/// `service_id` and `content_snippet_id` for later updates.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ServiceRecord {
    /// Remote service ID
    pub service_id: String,
    /// Version number all configuration was attached to
    pub version: u64,
    /// Domains registered
    pub domains: Vec<String>,
    /// Placeholder backend name
    pub backend: String,
    /// Names of the static snippets uploaded
    pub static_snippets: Vec<String>,
    /// ID of the dynamic content snippet, the one artifact the caller
    /// must retain to perform later updates
    pub content_snippet_id: String,
}

/// Provisioning pipeline over one [`ApiClient`].
pub struct Pipeline {
    api: ApiClient,
    settings: Settings,
}

impl Pipeline {
    /// Creates a pipeline driving `api` with `settings`.
    pub fn new(api: ApiClient, settings: Settings) -> Self {
        Self { api, settings }
    }

    /// Runs every stage in order. Halts at the first failing stage and
    /// returns its error; earlier stages are not compensated.
    pub async fn execute(&self, plan: &ProvisionPlan) -> Result<ServiceRecord> {
        let mut record = ServiceRecord::default();
        let mut stage = Some(Stage::CreateService);
        while let Some(current) = stage {
            info!(stage = %current, "starting stage");
            if let Err(e) = self.run_stage(current, plan, &mut record).await {
                error!(stage = %current, error = %e, "pipeline halted");
                return Err(e);
            }
            stage = current.next();
        }
        Ok(record)
    }

    async fn run_stage(
        &self,
        stage: Stage,
        plan: &ProvisionPlan,
        record: &mut ServiceRecord,
    ) -> Result<()> {
        match stage {
            Stage::CreateService => self.create_service(plan, record).await,
            Stage::RegisterDomains => self.register_domains(plan, record).await,
            Stage::RegisterBackend => self.register_backend(record).await,
            Stage::UploadStaticSnippets => self.upload_static_snippets(plan, record).await,
            Stage::UploadContentSnippet => self.upload_content_snippet(plan, record).await,
            Stage::ValidateAndActivate => self.validate_and_activate(record).await,
        }
    }

    async fn create_service(&self, plan: &ProvisionPlan, record: &mut ServiceRecord) -> Result<()> {
        let (service_id, version) = self.api.create_service(&plan.name).await?;
        info!(%service_id, version, "service created");
        record.service_id = service_id;
        record.version = version;
        Ok(())
    }

    async fn register_domains(
        &self,
        plan: &ProvisionPlan,
        record: &mut ServiceRecord,
    ) -> Result<()> {
        for domain in &plan.domains {
            self.api
                .add_domain(&record.service_id, record.version, domain)
                .await?;
            record.domains.push(domain.clone());
        }
        Ok(())
    }

    async fn register_backend(&self, record: &mut ServiceRecord) -> Result<()> {
        let backend = NewBackend {
            name: &self.settings.backend_name,
            ipv4: &self.settings.backend_address,
            port: self.settings.backend_port,
        };
        self.api
            .add_backend(&record.service_id, record.version, &backend)
            .await?;
        record.backend = self.settings.backend_name.clone();
        Ok(())
    }

    async fn upload_static_snippets(
        &self,
        plan: &ProvisionPlan,
        record: &mut ServiceRecord,
    ) -> Result<()> {
        if plan.access_control {
            let content = tokio::fs::read_to_string(&self.settings.access_snippet_path).await?;
            self.upload_static(record, &self.settings.access_snippet_name, &content, self.settings.access_snippet_priority)
                .await?;
        }
        let content = tokio::fs::read_to_string(&self.settings.main_snippet_path).await?;
        self.upload_static(record, &self.settings.main_snippet_name, &content, self.settings.main_snippet_priority)
            .await?;
        Ok(())
    }

    async fn upload_static(
        &self,
        record: &mut ServiceRecord,
        name: &str,
        content: &str,
        priority: u32,
    ) -> Result<()> {
        let snippet = NewSnippet {
            name,
            dynamic: 0,
            snippet_type: "init",
            content,
            priority,
        };
        self.api
            .add_snippet(&record.service_id, record.version, &snippet)
            .await?;
        record.static_snippets.push(name.to_string());
        Ok(())
    }

    async fn upload_content_snippet(
        &self,
        plan: &ProvisionPlan,
        record: &mut ServiceRecord,
    ) -> Result<()> {
        let compiled = compiler::compile(&plan.directory, &self.settings)?;
        info!(routes = compiled.routes.len(), "site compiled");
        let snippet = NewSnippet {
            name: &self.settings.content_snippet_name,
            dynamic: 1,
            snippet_type: "init",
            content: &compiled.artifact,
            priority: self.settings.content_snippet_priority,
        };
        let snippet_id = self
            .api
            .add_snippet(&record.service_id, record.version, &snippet)
            .await?;
        record.content_snippet_id = snippet_id;
        Ok(())
    }

    async fn validate_and_activate(&self, record: &mut ServiceRecord) -> Result<()> {
        self.api
            .validate(&record.service_id, record.version)
            .await?;
        info!("service validated");
        self.api
            .activate(&record.service_id, record.version)
            .await?;
        info!(service_id = %record.service_id, version = record.version, "service activated");
        Ok(())
    }
}

/// Recompiles `directory` and replaces the named dynamic snippet's content
/// in place. No new version is created and nothing is retried.
pub async fn update(
    api: &ApiClient,
    service_id: &str,
    snippet_id: &str,
    directory: &Path,
    settings: &Settings,
) -> Result<()> {
    let compiled = compiler::compile(directory, settings)?;
    info!(routes = compiled.routes.len(), "site compiled");
    api.update_snippet(service_id, snippet_id, &compiled.artifact)
        .await
}
