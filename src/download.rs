//! Schema download orchestration
//!
//! List the project's schemas, keep the ones selected by the pattern table
//! and the optional type filter, fetch each by its alias and write it to
//! local storage. The first error aborts the run.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::client::{ClientGuard, SchemaService};
use crate::config::DownloadSettings;
use crate::error::{Result, SchemaError};
use crate::pattern::{PatternFactory, PatternMatcher};
use crate::repository::SchemaRepository;
use crate::schema::SchemaType;
use crate::storage::LocalSchemaStorage;

/// Validated download settings
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub output_directory: PathBuf,
    pub project: String,
    pub schema_type: Option<SchemaType>,
    pub matcher: PatternMatcher,
}

impl DownloadPlan {
    /// Check every setting that can be checked without the registry
    pub fn from_settings(settings: &DownloadSettings) -> Result<Self> {
        let project = settings.project.trim();
        if project.is_empty() {
            return Err(SchemaError::InvalidConfig("project id is required".to_string()));
        }

        let schema_type = settings
            .schema_type
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(str::parse::<SchemaType>)
            .transpose()?;

        let matcher = PatternFactory::new()
            .matcher(&settings.patterns, Some(settings.versions.as_slice()))?;

        Ok(Self {
            output_directory: settings.output_directory.clone(),
            project: project.to_string(),
            schema_type,
            matcher,
        })
    }

    /// Whether schemas of `schema_type` pass the type filter
    pub fn accepts_type(&self, schema_type: SchemaType) -> bool {
        self.schema_type.map_or(true, |wanted| wanted == schema_type)
    }
}

/// Outcome of a download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Files written
    pub saved: Vec<PathBuf>,
    /// Listed schemas left out by the pattern or type filter
    pub filtered: Vec<String>,
    /// The run was skipped by configuration
    pub skipped: bool,
}

impl DownloadReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Downloads schemas for one project
pub struct SchemaDownloader {
    settings: DownloadSettings,
    client: ClientGuard,
}

impl SchemaDownloader {
    pub fn new(settings: DownloadSettings, service: Box<dyn SchemaService>) -> Self {
        Self {
            settings,
            client: ClientGuard::new(service),
        }
    }

    pub fn settings(&self) -> &DownloadSettings {
        &self.settings
    }

    /// Run the download. The client is closed before this returns.
    pub fn execute(&mut self) -> Result<DownloadReport> {
        if self.settings.skip {
            info!("Skipping schema download");
            self.client.close();
            return Ok(DownloadReport::skipped());
        }

        let result = self.download();
        self.client.close();
        result
    }

    /// Close the client without downloading
    pub fn close(&mut self) {
        self.client.close();
    }

    fn download(&self) -> Result<DownloadReport> {
        let plan = DownloadPlan::from_settings(&self.settings)?;
        let storage = LocalSchemaStorage::create(&plan.output_directory, &plan.project)?;
        let service = self.client.service().ok_or(SchemaError::ClientClosed)?;
        let repository = SchemaRepository::new(service, plan.project.as_str());

        let mut report = DownloadReport::default();

        for listed in repository.list()? {
            let alias = match plan.matcher.matches(&listed) {
                Some(alias) => alias,
                None => {
                    report.filtered.push(listed.name);
                    continue;
                }
            };

            if !plan.accepts_type(listed.schema_type) {
                debug!(schema = %listed.name, schema_type = %listed.schema_type, "schema type filtered out");
                report.filtered.push(listed.name);
                continue;
            }

            let schema = repository.fetch(&alias)?;
            let path = storage.save(&schema)?;
            info!(schema = %alias, path = %path.display(), "downloaded schema");
            report.saved.push(path);
        }

        info!(
            project = %repository.project(),
            saved = report.saved.len(),
            filtered = report.filtered.len(),
            "schema download finished"
        );
        Ok(report)
    }
}
