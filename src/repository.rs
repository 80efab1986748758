//! Schema Repository
//!
//! Project-scoped view over a [`SchemaService`].

use tracing::{debug, info};

use crate::client::{qualified_name, SchemaService};
use crate::error::Result;
use crate::schema::Schema;

/// Lists and fetches schemas for a single project
pub struct SchemaRepository<'a> {
    service: &'a dyn SchemaService,
    project: String,
}

impl<'a> SchemaRepository<'a> {
    pub fn new(service: &'a dyn SchemaService, project: impl Into<String>) -> Self {
        Self {
            service,
            project: project.into(),
        }
    }

    /// Get the project id
    pub fn project(&self) -> &str {
        &self.project
    }

    /// All schemas registered in the project
    pub fn list(&self) -> Result<Vec<Schema>> {
        let schemas = self.service.list_schemas(&self.project)?;
        info!(project = %self.project, count = schemas.len(), "listed schemas");
        Ok(schemas)
    }

    /// Fetch a schema by alias (`{id}` or `{id}@{revision}`)
    pub fn fetch(&self, alias: &str) -> Result<Schema> {
        let name = qualified_name(&self.project, alias);
        debug!(schema = %name, "fetching schema");
        self.service.get_schema(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::schema::SchemaType;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingService {
        requested: RefCell<Vec<String>>,
    }

    impl SchemaService for RecordingService {
        fn list_schemas(&self, project: &str) -> Result<Vec<Schema>> {
            Ok(vec![Schema::new(
                format!("projects/{}/schemas/orders", project),
                SchemaType::Avro,
                "",
            )])
        }

        fn get_schema(&self, name: &str) -> Result<Schema> {
            self.requested.borrow_mut().push(name.to_string());
            if name.ends_with("missing") {
                return Err(SchemaError::Remote {
                    status: 404,
                    message: "NOT_FOUND".to_string(),
                });
            }
            Ok(Schema::new(name, SchemaType::Avro, "{}"))
        }
    }

    #[test]
    fn test_list_uses_project() {
        let service = RecordingService::default();
        let repository = SchemaRepository::new(&service, "test-project");
        let schemas = repository.list().unwrap();
        assert_eq!(schemas[0].name, "projects/test-project/schemas/orders");
    }

    #[test]
    fn test_fetch_qualifies_alias() {
        let service = RecordingService::default();
        let repository = SchemaRepository::new(&service, "bigquerttest");
        repository.fetch("an-avro-schema-name@f81ba5ff").unwrap();
        assert_eq!(
            *service.requested.borrow(),
            vec!["projects/bigquerttest/schemas/an-avro-schema-name@f81ba5ff".to_string()]
        );
    }

    #[test]
    fn test_fetch_propagates_remote_error() {
        let service = RecordingService::default();
        let repository = SchemaRepository::new(&service, "p");
        let err = repository.fetch("missing").unwrap_err();
        assert!(err.is_remote());
    }
}
