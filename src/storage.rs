//! Local schema storage
//!
//! Downloaded schemas are written as `{root}/{project}/{short_name}.{ext}`,
//! where `ext` is `avsc` for Avro and `proto` for Protocol Buffer schemas.
//! The file content is the raw definition, unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SchemaError};
use crate::schema::Schema;

/// Writes schema definitions below an output directory
#[derive(Debug, Clone)]
pub struct LocalSchemaStorage {
    /// Output root
    root: PathBuf,
    /// Project used for names that carry no `projects/{id}/` prefix
    project: Option<String>,
}

impl LocalSchemaStorage {
    /// Storage rooted at `root`; no directories are touched
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            project: None,
        }
    }

    /// Validate `root` and make sure `root/project_id` exists
    pub fn create(root: impl AsRef<Path>, project_id: &str) -> Result<Self> {
        let root = root.as_ref();

        if root.exists() && !root.is_dir() {
            return Err(SchemaError::NotADirectory(root.to_path_buf()));
        }

        let project_dir = root.join(project_id);
        if !project_dir.is_dir() {
            info!(path = %project_dir.display(), "creating project output directory");
            fs::create_dir_all(&project_dir)?;
        }

        Ok(Self {
            root: root.to_path_buf(),
            project: Some(project_id.to_string()),
        })
    }

    /// Get the output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the schema will be written to
    pub fn location(&self, schema: &Schema) -> Result<PathBuf> {
        let extension = schema.schema_type.extension().ok_or_else(|| {
            SchemaError::UnsupportedSchemaType {
                name: schema.name.clone(),
                schema_type: schema.schema_type.to_string(),
            }
        })?;

        let dir = match schema.project().or(self.project.as_deref()) {
            Some(project) => self.root.join(project),
            None => self.root.clone(),
        };

        Ok(dir.join(format!("{}.{}", schema.short_name(), extension)))
    }

    /// Write the schema definition, replacing any existing file
    pub fn save(&self, schema: &Schema) -> Result<PathBuf> {
        let path = self.location(schema)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, schema.payload())?;

        debug!(path = %path.display(), bytes = schema.payload().len(), "schema written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaType;
    use tempfile::tempdir;

    const AVRO_DEFINITION: &str = r#"{"type":"record","name":"Avro","fields":[{"name":"StringField","type":"string"}]}"#;
    const PROTO_DEFINITION: &str = "syntax = \"proto3\";\nmessage ProtocolBuffer {\n  string string_field = 1;\n}";

    #[test]
    fn test_location_without_revision() {
        let storage = LocalSchemaStorage::new("./");
        let schema = Schema::new("projects/test-project/schemas/1234@1234", SchemaType::Avro, "");
        let path = storage.location(&schema).unwrap();
        assert_eq!(path, PathBuf::from("./test-project/1234.avsc"));
    }

    #[test]
    fn test_location_for_avro() {
        let storage = LocalSchemaStorage::new(".");
        let schema = Schema::new("projects/test-project/schemas/1234", SchemaType::Avro, "");
        let path = storage.location(&schema).unwrap();
        assert_eq!(path.to_string_lossy(), "./test-project/1234.avsc");
    }

    #[test]
    fn test_location_for_proto() {
        let storage = LocalSchemaStorage::new(".");
        let schema = Schema::new("projects/test-project/schemas/1234", SchemaType::ProtocolBuffer, "");
        let path = storage.location(&schema).unwrap();
        assert_eq!(path.to_string_lossy(), "./test-project/1234.proto");
    }

    #[test]
    fn test_location_is_deterministic() {
        let storage = LocalSchemaStorage::new(".");
        let schema = Schema::new("projects/p/schemas/orders@abc", SchemaType::Avro, "");
        assert_eq!(storage.location(&schema).unwrap(), storage.location(&schema).unwrap());
    }

    #[test]
    fn test_location_unspecified_type() {
        let storage = LocalSchemaStorage::new(".");
        let schema = Schema::new("projects/p/schemas/s", SchemaType::Unspecified, "");
        assert!(matches!(
            storage.location(&schema),
            Err(SchemaError::UnsupportedSchemaType { .. })
        ));
    }

    #[test]
    fn test_save_unspecified_type() {
        let dir = tempdir().unwrap();
        let storage = LocalSchemaStorage::new(dir.path());
        let schema = Schema::new("projects/p/schemas/s", SchemaType::Unspecified, "data");
        assert!(matches!(
            storage.save(&schema),
            Err(SchemaError::UnsupportedSchemaType { .. })
        ));
        assert!(!dir.path().join("p").exists());
    }

    #[test]
    fn test_store_avro_schema() {
        let dir = tempdir().unwrap();
        let storage = LocalSchemaStorage::new(dir.path());
        let schema = Schema::new(
            "projects/test-project/schemas/an-avro-schema-name@f81ba5ff",
            SchemaType::Avro,
            AVRO_DEFINITION,
        );

        let stored = storage.save(&schema).unwrap();
        assert_eq!(stored, dir.path().join("test-project/an-avro-schema-name.avsc"));
        assert_eq!(fs::read_to_string(&stored).unwrap(), AVRO_DEFINITION);
    }

    #[test]
    fn test_store_proto_schema() {
        let dir = tempdir().unwrap();
        let storage = LocalSchemaStorage::new(dir.path());
        let schema = Schema::new(
            "projects/test-project/schemas/proto-schema-name@f81ba5ff",
            SchemaType::ProtocolBuffer,
            PROTO_DEFINITION,
        );

        let stored = storage.save(&schema).unwrap();
        assert_eq!(fs::read(&stored).unwrap(), PROTO_DEFINITION.as_bytes());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalSchemaStorage::new(dir.path());
        let mut schema = Schema::new("projects/p/schemas/s", SchemaType::Avro, "old");
        storage.save(&schema).unwrap();

        schema.definition = "new".to_string();
        let stored = storage.save(&schema).unwrap();
        assert_eq!(fs::read_to_string(stored).unwrap(), "new");
    }

    #[test]
    fn test_unqualified_name_uses_storage_project() {
        let dir = tempdir().unwrap();
        let storage = LocalSchemaStorage::create(dir.path(), "project-id").unwrap();
        let schema = Schema::new("orders", SchemaType::Avro, "");
        assert_eq!(
            storage.location(&schema).unwrap(),
            dir.path().join("project-id/orders.avsc")
        );
    }

    #[test]
    fn test_create_fails_if_root_is_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("non-directory.txt");
        fs::write(&file, "not a directory").unwrap();

        let result = LocalSchemaStorage::create(&file, "project-id");
        assert!(matches!(result, Err(SchemaError::NotADirectory(_))));
        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn test_create_project_sub_path() {
        let dir = tempdir().unwrap();
        let storage = LocalSchemaStorage::create(dir.path(), "project-id").unwrap();
        assert_eq!(storage.root(), dir.path());
        assert!(dir.path().join("project-id").is_dir());
    }

    #[test]
    fn test_create_missing_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("generated/schemas");
        LocalSchemaStorage::create(&root, "project-id").unwrap();
        assert!(root.join("project-id").is_dir());
    }
}
