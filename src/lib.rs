//! Pub/Sub Schema Downloader
//!
//! Downloads Avro and Protocol Buffer schemas from a Pub/Sub schema registry
//! into local files, optionally filtered by name patterns and pinned to
//! specific revisions.
//!
//! ## Features
//!
//! - **Pattern Filtering**: Regular expressions select schemas by short name; first match wins
//! - **Revision Pinning**: Each pattern may pin a revision, fetched as `name@revision`
//! - **Type Filtering**: Restrict a run to Avro or Protocol Buffer schemas
//! - **Deterministic Layout**: One file per schema, content written verbatim
//!
//! ## Layout
//!
//! ```text
//! {output_directory}/
//! └── {project}/
//!     ├── orders.avsc
//!     ├── users.avsc
//!     └── payments.proto
//! ```

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod pattern;
pub mod repository;
pub mod schema;
pub mod storage;

pub use client::{ClientGuard, HttpSchemaService, SchemaService};
pub use config::{DownloadConfig, DownloadSettings, RegistryConfig};
pub use download::{DownloadPlan, DownloadReport, SchemaDownloader};
pub use error::{Result, SchemaError};
pub use pattern::{PatternEntry, PatternFactory, PatternMatcher, SchemaPattern};
pub use repository::SchemaRepository;
pub use schema::{Schema, SchemaName, SchemaType};
pub use storage::LocalSchemaStorage;
