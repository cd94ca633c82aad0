use std::path::{Path, PathBuf};

use tracing::{debug, info};

use rde_model::{FilesSchema, SchemaError};

use crate::compile::compile_files_schema;
use crate::raw::RawFilesSchema;

/// The files-schema compiled into the binary.
pub const DEFAULT_SCHEMA_YAML: &str = include_str!("../schemas/files-schema.yaml");

const SCHEMA_ENV_VAR: &str = "RDECHECK_SCHEMA";

/// Schema path taken from `RDECHECK_SCHEMA`, if set.
pub fn schema_path_from_env() -> Option<PathBuf> {
    std::env::var_os(SCHEMA_ENV_VAR).map(PathBuf::from)
}

pub fn load_default_schema() -> Result<FilesSchema, SchemaError> {
    parse_schema(DEFAULT_SCHEMA_YAML, "<builtin files-schema>")
}

pub fn load_schema(path: &Path) -> Result<FilesSchema, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = parse_schema(&text, &path.display().to_string())?;
    info!(path = %path.display(), kinds = schema.len(), "loaded files-schema");
    Ok(schema)
}

/// Load from an explicit path, else `RDECHECK_SCHEMA`, else the builtin schema.
pub fn load_schema_or_default(path: Option<&Path>) -> Result<FilesSchema, SchemaError> {
    match path.map(Path::to_path_buf).or_else(schema_path_from_env) {
        Some(path) => load_schema(&path),
        None => load_default_schema(),
    }
}

/// Parse and compile schema YAML; `origin` names the source in errors.
pub fn parse_schema(text: &str, origin: &str) -> Result<FilesSchema, SchemaError> {
    let raw: RawFilesSchema = serde_yaml::from_str(text).map_err(|err| SchemaError::Parse {
        origin: origin.to_string(),
        message: err.to_string(),
    })?;
    let schema = compile_files_schema(raw)?;
    debug!(origin, kinds = schema.len(), "parsed files-schema");
    Ok(schema)
}
