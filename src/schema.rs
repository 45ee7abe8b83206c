//! Output-schema staging.
//!
//! The CLI reads the output schema from a file, so a schema supplied as a
//! JSON value is staged to a temporary directory for the duration of the
//! turn. The directory (and the file in it) is removed when the guard is
//! dropped.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use crate::error::{Error, Result};

/// A schema file staged for one turn.
#[derive(Debug)]
pub(crate) struct OutputSchemaFile {
    // Held for its Drop; the path borrows from it.
    _dir: TempDir,
    path: PathBuf,
}

impl OutputSchemaFile {
    /// Stage a schema, if one was given.
    ///
    /// The schema must be a plain JSON object. The directory creation and
    /// write are blocking filesystem calls, so they run off the async
    /// executor.
    pub(crate) async fn stage(schema: Option<&Value>) -> Result<Option<Self>> {
        let Some(schema) = schema else {
            return Ok(None);
        };
        if !schema.is_object() {
            return Err(Error::InvalidSchema(
                "output schema must be a plain JSON object".to_string(),
            ));
        }
        let rendered = serde_json::to_string(schema)
            .map_err(|e| Error::InvalidSchema(format!("output schema not serializable: {e}")))?;

        let staged = tokio::task::spawn_blocking(move || -> Result<Self> {
            let dir = TempDir::with_prefix("codex-schema-").map_err(Error::io)?;
            let path = dir.path().join("schema.json");
            std::fs::write(&path, rendered).map_err(Error::io)?;
            Ok(Self { _dir: dir, path })
        })
        .await
        .map_err(|e| Error::io(std::io::Error::other(e)))??;

        Ok(Some(staged))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn no_schema_stages_nothing() {
        assert!(OutputSchemaFile::stage(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn object_schema_is_written_to_disk() {
        let schema = json!({"type": "object", "properties": {"answer": {"type": "string"}}});
        let staged = OutputSchemaFile::stage(Some(&schema)).await.unwrap().unwrap();
        assert!(staged.path().ends_with("schema.json"));

        let written = std::fs::read_to_string(staged.path()).unwrap();
        let back: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(back, schema);
    }

    #[tokio::test]
    async fn file_is_removed_on_drop() {
        let staged = OutputSchemaFile::stage(Some(&json!({}))).await.unwrap().unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn non_object_schema_is_rejected() {
        for schema in [json!("x"), json!(1), json!([1]), json!(null), json!(true)] {
            let err = OutputSchemaFile::stage(Some(&schema)).await.unwrap_err();
            assert!(matches!(err, Error::InvalidSchema(_)));
        }
    }
}
