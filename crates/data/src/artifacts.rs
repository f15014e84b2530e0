//! Contract templates read from compiler output.
//!
//! Hardhat artifacts carry `bytecode` as a string; Foundry nests it under
//! `bytecode.object`. Both are accepted, as is an `abi` stored as a JSON string.

use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads `{dir}/{name}.json`.
#[derive(Debug, Clone)]
pub struct FileArtifactSource {
    dir: PathBuf,
}

impl FileArtifactSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DexError::validation(format!(
                "artifact name '{name}' may only contain letters, digits, '_' and '-'"
            )));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl ArtifactSource for FileArtifactSource {
    async fn artifact(&self, name: &str) -> Result<ContractArtifact> {
        let path = self.path_for(name)?;
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Artifact unavailable");
            DexError::external(format!("artifact '{name}' unavailable: {e}"))
        })?;
        let artifact = parse_artifact(name, &raw)?;
        debug!(name, path = %path.display(), "Loaded artifact");
        Ok(artifact)
    }
}

/// Extracts ABI and creation bytecode from an artifact document.
///
/// # Errors
/// Returns `External` when the document lacks either part.
pub fn parse_artifact(name: &str, raw: &str) -> Result<ContractArtifact> {
    let invalid = |reason: &str| DexError::external(format!("artifact '{name}' {reason}"));
    let doc: Value = serde_json::from_str(raw).map_err(|e| invalid(&format!("is not JSON: {e}")))?;

    let abi = match doc.get("abi") {
        Some(Value::Array(_)) => doc["abi"].to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => return Err(invalid("has no ABI")),
    };

    let bytecode = match doc.get("bytecode") {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Object(obj)) => obj
            .get("object")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("has no bytecode object"))?,
        _ => return Err(invalid("has no bytecode")),
    };
    let bytecode = bytecode.trim();
    let bytecode = if bytecode.starts_with("0x") {
        bytecode.to_string()
    } else {
        format!("0x{bytecode}")
    };
    if bytecode.len() <= 2 {
        return Err(invalid("has empty bytecode"));
    }

    Ok(ContractArtifact {
        name: name.to_string(),
        abi,
        bytecode,
    })
}
