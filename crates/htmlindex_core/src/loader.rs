//! Debug loader generation.
//!
//! The debug index of the `index` template boots the application through a
//! generated loader script. Generation happens once per run, before that
//! template's debug build, through the [`LoaderGenerator`] seam.

use std::path::Path;

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

/// Produces the debug loader script from a dependency manifest.
#[async_trait]
pub trait LoaderGenerator: Send + Sync {
    /// Generate the loader at `output` from the manifest at `manifest`.
    async fn generate(&self, manifest: &Path, output: &Path) -> anyhow::Result<()>;
}

/// Writes a loader that requires each compiler entry point.
///
/// The manifest is the JSON compiler argument file used for debug builds,
/// either an object with an `entry_point` key or a list of
/// `--entry_point=...` arguments.
#[derive(Debug, Default, Clone)]
pub struct EntryPointLoaderGenerator;

impl EntryPointLoaderGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Render the loader script for a parsed manifest.
    pub fn render(&self, manifest: &Value) -> anyhow::Result<String> {
        let entry_points = entry_points(manifest);
        if entry_points.is_empty() {
            bail!("no entry points declared");
        }

        let mut script = String::from("// Generated debug loader.\n");
        for entry in entry_points {
            script.push_str(&format!("goog.require('{}');\n", entry));
        }
        Ok(script)
    }
}

#[async_trait]
impl LoaderGenerator for EntryPointLoaderGenerator {
    async fn generate(&self, manifest: &Path, output: &Path) -> anyhow::Result<()> {
        debug!("Reading loader manifest {:?}", manifest);
        let content = tokio::fs::read_to_string(manifest)
            .await
            .with_context(|| format!("reading {}", manifest.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", manifest.display()))?;

        let script = self
            .render(&value)
            .with_context(|| format!("in {}", manifest.display()))?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, script)
            .await
            .with_context(|| format!("writing {}", output.display()))?;

        info!("Generated debug loader {:?}", output);
        Ok(())
    }
}

fn entry_points(manifest: &Value) -> Vec<String> {
    let raw: Vec<String> = match manifest {
        Value::Object(map) => match map.get("entry_point").or_else(|| map.get("entryPoint")) {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        },
        Value::Array(args) => args
            .iter()
            .filter_map(|v| v.as_str())
            .filter_map(|arg| arg.strip_prefix("--entry_point="))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(|e| e.strip_prefix("goog:").map(str::to_string).unwrap_or(e))
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_entry_points_object() {
        let manifest = json!({"entry_point": ["goog:app.Main", "app.tools"]});
        assert_eq!(entry_points(&manifest), vec!["app.Main", "app.tools"]);
    }

    #[test]
    fn test_entry_points_args() {
        let manifest = json!(["--js=src/**.js", "--entry_point=goog:app.Main"]);
        assert_eq!(entry_points(&manifest), vec!["app.Main"]);
    }

    #[test]
    fn test_render_requires_entry_points() {
        let generator = EntryPointLoaderGenerator::new();
        assert!(generator.render(&json!({"js": []})).is_err());

        let script = generator.render(&json!({"entry_point": "app.Main"})).unwrap();
        assert!(script.ends_with("goog.require('app.Main');\n"));
    }

    #[tokio::test]
    async fn test_generate_writes_loader() {
        let temp = tempdir().unwrap();
        let manifest = temp.path().join("gcc-debug-args.json");
        let output = temp.path().join(".build/app-loader.js");
        std::fs::write(&manifest, r#"{"entry_point": "goog:app.Main"}"#).unwrap();

        EntryPointLoaderGenerator::new()
            .generate(&manifest, &output)
            .await
            .unwrap();

        let script = std::fs::read_to_string(&output).unwrap();
        assert!(script.contains("goog.require('app.Main');"));
    }

    #[tokio::test]
    async fn test_generate_missing_manifest() {
        let temp = tempdir().unwrap();
        let err = EntryPointLoaderGenerator::new()
            .generate(&temp.path().join("absent.json"), &temp.path().join("out.js"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }
}
