//! Template loading and output writing shared by both builders.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::config::{BuildOptions, TemplateDescriptor};
use crate::error::{IndexError, IndexResult};

/// Resolve and read the template for a descriptor.
pub async fn load_template(
    options: &BuildOptions,
    descriptor: &TemplateDescriptor,
) -> IndexResult<String> {
    let path = options.template_path(descriptor);
    debug!("Loading template {} from {:?}", descriptor.id, path);

    if !path.exists() {
        return Err(IndexError::MissingTemplate {
            id: descriptor.id.clone(),
            path,
        });
    }

    Ok(tokio::fs::read_to_string(&path).await?)
}

/// Write a generated index, creating its directory if needed.
pub async fn write_output(path: &Path, content: &str) -> IndexResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    info!("Wrote {:?}", path);
    Ok(())
}

/// Express `target` relative to the directory `base`.
///
/// Relative inputs are made absolute against the working directory first.
/// Returns `target` unchanged when the two paths share no root.
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let (target_abs, base_abs) = match (std::path::absolute(target), std::path::absolute(base)) {
        (Ok(t), Ok(b)) => (t, b),
        _ => return target.to_path_buf(),
    };

    let target_parts: Vec<Component> = normalize(&target_abs);
    let base_parts: Vec<Component> = normalize(&base_abs);

    if target_parts.first() != base_parts.first() {
        return target.to_path_buf();
    }

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(parts.last(), Some(Component::Normal(_))) => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/app/.build/deps.js"), Path::new("/app")),
            Path::new(".build/deps.js")
        );
        assert_eq!(
            relative_path(
                Path::new("/app/node_modules/lib/base.js"),
                Path::new("/app/web")
            ),
            Path::new("../node_modules/lib/base.js")
        );
        assert_eq!(
            relative_path(Path::new("/app/./a/../b.js"), Path::new("/app")),
            Path::new("b.js")
        );
    }

    #[test]
    fn test_relative_path_with_parent_base() {
        let cwd = std::env::current_dir().unwrap();
        let cwd_name = cwd.file_name().unwrap();

        let relative = relative_path(Path::new("b/x.js"), Path::new("../a"));
        assert_eq!(relative, Path::new("..").join(cwd_name).join("b/x.js"));

        assert_eq!(
            relative_path(Path::new("web/.build/deps.js"), Path::new("web")),
            Path::new(".build/deps.js")
        );
    }

    #[tokio::test]
    async fn test_missing_template() {
        let temp = tempdir().unwrap();
        let options = BuildOptions::new(temp.path());
        let err = load_template(&options, &TemplateDescriptor::new("index"))
            .await
            .unwrap_err();

        match err {
            IndexError::MissingTemplate { id, path } => {
                assert_eq!(id, "index");
                assert_eq!(path, temp.path().join("index-template.html"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_write_output_creates_parents() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dist/nested/index.html");
        write_output(&path, "<html></html>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
