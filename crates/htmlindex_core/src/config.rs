//! Build configuration.
//!
//! A configuration file (JSON or YAML) is deserialized into [`IndexConfig`],
//! then resolved once into immutable [`BuildOptions`]. All defaults that
//! depend on the working directory are applied during resolution, so nothing
//! downstream consults process-global state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndexError, IndexResult};

/// Template id whose debug build needs the generated loader.
pub const RESERVED_INDEX_ID: &str = "index";

/// Directory, relative to the app path, holding generated build inputs.
pub const BUILD_DIR: &str = ".build";

/// A template to generate indexes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Output name; also selects the manifests for this template
    pub id: String,
    /// Template path, overriding `<id>-template.html`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Omit this template from every build
    #[serde(default)]
    pub skip: bool,
}

impl TemplateDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file: None,
            skip: false,
        }
    }

    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Whether this is the template that triggers loader generation.
    pub fn is_reserved(&self) -> bool {
        self.id == RESERVED_INDEX_ID
    }
}

/// Resource category of a vendor manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

impl ResourceKind {
    fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Css => "css",
            ResourceKind::Js => "js",
        }
    }
}

/// Build flavor a vendor manifest was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFlavor {
    Debug,
    Dist,
}

impl BuildFlavor {
    fn as_str(&self) -> &'static str {
        match self {
            BuildFlavor::Debug => "debug",
            BuildFlavor::Dist => "dist",
        }
    }
}

/// Configuration file contents, before defaults are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    #[serde(default)]
    pub templates: Option<Vec<TemplateDescriptor>>,
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    #[serde(default)]
    pub app_path: Option<PathBuf>,
    #[serde(default)]
    pub dist_path: Option<PathBuf>,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub package_version: Option<String>,
    #[serde(default)]
    pub override_version: Option<String>,
    #[serde(default)]
    pub debug_css: Option<String>,
    #[serde(default)]
    pub compiled_css: Option<String>,
    #[serde(default)]
    pub compiled_js: Option<String>,
    #[serde(default)]
    pub defines_js: Option<PathBuf>,
    #[serde(default)]
    pub closure_base_js: Option<PathBuf>,
    #[serde(default)]
    pub deps_js: Option<PathBuf>,
    #[serde(default)]
    pub loader_js: Option<PathBuf>,
    #[serde(default)]
    pub loader_manifest: Option<PathBuf>,
}

impl IndexConfig {
    /// Load a configuration file. `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON.
    ///
    /// Uses blocking `std::fs`; call once at startup, before the
    /// orchestrator spawns any build tasks.
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| IndexError::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_yaml = path
            .extension()
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false);

        let parsed = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| IndexError::ConfigLoad {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Apply defaults and produce the options for one invocation.
    ///
    /// `basePath` defaults to `root`, and relative paths resolve against
    /// it. The CLI passes the working directory it was started from.
    ///
    /// May read `package.json` with blocking `std::fs`; startup only.
    pub fn resolve(self, root: &Path) -> IndexResult<BuildOptions> {
        let package_version = match &self.package_version {
            Some(v) => v.clone(),
            None => {
                let base_path = match &self.base_path {
                    Some(p) => root.join(p),
                    None => root.to_path_buf(),
                };
                read_package_version(&base_path)?.unwrap_or_default()
            }
        };
        Ok(self.into_options(root, package_version))
    }

    fn into_options(self, root: &Path, package_version: String) -> BuildOptions {
        let base_path = match self.base_path {
            Some(p) => root.join(p),
            None => root.to_path_buf(),
        };
        let app_path = self
            .app_path
            .map(|p| root.join(p))
            .unwrap_or_else(|| base_path.clone());
        let dist_path = self
            .dist_path
            .map(|p| root.join(p))
            .unwrap_or_else(|| base_path.join("dist"));

        let build_dir = app_path.join(BUILD_DIR);
        let bootstrap = BootstrapPaths {
            defines_js: self
                .defines_js
                .map(|p| root.join(p))
                .unwrap_or_else(|| build_dir.join("gcc-defines-debug.js")),
            closure_base_js: self.closure_base_js.map(|p| root.join(p)).unwrap_or_else(|| {
                app_path.join("node_modules/google-closure-library/closure/goog/base.js")
            }),
            deps_js: self
                .deps_js
                .map(|p| root.join(p))
                .unwrap_or_else(|| build_dir.join("deps.js")),
            loader_js: self
                .loader_js
                .map(|p| root.join(p))
                .unwrap_or_else(|| build_dir.join("app-loader.js")),
            loader_manifest: self
                .loader_manifest
                .map(|p| root.join(p))
                .unwrap_or_else(|| build_dir.join("gcc-debug-args.json")),
        };

        BuildOptions {
            templates: self.templates.unwrap_or_default(),
            base_path,
            app_path,
            dist_path,
            app_version: self.app_version.unwrap_or_default(),
            package_version,
            override_version: self.override_version.unwrap_or_default(),
            debug_css: self.debug_css.unwrap_or_default(),
            compiled_css: self.compiled_css.unwrap_or_default(),
            compiled_js: self.compiled_js.unwrap_or_default(),
            bootstrap,
        }
    }
}

/// `version` from `<base_path>/package.json`. Blocking; startup only.
fn read_package_version(base_path: &Path) -> IndexResult<Option<String>> {
    let package_json = base_path.join("package.json");
    if !package_json.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&package_json).map_err(|e| IndexError::ConfigLoad {
        path: package_json.clone(),
        message: e.to_string(),
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| IndexError::ConfigLoad {
            path: package_json.clone(),
            message: e.to_string(),
        })?;

    Ok(value
        .get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string))
}

/// Scripts making up the debug bootstrap sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPaths {
    /// Generated compiler defines
    pub defines_js: PathBuf,
    /// Module runtime base script
    pub closure_base_js: PathBuf,
    /// Generated dependency graph
    pub deps_js: PathBuf,
    /// Generated application loader
    pub loader_js: PathBuf,
    /// Dependency manifest the loader is generated from
    pub loader_manifest: PathBuf,
}

impl BootstrapPaths {
    /// The bootstrap scripts in load order.
    pub fn sequence(&self) -> [&Path; 4] {
        [
            &self.defines_js,
            &self.closure_base_js,
            &self.deps_js,
            &self.loader_js,
        ]
    }
}

/// Resolved options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub templates: Vec<TemplateDescriptor>,
    pub base_path: PathBuf,
    pub app_path: PathBuf,
    pub dist_path: PathBuf,
    pub app_version: String,
    pub package_version: String,
    pub override_version: String,
    pub debug_css: String,
    pub compiled_css: String,
    pub compiled_js: String,
    pub bootstrap: BootstrapPaths,
}

impl BuildOptions {
    /// Options rooted at `base_path` with every other value defaulted.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path: PathBuf = base_path.into();
        IndexConfig::default().into_options(&base_path, String::new())
    }

    pub fn template(mut self, descriptor: TemplateDescriptor) -> Self {
        self.templates.push(descriptor);
        self
    }

    pub fn app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    pub fn package_version(mut self, version: impl Into<String>) -> Self {
        self.package_version = version.into();
        self
    }

    pub fn override_version(mut self, version: impl Into<String>) -> Self {
        self.override_version = version.into();
        self
    }

    pub fn debug_css(mut self, path: impl Into<String>) -> Self {
        self.debug_css = path.into();
        self
    }

    pub fn compiled_css(mut self, path: impl Into<String>) -> Self {
        self.compiled_css = path.into();
        self
    }

    pub fn compiled_js(mut self, path: impl Into<String>) -> Self {
        self.compiled_js = path.into();
        self
    }

    pub fn dist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dist_path = path.into();
        self
    }

    /// Template file for a descriptor.
    pub fn template_path(&self, descriptor: &TemplateDescriptor) -> PathBuf {
        match &descriptor.file {
            Some(file) => self.base_path.join(file),
            None => self
                .base_path
                .join(format!("{}-template.html", descriptor.id)),
        }
    }

    /// Vendor manifest written by the resource resolution step.
    pub fn manifest_path(&self, kind: ResourceKind, flavor: BuildFlavor, id: &str) -> PathBuf {
        self.app_path.join(BUILD_DIR).join(format!(
            "resources-{}-{}-{}",
            kind.as_str(),
            flavor.as_str(),
            id
        ))
    }

    pub fn debug_output_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.html", id))
    }

    pub fn compiled_output_path(&self, id: &str) -> PathBuf {
        self.dist_path.join(format!("{}.html", id))
    }

    /// Value for `@packageVersion@` in compiled output.
    pub fn effective_package_version(&self) -> &str {
        if self.override_version.is_empty() {
            &self.package_version
        } else {
            &self.override_version
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_defaults() {
        let root = Path::new("/work/app");
        let options = IndexConfig {
            package_version: Some("1.2.3".to_string()),
            ..IndexConfig::default()
        }
        .resolve(root)
        .unwrap();

        assert_eq!(options.base_path, root);
        assert_eq!(options.app_path, root);
        assert_eq!(options.dist_path, root.join("dist"));
        assert!(options.templates.is_empty());
        assert_eq!(
            options.bootstrap.loader_js,
            root.join(".build").join("app-loader.js")
        );
    }

    #[test]
    fn test_template_path() {
        let options = BuildOptions::new("/work/app");
        let default = TemplateDescriptor::new("index");
        let relative = TemplateDescriptor::new("tools").file("src/tools.html");
        let absolute = TemplateDescriptor::new("other").file("/templates/other.html");

        assert_eq!(
            options.template_path(&default),
            Path::new("/work/app/index-template.html")
        );
        assert_eq!(
            options.template_path(&relative),
            Path::new("/work/app/src/tools.html")
        );
        assert_eq!(
            options.template_path(&absolute),
            Path::new("/templates/other.html")
        );
    }

    #[test]
    fn test_manifest_path() {
        let options = BuildOptions::new("/work/app");
        assert_eq!(
            options.manifest_path(ResourceKind::Css, BuildFlavor::Debug, "index"),
            Path::new("/work/app/.build/resources-css-debug-index")
        );
        assert_eq!(
            options.manifest_path(ResourceKind::Js, BuildFlavor::Dist, "tools"),
            Path::new("/work/app/.build/resources-js-dist-tools")
        );
    }

    #[test]
    fn test_effective_package_version() {
        let options = BuildOptions::new("/work").package_version("1.0.0");
        assert_eq!(options.effective_package_version(), "1.0.0");

        let options = options.override_version("2.0.0-rc1");
        assert_eq!(options.effective_package_version(), "2.0.0-rc1");
    }

    #[test]
    fn test_load_json_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.json");
        fs::write(
            &path,
            r#"{
                "templates": [{"id": "index"}, {"id": "old", "skip": true}],
                "appVersion": "v2",
                "distPath": "out",
                "compiledJs": "min/app.js"
            }"#,
        )
        .unwrap();

        let config = IndexConfig::load(&path).unwrap();
        let options = config.resolve(temp.path()).unwrap();

        assert_eq!(options.templates.len(), 2);
        assert!(options.templates[1].skip);
        assert_eq!(options.app_version, "v2");
        assert_eq!(options.dist_path, temp.path().join("out"));
        assert_eq!(options.compiled_js, "min/app.js");
    }

    #[test]
    fn test_load_yaml_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.yaml");
        fs::write(
            &path,
            "templates:\n  - id: index\n    file: html/index.html\ndebugCss: .build/app.css\n",
        )
        .unwrap();

        let config = IndexConfig::load(&path).unwrap();
        let templates = config.templates.clone().unwrap();
        assert_eq!(templates[0].file, Some(PathBuf::from("html/index.html")));
        assert_eq!(config.debug_css.as_deref(), Some(".build/app.css"));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let temp = tempdir().unwrap();
        let err = IndexConfig::load(temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IndexError::ConfigLoad { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_package_version_from_package_json() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name": "app", "version": "3.4.5"}"#,
        )
        .unwrap();

        let options = IndexConfig::default().resolve(temp.path()).unwrap();
        assert_eq!(options.package_version, "3.4.5");
    }
}
