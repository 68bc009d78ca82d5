//! Debug index generation.
//!
//! Debug indexes load vendor resources from the debug manifests and boot the
//! application from unminified sources through the generated loader.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::{BuildFlavor, BuildOptions, ResourceKind, TemplateDescriptor};
use crate::error::IndexResult;
use crate::manifest::fill_from_manifest;
use crate::tags::{script_tag, stylesheet_tag, tag_block, Marker, TagFiller, VersionTokens};
use crate::template::{load_template, relative_path, write_output};

/// Builds `<basePath>/<id>.html` from a template.
pub struct DebugIndexBuilder {
    options: Arc<BuildOptions>,
    filler: TagFiller,
}

impl DebugIndexBuilder {
    pub fn new(options: Arc<BuildOptions>) -> Self {
        Self {
            options,
            filler: TagFiller::new(),
        }
    }

    /// Render the debug index for a template without writing it.
    pub async fn render(&self, descriptor: &TemplateDescriptor) -> IndexResult<String> {
        let options = &self.options;
        let id = &descriptor.id;

        let template = load_template(options, descriptor).await?;
        let mut html = self
            .filler
            .replace_versions(&template, &VersionTokens::debug());

        let markers = self.filler.markers_present(&html);
        debug!("Template {} has markers {:?}", id, markers);

        html = fill_from_manifest(
            &self.filler,
            &html,
            Marker::VendorCss,
            &options.manifest_path(ResourceKind::Css, BuildFlavor::Debug, id),
            stylesheet_tag,
        )
        .await?;

        html = self
            .filler
            .fill_marker(&html, Marker::AppCss, &stylesheet_tag(&options.debug_css));

        if markers.contains(&Marker::VendorJs) {
            html = fill_from_manifest(
                &self.filler,
                &html,
                Marker::VendorJs,
                &options.manifest_path(ResourceKind::Js, BuildFlavor::Debug, id),
                script_tag,
            )
            .await?;
        }

        if markers.contains(&Marker::AppJs) {
            let bootstrap = self.bootstrap_sequence();
            html = self
                .filler
                .fill_marker(&html, Marker::AppJs, &tag_block(&bootstrap, script_tag));
        }

        Ok(html)
    }

    /// Render and write the debug index, returning the written path.
    pub async fn build(&self, descriptor: &TemplateDescriptor) -> IndexResult<PathBuf> {
        let html = self.render(descriptor).await?;
        let output = self.options.debug_output_path(&descriptor.id);
        write_output(&output, &html).await?;
        Ok(output)
    }

    /// Bootstrap scripts relative to the directory the index is written to.
    fn bootstrap_sequence(&self) -> Vec<String> {
        self.options
            .bootstrap
            .sequence()
            .iter()
            .map(|path| {
                relative_path(path, &self.options.base_path)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TEMPLATE: &str = "<html><head><title>@appVersion@ @packageVersion@</title>\
<!--VENDOR_CSS--><!--APP_CSS--></head><body><img src=\"@version@logo.png\">\
<!--VENDOR_JS--><!--APP_JS--></body></html>";

    #[tokio::test]
    async fn test_debug_versions() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index-template.html"), TEMPLATE).unwrap();

        let options = BuildOptions::new(temp.path()).app_version("9.9.9");
        let builder = DebugIndexBuilder::new(Arc::new(options));
        let html = builder.render(&TemplateDescriptor::new("index")).await.unwrap();

        assert!(html.contains("<title>dev dev</title>"));
        assert!(html.contains("<img src=\"logo.png\">"));
        assert!(!html.contains("9.9.9"));
        assert!(!html.contains('@'));
    }

    #[tokio::test]
    async fn test_debug_bootstrap_sequence() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index-template.html"), TEMPLATE).unwrap();

        let builder = DebugIndexBuilder::new(Arc::new(BuildOptions::new(temp.path())));
        let html = builder.render(&TemplateDescriptor::new("index")).await.unwrap();

        let defines = html.find(".build/gcc-defines-debug.js").unwrap();
        let base = html
            .find("node_modules/google-closure-library/closure/goog/base.js")
            .unwrap();
        let deps = html.find(".build/deps.js").unwrap();
        let loader = html.find(".build/app-loader.js").unwrap();
        assert!(defines < base && base < deps && deps < loader);
        assert_eq!(html.matches("<script").count(), 4);
    }

    #[tokio::test]
    async fn test_debug_without_js_markers() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("plain-template.html"),
            "<head><!--APP_CSS--></head><body></body>",
        )
        .unwrap();

        let options = BuildOptions::new(temp.path()).debug_css(".build/app.css");
        let builder = DebugIndexBuilder::new(Arc::new(options));
        let output = builder.build(&TemplateDescriptor::new("plain")).await.unwrap();

        assert_eq!(output, temp.path().join("plain.html"));
        let html = fs::read_to_string(output).unwrap();
        assert_eq!(
            html,
            "<head><link rel=\"stylesheet\" href=\".build/app.css\"></head><body></body>"
        );
    }
}
