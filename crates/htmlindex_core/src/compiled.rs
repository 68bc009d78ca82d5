//! Compiled (distribution) index generation.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BuildFlavor, BuildOptions, ResourceKind, TemplateDescriptor};
use crate::error::IndexResult;
use crate::manifest::fill_from_manifest;
use crate::tags::{script_tag, stylesheet_tag, Marker, TagFiller, VersionTokens};
use crate::template::{load_template, write_output};

/// Builds `<distPath>/<id>.html` from a template.
pub struct CompiledIndexBuilder {
    options: Arc<BuildOptions>,
    filler: TagFiller,
}

impl CompiledIndexBuilder {
    pub fn new(options: Arc<BuildOptions>) -> Self {
        Self {
            options,
            filler: TagFiller::new(),
        }
    }

    /// Render the compiled index for a template without writing it.
    pub async fn render(&self, descriptor: &TemplateDescriptor) -> IndexResult<String> {
        let options = &self.options;
        let id = &descriptor.id;

        let template = load_template(options, descriptor).await?;
        let tokens =
            VersionTokens::compiled(&options.app_version, options.effective_package_version());
        let mut html = self.filler.replace_versions(&template, &tokens);

        html = fill_from_manifest(
            &self.filler,
            &html,
            Marker::VendorCss,
            &options.manifest_path(ResourceKind::Css, BuildFlavor::Dist, id),
            stylesheet_tag,
        )
        .await?;
        html = fill_from_manifest(
            &self.filler,
            &html,
            Marker::VendorJs,
            &options.manifest_path(ResourceKind::Js, BuildFlavor::Dist, id),
            script_tag,
        )
        .await?;

        html = self
            .filler
            .fill_marker(&html, Marker::AppCss, &stylesheet_tag(&options.compiled_css));
        html = self
            .filler
            .fill_marker(&html, Marker::AppJs, &script_tag(&options.compiled_js));

        Ok(html)
    }

    /// Render and write the compiled index, returning the written path.
    pub async fn build(&self, descriptor: &TemplateDescriptor) -> IndexResult<PathBuf> {
        let html = self.render(descriptor).await?;
        let output = self.options.compiled_output_path(&descriptor.id);
        write_output(&output, &html).await?;
        Ok(output)
    }
}
