//! Read-only validation of configured templates.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::config::BuildOptions;
use crate::tags::{Marker, TagFiller};

/// What was found for one configured template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInspection {
    pub id: String,
    pub path: PathBuf,
    pub skip: bool,
    pub exists: bool,
    #[serde(serialize_with = "serialize_markers")]
    pub markers: BTreeSet<Marker>,
    /// `@...@` tokens that will survive substitution
    pub unknown_tokens: BTreeSet<String>,
}

impl TemplateInspection {
    /// Problems that would break or degrade a build.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.skip {
            return issues;
        }
        if !self.exists {
            issues.push(format!("Template file does not exist: {}", self.path.display()));
        }
        for token in &self.unknown_tokens {
            issues.push(format!("Unknown placeholder token: {}", token));
        }
        issues
    }

    pub fn marker_names(&self) -> Vec<&'static str> {
        self.markers.iter().map(|m| m.comment()).collect()
    }
}

fn serialize_markers<S: Serializer>(
    markers: &BTreeSet<Marker>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(markers.iter().map(|m| m.comment()))
}

/// Inspect every configured template without writing anything.
///
/// Reads templates with blocking `std::fs`; meant for one-shot use at
/// startup, before any build tasks are spawned.
pub fn inspect_templates(options: &BuildOptions) -> Vec<TemplateInspection> {
    let filler = TagFiller::new();

    options
        .templates
        .iter()
        .map(|descriptor| {
            let path = options.template_path(descriptor);
            let content = fs::read_to_string(&path).ok();

            TemplateInspection {
                id: descriptor.id.clone(),
                skip: descriptor.skip,
                exists: content.is_some(),
                markers: content
                    .as_deref()
                    .map(|c| filler.markers_present(c))
                    .unwrap_or_default(),
                unknown_tokens: content
                    .as_deref()
                    .map(|c| filler.unknown_tokens(c))
                    .unwrap_or_default(),
                path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateDescriptor;
    use tempfile::tempdir;

    #[test]
    fn test_inspect_templates() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("index-template.html"),
            "<head><!--APP_CSS--></head><p>@buildDate@ @appVersion@</p>",
        )
        .unwrap();

        let options = BuildOptions::new(temp.path())
            .template(TemplateDescriptor::new("index"))
            .template(TemplateDescriptor::new("absent"))
            .template(TemplateDescriptor::new("retired").skipped());

        let results = inspect_templates(&options);
        assert_eq!(results.len(), 3);

        let index = &results[0];
        assert!(index.exists);
        assert_eq!(index.marker_names(), vec!["<!--APP_CSS-->"]);
        assert_eq!(index.issues(), vec!["Unknown placeholder token: @buildDate@"]);

        assert_eq!(results[1].issues().len(), 1);
        assert!(results[2].issues().is_empty());
    }

    #[test]
    fn test_inspection_serializes_markers() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("index-template.html"),
            "<head><!--VENDOR_CSS--></head><body><!--APP_JS--></body>",
        )
        .unwrap();

        let options = BuildOptions::new(temp.path()).template(TemplateDescriptor::new("index"));
        let value = serde_json::to_value(inspect_templates(&options)).unwrap();

        assert_eq!(value[0]["id"], "index");
        assert_eq!(value[0]["exists"], true);
        assert_eq!(
            value[0]["markers"],
            serde_json::json!(["<!--VENDOR_CSS-->", "<!--APP_JS-->"])
        );
    }
}
