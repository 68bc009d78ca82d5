//! Tag generation and placeholder substitution.

use std::collections::BTreeSet;

use regex::Regex;

/// Insertion point comment in an index template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    VendorCss,
    VendorJs,
    AppCss,
    AppJs,
}

impl Marker {
    pub const ALL: [Marker; 4] = [
        Marker::VendorCss,
        Marker::VendorJs,
        Marker::AppCss,
        Marker::AppJs,
    ];

    /// The literal comment marking this insertion point.
    pub fn comment(&self) -> &'static str {
        match self {
            Marker::VendorCss => "<!--VENDOR_CSS-->",
            Marker::VendorJs => "<!--VENDOR_JS-->",
            Marker::AppCss => "<!--APP_CSS-->",
            Marker::AppJs => "<!--APP_JS-->",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "VENDOR_CSS" => Some(Marker::VendorCss),
            "VENDOR_JS" => Some(Marker::VendorJs),
            "APP_CSS" => Some(Marker::AppCss),
            "APP_JS" => Some(Marker::AppJs),
            _ => None,
        }
    }
}

/// Values substituted for the version tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionTokens {
    /// Replaces `@version@`
    pub version: String,
    /// Replaces `@appVersion@`
    pub app_version: String,
    /// Replaces `@packageVersion@`
    pub package_version: String,
}

impl VersionTokens {
    /// Tokens for a debug index: no version path, `dev` everywhere else.
    pub fn debug() -> Self {
        Self {
            version: String::new(),
            app_version: "dev".to_string(),
            package_version: "dev".to_string(),
        }
    }

    /// Tokens for a compiled index.
    ///
    /// `@version@` becomes a directory prefix, so it carries a trailing
    /// separator when the app version is set.
    pub fn compiled(app_version: &str, package_version: &str) -> Self {
        let version = if app_version.is_empty() {
            String::new()
        } else {
            format!("{}/", app_version)
        };

        Self {
            version,
            app_version: app_version.to_string(),
            package_version: package_version.to_string(),
        }
    }
}

/// Stylesheet tag for a path, or an empty string for an empty path.
pub fn stylesheet_tag(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!(r#"<link rel="stylesheet" href="{}">"#, normalize_separators(path))
}

/// Script tag for a path, or an empty string for an empty path.
pub fn script_tag(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!(r#"<script src="{}"></script>"#, normalize_separators(path))
}

/// Convert each path with `tag` and join the non-empty results.
pub fn tag_block<S: AsRef<str>>(paths: &[S], tag: fn(&str) -> String) -> String {
    paths
        .iter()
        .map(|p| tag(p.as_ref()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Placeholder substitution over template text.
pub struct TagFiller {
    version_pattern: Regex,
    marker_pattern: Regex,
    token_pattern: Regex,
}

impl Default for TagFiller {
    fn default() -> Self {
        Self::new()
    }
}

impl TagFiller {
    pub fn new() -> Self {
        Self {
            version_pattern: Regex::new(r"@(version|appVersion|packageVersion)@").unwrap(),
            marker_pattern: Regex::new(r"<!--(VENDOR_CSS|VENDOR_JS|APP_CSS|APP_JS)-->").unwrap(),
            token_pattern: Regex::new(r"@[A-Za-z][A-Za-z0-9_]*@").unwrap(),
        }
    }

    /// Replace every version token in a single pass.
    pub fn replace_versions(&self, content: &str, tokens: &VersionTokens) -> String {
        self.version_pattern
            .replace_all(content, |caps: &regex::Captures| match &caps[1] {
                "version" => tokens.version.clone(),
                "appVersion" => tokens.app_version.clone(),
                _ => tokens.package_version.clone(),
            })
            .to_string()
    }

    /// Markers present in the template text.
    pub fn markers_present(&self, content: &str) -> BTreeSet<Marker> {
        self.marker_pattern
            .captures_iter(content)
            .filter_map(|caps| Marker::from_name(&caps[1]))
            .collect()
    }

    /// `@...@` tokens that no substitution handles.
    pub fn unknown_tokens(&self, content: &str) -> BTreeSet<String> {
        self.token_pattern
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .filter(|t| !self.version_pattern.is_match(t))
            .collect()
    }

    /// Replace every occurrence of a marker with a tag block.
    ///
    /// An empty block strips the marker.
    pub fn fill_marker(&self, content: &str, marker: Marker, block: &str) -> String {
        content.replace(marker.comment(), block)
    }
}
