//! # htmlindex_core
//!
//! Generation of HTML entry points for the debug and compiled builds of a
//! web application.
//!
//! Index templates carry version tokens (`@version@`, `@appVersion@`,
//! `@packageVersion@`) and marker comments where resource tags are inserted:
//!
//! - `<!--VENDOR_CSS-->` / `<!--VENDOR_JS-->`: tags for each path listed in
//!   the vendor manifests under `<appPath>/.build`
//! - `<!--APP_CSS-->` / `<!--APP_JS-->`: the application stylesheet and
//!   scripts, either the debug bootstrap sequence or the compiled artifacts
//!
//! ## Example
//!
//! ```rust,no_run
//! use htmlindex_core::{BuildOptions, IndexOrchestrator, TemplateDescriptor};
//!
//! # async fn run() -> htmlindex_core::IndexResult<()> {
//! let options = BuildOptions::new("web")
//!     .template(TemplateDescriptor::new("index"))
//!     .app_version("2.1.0")
//!     .compiled_css("styles/app.min.css")
//!     .compiled_js("app.min.js");
//!
//! let report = IndexOrchestrator::new(options).run().await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod compiled;
pub mod config;
pub mod debug;
pub mod error;
pub mod inspect;
pub mod loader;
pub mod manifest;
pub mod orchestrator;
pub mod tags;
pub mod template;

pub use compiled::CompiledIndexBuilder;
pub use config::{
    BootstrapPaths, BuildFlavor, BuildOptions, IndexConfig, ResourceKind, TemplateDescriptor,
    RESERVED_INDEX_ID,
};
pub use debug::DebugIndexBuilder;
pub use error::{IndexError, IndexResult};
pub use inspect::{inspect_templates, TemplateInspection};
pub use loader::{EntryPointLoaderGenerator, LoaderGenerator};
pub use orchestrator::{BuildMode, IndexOrchestrator, RunReport, TemplateOutcome, TemplateState};
pub use tags::{Marker, TagFiller, VersionTokens};
