//! Index generation across all configured templates.
//!
//! Each template moves through `Pending → DebugBuilt → (CompiledBuilt |
//! SkippedCompiled)`, or ends as `Skipped` or `Failed`. Templates are built
//! as independent tasks in declaration order. The first non-skipped `index`
//! template generates the shared debug loader before its task is spawned;
//! if that fails the whole run is aborted.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::compiled::CompiledIndexBuilder;
use crate::config::{BuildOptions, TemplateDescriptor};
use crate::debug::DebugIndexBuilder;
use crate::error::{IndexError, IndexResult};
use crate::loader::{EntryPointLoaderGenerator, LoaderGenerator};

/// Which indexes a run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Debug and compiled indexes
    #[default]
    Full,
    /// Debug indexes only
    DebugOnly,
}

/// Progress of a single template through the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum TemplateState {
    Pending,
    DebugBuilt,
    CompiledBuilt,
    SkippedCompiled,
    Skipped,
    Failed(String),
}

impl TemplateState {
    pub fn is_failed(&self) -> bool {
        matches!(self, TemplateState::Failed(_))
    }
}

/// Final state of one template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateOutcome {
    pub id: String,
    pub state: TemplateState,
    /// Files written, debug index first
    pub outputs: Vec<PathBuf>,
}

impl TemplateOutcome {
    fn pending(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state: TemplateState::Pending,
            outputs: Vec::new(),
        }
    }
}

/// Result of a run, one outcome per configured template in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<TemplateOutcome>,
    pub loader_generated: bool,
}

impl RunReport {
    pub fn failures(&self) -> Vec<&TemplateOutcome> {
        self.outcomes.iter().filter(|o| o.state.is_failed()).collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TemplateOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }
}

/// Builds every configured template.
pub struct IndexOrchestrator {
    options: Arc<BuildOptions>,
    generator: Arc<dyn LoaderGenerator>,
    mode: BuildMode,
    debug: Arc<DebugIndexBuilder>,
    compiled: Arc<CompiledIndexBuilder>,
}

impl IndexOrchestrator {
    /// Create an orchestrator using the entry point loader generator.
    pub fn new(options: BuildOptions) -> Self {
        let options = Arc::new(options);
        Self {
            debug: Arc::new(DebugIndexBuilder::new(options.clone())),
            compiled: Arc::new(CompiledIndexBuilder::new(options.clone())),
            options,
            generator: Arc::new(EntryPointLoaderGenerator::new()),
            mode: BuildMode::default(),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn LoaderGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build all templates.
    ///
    /// Per-template failures are recorded in the report. Loader generation
    /// failures and fatal errors abort the run and are returned.
    pub async fn run(&self) -> IndexResult<RunReport> {
        let templates = &self.options.templates;
        if templates.is_empty() {
            info!("No templates configured");
        }

        let mut outcomes: Vec<TemplateOutcome> = templates
            .iter()
            .map(|t| TemplateOutcome::pending(&t.id))
            .collect();
        let mut loader_generated = false;
        let mut tasks = JoinSet::new();

        for (position, descriptor) in templates.iter().enumerate() {
            if descriptor.skip {
                debug!("Skipping template {}", descriptor.id);
                outcomes[position].state = TemplateState::Skipped;
                continue;
            }

            if descriptor.is_reserved() && !loader_generated {
                loader_generated = true;
                self.generate_loader(descriptor).await?;
            }

            let task = TemplateTask {
                descriptor: descriptor.clone(),
                debug: self.debug.clone(),
                compiled: self.compiled.clone(),
                mode: self.mode,
            };
            tasks.spawn(async move { (position, task.run().await) });
        }

        while let Some(joined) = tasks.join_next().await {
            let (position, result) = joined.map_err(|e| IndexError::Task(e.to_string()))?;
            match result {
                Ok(outcome) => outcomes[position] = outcome,
                Err(e) if e.is_fatal() => {
                    error!("Aborting index generation: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Template {} failed: {}", outcomes[position].id, e);
                    outcomes[position].state = TemplateState::Failed(e.to_string());
                }
            }
        }

        let report = RunReport {
            outcomes,
            loader_generated,
        };
        info!(
            "Index generation finished: {} template(s), {} failed",
            report.outcomes.len(),
            report.failures().len()
        );
        Ok(report)
    }

    async fn generate_loader(&self, descriptor: &TemplateDescriptor) -> IndexResult<()> {
        let bootstrap = &self.options.bootstrap;
        info!("Generating debug loader for template {}", descriptor.id);

        self.generator
            .generate(&bootstrap.loader_manifest, &bootstrap.loader_js)
            .await
            .map_err(|e| {
                error!("Debug loader generation failed: {:#}", e);
                IndexError::LoaderGeneration(
                    e.context(format!("generating loader for template {}", descriptor.id)),
                )
            })
    }
}

/// Debug then compiled build of one template.
struct TemplateTask {
    descriptor: TemplateDescriptor,
    debug: Arc<DebugIndexBuilder>,
    compiled: Arc<CompiledIndexBuilder>,
    mode: BuildMode,
}

impl TemplateTask {
    async fn run(self) -> IndexResult<TemplateOutcome> {
        let mut outcome = TemplateOutcome::pending(&self.descriptor.id);

        outcome.outputs.push(self.debug.build(&self.descriptor).await?);
        outcome.state = TemplateState::DebugBuilt;

        match self.mode {
            BuildMode::Full => {
                outcome
                    .outputs
                    .push(self.compiled.build(&self.descriptor).await?);
                outcome.state = TemplateState::CompiledBuilt;
            }
            BuildMode::DebugOnly => outcome.state = TemplateState::SkippedCompiled,
        }

        Ok(outcome)
    }
}
