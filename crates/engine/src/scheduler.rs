//! Run orchestration: one worker thread per active module, joined at the
//! run boundary, with the global interface released after the last join on
//! every path.

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::core::module::ModuleDescriptor;
use crate::core::result::{ModuleResult, ModuleStatus};
use crate::error::EngineError;
use crate::graph;
use crate::interface::GlobalModuleInterface;
use crate::report::RunReport;
use crate::runner;
use crate::table::ResultTable;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The engine entry point collaborators call: feed a file list and a module
/// set, receive a per-module result map or a structured fatal failure.
pub struct ScanEngine {
    config: EngineConfig,
}

impl ScanEngine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the active module set over `files`. Completes with a result for
    /// every scheduled module (possibly skipped) or fails fatally at graph
    /// build or global-resource handling.
    pub fn run(&self, files: Vec<String>, modules: Vec<ModuleDescriptor>) -> Result<RunReport, EngineError> {
        self.run_with_cancel(files, modules, CancelToken::new())
    }

    /// Same as [`Self::run`], with an externally controlled cancellation
    /// token. On cancellation in-flight workers abandon remaining files,
    /// publish partial results and the run proceeds to teardown.
    pub fn run_with_cancel(
        &self,
        files: Vec<String>,
        mut modules: Vec<ModuleDescriptor>,
        cancel: CancelToken,
    ) -> Result<RunReport, EngineError> {
        let started = Utc::now();
        for descriptor in &mut modules {
            self.config.apply(descriptor);
        }
        modules.retain(|m| m.enabled);

        // Cycles abort before any worker is scheduled.
        let plan = graph::build(modules)?;
        info!(
            modules = plan.modules.len(),
            files = files.len(),
            "starting run"
        );

        let iface = Arc::new(GlobalModuleInterface::acquire()?);
        let table = Arc::new(ResultTable::new(plan.scheduled_names().map(str::to_string)));
        let files = Arc::new(files);
        let deadline = Instant::now() + self.config.timeout();
        let wait_slice = self.config.wait_slice();

        let mut handles = Vec::with_capacity(plan.modules.len());
        for descriptor in plan.modules {
            let descriptor = Arc::new(descriptor);
            let worker_descriptor = descriptor.clone();
            let worker_files = files.clone();
            let worker_table = table.clone();
            let worker_iface = iface.clone();
            let worker_cancel = cancel.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("module-{}", descriptor.name))
                .spawn(move || {
                    runner::run_module(
                        &worker_descriptor,
                        &worker_files,
                        &worker_table,
                        &worker_iface,
                        &worker_cancel,
                        deadline,
                        wait_slice,
                    );
                });
            match spawned {
                Ok(handle) => handles.push((descriptor, handle)),
                Err(e) => {
                    // Spawn failure must not leave the slot empty forever:
                    // dependents would otherwise wait out the full timeout.
                    error!(module = %descriptor.name, error = %e, "failed to spawn worker");
                    table.publish(
                        &descriptor.name,
                        ModuleResult::new(Vec::new(), descriptor.metadata())
                            .with_status(ModuleStatus::Failed),
                    );
                }
            }
        }

        // Every worker reaches a terminal state: dependency waits are
        // deadline-bounded, so joins cannot hang.
        for (descriptor, handle) in handles {
            if handle.join().is_err() {
                error!(module = %descriptor.name, "worker panicked");
                table.publish(
                    &descriptor.name,
                    ModuleResult::new(Vec::new(), descriptor.metadata())
                        .with_status(ModuleStatus::Failed),
                );
            } else {
                debug!(module = %descriptor.name, "worker joined");
            }
        }

        // Release happens-after every worker's termination, and its failure
        // is surfaced, not swallowed.
        iface.release()?;

        let report = RunReport::new(
            Arc::try_unwrap(files).unwrap_or_else(|shared| (*shared).clone()),
            table.snapshot(),
            started,
        );
        info!("run finished");
        Ok(report)
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new()
    }
}
