//! CycleOrchestrator - Runs one clone-to-cleanup cycle.
//!
//! Steps run strictly in sequence and each waits for its external operation
//! to finish. Any error ends the cycle in `Failed`; cleanup of the working
//! copy runs on every path. The only state carried between cycles is the
//! session memory and the cycle counter.
//!
//! Configuration is fixed for the life of the process. It is re-validated
//! before every cycle but never reloaded, and the adapters keep the token
//! they were built with. A reset, including one raised by saving the config
//! file, re-binds the new session to the repository this process is
//! actually cycling; an edited `repo_url` takes effect after a restart.

use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

use crate::application::handlers::inspection::{DependencyInspector, ScanError};
use crate::application::handlers::memory::{MemoryError, SessionMemoryStore};
use crate::application::handlers::publishing::{
    ChangePublisher, CommitIdentity, PublishCommand, PublishError,
};
use crate::application::handlers::repository::{CloneError, RepositoryController, WorkingCopy};
use crate::application::handlers::upgrade::{UpgradeError, UpgradeExecutor};
use crate::config::{AppConfig, ConfigError, ValidationError};
use crate::domain::cycle::{CycleOutcome, CyclePhase, CycleRecord, CycleReport, FailureKind};
use crate::domain::foundation::{CycleId, StateMachine, Timestamp};
use crate::domain::memory::{MemoryStats, SessionMemory};
use crate::ports::{CodeReviewHost, MemoryStore, PackageManager, ResetSignal, SourceControl};

/// Anything that ends a cycle early.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Upgrade(#[from] UpgradeError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

impl CycleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CycleError::Config(_) => FailureKind::Config,
            CycleError::Clone(_) => FailureKind::Clone,
            CycleError::Scan(_) => FailureKind::Scan,
            CycleError::Upgrade(_) => FailureKind::Upgrade,
            CycleError::Publish(_) => FailureKind::Publish,
            CycleError::Memory(_) => FailureKind::Memory,
        }
    }

    /// The error and all of its causes, outermost first.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

/// The external collaborators a cycle needs.
pub struct CyclePorts {
    pub source_control: Arc<dyn SourceControl>,
    pub package_manager: Arc<dyn PackageManager>,
    pub review_host: Arc<dyn CodeReviewHost>,
    pub memory_store: Arc<dyn MemoryStore>,
    pub reset_signal: Arc<dyn ResetSignal>,
}

/// Handler that sequences the other handlers into cycles.
pub struct CycleOrchestrator {
    config: AppConfig,
    repository: RepositoryController,
    inspector: DependencyInspector,
    executor: UpgradeExecutor,
    publisher: ChangePublisher,
    memory: SessionMemoryStore,
    reset_signal: Arc<dyn ResetSignal>,
    phase: CyclePhase,
    cycles_run: u64,
}

impl CycleOrchestrator {
    pub fn new(config: AppConfig, ports: CyclePorts) -> Self {
        let identity = CommitIdentity {
            name: config.agent.commit_author_name.clone(),
            email: config.agent.commit_author_email.clone(),
        };
        let publisher = ChangePublisher::new(ports.source_control.clone(), ports.review_host, identity)
            .with_base_branch(config.github.base_branch.clone());

        Self {
            repository: RepositoryController::new(ports.source_control),
            inspector: DependencyInspector::new(ports.package_manager.clone()),
            executor: UpgradeExecutor::new(ports.package_manager),
            publisher,
            memory: SessionMemoryStore::new(ports.memory_store),
            reset_signal: ports.reset_signal,
            phase: CyclePhase::Idle,
            cycles_run: 0,
            config,
        }
    }

    /// Starts an empty session bound to the configured repository.
    pub async fn start(&mut self) -> Result<(), MemoryError> {
        self.memory.start_session(&self.config.github.repo_url).await
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    pub fn memory(&self) -> &SessionMemory {
        self.memory.memory()
    }

    pub fn stats(&self) -> MemoryStats {
        self.memory.stats()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs one full cycle. Never fails; failures are part of the report.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycles_run += 1;
        let cycle_id = CycleId::new();
        let cycle_number = self.cycles_run;
        let started_at = Timestamp::now();

        let span = tracing::info_span!("cycle", cycle_id = %cycle_id, cycle_number);
        let outcome = self.execute().instrument(span).await;

        CycleReport {
            cycle_id,
            cycle_number,
            started_at,
            finished_at: Timestamp::now(),
            outcome,
        }
    }

    async fn execute(&mut self) -> CycleOutcome {
        self.phase = CyclePhase::Idle;
        tracing::info!("Cycle started");

        let mut working_copy = None;
        let outcome = match self.steps(&mut working_copy).await {
            Ok(Some(record)) => {
                tracing::info!(pr_url = %record.pr_url, branch = %record.branch, "Cycle published upgrades");
                CycleOutcome::Published { record }
            }
            Ok(None) => {
                tracing::info!("Cycle finished with nothing to upgrade");
                CycleOutcome::NoAction
            }
            Err(err) => {
                let phase = self.phase;
                let message = err.chain();
                tracing::error!(phase = %phase, error = %message, "Cycle failed");
                self.advance(CyclePhase::Failed);
                CycleOutcome::Failed {
                    phase,
                    kind: err.kind(),
                    message,
                }
            }
        };

        self.advance(CyclePhase::CleaningUp);
        if let Some(working_copy) = working_copy {
            if let Err(err) = self.repository.release(&working_copy).await {
                tracing::error!(error = %err, "Could not remove working copy");
            }
        }
        self.advance(CyclePhase::Idle);

        outcome
    }

    async fn steps(
        &mut self,
        working_copy: &mut Option<WorkingCopy>,
    ) -> Result<Option<CycleRecord>, CycleError> {
        // Reset triggers are honoured here and nowhere else. The session is
        // bound to the running config, not to whatever the file now says.
        if self.reset_signal.take_reset().await {
            tracing::info!("Reset requested, starting a new session");
            self.memory
                .start_session(&self.config.github.repo_url)
                .await?;
        }

        self.config.validate().map_err(ConfigError::from)?;
        let destination = self
            .config
            .working_copy_path()
            .ok_or(ConfigError::from(ValidationError::InvalidRepoUrl))?;
        let credential = self.config.github.token();

        self.advance(CyclePhase::Cloning);
        let acquired = self
            .repository
            .acquire(&self.config.github.repo_url, &credential, &destination)
            .await?;
        let working_copy: &WorkingCopy = working_copy.insert(acquired);

        self.advance(CyclePhase::Installing);
        if let Err(err) = self.inspector.prepare(working_copy).await {
            tracing::warn!(error = %err, "Install failed, continuing with the outdated check");
        }

        self.advance(CyclePhase::Scanning);
        let outdated = self.inspector.scan(working_copy).await?;
        if outdated.is_empty() {
            self.advance(CyclePhase::NoAction);
            return Ok(None);
        }

        self.advance(CyclePhase::Upgrading);
        let results = self.executor.upgrade(working_copy, &outdated).await?;

        self.advance(CyclePhase::Publishing);
        let published = self
            .publisher
            .publish(PublishCommand {
                working_copy,
                results: &results,
                repo_url: &self.config.github.repo_url,
                branch_prefix: &self.config.agent.branch_prefix,
                credential: &credential,
            })
            .await?;

        self.advance(CyclePhase::Recording);
        let record = CycleRecord::new(
            published.branch,
            results.iter().map(|r| r.package.clone()).collect(),
            published.pr_url,
            Timestamp::now(),
        );
        self.memory.record(record.clone()).await?;

        Ok(Some(record))
    }

    fn advance(&mut self, next: CyclePhase) {
        match self.phase.transition_to(next) {
            Ok(phase) => {
                tracing::debug!(from = %self.phase, to = %phase, "Phase transition");
                self.phase = phase;
            }
            Err(err) => {
                tracing::error!(error = %err, "Unexpected phase transition");
                self.phase = next;
            }
        }
    }
}
