//! Scheduler - Repeats cycles at a fixed interval until shutdown.
//!
//! Cycles never overlap: the next sleep starts only after the previous cycle
//! has cleaned up. Shutdown is observed between cycles and interrupts the
//! sleep, never a running cycle.

use std::time::Duration;
use tokio::sync::watch;

use super::CycleOrchestrator;
use crate::domain::cycle::CycleReport;

pub struct Scheduler {
    orchestrator: CycleOrchestrator,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
    reports: watch::Sender<Option<CycleReport>>,
}

impl Scheduler {
    pub fn new(
        orchestrator: CycleOrchestrator,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let (reports, _) = watch::channel(None);
        Self {
            orchestrator,
            interval,
            shutdown,
            reports,
        }
    }

    /// Latest finished cycle, `None` until the first one completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<CycleReport>> {
        self.reports.subscribe()
    }

    pub fn orchestrator(&self) -> &CycleOrchestrator {
        &self.orchestrator
    }

    /// Runs exactly one cycle and publishes its report.
    pub async fn run_once(&mut self) -> CycleReport {
        let report = self.orchestrator.run_cycle().await;

        let stats = self.orchestrator.stats();
        tracing::info!(
            cycles = stats.cycles,
            successful_upgrades = stats.successful_upgrades,
            recently_upgraded = stats.recently_upgraded_count,
            "Session memory"
        );

        self.reports.send_replace(Some(report.clone()));
        report
    }

    /// Loops until shutdown is requested. Returns the number of cycles run.
    pub async fn run(&mut self) -> u64 {
        let mut completed = 0;
        tracing::info!(interval_secs = self.interval.as_secs(), "Scheduler started");

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            let report = self.run_once().await;
            completed += 1;
            if report.outcome.is_failure() {
                tracing::warn!(cycle_number = report.cycle_number, "Cycle ended in failure, retrying next interval");
            }

            if *self.shutdown.borrow() {
                break;
            }

            tracing::info!(next_in_secs = self.interval.as_secs(), "Waiting for next cycle");
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = wait_for_shutdown(&mut self.shutdown) => break,
            }
        }

        tracing::info!(cycles = completed, "Scheduler stopped");
        completed
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            // Sender gone: nobody can ask for shutdown any more.
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMemoryStore;
    use crate::adapters::signals::ResetFlag;
    use crate::application::handlers::orchestration::CyclePorts;
    use crate::application::handlers::test_support::{
        FakePackageManager, FakeReviewHost, FakeSourceControl, LODASH_MANIFEST,
    };
    use crate::config::{AppConfig, GithubConfig, PathsConfig};
    use crate::domain::cycle::CycleOutcome;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn scheduler(temp: &TempDir, shutdown: watch::Receiver<bool>) -> Scheduler {
        let config = AppConfig {
            github: GithubConfig {
                repo_url: "https://github.com/acme/widgets".to_string(),
                token: "ghp_secret".to_string(),
                base_branch: None,
                api_base_url: "https://api.github.com".to_string(),
            },
            paths: PathsConfig {
                working_directory: temp.path().join("repos"),
                memory_file: temp.path().join("memory.json"),
            },
            ..AppConfig::default()
        };
        let orchestrator = CycleOrchestrator::new(
            config,
            CyclePorts {
                source_control: Arc::new(FakeSourceControl::new(LODASH_MANIFEST)),
                package_manager: Arc::new(FakePackageManager::new()),
                review_host: Arc::new(FakeReviewHost::new()),
                memory_store: Arc::new(InMemoryMemoryStore::new()),
                reset_signal: Arc::new(ResetFlag::new()),
            },
        );
        Scheduler::new(orchestrator, Duration::from_secs(3600), shutdown)
    }

    #[tokio::test]
    async fn run_once_publishes_report() {
        let temp = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let mut scheduler = scheduler(&temp, rx);
        let reports = scheduler.subscribe();
        assert!(reports.borrow().is_none());

        let report = scheduler.run_once().await;

        assert_eq!(report.outcome, CycleOutcome::NoAction);
        assert_eq!(reports.borrow().as_ref(), Some(&report));
    }

    #[tokio::test]
    async fn shutdown_before_start_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(true);
        let mut scheduler = scheduler(&temp, rx);

        assert_eq!(scheduler.run().await, 0);
        assert_eq!(scheduler.orchestrator().cycles_run(), 0);
    }

    #[tokio::test]
    async fn shutdown_interrupts_the_sleep() {
        let temp = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);
        let mut scheduler = scheduler(&temp, rx);
        let mut reports = scheduler.subscribe();

        let handle = tokio::spawn(async move { scheduler.run().await });
        reports.changed().await.unwrap();
        tx.send(true).unwrap();

        let completed = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
        assert_eq!(completed, 1);
    }
}
