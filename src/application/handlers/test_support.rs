//! Recording fakes for the handler unit tests.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::dependency::MANIFEST_FILE_NAME;
use crate::ports::{
    CodeReviewError, CodeReviewHost, PackageManager, PackageManagerError, PullRequestRequest,
    SourceControl, SourceControlError, StatusEntry,
};

// ─────────────────────────────────────────────────────────────────────
// Source control
// ─────────────────────────────────────────────────────────────────────

/// Clones by writing a manifest into the destination; records every call.
pub struct FakeSourceControl {
    pub calls: Mutex<Vec<String>>,
    pub remotes: Mutex<Vec<String>>,
    pub manifest: String,
    pub branch: String,
    pub fail_clone: bool,
    pub fail_push: bool,
    pub clean_status: bool,
}

impl FakeSourceControl {
    pub fn new(manifest: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            remotes: Mutex::new(Vec::new()),
            manifest: manifest.to_string(),
            branch: "main".to_string(),
            fail_clone: false,
            fail_push: false,
            clean_status: false,
        }
    }

    pub fn failing_clone() -> Self {
        Self {
            fail_clone: true,
            ..Self::new("{}")
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SourceControl for FakeSourceControl {
    async fn clone_repository(
        &self,
        remote: &Secret<String>,
        destination: &Path,
    ) -> Result<(), SourceControlError> {
        self.log(format!("clone {}", destination.display()));
        self.remotes
            .lock()
            .unwrap()
            .push(remote.expose_secret().clone());
        tokio::fs::create_dir_all(destination).await.unwrap();
        if self.fail_clone {
            // A partial clone leaves something behind.
            tokio::fs::write(destination.join(".partial"), "x").await.unwrap();
            return Err(SourceControlError::command_failed(
                "git clone",
                Some(128),
                "Authentication failed",
            ));
        }
        tokio::fs::write(destination.join(MANIFEST_FILE_NAME), &self.manifest)
            .await
            .unwrap();
        Ok(())
    }

    async fn current_branch(&self, _repo: &Path) -> Result<String, SourceControlError> {
        self.log("current_branch".to_string());
        Ok(self.branch.clone())
    }

    async fn status(&self, _repo: &Path) -> Result<Vec<StatusEntry>, SourceControlError> {
        self.log("status".to_string());
        if self.clean_status {
            return Ok(vec![]);
        }
        Ok(vec![StatusEntry {
            index: 'M',
            worktree: ' ',
            path: MANIFEST_FILE_NAME.to_string(),
        }])
    }

    async fn create_branch(&self, _repo: &Path, branch: &str) -> Result<(), SourceControlError> {
        self.log(format!("create_branch {branch}"));
        Ok(())
    }

    async fn stage(&self, _repo: &Path, paths: &[&str]) -> Result<(), SourceControlError> {
        self.log(format!("stage {}", paths.join(" ")));
        Ok(())
    }

    async fn configure_identity(
        &self,
        _repo: &Path,
        name: &str,
        email: &str,
    ) -> Result<(), SourceControlError> {
        self.log(format!("identity {name} <{email}>"));
        Ok(())
    }

    async fn commit(&self, _repo: &Path, message: &str) -> Result<(), SourceControlError> {
        self.log(format!("commit {}", message.lines().next().unwrap_or("")));
        Ok(())
    }

    async fn push(
        &self,
        _repo: &Path,
        remote: &Secret<String>,
        branch: &str,
    ) -> Result<(), SourceControlError> {
        self.log(format!("push {branch}"));
        self.remotes
            .lock()
            .unwrap()
            .push(remote.expose_secret().clone());
        if self.fail_push {
            return Err(SourceControlError::command_failed(
                "git push",
                Some(1),
                "rejected: reference already exists",
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Package manager
// ─────────────────────────────────────────────────────────────────────

/// Rewrites the manifest the way an upgrade would.
pub struct FakePackageManager {
    pub calls: Mutex<Vec<String>>,
    /// Raw outdated report to return.
    pub report: String,
    /// package -> version written on `install_latest`.
    pub latest: HashMap<String, String>,
    /// Packages whose upgrade fails (after mutating the manifest).
    pub failing: Vec<String>,
    /// Extra rewrites applied by the reconciling install.
    pub reconcile: HashMap<String, String>,
    pub fail_install: bool,
    pub fail_verify: bool,
    pub fail_report: bool,
    pub installs: Mutex<u32>,
}

impl FakePackageManager {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            report: "{}".to_string(),
            latest: HashMap::new(),
            failing: Vec::new(),
            reconcile: HashMap::new(),
            fail_install: false,
            fail_verify: false,
            fail_report: false,
            installs: Mutex::new(0),
        }
    }

    pub fn with_report(mut self, report: &str) -> Self {
        self.report = report.to_string();
        self
    }

    pub fn with_latest(mut self, package: &str, version: &str) -> Self {
        self.latest.insert(package.to_string(), version.to_string());
        self
    }

    pub fn failing_on(mut self, package: &str) -> Self {
        self.failing.push(package.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Sets `dependencies[package] = version` in the manifest under `project`.
pub async fn rewrite_dependency(project: &Path, package: &str, version: &str) {
    let path: PathBuf = project.join(MANIFEST_FILE_NAME);
    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json["dependencies"][package] = serde_json::Value::String(version.to_string());
    tokio::fs::write(&path, serde_json::to_string_pretty(&json).unwrap())
        .await
        .unwrap();
}

#[async_trait]
impl PackageManager for FakePackageManager {
    async fn install(&self, project: &Path) -> Result<(), PackageManagerError> {
        self.log("install".to_string());
        *self.installs.lock().unwrap() += 1;
        if self.fail_install {
            return Err(PackageManagerError::command_failed(
                "npm install",
                Some(1),
                "ERESOLVE",
            ));
        }
        for (package, version) in &self.reconcile {
            rewrite_dependency(project, package, version).await;
        }
        Ok(())
    }

    async fn outdated_report(&self, _project: &Path) -> Result<String, PackageManagerError> {
        self.log("outdated".to_string());
        if self.fail_report {
            return Err(PackageManagerError::command_failed(
                "npm outdated --json",
                Some(254),
                "ENOENT",
            ));
        }
        Ok(self.report.clone())
    }

    async fn install_latest(
        &self,
        project: &Path,
        package: &str,
    ) -> Result<(), PackageManagerError> {
        self.log(format!("install_latest {package}"));
        if let Some(version) = self.latest.get(package) {
            rewrite_dependency(project, package, version).await;
        }
        if self.failing.iter().any(|p| p == package) {
            return Err(PackageManagerError::command_failed(
                format!("npm install {package}@latest"),
                Some(1),
                "ETARGET",
            ));
        }
        Ok(())
    }

    async fn verify(&self, _project: &Path) -> Result<(), PackageManagerError> {
        self.log("verify".to_string());
        if self.fail_verify {
            return Err(PackageManagerError::VerificationFailed(
                "invalid: lodash".to_string(),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Code review host
// ─────────────────────────────────────────────────────────────────────

pub struct FakeReviewHost {
    pub requests: Mutex<Vec<PullRequestRequest>>,
    pub error: Option<CodeReviewError>,
}

impl FakeReviewHost {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            error: None,
        }
    }

    pub fn failing(error: CodeReviewError) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            error: Some(error),
        }
    }

    pub fn requests(&self) -> Vec<PullRequestRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeReviewHost for FakeReviewHost {
    async fn open_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<String, CodeReviewError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(format!(
                "https://github.com/{}/{}/pull/{}",
                request.owner,
                request.repo,
                self.requests.lock().unwrap().len()
            )),
        }
    }
}

pub const LODASH_MANIFEST: &str = r#"{
  "name": "widgets",
  "version": "1.0.0",
  "dependencies": {
    "axios": "0.21.0",
    "lodash": "4.17.20"
  }
}"#;
