//! Mock git runner for testing
//!
//! Simulates just enough of git for the conflict resolver: `clone` creates
//! the target directory, `merge` writes the configured conflicted files and
//! fails, `diff --diff-filter=U` lists them, `add` snapshots the staged file.
//! Everything else succeeds unless a failure is injected for its subcommand.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_triage::conflict::{GitOutput, GitRunner};
use pr_triage::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Call record for one git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCall {
    pub dir: PathBuf,
    pub args: Vec<String>,
}

impl GitCall {
    pub fn subcommand(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }
}

#[derive(Default)]
pub struct MockGitRunner {
    conflicted_files: Mutex<Vec<(String, Vec<u8>)>>,
    calls: Mutex<Vec<GitCall>>,
    failing_subcommands: Mutex<Vec<String>>,
    staged: Mutex<Vec<(String, String)>>,
}

impl MockGitRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `merge` fail and leave this file behind as conflicted
    pub fn add_conflicted_file(&self, path: &str, content: impl Into<Vec<u8>>) {
        self.conflicted_files
            .lock()
            .unwrap()
            .push((path.to_string(), content.into()));
    }

    /// Make every call of `subcommand` exit non-zero
    pub fn fail_subcommand(&self, subcommand: &str) {
        self.failing_subcommands
            .lock()
            .unwrap()
            .push(subcommand.to_string());
    }

    pub fn get_calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Path and content of every file passed to `git add`
    pub fn get_staged(&self) -> Vec<(String, String)> {
        self.staged.lock().unwrap().clone()
    }

    pub fn calls_to(&self, subcommand: &str) -> Vec<GitCall> {
        self.get_calls()
            .into_iter()
            .filter(|c| c.subcommand() == subcommand)
            .collect()
    }

    pub fn count(&self, subcommand: &str) -> usize {
        self.calls_to(subcommand).len()
    }

    /// Directory the clone was made in
    pub fn workspace(&self) -> Option<PathBuf> {
        self.calls_to("clone").first().map(|c| c.dir.clone())
    }

    /// Directory the repository was cloned into
    pub fn repo_dir(&self) -> Option<PathBuf> {
        self.calls_to("clone")
            .first()
            .and_then(|c| c.args.last().map(|target| c.dir.join(target)))
    }

    fn ok(stdout: impl Into<String>) -> GitOutput {
        GitOutput {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    fn failed(stderr: &str) -> GitOutput {
        GitOutput {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

#[async_trait]
impl GitRunner for MockGitRunner {
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        let call = GitCall {
            dir: dir.to_path_buf(),
            args: args.iter().map(ToString::to_string).collect(),
        };
        self.calls.lock().unwrap().push(call.clone());

        if self
            .failing_subcommands
            .lock()
            .unwrap()
            .iter()
            .any(|s| s == call.subcommand())
        {
            return Ok(Self::failed("fatal: injected failure"));
        }

        let conflicted = self.conflicted_files.lock().unwrap().clone();
        match call.subcommand() {
            "clone" => {
                if let Some(target) = args.last() {
                    std::fs::create_dir_all(dir.join(target))?;
                }
                Ok(Self::ok(""))
            }
            "merge" if !conflicted.is_empty() => {
                for (path, content) in &conflicted {
                    let file = dir.join(path);
                    if let Some(parent) = file.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(file, content)?;
                }
                Ok(Self::failed("CONFLICT (content): Merge conflict"))
            }
            "add" => {
                if let Some(path) = args.last() {
                    let content = std::fs::read_to_string(dir.join(path))?;
                    self.staged
                        .lock()
                        .unwrap()
                        .push(((*path).to_string(), content));
                }
                Ok(Self::ok(""))
            }
            "diff" => {
                let names: Vec<&str> = conflicted.iter().map(|(p, _)| p.as_str()).collect();
                Ok(Self::ok(names.join("\n")))
            }
            _ => Ok(Self::ok("")),
        }
    }
}
