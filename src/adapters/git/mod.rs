//! Git adapter - `SourceControl` over the git command line.

mod git_cli;

pub use git_cli::GitCli;
