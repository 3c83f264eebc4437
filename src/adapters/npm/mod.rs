//! npm adapter - `PackageManager` over the npm command line.

mod npm_cli;

pub use npm_cli::NpmCli;
