//! Dependency Guardian - Automated npm dependency updates
//!
//! This crate watches one repository, upgrades its outdated npm packages on
//! a schedule, and proposes each batch of upgrades as a pull request.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
