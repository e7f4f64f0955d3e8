//! Core merge-and-fan-out pipeline for rulemerge.
//!
//! This crate ties together source scanning, merging, target resolution,
//! output planning and conflict-safe writing into a single run
//! ([`pipeline::run`]). Reporting and confirmation are injected through the
//! [`report::Reporter`] and [`confirm::Confirm`] traits.

pub mod confirm;
pub mod merge;
pub mod pipeline;
pub mod planner;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod writer;
