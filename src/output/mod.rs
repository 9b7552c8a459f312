//! Output module for crawl reports
//!
//! This module handles:
//! - Collecting what a single crawl call did into a [`CrawlReport`]
//! - Printing reports for the command line

mod report;
pub mod stats;

pub use report::{BranchFailure, CrawlReport};
pub(crate) use report::ReportBuilder;
pub use stats::print_report;
