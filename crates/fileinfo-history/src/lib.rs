//! Per-file size, recency and churn metrics mined from git history.
//!
//! Every metric is computed from scratch against a checked-out working tree
//! with full history, by driving the `git` and `wc` command line tools and
//! parsing their bulk output:
//!
//! - [`inventory`] lists the files present in the working tree;
//! - [`classify`] separates text from binary files;
//! - [`loc`] counts lines of the text files;
//! - [`last_commit`] finds each file's newest commit date;
//! - [`window`] picks the commit range churn is measured over;
//! - [`churn`] totals additions and deletions within that range;
//! - [`metrics`] joins everything into one record per file.

pub mod churn;
pub mod classify;
pub mod command;
pub mod inventory;
pub mod last_commit;
pub mod loc;
pub mod metrics;
pub mod repo;
pub mod window;
