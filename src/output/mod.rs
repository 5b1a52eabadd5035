//! Output module for discovery artifacts
//!
//! This module handles:
//! - Writing the line-delimited URL list for downstream crawling
//! - Generating the markdown topology summary
//! - Computing and printing discovery statistics

mod markdown;
pub mod stats;
mod traits;
mod url_list;

pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownOutput};
pub use stats::{print_statistics, DiscoveryStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
pub use url_list::{format_url_list, write_url_list, UrlListOutput};

use crate::discovery::DiscoveryResult;

/// Runs every handler against `result`, stopping at the first failure
pub fn write_all(handlers: &[&dyn OutputHandler], result: &DiscoveryResult) -> OutputResult<()> {
    for handler in handlers {
        handler.write(result)?;
        tracing::debug!(output = handler.name(), "Wrote output");
    }
    Ok(())
}
