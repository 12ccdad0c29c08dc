//! Extraction followed by aggregation.

use tracing::info;

use folio_core::{ContentFragment, FolioResult};

use crate::aggregator::Aggregator;
use crate::config::ExtractionConfig;
use crate::extractor::Extractor;
use crate::report::ExtractionReport;

/// One document in, one report out.
///
/// The pipeline holds only configuration and can be shared across requests.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ExtractionConfig,
}

impl Pipeline {
    /// Create a pipeline.
    #[must_use]
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// The pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run extraction and aggregation over a document's fragments.
    ///
    /// # Errors
    ///
    /// Returns the first field failure in strict mode, or a risk metrics
    /// conflict under the reject policy.
    pub fn run(&self, fragments: &[ContentFragment]) -> FolioResult<ExtractionReport> {
        let outcome = Extractor::new(self.config.mode).extract(fragments)?;
        let snapshot = Aggregator::new(&self.config).aggregate(&outcome.records)?;

        info!(
            fragments = fragments.len(),
            holdings = snapshot.holdings.len(),
            sectors = snapshot.sectors.len(),
            failures = outcome.failures.len(),
            ignored = outcome.ignored.len(),
            "Portfolio extracted"
        );

        Ok(ExtractionReport {
            snapshot,
            extraction_failures: outcome.failures,
            ignored_fragments: outcome.ignored,
        })
    }
}
