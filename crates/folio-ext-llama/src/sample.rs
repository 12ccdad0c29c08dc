//! Offline parser returning a fixed statement.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use folio_core::ContentFragment;
use folio_traits::error::IngestionError;
use folio_traits::ingestion::{DocumentParser, ParserKind};

/// Parser that ignores the document's content and returns a canned
/// statement. Used when no LlamaParse credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleDocumentParser;

impl SampleDocumentParser {
    /// Creates the parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The fragments every call returns.
    #[must_use]
    pub fn fragments() -> Vec<ContentFragment> {
        vec![
            ContentFragment::new(
                "portfolio_summary",
                "Portfolio Summary\nTotal Value: $1,000,000\nRisk Score: 65",
            )
            .with_field("page", 1),
            ContentFragment::new(
                "sector_allocation",
                "Technology: 30% Finance: 25% Healthcare: 20% Consumer Goods: 15% Energy: 10%",
            )
            .with_field("page", 1),
            ContentFragment::new(
                "holding",
                "Symbol: AAPL Name: Apple Inc. Value: $300,000 Weight: 30.00% Beta: 1.20 Alpha: 2.10%",
            )
            .with_field("page", 2),
            ContentFragment::new(
                "holding",
                "Symbol: JPM Name: JPMorgan Chase & Co. Value: $250,000 Weight: 25.00% Beta: 1.10 Alpha: 0.80%",
            )
            .with_field("page", 2),
            ContentFragment::new(
                "holding",
                "Symbol: JNJ Name: Johnson & Johnson Value: $200,000 Weight: 20.00% Beta: 0.70 Alpha: 0.50%",
            )
            .with_field("page", 2),
            ContentFragment::new(
                "holding",
                "Symbol: PG Name: Procter & Gamble Value: $150,000 Weight: 15.00% Beta: 0.60 Alpha: 0.30%",
            )
            .with_field("page", 2),
            ContentFragment::new(
                "holding",
                "Symbol: XOM Name: Exxon Mobil Value: $100,000 Weight: 10.00% Beta: 0.90 Alpha: -0.40%",
            )
            .with_field("page", 2),
            ContentFragment::new(
                "risk_metrics",
                "Alpha: 2.50% Beta: 1.10 Sharpe Ratio: 1.20 Treynor Ratio: 0.08 \
                 Information Ratio: 0.45 VaR (95%): 2.10% Max Drawdown: -15.00%",
            )
            .with_field("page", 3),
            ContentFragment::new(
                "historical_performance",
                "2020-01: $800,000\n2020-07: $850,000\n2021-01: $920,000\n\
                 2021-07: $980,000\n2022-01: $1,000,000",
            )
            .with_field("page", 3),
        ]
    }
}

#[async_trait]
impl DocumentParser for SampleDocumentParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Sample
    }

    fn name(&self) -> &str {
        "sample"
    }

    async fn parse(&self, document: Bytes) -> Result<Vec<ContentFragment>, IngestionError> {
        if document.is_empty() {
            return Err(IngestionError::EmptyDocument);
        }
        debug!("Sample parser ignoring {} bytes", document.len());
        Ok(Self::fragments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::FragmentKind;

    #[tokio::test]
    async fn test_sample_fragments() {
        let parser = SampleDocumentParser::new();
        let fragments = parser.parse(Bytes::from_static(b"%PDF-1.7")).await.unwrap();

        assert_eq!(parser.kind(), ParserKind::Sample);
        assert_eq!(fragments.len(), 9);
        assert_eq!(fragments[0].kind(), FragmentKind::PortfolioSummary);
        assert!(fragments.iter().all(|f| f.kind().is_recognized()));
    }

    #[tokio::test]
    async fn test_sample_rejects_empty() {
        let err = SampleDocumentParser::new()
            .parse(Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::EmptyDocument));
    }
}
