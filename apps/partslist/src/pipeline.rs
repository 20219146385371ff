//! # Render Pipeline
//!
//! Load, build, present. One pass, one region write.
//!
//! ```text
//! ┌──────────────┐    ┌───────────────┐    ┌──────────────────┐    ┌────────┐
//! │  DataLoader  │───►│  build_table  │───►│ PresentationSink │───►│ region │
//! │  (async)     │    │  (pure)       │    │ render + replace │    │        │
//! └──────┬───────┘    └───────────────┘    └──────────────────┘    └────────┘
//!        │ DataUnavailable          │ Render (overflow)
//!        ▼                          ▼
//!   error! once, region untouched, Err returned
//! ```

use partslist_core::{build_table, TableView, TaxRate};
use tracing::{debug, error, info};

use crate::error::PipelineResult;
use crate::loader::{DataLoader, Fetch};
use crate::sink::{DisplayRegion, PresentationSink};

/// Loads the line items, builds the table and writes it into `region`.
///
/// Returns the table that was presented.
///
/// ## Errors
/// - `DataUnavailable`: reported with a single `error!` event; `region` is
///   not modified
/// - `Render`: an amount overflowed while building the table; reported like
///   `DataUnavailable` and `region` is not modified
/// - `Sink`: the table could not be placed
pub async fn render_into<F, R>(
    loader: &DataLoader<F>,
    rate: TaxRate,
    sink: &PresentationSink,
    region: &mut R,
) -> PipelineResult<TableView>
where
    F: Fetch,
    R: DisplayRegion + ?Sized,
{
    let items = match loader.load().await {
        Ok(items) => items,
        Err(err) => {
            error!(location = %loader.location(), error = %err, "Failed to load line items");
            return Err(err);
        }
    };

    let table = match build_table(&items, rate) {
        Ok(table) => table,
        Err(err) => {
            error!(location = %loader.location(), error = %err, "Failed to build parts table");
            return Err(err.into());
        }
    };
    let totals = &table.footer.totals;
    debug!(
        rows = table.row_count(),
        rate = %rate,
        subtotal = %totals.subtotal,
        tax = %totals.total_tax,
        grand_total = %totals.grand_total,
        "Table built"
    );

    sink.present(&table, region)?;

    info!(
        rows = table.row_count(),
        grand_total = %totals.grand_total,
        "Parts table rendered"
    );
    Ok(table)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, PipelineError};
    use crate::sink::MemoryRegion;
    use partslist_core::{CoreError, HtmlRenderer, Money, TextRenderer, DEFAULT_TAX_RATE};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    struct FixedFetcher(Result<String, String>);

    impl Fetch for FixedFetcher {
        async fn fetch(&self, _location: &str) -> Result<String, FetchError> {
            self.0.clone().map_err(FetchError::Unavailable)
        }
    }

    fn ok_loader(body: &str) -> DataLoader<FixedFetcher> {
        DataLoader::new(FixedFetcher(Ok(body.to_string())), "data.json")
    }

    #[tokio::test]
    async fn test_render_into_region() {
        let loader = ok_loader(
            r#"[{"qty": 2, "item": "A", "title": "T", "sku": "S", "model": "M", "note": "",
                 "price": 10.00, "buy_url": "https://example.com", "store_name": "Shop"}]"#,
        );
        let sink = PresentationSink::new(HtmlRenderer);
        let mut region = MemoryRegion::new();

        let table = render_into(&loader, DEFAULT_TAX_RATE, &sink, &mut region)
            .await
            .unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.footer.totals.grand_total, Money::from_cents(2165));
        assert!(region.content().contains("$21.65"));
    }

    #[tokio::test]
    async fn test_sub_cent_price_is_taxed_at_full_precision() {
        let loader = ok_loader(
            r#"[{"qty": 3, "item": "R", "title": "Resistor", "sku": "S", "model": "M",
                 "price": "0.333", "buy_url": "https://example.com", "store_name": "Shop"}]"#,
        );
        let sink = PresentationSink::new(TextRenderer);
        let mut region = MemoryRegion::new();

        let table = render_into(&loader, DEFAULT_TAX_RATE, &sink, &mut region)
            .await
            .unwrap();

        let totals = &table.footer.totals;
        assert_eq!(totals.subtotal.to_string(), "$1.00");
        assert_eq!(totals.total_tax.to_string(), "$0.08");
        assert_eq!(totals.grand_total.to_string(), "$1.08");
        assert!(region.content().contains("$0.33"));
        assert!(region.content().contains("$1.08"));
    }

    #[tokio::test]
    async fn test_overflow_reports_once_and_leaves_region() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let loader = ok_loader(
            r#"[{"qty": 10, "price": "79228162514264337593543950335"}]"#,
        );
        let sink = PresentationSink::new(HtmlRenderer);
        let mut region = MemoryRegion::with_content("Loading...");

        let result = render_into(&loader, DEFAULT_TAX_RATE, &sink, &mut region).await;

        assert!(matches!(
            result,
            Err(PipelineError::Render(CoreError::Overflow(_)))
        ));
        assert_eq!(region.content(), "Loading...");
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_list_renders_header_and_zero_footer() {
        let sink = PresentationSink::new(HtmlRenderer);
        let mut region = MemoryRegion::new();

        let table = render_into(&ok_loader("[]"), DEFAULT_TAX_RATE, &sink, &mut region)
            .await
            .unwrap();

        assert!(table.is_empty());
        assert!(table.footer.totals.is_zero());
        assert!(region.content().contains("<thead>"));
        assert_eq!(region.content().matches("$0.00").count(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_once_and_leaves_region() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let loader = DataLoader::new(
            FixedFetcher(Err("connection refused".to_string())),
            "https://example.com/data.json",
        );
        let sink = PresentationSink::new(HtmlRenderer);
        let mut region = MemoryRegion::with_content("Loading...");

        let result = render_into(&loader, DEFAULT_TAX_RATE, &sink, &mut region).await;

        assert!(matches!(result, Err(PipelineError::DataUnavailable { .. })));
        assert_eq!(region.content(), "Loading...");
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_reports_no_errors() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let sink = PresentationSink::new(HtmlRenderer);
        let mut region = MemoryRegion::new();
        render_into(&ok_loader("[]"), DEFAULT_TAX_RATE, &sink, &mut region)
            .await
            .unwrap();

        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }
}
