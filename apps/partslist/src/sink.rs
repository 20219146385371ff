//! # Presentation Sink
//!
//! Puts rendered table markup into a display region.
//!
//! ## Replacement Model
//! ```text
//! <html>
//!   <body>
//!     <table id="computerPartsTable">   ◄── region located by id
//!       ┌──────────────────────────┐
//!       │ previous inner content   │    ◄── replaced wholesale, once
//!       └──────────────────────────┘
//!     </table>                         ◄── matching close tag (nesting aware)
//!   </body>
//! </html>
//! ```
//!
//! The table is rendered to a string before the region is touched, so a
//! render failure leaves the region exactly as it was.
//!
//! Comments and `<script>` / `<style>` bodies are not markup: an id or a
//! close tag inside them is never matched.

use std::ops::Range;

use partslist_core::{TableRenderer, TableView};
use tracing::debug;

use crate::error::SinkError;

// =============================================================================
// Display Region
// =============================================================================

/// A container whose whole content can be replaced.
pub trait DisplayRegion {
    /// Replaces the region's content with `content`.
    fn replace_content(&mut self, content: &str) -> Result<(), SinkError>;

    /// Current content of the region.
    fn content(&self) -> &str;
}

/// Region backed by a plain string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRegion {
    content: String,
}

impl MemoryRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Region with pre-existing content.
    pub fn with_content(content: impl Into<String>) -> Self {
        MemoryRegion {
            content: content.into(),
        }
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl DisplayRegion for MemoryRegion {
    fn replace_content(&mut self, content: &str) -> Result<(), SinkError> {
        self.content.clear();
        self.content.push_str(content);
        Ok(())
    }

    fn content(&self) -> &str {
        &self.content
    }
}

// =============================================================================
// Page Region
// =============================================================================

/// The inner content of one element of an HTML document.
#[derive(Debug, Clone)]
pub struct PageRegion {
    document: String,
    region_id: String,
    inner: Range<usize>,
}

impl PageRegion {
    /// Locates the element with `id="{region_id}"` in `document`.
    ///
    /// ## Errors
    /// - `RegionNotFound` when no element carries the id
    /// - `MalformedRegion` when the element is self-closing or never closed
    pub fn new(document: impl Into<String>, region_id: impl Into<String>) -> Result<Self, SinkError> {
        let document = document.into();
        let region_id = region_id.into();
        let inner = locate_region(&document, &region_id)?;

        debug!(region_id = %region_id, start = inner.start, end = inner.end, "Located display region");

        Ok(PageRegion {
            document,
            region_id,
            inner,
        })
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// The whole document, including the current region content.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

impl DisplayRegion for PageRegion {
    fn replace_content(&mut self, content: &str) -> Result<(), SinkError> {
        self.document.replace_range(self.inner.clone(), content);
        self.inner = self.inner.start..self.inner.start + content.len();
        Ok(())
    }

    fn content(&self) -> &str {
        &self.document[self.inner.clone()]
    }
}

/// Byte range of the inner content of the element carrying `region_id`.
fn locate_region(document: &str, region_id: &str) -> Result<Range<usize>, SinkError> {
    // ASCII lowercasing keeps byte offsets
    let lower = document.to_ascii_lowercase();
    let malformed = |reason: &str| SinkError::MalformedRegion {
        id: region_id.to_string(),
        reason: reason.to_string(),
    };

    let opaque = opaque_spans(&lower);

    let mut search_from = 0;
    while let Some(found) = lower[search_from..].find("id=") {
        let attr = search_from + found;
        search_from = attr + 3;

        if !document[..attr].ends_with(|c: char| c.is_ascii_whitespace()) {
            continue;
        }
        if opaque.iter().any(|span| span.contains(&attr)) {
            continue;
        }

        let Some(quote) = document[search_from..]
            .chars()
            .next()
            .filter(|c| *c == '"' || *c == '\'')
        else {
            continue;
        };
        let value_start = search_from + 1;
        let Some(value_len) = document[value_start..].find(quote) else {
            continue;
        };
        if &document[value_start..value_start + value_len] != region_id {
            continue;
        }

        let Some(tag_start) = document[..attr].rfind('<') else {
            continue;
        };
        let open_end = find_tag_end(document, tag_start + 1)
            .ok_or_else(|| malformed("opening tag is never closed"))?;
        if open_end <= attr {
            continue;
        }

        let tag_name: String = lower[tag_start + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if tag_name.is_empty() {
            continue;
        }

        if document[..open_end].ends_with("/>") {
            return Err(malformed("element is self-closing"));
        }

        let close_start = find_matching_close(&lower, &tag_name, open_end, &opaque)
            .ok_or_else(|| malformed(&format!("missing </{}>", tag_name)))?;

        return Ok(open_end..close_start);
    }

    Err(SinkError::RegionNotFound(region_id.to_string()))
}

/// Index just past the `>` that ends the tag, skipping quoted values.
fn find_tag_end(document: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, c) in document[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(from + offset + 1),
            (None, _) => {}
        }
    }
    None
}

/// Elements whose body is raw text rather than markup.
const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// Whether a tag name ends where `rest` starts.
fn is_tag_boundary(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
}

/// Byte ranges that hold no markup: `<!-- -->` comments, and `<script>` or
/// `<style>` elements up to their close tag. An unterminated span runs to the
/// end of the document.
fn opaque_spans(lower: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(found) = lower[pos..].find('<') {
        let at = pos + found;
        let after = &lower[at + 1..];

        let end = if after.starts_with("!--") {
            lower[at + 4..]
                .find("-->")
                .map_or(lower.len(), |i| at + 4 + i + 3)
        } else if let Some(name) = RAW_TEXT_TAGS
            .iter()
            .find(|name| after.starts_with(*name) && is_tag_boundary(&after[name.len()..]))
        {
            let body = find_tag_end(lower, at + 1).unwrap_or(lower.len());
            lower[body..]
                .find(&format!("</{name}"))
                .map_or(lower.len(), |i| body + i)
        } else {
            pos = at + 1;
            continue;
        };

        spans.push(at..end);
        pos = end;
    }

    spans
}

/// Start of the close tag that balances the element opened before `from`.
fn find_matching_close(
    lower: &str,
    tag_name: &str,
    from: usize,
    opaque: &[Range<usize>],
) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(found) = lower[pos..].find('<') {
        let at = pos + found;
        if let Some(span) = opaque.iter().find(|span| span.contains(&at)) {
            pos = span.end;
            continue;
        }
        let after = &lower[at + 1..];

        if let Some(rest) = after.strip_prefix('/').and_then(|r| r.strip_prefix(tag_name)) {
            if is_tag_boundary(rest) {
                depth -= 1;
                if depth == 0 {
                    return Some(at);
                }
            }
        } else if let Some(rest) = after.strip_prefix(tag_name) {
            if is_tag_boundary(rest) {
                depth += 1;
            }
        }

        pos = at + 1;
    }
    None
}

// =============================================================================
// Presentation Sink
// =============================================================================

/// Renders a [`TableView`] and writes it into a region in one step.
pub struct PresentationSink {
    renderer: Box<dyn TableRenderer + Send + Sync>,
}

impl PresentationSink {
    pub fn new(renderer: impl TableRenderer + Send + Sync + 'static) -> Self {
        PresentationSink {
            renderer: Box::new(renderer),
        }
    }

    /// Renders `table` and replaces the region content with the result.
    pub fn present<R: DisplayRegion + ?Sized>(
        &self,
        table: &TableView,
        region: &mut R,
    ) -> Result<(), crate::error::PipelineError> {
        let markup = self.renderer.render(table)?;
        region.replace_content(&markup)?;

        debug!(rows = table.row_count(), bytes = markup.len(), "Table presented");
        Ok(())
    }
}

impl std::fmt::Debug for PresentationSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationSink").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use partslist_core::{build_table, HtmlRenderer, LineItem, TextRenderer, DEFAULT_TAX_RATE};

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h1>Parts</h1>
  <table id="computerPartsTable" class="parts">
    <tr><td>Loading...</td></tr>
  </table>
  <p>After</p>
</body>
</html>"#;

    fn sample_table() -> TableView {
        let items = LineItem::parse_list(
            r#"[{"qty": 2, "item": "CPU-01", "title": "Processor", "sku": "BX80", "model": "i7",
                 "note": "", "price": 10.00, "buy_url": "https://example.com/cpu",
                 "store_name": "Example"}]"#,
        )
        .unwrap();
        build_table(&items, DEFAULT_TAX_RATE).unwrap()
    }

    #[test]
    fn test_memory_region_replace() {
        let mut region = MemoryRegion::with_content("old");
        region.replace_content("new").unwrap();
        assert_eq!(region.content(), "new");
        assert_eq!(region.into_content(), "new");
    }

    #[test]
    fn test_page_region_locates_inner_content() {
        let region = PageRegion::new(PAGE, "computerPartsTable").unwrap();
        assert_eq!(region.content().trim(), "<tr><td>Loading...</td></tr>");
        assert_eq!(region.region_id(), "computerPartsTable");
    }

    #[test]
    fn test_page_region_replace_keeps_surroundings() {
        let mut region = PageRegion::new(PAGE, "computerPartsTable").unwrap();
        region.replace_content("<tbody></tbody>").unwrap();

        assert_eq!(region.content(), "<tbody></tbody>");
        let doc = region.document();
        assert!(doc.contains(r#"<table id="computerPartsTable" class="parts"><tbody></tbody></table>"#));
        assert!(doc.contains("<h1>Parts</h1>"));
        assert!(doc.contains("<p>After</p>"));
        assert!(!doc.contains("Loading..."));
    }

    #[test]
    fn test_page_region_second_replace() {
        let mut region = PageRegion::new(PAGE, "computerPartsTable").unwrap();
        region.replace_content("first, and longer").unwrap();
        region.replace_content("second").unwrap();
        assert_eq!(region.content(), "second");
        assert!(!region.document().contains("first"));
    }

    #[test]
    fn test_page_region_nested_same_tag() {
        let page = r#"<div id="outer"><div id="inner">x</div><div>y</div></div><div>z</div>"#;
        let region = PageRegion::new(page, "outer").unwrap();
        assert_eq!(region.content(), r#"<div id="inner">x</div><div>y</div>"#);

        let inner = PageRegion::new(page, "inner").unwrap();
        assert_eq!(inner.content(), "x");
    }

    #[test]
    fn test_page_region_single_quotes_and_case() {
        let page = "<BODY><Table class=\"a>b\" id='parts'>old</TABLE></BODY>";
        let mut region = PageRegion::new(page, "parts").unwrap();
        assert_eq!(region.content(), "old");
        region.replace_content("new").unwrap();
        assert_eq!(region.document(), "<BODY><Table class=\"a>b\" id='parts'>new</TABLE></BODY>");
    }

    #[test]
    fn test_page_region_ignores_similar_attributes() {
        let page = r#"<div data-id="parts">a</div><div id="parts-2">b</div><div id="parts">c</div>"#;
        let region = PageRegion::new(page, "parts").unwrap();
        assert_eq!(region.content(), "c");
    }

    #[test]
    fn test_page_region_not_found() {
        let err = PageRegion::new(PAGE, "missing").unwrap_err();
        assert!(matches!(err, SinkError::RegionNotFound(id) if id == "missing"));

        // the id only appears as text
        let err = PageRegion::new("<p> id=\"parts\"</p>", "parts").unwrap_err();
        assert!(matches!(err, SinkError::RegionNotFound(_)));
    }

    #[test]
    fn test_page_region_malformed() {
        assert!(matches!(
            PageRegion::new(r#"<table id="parts"><tr></tr>"#, "parts"),
            Err(SinkError::MalformedRegion { .. })
        ));
        assert!(matches!(
            PageRegion::new(r#"<div id="parts"/>"#, "parts"),
            Err(SinkError::MalformedRegion { .. })
        ));
    }

    #[test]
    fn test_page_region_skips_commented_out_element() {
        let page = "<body>\n<!-- <table id=\"computerPartsTable\"> -->\n\
                    <table id=\"computerPartsTable\">old</table>\n</body>";
        let mut region = PageRegion::new(page, "computerPartsTable").unwrap();
        assert_eq!(region.content(), "old");

        region.replace_content("new").unwrap();
        assert!(region
            .document()
            .starts_with("<body>\n<!-- <table id=\"computerPartsTable\"> -->\n"));
        assert!(region.document().contains(">new</table>"));
    }

    #[test]
    fn test_page_region_only_commented_out_is_not_found() {
        let page = "<!-- <table id=\"parts\"></table> --><p>x</p>";
        assert!(matches!(
            PageRegion::new(page, "parts"),
            Err(SinkError::RegionNotFound(_))
        ));
    }

    #[test]
    fn test_page_region_close_tag_inside_comment_or_script() {
        let page = "<div id=\"parts\">a<!-- </div> -->b<script>if (x) document.write('</div>')</script>c</div>";
        let region = PageRegion::new(page, "parts").unwrap();
        assert_eq!(
            region.content(),
            "a<!-- </div> -->b<script>if (x) document.write('</div>')</script>c"
        );
    }

    #[test]
    fn test_page_region_ignores_ids_in_scripts() {
        let page = "<script>const tpl = '<div id=\"parts\">';</script><div id=\"parts\">real</div>";
        let region = PageRegion::new(page, "parts").unwrap();
        assert_eq!(region.content(), "real");
    }

    #[test]
    fn test_present_writes_full_table() {
        let sink = PresentationSink::new(HtmlRenderer);
        let mut region = PageRegion::new(PAGE, "computerPartsTable").unwrap();
        sink.present(&sample_table(), &mut region).unwrap();

        let content = region.content();
        assert!(content.starts_with("<thead>"));
        assert!(content.ends_with("</tfoot>"));
        assert!(content.contains("$21.65"));
    }

    #[test]
    fn test_present_is_deterministic() {
        let sink = PresentationSink::new(HtmlRenderer);
        let table = sample_table();

        let mut first = MemoryRegion::new();
        let mut second = MemoryRegion::with_content("stale");
        sink.present(&table, &mut first).unwrap();
        sink.present(&table, &mut second).unwrap();
        sink.present(&table, &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_present_with_text_renderer() {
        let sink = PresentationSink::new(TextRenderer);
        let mut region = MemoryRegion::new();
        sink.present(&sample_table(), &mut region).unwrap();
        assert!(region.content().contains("Totals:"));
    }
}
