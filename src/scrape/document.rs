//! Loading HTML into a queryable document.

use scraper::{ElementRef, Html};

use super::selector::{parse_selector, TITLE_SELECTOR};
use crate::error_handling::Result;

/// Turns fetched HTML into a document value.
///
/// The scraper holds a loader instead of calling a parser directly, so tests and
/// embedders can substitute their own document type.
pub trait DocumentLoader: Send + Sync {
    type Document;

    fn load(&self, html: &str) -> Self::Document;
}

/// Default loader, backed by the `scraper` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLoader;

impl DocumentLoader for HtmlLoader {
    type Document = HtmlDocument;

    fn load(&self, html: &str) -> HtmlDocument {
        HtmlDocument::parse(html)
    }
}

/// A parsed HTML document with CSS-selector queries.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses `html` leniently; malformed markup never fails.
    ///
    /// Fragments such as `<p>hi</p>` are wrapped in an implied `html`/`body`.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Inner text of every element matching `css`, in document order.
    pub fn select(&self, css: &str) -> Result<Vec<String>> {
        let selector = parse_selector(css)?;
        Ok(self.html.select(&selector).map(element_text).collect())
    }

    /// Value of `attr` on every element matching `css` that carries it.
    pub fn select_attr(&self, css: &str, attr: &str) -> Result<Vec<String>> {
        let selector = parse_selector(css)?;
        Ok(self
            .html
            .select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(str::to_string)
            .collect())
    }

    /// Trimmed text of the first `<title>`, if any.
    pub fn title(&self) -> Option<String> {
        self.html
            .select(&TITLE_SELECTOR)
            .next()
            .map(|element| element_text(element).trim().to_string())
    }

    /// Concatenated text content of the whole document.
    pub fn text(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// The document serialized back to HTML.
    pub fn html(&self) -> String {
        self.html.html()
    }

    /// The underlying `scraper` document.
    pub fn inner(&self) -> &Html {
        &self.html
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::Error;

    const PAGE: &str = r#"<html><head><title> Items </title></head>
<body><ul><li><a href="/a">A</a></li><li><a href="/b">B</a></li><li>none</li></ul></body></html>"#;

    #[test]
    fn test_fragment_text() {
        let doc = HtmlLoader.load("<p>hi</p>");
        assert_eq!(doc.text(), "hi");
    }

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(HtmlDocument::parse(PAGE).title().as_deref(), Some("Items"));
        assert_eq!(HtmlDocument::parse("<p>x</p>").title(), None);
    }

    #[test]
    fn test_select_and_select_attr() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.select("li").unwrap(), vec!["A", "B", "none"]);
        assert_eq!(doc.select_attr("li a", "href").unwrap(), vec!["/a", "/b"]);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = HtmlDocument::parse(PAGE);
        match doc.select("li[") {
            Err(Error::Validation(err)) => assert!(err.has_field("selector")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
