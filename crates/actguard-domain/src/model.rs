//! Collaborator shapes the engine consumes.
//!
//! Parsing, browser automation, style resolution and accessibility-tree
//! computation live outside this crate. The engine only sees element handles
//! and selector queries through these traits. All reads are asynchronous so
//! static trees and live pages share one shape; futures are not `Send`
//! because a run is a single cooperative task.

use crate::error::ProviderError;
use crate::mapping::Phase;
use async_trait::async_trait;
use std::fmt;
use std::rc::Rc;

pub type ElementRef = Rc<dyn Element>;

/// Scroll and client extents of a rendered element, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
}

/// Handle to one element of a document or live page.
///
/// Live-only reads (`computed_style`, `geometry`, `accessible_name`) default to
/// "unknown" so static trees need not implement them.
#[async_trait(?Send)]
pub trait Element: fmt::Debug {
    /// Lowercase tag name.
    async fn tag_name(&self) -> Result<String, ProviderError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, ProviderError>;

    async fn has_attribute(&self, name: &str) -> Result<bool, ProviderError> {
        Ok(self.attribute(name).await?.is_some())
    }

    /// Concatenated descendant text.
    async fn text(&self) -> Result<String, ProviderError>;

    /// Child elements in document order.
    async fn children(&self) -> Result<Vec<ElementRef>, ProviderError>;

    /// Parent element; `None` for the document root.
    async fn parent(&self) -> Result<Option<ElementRef>, ProviderError>;

    async fn outer_html(&self) -> Result<String, ProviderError>;

    /// CSS path that locates this element in its document.
    async fn locator(&self) -> Result<String, ProviderError>;

    async fn computed_style(&self, _property: &str) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }

    async fn geometry(&self) -> Result<Option<Geometry>, ProviderError> {
        Ok(None)
    }

    async fn accessible_name(&self) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }

    /// Excluded from the accessibility tree via `hidden` or `aria-hidden`.
    async fn is_hidden(&self) -> Result<bool, ProviderError> {
        if self.has_attribute("hidden").await? {
            return Ok(true);
        }
        let aria_hidden = self.attribute("aria-hidden").await?;
        Ok(aria_hidden.is_some_and(|v| v.trim().eq_ignore_ascii_case("true")))
    }

    /// Part of sequential focus navigation.
    async fn is_focusable(&self) -> Result<bool, ProviderError> {
        if self.has_attribute("disabled").await? {
            return Ok(false);
        }
        if let Some(tabindex) = self.attribute("tabindex").await?
            && let Ok(index) = tabindex.trim().parse::<i32>()
        {
            return Ok(index >= 0);
        }
        let tag = self.tag_name().await?;
        let focusable = match tag.as_str() {
            "a" | "area" => self.has_attribute("href").await?,
            "input" => self
                .attribute("type")
                .await?
                .is_none_or(|t| !t.eq_ignore_ascii_case("hidden")),
            "button" | "select" | "textarea" | "summary" | "iframe" => true,
            _ => false,
        };
        Ok(focusable)
    }
}

/// A document the engine can query with structural selectors.
#[async_trait(?Send)]
pub trait DocumentProvider {
    /// Elements matching `selector`, in document order.
    async fn select(&self, selector: &str) -> Result<Vec<ElementRef>, ProviderError>;
}

/// A live rendered page. Its element handles answer the live-only reads of
/// [`Element`].
pub trait LivePageProvider: DocumentProvider {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Where the sheet came from, when known (`href` or a file name).
    pub origin: Option<String>,
    pub content: String,
}

#[async_trait(?Send)]
pub trait StylesheetProvider {
    async fn stylesheets(&self) -> Result<Vec<Stylesheet>, ProviderError>;
}

/// Everything one run evaluates.
///
/// Three shapes are legitimate: source only, source with a live page, and
/// source with a live page and stylesheets. The source document is required.
#[derive(Clone, Copy, Default)]
pub struct PageBundle<'a> {
    pub source: Option<&'a dyn DocumentProvider>,
    pub page: Option<&'a dyn LivePageProvider>,
    pub stylesheets: Option<&'a dyn StylesheetProvider>,
}

impl<'a> PageBundle<'a> {
    pub fn source(source: &'a dyn DocumentProvider) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: &'a dyn LivePageProvider) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_stylesheets(mut self, stylesheets: &'a dyn StylesheetProvider) -> Self {
        self.stylesheets = Some(stylesheets);
        self
    }
}

/// What a rule sees besides its candidate element.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// The document the rule's selector was resolved against.
    pub document: &'a dyn DocumentProvider,
    pub stylesheets: Option<&'a dyn StylesheetProvider>,
    pub phase: Phase,
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("phase", &self.phase)
            .field("stylesheets", &self.stylesheets.is_some())
            .finish_non_exhaustive()
    }
}
