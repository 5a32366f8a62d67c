use actguard_domain::ProviderError;
use actguard_domain::model::{DocumentProvider, Element, ElementRef};
use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::{ElementRef as NodeElement, Html, Selector};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

const PROVIDER: &str = "html document";

/// A parsed HTML source document.
///
/// Cloning is cheap; element handles share the parsed tree.
#[derive(Clone)]
pub struct HtmlDocument {
    doc: Rc<Html>,
}

impl HtmlDocument {
    /// Parse a full document. The HTML parser recovers from malformed markup,
    /// so this never fails; recoverable parse errors are only logged.
    pub fn parse(source: &str) -> Self {
        let doc = Html::parse_document(source);
        debug!(
            bytes = source.len(),
            parse_errors = doc.errors.len(),
            "parsed html document"
        );
        Self { doc: Rc::new(doc) }
    }

    fn handle(&self, id: NodeId) -> ElementRef {
        Rc::new(HtmlElement {
            doc: Rc::clone(&self.doc),
            id,
        })
    }

    /// Text of every `<style>` element, in document order.
    pub(crate) fn style_blocks(&self) -> Vec<String> {
        let selector = Selector::parse("style").expect("static selector parses");
        self.doc
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("parse_errors", &self.doc.errors.len())
            .finish_non_exhaustive()
    }
}

#[async_trait(?Send)]
impl DocumentProvider for HtmlDocument {
    async fn select(&self, selector: &str) -> Result<Vec<ElementRef>, ProviderError> {
        let parsed = Selector::parse(selector).map_err(|err| ProviderError::InvalidSelector {
            selector: selector.to_string(),
            reason: err.to_string(),
        })?;
        Ok(self
            .doc
            .select(&parsed)
            .map(|el| self.handle(el.id()))
            .collect())
    }
}

/// One element of an [`HtmlDocument`].
#[derive(Clone)]
pub struct HtmlElement {
    doc: Rc<Html>,
    id: NodeId,
}

impl HtmlElement {
    fn node(&self) -> Result<NodeElement<'_>, ProviderError> {
        self.doc
            .tree
            .get(self.id)
            .and_then(NodeElement::wrap)
            .ok_or_else(|| ProviderError::Unavailable {
                provider: PROVIDER,
                reason: format!("node {:?} is not an element", self.id),
            })
    }

    fn handle(&self, id: NodeId) -> ElementRef {
        Rc::new(HtmlElement {
            doc: Rc::clone(&self.doc),
            id,
        })
    }
}

impl fmt::Debug for HtmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.node().map(|el| el.value().name().to_string()).ok();
        f.debug_struct("HtmlElement")
            .field("id", &self.id)
            .field("tag", &tag)
            .finish()
    }
}

#[async_trait(?Send)]
impl Element for HtmlElement {
    async fn tag_name(&self) -> Result<String, ProviderError> {
        Ok(self.node()?.value().name().to_ascii_lowercase())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, ProviderError> {
        Ok(self.node()?.value().attr(name).map(str::to_string))
    }

    async fn text(&self) -> Result<String, ProviderError> {
        Ok(self.node()?.text().collect())
    }

    async fn children(&self) -> Result<Vec<ElementRef>, ProviderError> {
        Ok(self
            .node()?
            .children()
            .filter_map(NodeElement::wrap)
            .map(|child| self.handle(child.id()))
            .collect())
    }

    async fn parent(&self) -> Result<Option<ElementRef>, ProviderError> {
        Ok(self
            .node()?
            .parent()
            .and_then(NodeElement::wrap)
            .map(|parent| self.handle(parent.id())))
    }

    async fn outer_html(&self) -> Result<String, ProviderError> {
        Ok(self.node()?.html())
    }

    async fn locator(&self) -> Result<String, ProviderError> {
        Ok(css_path(self.node()?))
    }
}

/// `html > body > div:nth-child(2)`: one step per ancestor, positions counted
/// among element siblings.
fn css_path(element: NodeElement<'_>) -> String {
    let mut steps = Vec::new();
    let mut current = Some(element);
    while let Some(el) = current {
        let name = el.value().name();
        let parent = el.parent().and_then(NodeElement::wrap);
        let step = if parent.is_some() {
            let position = el
                .prev_siblings()
                .filter(|node| node.value().is_element())
                .count()
                + 1;
            format!("{name}:nth-child({position})")
        } else {
            name.to_string()
        };
        steps.push(step);
        current = parent;
    }
    steps.reverse();
    steps.join(" > ")
}
