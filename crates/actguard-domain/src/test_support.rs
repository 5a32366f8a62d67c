use crate::error::{ProviderError, RuleError};
use crate::mapping::Phase;
use crate::model::{
    DocumentProvider, Element, ElementRef, Geometry, LivePageProvider, RuleContext, Stylesheet,
    StylesheetProvider,
};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Outcome, Principle, Verdict};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

pub fn block_on<F: Future>(future: F) -> F::Output {
    futures::executor::block_on(future)
}

pub fn context(document: &dyn DocumentProvider) -> RuleContext<'_> {
    RuleContext {
        document,
        stylesheets: None,
        phase: Phase::Pre,
    }
}

/// Suspends once, waking itself immediately.
pub struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub async fn yield_times(n: usize) {
    for _ in 0..n {
        YieldNow(false).await;
    }
}

#[derive(Debug)]
pub struct FakeElement {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    styles: BTreeMap<String, String>,
    geometry: Option<Geometry>,
    accessible_name: Option<String>,
    locator: Option<String>,
    yields: usize,
    failing: bool,
    children: Vec<Rc<FakeElement>>,
    parent: Weak<FakeElement>,
}

impl FakeElement {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(tag: &str) -> FakeElementBuilder {
        FakeElementBuilder {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: String::new(),
            styles: BTreeMap::new(),
            geometry: None,
            accessible_name: None,
            locator: None,
            yields: 0,
            failing: false,
            children: Vec::new(),
        }
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    fn render(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        out.push('>');
        out.push_str(&self.text);
        for child in &self.children {
            child.render(out);
        }
        out.push_str(&format!("</{}>", self.tag));
    }

    async fn touch(&self) -> Result<(), ProviderError> {
        yield_times(self.yields).await;
        if self.failing {
            return Err(ProviderError::Unavailable {
                provider: "fake page",
                reason: "element detached".to_string(),
            });
        }
        Ok(())
    }
}

pub struct FakeElementBuilder {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    styles: BTreeMap<String, String>,
    geometry: Option<Geometry>,
    accessible_name: Option<String>,
    locator: Option<String>,
    yields: usize,
    failing: bool,
    children: Vec<FakeElementBuilder>,
}

impl FakeElementBuilder {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    pub fn geometry(mut self, scroll: (f64, f64), client: (f64, f64)) -> Self {
        self.geometry = Some(Geometry {
            scroll_width: scroll.0,
            scroll_height: scroll.1,
            client_width: client.0,
            client_height: client.1,
        });
        self
    }

    pub fn accessible_name(mut self, name: &str) -> Self {
        self.accessible_name = Some(name.to_string());
        self
    }

    pub fn locator(mut self, locator: &str) -> Self {
        self.locator = Some(locator.to_string());
        self
    }

    /// Suspend `n` times on every attribute read.
    pub fn yields(mut self, n: usize) -> Self {
        self.yields = n;
        self
    }

    /// Every read fails with a provider error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn child(mut self, child: FakeElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn build(self) -> ElementRef {
        self.build_node(Weak::new())
    }

    fn build_node(self, parent: Weak<FakeElement>) -> Rc<FakeElement> {
        let FakeElementBuilder {
            tag,
            attrs,
            text,
            styles,
            geometry,
            accessible_name,
            locator,
            yields,
            failing,
            children,
        } = self;
        Rc::new_cyclic(|me| FakeElement {
            tag,
            attrs,
            text,
            styles,
            geometry,
            accessible_name,
            locator,
            yields,
            failing,
            children: children
                .into_iter()
                .map(|child| child.build_node(me.clone()))
                .collect(),
            parent,
        })
    }
}

#[async_trait(?Send)]
impl Element for FakeElement {
    async fn tag_name(&self) -> Result<String, ProviderError> {
        self.touch().await?;
        Ok(self.tag.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, ProviderError> {
        self.touch().await?;
        Ok(self
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }

    async fn text(&self) -> Result<String, ProviderError> {
        self.touch().await?;
        let mut out = String::new();
        self.collect_text(&mut out);
        Ok(out)
    }

    async fn children(&self) -> Result<Vec<ElementRef>, ProviderError> {
        self.touch().await?;
        Ok(self
            .children
            .iter()
            .map(|c| Rc::clone(c) as ElementRef)
            .collect())
    }

    async fn parent(&self) -> Result<Option<ElementRef>, ProviderError> {
        self.touch().await?;
        Ok(self.parent.upgrade().map(|p| p as ElementRef))
    }

    async fn outer_html(&self) -> Result<String, ProviderError> {
        let mut out = String::new();
        self.render(&mut out);
        Ok(out)
    }

    async fn locator(&self) -> Result<String, ProviderError> {
        Ok(self.locator.clone().unwrap_or_else(|| self.tag.clone()))
    }

    async fn computed_style(&self, property: &str) -> Result<Option<String>, ProviderError> {
        self.touch().await?;
        Ok(self.styles.get(property).cloned())
    }

    async fn geometry(&self) -> Result<Option<Geometry>, ProviderError> {
        self.touch().await?;
        Ok(self.geometry)
    }

    async fn accessible_name(&self) -> Result<Option<String>, ProviderError> {
        self.touch().await?;
        Ok(self.accessible_name.clone())
    }
}

/// Selector to element table standing in for a parsed document or live page.
#[derive(Default)]
pub struct FakeDocument {
    nodes: BTreeMap<String, Vec<ElementRef>>,
    invalid: BTreeSet<String>,
    queries: RefCell<Vec<String>>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str, elements: Vec<ElementRef>) -> Self {
        self.nodes.insert(selector.to_string(), elements);
        self
    }

    pub fn invalid(mut self, selector: &str) -> Self {
        self.invalid.insert(selector.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl DocumentProvider for FakeDocument {
    async fn select(&self, selector: &str) -> Result<Vec<ElementRef>, ProviderError> {
        self.queries.borrow_mut().push(selector.to_string());
        if self.invalid.contains(selector) {
            return Err(ProviderError::InvalidSelector {
                selector: selector.to_string(),
                reason: "rejected by fake document".to_string(),
            });
        }
        Ok(self.nodes.get(selector).cloned().unwrap_or_default())
    }
}

impl LivePageProvider for FakeDocument {}

#[derive(Default)]
pub struct FakeStylesheets {
    sheets: Vec<Stylesheet>,
}

impl FakeStylesheets {
    pub fn css(mut self, content: &str) -> Self {
        self.sheets.push(Stylesheet {
            origin: None,
            content: content.to_string(),
        });
        self
    }
}

#[async_trait(?Send)]
impl StylesheetProvider for FakeStylesheets {
    async fn stylesheets(&self) -> Result<Vec<Stylesheet>, ProviderError> {
        Ok(self.sheets.clone())
    }
}

const SCRIPTED_CRITERIA: &[Criterion] = &[Criterion::new(
    "4.1.1",
    Level::A,
    Principle::Robust,
    "https://www.w3.org/WAI/WCAG21/Understanding/parsing",
)];

const SCRIPTED_GATES: &[Precondition] = &[Precondition::ElementExists];

/// Rule whose verdict is read from the candidate's `data-outcome` attribute.
/// A `data-error` attribute makes evaluation fail with its value.
#[derive(Debug)]
pub struct ScriptedRule {
    descriptor: RuleDescriptor,
    calls: Cell<usize>,
}

impl ScriptedRule {
    pub fn new(code: &'static str) -> Self {
        let external_id: &'static str =
            Box::leak(format!("scripted-{}", code.to_ascii_lowercase()).into_boxed_str());
        Self::with_external_id(code, external_id)
    }

    pub fn with_external_id(code: &'static str, external_id: &'static str) -> Self {
        Self {
            descriptor: RuleDescriptor {
                code,
                external_id,
                name: "Scripted rule",
                description: "Reports the outcome written on each candidate.",
                target: &["[data-outcome]"],
                success_criteria: SCRIPTED_CRITERIA,
            },
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl Rule for ScriptedRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn preconditions(&self) -> &[Precondition] {
        SCRIPTED_GATES
    }

    async fn evaluate(
        &self,
        element: &dyn Element,
        _ctx: &RuleContext<'_>,
    ) -> Result<Verdict, RuleError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(message) = element.attribute("data-error").await? {
            return Err(RuleError::Evaluation(message));
        }
        let outcome = match element.attribute("data-outcome").await?.as_deref() {
            Some("passed") => Outcome::Passed,
            Some("warning") => Outcome::Warning,
            Some("failed") => Outcome::Failed,
            _ => Outcome::Inapplicable,
        };
        Ok(Verdict::new(outcome, format!("scripted {outcome}"), "RC-scripted"))
    }
}
