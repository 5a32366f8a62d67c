use crate::document::HtmlDocument;
use actguard_domain::ProviderError;
use actguard_domain::model::{Stylesheet, StylesheetProvider};
use async_trait::async_trait;

/// Stylesheets available without fetching: inline `<style>` blocks plus any
/// CSS handed over by the caller.
#[derive(Clone, Debug, Default)]
pub struct InlineStylesheets {
    sheets: Vec<Stylesheet>,
}

impl InlineStylesheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `<style>` block of `doc`.
    pub fn from_document(doc: &HtmlDocument) -> Self {
        let sheets = doc
            .style_blocks()
            .into_iter()
            .filter(|content| !content.trim().is_empty())
            .map(|content| Stylesheet {
                origin: None,
                content,
            })
            .collect();
        Self { sheets }
    }

    pub fn with_css(mut self, origin: impl Into<String>, content: impl Into<String>) -> Self {
        self.sheets.push(Stylesheet {
            origin: Some(origin.into()),
            content: content.into(),
        });
        self
    }

    pub fn sheets(&self) -> &[Stylesheet] {
        &self.sheets
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[async_trait(?Send)]
impl StylesheetProvider for InlineStylesheets {
    async fn stylesheets(&self) -> Result<Vec<Stylesheet>, ProviderError> {
        Ok(self.sheets.clone())
    }
}
