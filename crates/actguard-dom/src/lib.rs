//! Static document adapters: parse HTML source and expose it to the engine.
//!
//! Everything here answers the structural reads of the element model. Live-only
//! reads (computed style, geometry, accessible name) stay unknown; a live page
//! provider is expected to come from a browser-driving adapter.

#![forbid(unsafe_code)]

mod document;
mod stylesheet;

pub use document::{HtmlDocument, HtmlElement};
pub use stylesheet::InlineStylesheets;
