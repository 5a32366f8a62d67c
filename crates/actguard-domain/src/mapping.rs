//! Selector-to-rule dispatch tables.
//!
//! Bindings live in four cells: {pre, post} x {concurrent, non-concurrent}.
//! Within a cell, bindings and the codes inside each binding keep their
//! declared order. Rules that inspect stylesheets rather than nodes are
//! listed separately as unmapped.

use actguard_types::ids;
use serde::Serialize;
use std::fmt;

/// Which rendering of the page a binding is resolved against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// The authored markup, as parsed from source.
    Pre,
    /// The rendered page; falls back to the source document when no live
    /// page is supplied.
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Pre => "pre",
            Phase::Post => "post",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingClass {
    /// Per-node invocations fan out and are joined before finalizing.
    Concurrent,
    /// Per-node invocations run strictly in document order.
    NonConcurrent,
}

impl fmt::Display for SchedulingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchedulingClass::Concurrent => "concurrent",
            SchedulingClass::NonConcurrent => "non-concurrent",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectorBinding {
    pub selector: String,
    pub rules: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTable {
    pub pre: Vec<SelectorBinding>,
    pub post: Vec<SelectorBinding>,
}

impl PhaseTable {
    pub fn cell(&self, phase: Phase) -> &[SelectorBinding] {
        match phase {
            Phase::Pre => &self.pre,
            Phase::Post => &self.post,
        }
    }

    fn cell_mut(&mut self, phase: Phase) -> &mut Vec<SelectorBinding> {
        match phase {
            Phase::Pre => &mut self.pre,
            Phase::Post => &mut self.post,
        }
    }
}

/// Where a mapped rule sits in the dispatch tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement<'a> {
    pub phase: Phase,
    pub class: SchedulingClass,
    pub selector: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectorMap {
    pub concurrent: PhaseTable,
    pub non_concurrent: PhaseTable,
    /// Rules executed once per run without node resolution.
    pub unmapped: Vec<String>,
}

impl SelectorMap {
    /// Dispatch tables for the built-in rule set.
    pub fn builtin() -> Self {
        let mut map = SelectorMap::default();
        use Phase::*;
        use SchedulingClass::*;

        map.bind(
            Pre,
            NonConcurrent,
            "html",
            [
                ids::RULE_HTML_HAS_TITLE,
                ids::RULE_HTML_HAS_LANG,
                ids::RULE_LANG_XML_LANG_MATCH,
                ids::RULE_HTML_LANG_VALID,
            ],
        );
        map.bind(Pre, NonConcurrent, "meta[http-equiv]", [ids::RULE_META_REFRESH_NO_DELAY]);
        map.bind(Pre, NonConcurrent, "[id]", [ids::RULE_ID_UNIQUE]);
        map.bind(Pre, NonConcurrent, "meta[name]", [ids::RULE_META_VIEWPORT_ZOOM]);

        map.bind(
            Post,
            Concurrent,
            r#"img, input[type="image"]"#,
            [ids::RULE_IMAGE_FILENAME_NAME],
        );
        map.bind(Post, Concurrent, "audio, video", [ids::RULE_NO_AUTOPLAY_AUDIO]);
        map.bind(Post, Concurrent, "body *", [ids::RULE_SCROLLABLE_KEYBOARD]);
        map.bind(Post, Concurrent, "svg, svg *", [ids::RULE_SVG_IMAGE_NAME]);

        map.unmapped_rule(ids::RULE_ORIENTATION_NOT_RESTRICTED);
        map
    }

    /// Append rule codes under `selector` in the given cell. Repeated
    /// selectors extend the existing binding.
    pub fn bind<I, S>(&mut self, phase: Phase, class: SchedulingClass, selector: &str, rules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = match class {
            SchedulingClass::Concurrent => &mut self.concurrent,
            SchedulingClass::NonConcurrent => &mut self.non_concurrent,
        };
        let cell = table.cell_mut(phase);
        let rules = rules.into_iter().map(Into::into);
        match cell.iter_mut().find(|b| b.selector == selector) {
            Some(binding) => binding.rules.extend(rules),
            None => cell.push(SelectorBinding {
                selector: selector.to_string(),
                rules: rules.collect(),
            }),
        }
    }

    pub fn unmapped_rule(&mut self, code: impl Into<String>) {
        self.unmapped.push(code.into());
    }

    pub fn table(&self, class: SchedulingClass) -> &PhaseTable {
        match class {
            SchedulingClass::Concurrent => &self.concurrent,
            SchedulingClass::NonConcurrent => &self.non_concurrent,
        }
    }

    pub fn cell(&self, phase: Phase, class: SchedulingClass) -> &[SelectorBinding] {
        self.table(class).cell(phase)
    }

    /// Every mapped code with its placement, in cell then declared order.
    pub fn placements(&self) -> impl Iterator<Item = (&str, Placement<'_>)> {
        [SchedulingClass::NonConcurrent, SchedulingClass::Concurrent]
            .into_iter()
            .flat_map(move |class| {
                [Phase::Pre, Phase::Post].into_iter().flat_map(move |phase| {
                    self.cell(phase, class).iter().flat_map(move |binding| {
                        binding.rules.iter().map(move |code| {
                            (
                                code.as_str(),
                                Placement {
                                    phase,
                                    class,
                                    selector: binding.selector.as_str(),
                                },
                            )
                        })
                    })
                })
            })
    }

    /// Placement of a mapped rule, if any.
    pub fn placement_of(&self, code: &str) -> Option<Placement<'_>> {
        self.placements()
            .find(|(c, _)| *c == code)
            .map(|(_, placement)| placement)
    }

    pub fn is_unmapped(&self, code: &str) -> bool {
        self.unmapped.iter().any(|c| c == code)
    }
}
