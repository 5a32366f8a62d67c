use actguard_types::{Report, RuleRunResult};

/// Folds finalized rule results into a [`Report`].
///
/// Global counters tally each rule's rollup outcome once.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    report: Report,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, result: RuleRunResult) {
        self.report.metadata.record(result.outcome());
        self.report.rules.insert(result.code.clone(), result);
    }

    pub fn finish(self) -> Report {
        self.report
    }
}

impl Extend<RuleRunResult> for ReportAggregator {
    fn extend<I: IntoIterator<Item = RuleRunResult>>(&mut self, iter: I) {
        for result in iter {
            self.fold(result);
        }
    }
}
