use chrono::{Months, NaiveDate};

use super::{ValidityPolicy, WindowLength};

/// Date format embedded in instruction text. This is an external contract:
/// the directive wording is consumed by the evaluator, so the rendering must
/// stay day/month/year, zero-padded.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Concrete comparison dates for one evaluation: the reference date and, for
/// fixed-window policies, the computed cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub reference: NaiveDate,
    pub cutoff: Option<NaiveDate>,
}

impl ValidityWindow {
    /// Computes the window for a policy. Subtraction is calendar-accurate:
    /// whole months/years off the reference date, with chrono clamping the
    /// day (2024-02-29 minus a year lands on 2023-02-28).
    pub fn compute(policy: &ValidityPolicy, reference: NaiveDate) -> Self {
        let cutoff = policy
            .window_length()
            .map(|length| subtract_window(reference, length));

        Self { reference, cutoff }
    }

    pub fn reference_label(&self) -> String {
        self.reference.format(DATE_FORMAT).to_string()
    }

    pub fn cutoff_label(&self) -> Option<String> {
        self.cutoff.map(|date| date.format(DATE_FORMAT).to_string())
    }
}

fn subtract_window(reference: NaiveDate, length: WindowLength) -> NaiveDate {
    // checked_sub_months only fails approaching NaiveDate::MIN.
    reference
        .checked_sub_months(Months::new(length.months()))
        .unwrap_or(reference)
}
