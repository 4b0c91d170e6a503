//! Validity-policy resolution.
//!
//! Expiration policy is nominally declared per document type by the raw
//! descriptor text, but several labels carry real-world policies that
//! diverge from their nominal descriptor. The resolver therefore walks an
//! explicit ordered rule table: exact name patterns first, descriptor cues
//! last. New exceptions are additions to the table, not new branches.

pub mod window;

pub use window::ValidityWindow;

use serde::{Deserialize, Serialize};

use super::domain::tokenize_label;

/// Calendar length of a fixed validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLength {
    SixMonths,
    OneYear,
    TwoYears,
}

impl WindowLength {
    pub(crate) fn months(self) -> u32 {
        match self {
            WindowLength::SixMonths => 6,
            WindowLength::OneYear => 12,
            WindowLength::TwoYears => 24,
        }
    }
}

/// Resolved expiry-validation strategy for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidityPolicy {
    /// Certificate date compared against a computed cutoff.
    FixedWindow(WindowLength),
    /// The document's own printed expiry date is compared against today.
    PrintedExpiry,
    /// Name-pattern override: annual regardless of descriptor.
    NameOverrideAnnual,
    /// Name-pattern override: biennial regardless of descriptor.
    NameOverrideBiennial,
    /// NR33 special case; the window is configuration because observed rule
    /// tables disagree on annual vs biennial.
    Nr33(WindowLength),
    /// No computed dates; the raw descriptor is passed through verbatim for
    /// the evaluator to interpret.
    GenericTextual { descriptor: String },
}

impl ValidityPolicy {
    /// Concrete window length, when the policy computes a cutoff.
    pub fn window_length(&self) -> Option<WindowLength> {
        match self {
            ValidityPolicy::FixedWindow(length) | ValidityPolicy::Nr33(length) => Some(*length),
            ValidityPolicy::NameOverrideAnnual => Some(WindowLength::OneYear),
            ValidityPolicy::NameOverrideBiennial => Some(WindowLength::TwoYears),
            ValidityPolicy::PrintedExpiry | ValidityPolicy::GenericTextual { .. } => None,
        }
    }
}

/// A phrase that must appear in the document name, compared token-wise so
/// "NR33", "NR 33" and "nr-33" are equivalent and "eso" does not match
/// inside "acesso".
#[derive(Debug, Clone)]
pub struct NamePattern {
    phrases: Vec<Vec<String>>,
}

impl NamePattern {
    /// Pattern requiring every phrase to appear somewhere in the name.
    pub fn all_of(phrases: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|phrase| tokenize_label(phrase)).collect(),
        }
    }

    fn matches(&self, name_tokens: &[String]) -> bool {
        self.phrases
            .iter()
            .all(|phrase| contains_phrase(name_tokens, phrase))
    }
}

fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return phrase.is_empty();
    }
    tokens.windows(phrase.len()).any(|window| window == phrase)
}

/// One entry of the ordered override table.
#[derive(Debug, Clone)]
pub struct NameRule {
    patterns: Vec<NamePattern>,
    policy: ValidityPolicy,
}

impl NameRule {
    pub fn new(patterns: Vec<NamePattern>, policy: ValidityPolicy) -> Self {
        Self { patterns, policy }
    }

    fn matches(&self, name_tokens: &[String]) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name_tokens))
    }
}

/// Validity knobs surfaced as configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityConfig {
    pub nr33_window: WindowLength,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            nr33_window: WindowLength::OneYear,
        }
    }
}

/// Resolves (document name, expiration descriptor) to a policy. Never fails:
/// absence of every cue falls through to the textual policy.
#[derive(Debug, Clone)]
pub struct PolicyResolver {
    name_rules: Vec<NameRule>,
}

impl PolicyResolver {
    pub fn new(config: ValidityConfig) -> Self {
        Self::with_name_rules(default_name_rules(config))
    }

    /// Custom override table, evaluated top-to-bottom before descriptor cues.
    pub fn with_name_rules(name_rules: Vec<NameRule>) -> Self {
        Self { name_rules }
    }

    pub fn resolve(&self, document_name: &str, expiration_descriptor: &str) -> ValidityPolicy {
        let tokens = tokenize_label(document_name);
        for rule in &self.name_rules {
            if rule.matches(&tokens) {
                return rule.policy.clone();
            }
        }

        resolve_descriptor(expiration_descriptor)
    }
}

/// Default override table. Order matters: NR33 first, then the annual
/// exceptions that would otherwise fall into the biennial group.
fn default_name_rules(config: ValidityConfig) -> Vec<NameRule> {
    vec![
        NameRule::new(
            vec![NamePattern::all_of(&["nr33"])],
            ValidityPolicy::Nr33(config.nr33_window),
        ),
        NameRule::new(
            vec![
                NamePattern::all_of(&["nr18"]),
                NamePattern::all_of(&["operador de elevador"]),
                NamePattern::all_of(&["loto", "escola"]),
                NamePattern::all_of(&["cartao", "nr11"]),
            ],
            ValidityPolicy::NameOverrideAnnual,
        ),
        NameRule::new(
            vec![
                NamePattern::all_of(&["direcao defensiva"]),
                NamePattern::all_of(&["nr10"]),
                NamePattern::all_of(&["nr11"]),
                NamePattern::all_of(&["nr12"]),
                NamePattern::all_of(&["primeiros socorros"]),
                NamePattern::all_of(&["combate a incendio"]),
                NamePattern::all_of(&["gwo"]),
                NamePattern::all_of(&["bst"]),
                NamePattern::all_of(&["eso"]),
                NamePattern::all_of(&["esq"]),
                NamePattern::all_of(&["fpa"]),
                NamePattern::all_of(&["loto"]),
                NamePattern::all_of(&["pt1"]),
                NamePattern::all_of(&["pt2"]),
                NamePattern::all_of(&["inspetor competente"]),
                NamePattern::all_of(&["sit", "safety"]),
            ],
            ValidityPolicy::NameOverrideBiennial,
        ),
    ]
}

/// Descriptor substring cues, checked in priority order on the folded text.
fn resolve_descriptor(descriptor: &str) -> ValidityPolicy {
    let folded = super::domain::fold_label(descriptor);

    if folded.contains("bienal") || folded.contains("2 anos") {
        ValidityPolicy::FixedWindow(WindowLength::TwoYears)
    } else if folded.contains("anual") || folded.contains("1 ano") {
        ValidityPolicy::FixedWindow(WindowLength::OneYear)
    } else if folded.contains("6 meses") {
        ValidityPolicy::FixedWindow(WindowLength::SixMonths)
    } else if folded.contains("validade do documento") || folded.contains("vencimento") {
        ValidityPolicy::PrintedExpiry
    } else {
        ValidityPolicy::GenericTextual {
            descriptor: descriptor.to_string(),
        }
    }
}
