mod builtin;
mod workbook;

pub use builtin::ALLOWED_SCHOOLS;
pub use workbook::{RuleSourceError, RuleWorkbook, Sheet, WorkbookLayout, WorkbookRow};

use super::domain::{fold_label, AnalysisContext, DocumentRule};

/// Read-only parametrization store: one rule list per context, sourced from
/// the built-in table or from an ingested workbook.
#[derive(Debug, Clone)]
pub struct RuleStore {
    worker: Vec<DocumentRule>,
    equipment: Vec<DocumentRule>,
}

impl RuleStore {
    /// The fixed built-in parametrization: the full worker table, no
    /// equipment rules.
    pub fn builtin() -> Self {
        Self {
            worker: builtin::worker_rules(),
            equipment: Vec::new(),
        }
    }

    /// Builds a store from parsed workbook rows, merging duplicate document
    /// names by criteria union.
    pub fn from_workbook(workbook: &RuleWorkbook) -> Self {
        Self {
            worker: workbook::merge_rows(&workbook.worker),
            equipment: workbook::merge_rows(&workbook.equipment),
        }
    }

    fn rules(&self, context: AnalysisContext) -> &[DocumentRule] {
        match context {
            AnalysisContext::Worker => &self.worker,
            AnalysisContext::Equipment => &self.equipment,
        }
    }

    /// Finds the rule for an identified document label. Matching is
    /// normalized: trimmed, case- and accent-insensitive.
    pub fn lookup(&self, context: AnalysisContext, document_name: &str) -> Option<&DocumentRule> {
        let key = fold_label(document_name);
        self.rules(context)
            .iter()
            .find(|rule| fold_label(&rule.document_name) == key)
    }

    /// All known document names for a context, in table order, for use as
    /// classifier candidates.
    pub fn available_labels(&self, context: AnalysisContext) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.rules(context)
            .iter()
            .filter(|rule| !rule.document_name.trim().is_empty())
            .filter(|rule| seen.insert(fold_label(&rule.document_name)))
            .map(|rule| rule.document_name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_is_case_and_accent_insensitive() {
        let store = RuleStore::builtin();
        let rule = store.lookup(AnalysisContext::Worker, "  aso ").expect("ASO rule");
        assert_eq!(rule.expiration_descriptor, "Anual");

        let rule = store
            .lookup(AnalysisContext::Worker, "DIRECAO DEFENSIVA - FORMACAO/RECICLAGEM")
            .expect("accent-folded lookup");
        assert_eq!(rule.document_name, "Direção Defensiva - Formação/Reciclagem");
    }

    #[test]
    fn builtin_equipment_context_has_no_labels() {
        let store = RuleStore::builtin();
        assert!(store.available_labels(AnalysisContext::Equipment).is_empty());
        assert!(store.lookup(AnalysisContext::Equipment, "ASO").is_none());
    }

    #[test]
    fn workbook_store_exposes_distinct_labels() {
        let workbook = RuleWorkbook {
            worker: vec![
                WorkbookRow {
                    document: "ASO".to_string(),
                    descriptor: "Anual".to_string(),
                    criteria: "A".to_string(),
                },
                WorkbookRow {
                    document: "aso".to_string(),
                    descriptor: String::new(),
                    criteria: "B".to_string(),
                },
            ],
            equipment: vec![WorkbookRow {
                document: "Laudo NR13".to_string(),
                descriptor: String::new(),
                criteria: "Itens".to_string(),
            }],
        };

        let store = RuleStore::from_workbook(&workbook);
        assert_eq!(store.available_labels(AnalysisContext::Worker), vec!["ASO"]);
        assert_eq!(
            store.available_labels(AnalysisContext::Equipment),
            vec!["Laudo NR13"]
        );
        let rule = store.lookup(AnalysisContext::Worker, "ASO").expect("merged rule");
        assert_eq!(rule.criteria_text, "A\nB");
    }
}
