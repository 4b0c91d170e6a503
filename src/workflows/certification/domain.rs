use serde::{Deserialize, Serialize};

/// Top-level validation context selecting the active rule set and the
/// candidate labels offered to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisContext {
    #[serde(alias = "colaborador")]
    Worker,
    #[serde(alias = "equipamento", alias = "maquina")]
    Equipment,
}

impl AnalysisContext {
    pub fn display_label(self) -> &'static str {
        match self {
            AnalysisContext::Worker => "Colaborador",
            AnalysisContext::Equipment => "Equipamento",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match fold_label(value).as_str() {
            "worker" | "colaborador" | "empregado" | "funcionario" => Some(Self::Worker),
            "equipment" | "equipamento" | "maquina" => Some(Self::Equipment),
            _ => None,
        }
    }
}

/// One parametrization entry: a canonical document label, the human-authored
/// expiration descriptor, and the free-text criteria the evaluator checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRule {
    pub document_name: String,
    pub expiration_descriptor: String,
    pub criteria_text: String,
}

/// An uploaded certificate awaiting analysis.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentSource {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: "application/pdf".to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriterionStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOK")]
    Nok,
}

/// Verdict for a single checklist item, as produced by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub description: String,
    /// Missing status (e.g. in a repaired, truncated response) degrades to
    /// NOK rather than silently passing.
    #[serde(default)]
    pub status: CriterionStatus,
    #[serde(default)]
    pub observation: String,
}

impl Default for CriterionStatus {
    fn default() -> Self {
        CriterionStatus::Nok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    Rejected,
}

/// Final per-file report. The overall status folding (approved iff every
/// criterion is OK) is owned by the evaluator; the pipeline only fills in
/// `file_name` and `identified_type` from ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub file_name: String,
    pub identified_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_detected: Option<String>,
    pub overall_status: OverallStatus,
    pub criteria_results: Vec<CriterionResult>,
}

/// Normalizes a label for matching: trimmed, whitespace-collapsed,
/// lowercased, diacritics folded. Both rule sources and classifier output go
/// through this before comparison.
pub(crate) fn fold_label(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let lower = c.to_ascii_lowercase();
    match lower {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        _ => lower,
    }
}

/// Splits a folded label into comparable tokens. Alphabetic/numeric runs are
/// separated so "NR33", "NR 33" and "nr-33" all yield ["nr", "33"].
pub(crate) fn tokenize_label(value: &str) -> Vec<String> {
    let folded = fold_label(value);
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            let is_digit = c.is_ascii_digit();
            if !current.is_empty() && is_digit != current_is_digit {
                tokens.push(std::mem::take(&mut current));
            }
            current_is_digit = is_digit;
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_label_strips_accents_and_collapses_whitespace() {
        assert_eq!(fold_label("  Direção   Defensiva "), "direcao defensiva");
        assert_eq!(fold_label("Máquina"), "maquina");
        assert_eq!(fold_label("AVALIAÇÃO"), "avaliacao");
    }

    #[test]
    fn tokenize_label_splits_code_and_number() {
        assert_eq!(tokenize_label("NR33/Supervisor"), vec!["nr", "33", "supervisor"]);
        assert_eq!(tokenize_label("NR 33"), vec!["nr", "33"]);
        assert_eq!(tokenize_label("PT1 | PT2"), vec!["pt", "1", "pt", "2"]);
    }

    #[test]
    fn context_parses_portuguese_aliases() {
        assert_eq!(AnalysisContext::parse("Colaborador"), Some(AnalysisContext::Worker));
        assert_eq!(AnalysisContext::parse("MÁQUINA"), Some(AnalysisContext::Equipment));
        assert_eq!(AnalysisContext::parse("other"), None);
    }
}
