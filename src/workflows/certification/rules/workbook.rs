//! Rule-workbook ingestion.
//!
//! Parametrization spreadsheets arrive as one CSV export per sheet. Sheet
//! names select the context (worker-like vs equipment-like) and a scoring
//! pass over the first rows locates the header row and the document/criteria
//! columns, since real workbooks bury the table under title banners and
//! merged cells.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::workflows::certification::domain::{fold_label, DocumentRule};

/// Rows to scan while looking for a header.
const HEADER_SCAN_ROWS: usize = 50;
/// Minimum score for a row to be accepted as the header.
const HEADER_SCORE_THRESHOLD: i32 = 2;

/// Fallback column layout when no header row is recognized. Inherited from
/// the reference workbook template (document in column A, criteria in
/// column C); override via configuration for other layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbookLayout {
    pub document_column: usize,
    pub criteria_column: usize,
}

impl Default for WorkbookLayout {
    fn default() -> Self {
        Self {
            document_column: 0,
            criteria_column: 2,
        }
    }
}

/// One sheet of a rule workbook, as a grid of cell strings.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Reads a sheet from CSV bytes. Records may have ragged lengths.
    pub fn from_csv<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, RuleSourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
        }

        Ok(Self {
            name: name.into(),
            rows,
        })
    }

    /// Reads every `*.csv` file in a directory as one sheet each, named after
    /// the file stem.
    pub fn from_csv_dir(dir: &Path) -> Result<Vec<Self>, RuleSourceError> {
        let mut sheets = Vec::new();
        let mut entries: Vec<_> = fs::read_dir(dir)
            .map_err(RuleSourceError::Io)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        entries.sort();

        for path in entries {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file = fs::File::open(&path).map_err(RuleSourceError::Io)?;
            sheets.push(Sheet::from_csv(name, file)?);
        }

        Ok(sheets)
    }
}

/// Raw row extracted from a recognized sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookRow {
    pub document: String,
    pub descriptor: String,
    pub criteria: String,
}

/// Parsed workbook: worker-like and equipment-like rows, pre-merge.
#[derive(Debug, Clone, Default)]
pub struct RuleWorkbook {
    pub worker: Vec<WorkbookRow>,
    pub equipment: Vec<WorkbookRow>,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleSourceError {
    #[error("no 'empregado/colaborador' or 'maquina/equipamento' sheet was recognized")]
    NoRecognizedSheets,
    #[error("recognized sheets contained no usable rows; check that the document column is filled")]
    EmptyExtraction,
    #[error("failed to read rule workbook: {0}")]
    Io(#[source] std::io::Error),
    #[error("failed to parse rule sheet: {0}")]
    Csv(#[from] csv::Error),
}

impl RuleWorkbook {
    /// Splits the sheets into worker and equipment row sets. Fails before any
    /// document is processed when nothing usable was found.
    pub fn from_sheets(sheets: &[Sheet], layout: WorkbookLayout) -> Result<Self, RuleSourceError> {
        let worker_sheet = sheets.iter().find(|sheet| {
            let name = fold_label(&sheet.name);
            ["empregado", "colaborador", "funcionario"]
                .iter()
                .any(|needle| name.contains(needle))
        });
        let equipment_sheet = sheets.iter().find(|sheet| {
            let name = fold_label(&sheet.name);
            ["maquina", "equipamento"].iter().any(|needle| name.contains(needle))
        });

        if worker_sheet.is_none() && equipment_sheet.is_none() {
            return Err(RuleSourceError::NoRecognizedSheets);
        }

        let workbook = Self {
            worker: worker_sheet.map(|sheet| extract_rows(sheet, layout)).unwrap_or_default(),
            equipment: equipment_sheet
                .map(|sheet| extract_rows(sheet, layout))
                .unwrap_or_default(),
        };

        if workbook.worker.is_empty() && workbook.equipment.is_empty() {
            return Err(RuleSourceError::EmptyExtraction);
        }

        tracing::info!(
            worker_rows = workbook.worker.len(),
            equipment_rows = workbook.equipment.len(),
            "rule workbook loaded"
        );

        Ok(workbook)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SheetStructure {
    header_row: usize,
    document_column: usize,
    criteria_column: usize,
    descriptor_column: Option<usize>,
}

/// Scores candidate header rows: "documento" exact hit weighs 10, substring
/// 2; criteria-like keywords weigh 5. The best row above the threshold wins,
/// otherwise the configured fallback layout applies.
fn detect_structure(rows: &[Vec<String>], layout: WorkbookLayout) -> SheetStructure {
    let mut best_score = -1;
    let mut best = SheetStructure {
        header_row: 0,
        document_column: layout.document_column,
        criteria_column: layout.criteria_column,
        descriptor_column: None,
    };

    for (row_index, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let mut score = 0;
        let mut document_column = None;
        let mut criteria_column = None;
        let mut descriptor_column = None;

        for (column, cell) in row.iter().enumerate() {
            let value = fold_label(cell);
            if value.is_empty() {
                continue;
            }

            if value == "documento" || value == "documentos" {
                score += 10;
                document_column = Some(column);
            } else if value.contains("documento") {
                score += 2;
                document_column = document_column.or(Some(column));
            }

            if ["criterio", "validacao", "requisito", "avaliacao"]
                .iter()
                .any(|needle| value.contains(needle))
            {
                score += 5;
                criteria_column = Some(column);
            }

            if value.contains("vencimento") || value.contains("validade") {
                descriptor_column = descriptor_column.or(Some(column));
            }
        }

        if score > best_score {
            best_score = score;
            let document_column = document_column.unwrap_or(layout.document_column);
            best = SheetStructure {
                header_row: row_index,
                document_column,
                // Criteria follow the document two columns over in the
                // standard A -> C template.
                criteria_column: criteria_column.unwrap_or(document_column + 2),
                descriptor_column,
            };
        }
    }

    if best_score >= HEADER_SCORE_THRESHOLD {
        best
    } else {
        SheetStructure {
            header_row: 0,
            document_column: layout.document_column,
            criteria_column: layout.criteria_column,
            descriptor_column: None,
        }
    }
}

fn extract_rows(sheet: &Sheet, layout: WorkbookLayout) -> Vec<WorkbookRow> {
    let structure = detect_structure(&sheet.rows, layout);
    let cell = |row: &Vec<String>, index: usize| -> String {
        row.get(index).map(|value| value.trim().to_string()).unwrap_or_default()
    };

    sheet
        .rows
        .iter()
        .skip(structure.header_row + 1)
        .map(|row| WorkbookRow {
            document: cell(row, structure.document_column),
            descriptor: structure
                .descriptor_column
                .map(|index| cell(row, index))
                .unwrap_or_default(),
            criteria: cell(row, structure.criteria_column),
        })
        .filter(|row| {
            let folded = fold_label(&row.document);
            // Drop blanks and repeated header lines; empty criteria cells are
            // kept so merged-cell layouts still surface the document.
            !row.document.is_empty() && folded != "documento" && folded != "documentos"
        })
        .collect()
}

/// Collapses rows sharing a document name into one rule: distinct non-empty
/// criteria texts are joined with a newline in first-seen order, and the
/// first non-empty descriptor wins.
pub(crate) fn merge_rows(rows: &[WorkbookRow]) -> Vec<DocumentRule> {
    let mut merged: Vec<DocumentRule> = Vec::new();

    for row in rows {
        let key = fold_label(&row.document);
        if let Some(existing) = merged
            .iter_mut()
            .find(|rule| fold_label(&rule.document_name) == key)
        {
            if !row.criteria.is_empty()
                && !existing
                    .criteria_text
                    .split('\n')
                    .any(|line| line == row.criteria)
            {
                if !existing.criteria_text.is_empty() {
                    existing.criteria_text.push('\n');
                }
                existing.criteria_text.push_str(&row.criteria);
            }
            if existing.expiration_descriptor.is_empty() && !row.descriptor.is_empty() {
                existing.expiration_descriptor = row.descriptor.clone();
            }
        } else {
            merged.push(DocumentRule {
                document_name: row.document.clone(),
                expiration_descriptor: row.descriptor.clone(),
                criteria_text: row.criteria.clone(),
            });
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
        Sheet {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn detects_header_row_and_columns_by_score() {
        let rows = vec![
            vec!["Planilha de Controle".to_string()],
            vec![String::new()],
            vec![
                "Documento".to_string(),
                "Vencimento".to_string(),
                "Critérios de Validação".to_string(),
            ],
            vec!["ASO".to_string(), "Anual".to_string(), "Itens do ASO".to_string()],
        ];

        let structure = detect_structure(&rows, WorkbookLayout::default());
        assert_eq!(structure.header_row, 2);
        assert_eq!(structure.document_column, 0);
        assert_eq!(structure.criteria_column, 2);
        assert_eq!(structure.descriptor_column, Some(1));
    }

    #[test]
    fn falls_back_to_configured_layout_when_no_header_scores() {
        let rows = vec![
            vec!["ASO".to_string(), String::new(), "Itens".to_string()],
            vec!["NR 10".to_string(), String::new(), "Outros itens".to_string()],
        ];

        let structure = detect_structure(&rows, WorkbookLayout::default());
        assert_eq!(structure.header_row, 0);
        assert_eq!(structure.document_column, 0);
        assert_eq!(structure.criteria_column, 2);
        assert_eq!(structure.descriptor_column, None);
    }

    #[test]
    fn extracts_rows_after_header_and_skips_repeated_headers() {
        let sheet = sheet(
            "Empregado",
            &[
                &["Documento", "Vencimento", "Critérios"],
                &["ASO", "Anual", "Itens do ASO"],
                &["documento", "", ""],
                &["", "", "orfão"],
                &["NR 10", "Bienal", ""],
            ],
        );

        let rows = extract_rows(&sheet, WorkbookLayout::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].document, "ASO");
        assert_eq!(rows[0].descriptor, "Anual");
        assert_eq!(rows[1].document, "NR 10");
        assert_eq!(rows[1].criteria, "");
    }

    #[test]
    fn merge_deduplicates_identical_criteria() {
        let rows = vec![
            WorkbookRow {
                document: "NR 10".to_string(),
                descriptor: "Bienal".to_string(),
                criteria: "A".to_string(),
            },
            WorkbookRow {
                document: "nr 10".to_string(),
                descriptor: String::new(),
                criteria: "A".to_string(),
            },
        ];

        let merged = merge_rows(&rows);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].criteria_text, "A");
        assert_eq!(merged[0].expiration_descriptor, "Bienal");
    }

    #[test]
    fn merge_joins_distinct_criteria_in_order() {
        let rows = vec![
            WorkbookRow {
                document: "NR 10".to_string(),
                descriptor: String::new(),
                criteria: "A".to_string(),
            },
            WorkbookRow {
                document: "NR 10".to_string(),
                descriptor: String::new(),
                criteria: "B".to_string(),
            },
        ];

        let merged = merge_rows(&rows);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].criteria_text, "A\nB");
    }

    #[test]
    fn rejects_workbook_without_recognized_sheets() {
        let sheets = vec![sheet("Resumo", &[&["Documento", "Critérios"]])];
        let err = RuleWorkbook::from_sheets(&sheets, WorkbookLayout::default()).unwrap_err();
        assert!(matches!(err, RuleSourceError::NoRecognizedSheets));
    }

    #[test]
    fn rejects_workbook_with_empty_extraction() {
        let sheets = vec![sheet("Empregado", &[&["Documento", "Vencimento", "Critérios"]])];
        let err = RuleWorkbook::from_sheets(&sheets, WorkbookLayout::default()).unwrap_err();
        assert!(matches!(err, RuleSourceError::EmptyExtraction));
    }

    #[test]
    fn recognizes_accented_sheet_names() {
        let sheets = vec![sheet(
            "Máquinas e Equipamentos",
            &[
                &["Documento", "Vencimento", "Critérios"],
                &["Laudo NR13", "Anual", "Itens do laudo"],
            ],
        )];

        let workbook = RuleWorkbook::from_sheets(&sheets, WorkbookLayout::default()).unwrap();
        assert!(workbook.worker.is_empty());
        assert_eq!(workbook.equipment.len(), 1);
        assert_eq!(workbook.equipment[0].document, "Laudo NR13");
    }
}
