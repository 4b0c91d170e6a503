//! Instruction-payload composition.
//!
//! Merges the rule's criteria text with a validity directive block selected
//! by policy. The directive wording is an external contract with the
//! evaluator (it is read by a language model, not parsed by machines), so
//! the templates keep the exact operative phrasing, dates rendered
//! dd/mm/yyyy.

use super::validity::{ValidityPolicy, ValidityWindow, WindowLength};

/// Upper bound on the composed payload handed to the evaluator. Trailing
/// content is dropped silently; this bounds request size and cost, not
/// correctness.
pub const MAX_INSTRUCTION_CHARS: usize = 5000;

/// Builds the full instruction payload: base criteria, a blank line, then
/// the policy directive, truncated to [`MAX_INSTRUCTION_CHARS`].
pub fn compose(base_criteria: &str, policy: &ValidityPolicy, window: &ValidityWindow) -> String {
    let directive = directive_block(policy, window);
    let payload = format!("{base_criteria}\n\n{directive}");
    truncate_chars(&payload, MAX_INSTRUCTION_CHARS)
}

fn directive_block(policy: &ValidityPolicy, window: &ValidityWindow) -> String {
    let reference = window.reference_label();
    let cutoff = window.cutoff_label().unwrap_or_default();

    match policy {
        ValidityPolicy::Nr33(length) => {
            let (period_label, years_label) = match length {
                WindowLength::TwoYears => ("BIENAL / 2 ANOS", "2 anos atrás"),
                _ => ("ANUAL / 1 ANO", "1 ano atrás"),
            };
            format!(
                "ALERTA DE DOCUMENTO NR33 - REQUISITOS OBRIGATÓRIOS:\n\
                 1. Nome e Assinatura do Trabalhador: EXTRAIA O NOME COMPLETO.\n\
                 2. Conteúdo Programático: Deve estar presente.\n\
                 3. Carga Horária: FORMAÇÃO/INICIAL (40h) ou RECICLAGEM (08h).\n\
                 4. Data e Validade ({period_label}):\n\
                 \x20   - Data Referência: {reference}\n\
                 \x20   - Data Limite ({years_label}): {cutoff}\n\
                 \x20   - COMPARE a data do curso com {cutoff}.\n\
                 \x20   - Se anterior: VENCIDO (NOK). Se posterior: VÁLIDO (OK).\n\
                 \x20   - Obs: \"Data: DD/MM/AAAA - Status: [Válido/Vencido]\".\n\
                 5. Local de Realização: Identifique.\n\
                 6. Nome e Assinatura do Instrutor: EXTRAIA NOME e FUNÇÃO.\n\
                 7. Assinatura do Responsável Técnico: EXTRAIA NOME."
            )
        }
        ValidityPolicy::NameOverrideBiennial | ValidityPolicy::FixedWindow(WindowLength::TwoYears) => {
            fixed_window_block("BIENAL (2 ANOS)", "2 anos atrás", &reference, &cutoff)
        }
        ValidityPolicy::NameOverrideAnnual | ValidityPolicy::FixedWindow(WindowLength::OneYear) => {
            fixed_window_block("ANUAL (1 ANO)", "1 ano atrás", &reference, &cutoff)
        }
        ValidityPolicy::FixedWindow(WindowLength::SixMonths) => {
            fixed_window_block("SEMESTRAL (6 MESES)", "6 meses atrás", &reference, &cutoff)
        }
        ValidityPolicy::PrintedExpiry => format!(
            "ALERTA: VERIFIQUE A DATA DE VALIDADE IMPRESSA NO DOCUMENTO.\n\
             Data de hoje: {reference}.\n\
             Se a data de validade/vencimento impressa for anterior a hoje, está VENCIDO (NOK)."
        ),
        ValidityPolicy::GenericTextual { descriptor } => format!(
            "Regra de Vencimento informada: \"{descriptor}\".\n\
             Verifique se o documento atende a essa regra. Se for \"Não expira\" ou \"-\", a data é informativa (OK)."
        ),
    }
}

fn fixed_window_block(period_label: &str, ago_label: &str, reference: &str, cutoff: &str) -> String {
    format!(
        "ALERTA VALIDADE {period_label} - REQUISITOS OBRIGATÓRIOS:\n\
         1. Nome e Assinatura do Trabalhador.\n\
         2. Conteúdo Programático.\n\
         3. Data e Validade ({period_label}):\n\
         \x20   - Data Referência: {reference}\n\
         \x20   - Data Limite ({ago_label}): {cutoff}\n\
         \x20   - COMPARE a data do curso com {cutoff}.\n\
         \x20   - Se data curso < {cutoff} -> STATUS: VENCIDO (NOK).\n\
         \x20   - Se data curso >= {cutoff} -> STATUS: VÁLIDO (OK).\n\
         \x20   - Obs: \"Data: DD/MM/AAAA - Status: [Válido/Vencido]\"."
    )
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        value.chars().take(max_chars).collect()
    }
}
