//! Built-in worker parametrization table.
//!
//! Mirrors the compliance spreadsheet maintained by the HSE team: document
//! label, raw expiration descriptor, and the checklist text handed to the
//! evaluator. Descriptors are free text on purpose; interpretation happens in
//! the validity resolver.

use crate::workflows::certification::domain::DocumentRule;

/// Training institutions accepted on certificates.
pub const ALLOWED_SCHOOLS: [&str; 9] = [
    "TASK",
    "SENAI",
    "PROALTITUDE",
    "MAERSK",
    "STORZ",
    "PREVENT WORK",
    "CT Profissional",
    "CTAR",
    "VESTAS",
];

fn rule(document_name: &str, expiration_descriptor: &str, criteria_text: &str) -> DocumentRule {
    DocumentRule {
        document_name: document_name.to_string(),
        expiration_descriptor: expiration_descriptor.to_string(),
        criteria_text: criteria_text.to_string(),
    }
}

pub(crate) fn worker_rules() -> Vec<DocumentRule> {
    vec![
        rule(
            "Identificação Pessoal",
            "CNH = Validade do documento\nRG + CPF = Não aplicável.",
            "CNH = Colaboradores Vestas\nCNH ou RG + CPF = Fornecedores Terceiros\nNota: Imagens infantis serão recusadas.",
        ),
        rule(
            "Cartão de Vacina",
            "-",
            "Esquema Vacinal completo, incluso prevenção contra COVID.\n\nNota: Hepatite B (03 doses); Febre Amarela (01 dose); DT - Difteria e Tétano (03 doses e reforço à cada 10 anos); Tríplice Viral (02 doses).",
        ),
        rule(
            "Cartão do SUS",
            "-",
            "Nº do cartão e Nome do colaborador",
        ),
        rule(
            "Formação Profissional + Conselho de Classe",
            "-",
            "Formação Profissional (Habilitação Profissional)\n01 - Certificado/Diploma de formação expedido por Instituição Oficial de Ensino.\n\nConselho de Classe\n - CFT/CRT = Téc. de O&M; Téc. de Blades\n - COREN = Técnico Enfermagem\n - MTE = Técnico Segurança\n - CREA = Engenheiro",
        ),
        rule(
            "Formação Específica",
            "Validade do documento\n(02 Anos - Reparador de Blade;\n02 Anos - Piloto de Drone)",
            "01 - Certificado/Diploma expedido por Instituição Oficial de Ensino (Qualificação Profissional)\na) Identificação do equipamento, quando aplicável;\nb) Conteúdo programático;\nc) Carga horária;\nd) Data;\ne) Local do treinamento;\nf) Nome e assinatura do Aluno, Instrutor e Responsável Técnico.\ng) Documento legível, sem rasuras e em pdf.",
        ),
        rule(
            "Vínculo Empregatício",
            "-",
            "CTPS + Ficha de Registro\nNota: Dados do Empregado(a), Cargo, Data de admissão.",
        ),
        rule(
            "ASO",
            "Anual",
            "01 - O ASO deve conter no mínimo:\na) razão social e CNPJ ou CAEPF da organização;\nb) nome completo do empregado, o número de seu CPF e seu cargo/função;\nc) a descrição dos perigos ou fatores de risco identificados no PGR;\nd) indicação e data dos exames ocupacionais clínicos e complementares;\ne) definição de apto ou inapto para a função do empregado;\nf) nome e número de registro profissional do médico responsável pelo PCMSO;\ng) data, número de registro profissional e assinatura do médico examinador;\nh) aptidões específicas, quando aplicável;\ni) Documento legível, sem rasuras e em pdf.",
        ),
        rule(
            "Plano de Saúde",
            "",
            "01 - Dados do Colaborador\n01 - Vigência",
        ),
        rule(
            "Registro de Integração no Campo",
            "Anual - Por Site.",
            "1. FR120/0108-2929;\n2. Título;\n3. Tipo de treinamento;\n4. Se houver acesso a turbina, identificá-la;\n5. Iniciais do multiplicador;\n6. Nome do participante;\n7. Empresa do participante;\n8. Assinatura do participante;\n9. Assinatura do multiplicador;\n10. Data e local.",
        ),
        rule(
            "SIT - Safety Introdution for Technicians",
            "Bienal para subcontratados / Não expira VESTAS",
            "01 - Nome e assinatura do colaborador;\n02 - Conteúdo programático;\n03 - Data de conclusão do treinamento;\n04 - Local de realização do treinamento;\n05 - Nome e assinatura dos Instrutores;\n06 - Nome e assinatura do responsável técnico;\n07 - Documento legível, sem rasuras e em pdf.",
        ),
        rule(
            "Ordem de Serviço",
            "Mudança de Função",
            "01 - Nome e função do trabalhador;\n02 - Atividades descritas de acordo com o PGR;\n03 - Riscos ocupacionais compatíveis com o PGR/Inventário de risco;\n04 - EPIs compatíveis com os indicados no PGR;\n05 - Documento datado (emissão não anterior à admissão);\n06 - Assinatura do trabalhador e do responsável do HSE;\n07 - Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "Ficha de Entrega do Equipamento de Proteção Individual - EPI",
            "6 meses",
            "01 - Nome e Função do Colaborador;\n02 - Descrição dos EPIs, número do CA e data de entrega;\n03 - Assinado e datado pelo trabalhador (termo de responsabilidade);\n04 - Documento legível e sem rasuras;\n05 - Documento em PDF.",
        ),
        rule(
            "Direção Defensiva - Formação/Reciclagem",
            "Bienal",
            "01 - Nome e assinatura do trabalhador;\n02 - Conteúdo programático teórico e prático;\n03 - Carga horária formação 08hs/reciclagem 08hs;\n04 - Data;\n05 - Local de realização do treinamento;\n06 - Nome e qualificação dos instrutores;\n07 - Assinatura do responsável técnico do treinamento.",
        ),
        rule(
            "NR 10 - Certificado de Capacitação",
            "Bienal",
            "01 - Nome e assinatura do colaborador;\n02 - Conteúdo programático;\n03 - Carga horária de 40 horas e reciclagem 08hs;\n04 - Data e Local do treinamento;\n05 - Nome e qualificação dos Instrutores;\n06 - Nome e assinatura do Responsável Técnico;\n07 - Documento legível, sem rasuras e em PDF.\n\nNota: Conteúdo programático conforme Anexo III da NR10.",
        ),
        rule(
            "NR 10 - Carta de Anuência",
            "Mudança de Função",
            "1. Nome do colaborador;\n2. Autorização para trabalho em eletricidade (NR 10);\n3. Anuência emitida após a conclusão da capacitação;\n4. Data da emissão;\n5. Assinatura do representante de HSE;\n6. Assinatura do representante da área de elétrica;\n7. Assinatura do trabalhador;\n8. Função do trabalhador;\n9. Abrangência e limitações da autorização;\n10. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "NR 10 SEP - Formação/reciclagem.",
            "Bienal",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático (Anexo III - NR10, Curso Básico);\n3. Formação carga horária 40hs/Reciclagem 08hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento;\n8. Reciclagem aceita mediante certificado de formação;\n9. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "NR 10 SEP - Carta de Anuência",
            "Mudança de Função",
            "1. Nome do colaborador;\n2. Autorização para trabalho em eletricidade (NR10/SEP);\n3. Anuência emitida após a conclusão da capacitação;\n4. Data da emissão;\n5. Assinatura do representante de HSE;\n6. Assinatura do representante da área de elétrica;\n7. Assinatura do trabalhador;\n8. Função do trabalhador;\n9. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "BTT - VESTAS",
            "Não possui reciclagem",
            "1. Nome do Colaborador;\n2. Documento legível;\n3. Documento sem rasuras;\n4. Documento em PDF.",
        ),
        rule(
            "BTT - Escola parceira",
            "Não possui reciclagem",
            "1. Nome do trabalhador;\n2. Conteúdo programático definido pelo empregador;\n3. Carga horária: Elétrica 8hs, Mecânica 13hs, Hidráulica 08hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e formação profissional do(s) instrutor(es);\n7. Nome e assinatura do responsável técnico.",
        ),
        rule(
            "NR 11 - Formação/Reciclagem.",
            "Bienal",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático definido pelo empregador;\n3. Carga horária formação 02hs/reciclagem 02hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento.",
        ),
        rule(
            "Cartão de Autorização de Uso de Veículo Industrial (NR11)",
            "Anual",
            "1. Nome em lugar visível;\n2. Fotografia em lugar visível;\n3. Autorização para uso de veículo industrial;\n4. Data do início da vigência/autorização;\n5. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "NR 12 - Formação/Reciclagem",
            "Bienal",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático (Anexo II da NR12);\n3. Carga horária formação 02hs/reciclagem 02hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento.",
        ),
        rule(
            "NR 12 - Carta de Anuência",
            "Mudança de Função",
            "1. Nome do colaborador;\n2. Autorização para trabalho em máquinas e equipamentos (NR12);\n3. Anuência emitida após a conclusão da capacitação;\n4. Data da emissão;\n5. Assinatura do representante de HSE;\n6. Assinatura do trabalhador;\n7. Função do colaborador;\n8. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "NR 17",
            "-",
            "Obs: Certificação GWO contempla",
        ),
        rule(
            "NR33/Supervisor - Formação/reciclagem.",
            "Anual",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático (Quadro I - NR33);\n3. Carga horária formação 40hs/Reciclagem 08hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento;\n8. Reciclagem aceita mediante certificado de formação;\n9. Somente escolas homologadas: TASK, SENAI, PROALTITUDE, MAERSK, STORZ, PREVENT WORK, CT Profissional e CTAR.",
        ),
        rule(
            "Carta de Anuência - NR 33",
            "Anual",
            "1. Nome do colaborador;\n2. Autorização para trabalho em espaços confinados (NR33);\n3. Anuência emitida após a conclusão da capacitação;\n4. Data da emissão;\n5. Assinatura do representante de HSE;\n6. Assinatura do trabalhador;\n7. Função do colaborador;\n8. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "NR 35 - Formação/Reciclagem",
            "-",
            "-",
        ),
        rule(
            "NR 35 - Carta de Anuência",
            "Mudança de Função",
            "1. Nome do colaborador;\n2. Autorização para trabalho em altura (NR35);\n3. Anuência emitida após a conclusão da capacitação;\n4. Data da emissão;\n5. Assinatura do representante de HSE;\n6. Assinatura do trabalhador;\n7. Função do trabalhador;\n8. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "Lift User",
            "Não expira VESTAS",
            "1. Nome e assinatura do colaborador;\n2. Conteúdo programático;\n3. Data de conclusão do treinamento;\n4. Local de realização do treinamento;\n5. Nome e qualificação dos Instrutores;\n6. Nome e assinatura do responsável técnico;\n7. Documento legível, sem rasuras e em PDF.",
        ),
        rule(
            "Inspetor Competente (EPI Altura) - Formação/Reciclagem",
            "Bienal",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático;\n3. Carga horária formação 16hs/reciclagem 16hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento.",
        ),
        rule(
            "Certificado de Operador de Elevador (ARTAMA A400 | USIMAQ | AVANTI | POWER CLIMBER)",
            "Anual",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático;\n3. Carga horária formação 16hs/Reciclagem 16hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento.\n\nOBS: Para a plataforma AVANTI, considerar apenas o certificado expedido pela AVANTI.",
        ),
        rule(
            "Certificado de Primeiros Socorros",
            "Bienal",
            "1. Nome do trabalhador;\n2. Conteúdo programático definido pelo empregador;\n3. Carga horária 04hs/Reciclagem 04hs;\n4. Data;\n5. Local;\n6. Nome e formação profissional do(s) instrutor(es);\n7. Nome e assinatura do responsável técnico do curso.",
        ),
        rule(
            "Certificado de Combate a Incêndio",
            "Bienal",
            "1. Nome do trabalhador;\n2. Conteúdo programático definido pelo empregador;\n3. Carga horária 08hs/Reciclagem 08hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e formação profissional do(s) instrutor(es);\n7. Nome e assinatura do responsável técnico.",
        ),
        rule(
            "GWO/BST - Formação/Reciclagem.",
            "Bienal",
            "Certificado GWO\n1. Nome do colaborador;\n2. Número WINDA do colaborador;\n3. Número WINDA da Escola;\n4. Módulos realizados (Trabalho em Altura / Primeiros Socorros / Combate a Incêndio / Movimentação de Cargas);\n5. Data de realização do treinamento.\nCarga horária formação 32h / reciclagem 24h.\n\nMódulos:\n - Trabalho em Altura: Formação 16h / Reciclagem 08h (deve citar a NR35);\n - Primeiros Socorros: Formação 8h / Reciclagem 04h;\n - Combate a Incêndio: Formação 04h / Reciclagem 04h;\n - Movimentação de Cargas: Formação 04h / Reciclagem 04h.\n\nSomente escolas homologadas pela GWO - Global Wind Organization.",
        ),
        rule(
            "Inventário do material de acesso por corda",
            "N/A",
            "1. Lista dos materiais que o colaborador irá utilizar;\n2. A lista deve estar nominal ao colaborador.",
        ),
        rule(
            "Check list de inspeção de acesso por corda",
            "1 ano",
            "1. Check list informando que a corda está apta para ser utilizada;\n2. Deve estar assinado pelo responsável que realizou o check list.",
        ),
        rule(
            "Certificado IRATA/ANEAC/ABENDI",
            "Definida pela vigência da certificação",
            "1. Verificar no site da empresa certificadora (IRATA, ANEAC ou ABENDI);\n2. Verificar validade da certificação.",
        ),
        rule(
            "Checklist de Inspeção dos EPI's de altura",
            "Anual",
            "1. Nome ou iniciais do colaborador;\n2. Nome e assinatura do inspetor;\n3. Data da inspeção;\n4. Fabricante;\n5. Modelo;\n6. Número de série;\n7. Número do lote;\n8. Validar modelo e número de série com a Ficha de EPI;\n9. Documento legível, sem rasuras e em PDF.\n\nOBS: Cinturão, talabarte em \"Y\", corda de posicionamento e trava quedas devem pertencer ao mesmo fabricante.",
        ),
        rule(
            "ESO - Electrical Safety for Ordinary",
            "Bienal para subcontratados / Não expira VESTAS",
            "1. Nome do Colaborador;\n2. Documento legível;\n3. Documento sem rasuras;\n4. Documento em PDF.",
        ),
        rule(
            "ESQ",
            "Bienal",
            "1. Nome do Colaborador;\n2. Documento legível;\n3. Documento sem rasuras;\n4. Documento em PDF.",
        ),
        rule(
            "LOTO - Escola Parceira",
            "Anual",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático definido pelo empregador;\n3. Carga horária formação 08hs/reciclagem 08hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento.",
        ),
        rule(
            "LOTO 2 - VESTAS",
            "Bienal",
            "1. Nome do Colaborador;\n2. Documento legível;\n3. Documento sem rasuras;\n4. Documento em PDF.",
        ),
        rule(
            "SAI",
            "Não expira VESTAS",
            "1. Nome do Colaborador;\n2. Documento legível;\n3. Documento sem rasuras;\n4. Documento em PDF.",
        ),
        rule(
            "FPA",
            "Bienal",
            "1. Nome do Colaborador;\n2. Documento legível;\n3. Documento sem rasuras;\n4. Documento em PDF.",
        ),
        rule(
            "HIGH VOLTAGE",
            "Não expira VESTAS",
            "1. Nome do Colaborador;\n2. Documento legível;\n3. Documento sem rasuras;\n4. Documento em PDF.",
        ),
        rule(
            "PT1 | PT2",
            "Bienal",
            "1. Nome e assinatura do trabalhador;\n2. Conteúdo programático;\n3. Carga horária formação 02hs/reciclagem 02hs;\n4. Data;\n5. Local de realização do treinamento;\n6. Nome e qualificação dos instrutores;\n7. Assinatura do responsável técnico do treinamento.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::certification::domain::fold_label;
    use std::collections::HashSet;

    #[test]
    fn builtin_table_has_unique_normalized_names() {
        let rules = worker_rules();
        let mut seen = HashSet::new();
        for entry in &rules {
            assert!(
                seen.insert(fold_label(&entry.document_name)),
                "duplicate document name: {}",
                entry.document_name
            );
        }
        assert!(rules.len() >= 40);
    }
}
