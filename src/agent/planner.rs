// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PARSER DA RESPOSTA DE PLANEJAMENTO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Extrai plano e sub-questions do texto livre retornado pelo estágio de
// planejamento. Função pura, varredura linha a linha; nunca falha — a
// política de fallback garante sempre um resultado utilizável.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use regex::Regex;

/// Seção ativa durante a varredura
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Plan,
    SubQuestions,
}

/// Marcadores de item de lista reconhecidos dentro da seção de plano
fn is_list_marker(line: &str) -> bool {
    const NUMBERED: [&str; 5] = ["1.", "2.", "3.", "4.", "5."];
    NUMBERED.iter().any(|prefix| line.starts_with(prefix)) || line.starts_with('-')
}

/// Extrai todas as substrings entre aspas duplas
fn quoted_substrings(raw: &str) -> Vec<String> {
    match Regex::new(r#""([^"]*)""#) {
        Ok(re) => re
            .captures_iter(raw)
            .map(|cap| cap[1].to_string())
            .collect(),
        // Padrão é constante e válido; o braço existe só para evitar panic
        Err(_) => Vec::new(),
    }
}

/// Faz o parse da resposta do agente de planejamento.
///
/// Varre o texto linha a linha com duas seções:
/// - Uma linha contendo `PLAN:` (case-insensitive) abre a seção de plano;
///   o texto após o primeiro `:` vira o plano inicial, se não vazio.
/// - Uma linha contendo `SUB-QUESTION` ou `SUB QUESTION` abre a seção de
///   sub-questions sem contribuir texto.
/// - Na seção de plano, linhas que não começam com marcador de lista
///   (`1.`-`5.` ou `-`) são concatenadas ao plano com espaço.
/// - Na seção de sub-questions, linhas iniciadas por dígito ou `-` têm
///   numeração/pontuação inicial e aspas removidas; o restante, se não
///   vazio, entra na lista em ordem de encontro. A numeração não precisa
///   ser sequencial nem completa.
/// - Linhas que não casam com a seção ativa são ignoradas em silêncio.
///
/// Fallback: se NADA foi extraído, a resposta inteira vira o plano e as
/// sub-questions são as substrings entre aspas duplas; sem aspas, a lista
/// vira um único elemento com a resposta inteira.
pub fn parse_planning_response(response: &str) -> (String, Vec<String>) {
    let mut plan = String::new();
    let mut sub_questions: Vec<String> = Vec::new();
    let mut current_section = Section::None;

    for raw_line in response.lines() {
        let line = raw_line.trim();
        let upper = line.to_uppercase();

        if upper.contains("PLAN:") {
            current_section = Section::Plan;
            // Texto após o primeiro ':' vira o plano inicial
            if let Some(plan_text) = line.splitn(2, ':').nth(1) {
                let plan_text = plan_text.trim();
                if !plan_text.is_empty() {
                    plan = plan_text.to_string();
                }
            }
            continue;
        }

        if upper.contains("SUB-QUESTION") || upper.contains("SUB QUESTION") {
            current_section = Section::SubQuestions;
            continue;
        }

        match current_section {
            Section::Plan if !line.is_empty() => {
                if !is_list_marker(line) {
                    plan.push(' ');
                    plan.push_str(line);
                }
            }
            Section::SubQuestions if !line.is_empty() => {
                let starts_like_item = line
                    .chars()
                    .next()
                    .map(|c| c.is_ascii_digit())
                    .unwrap_or(false)
                    || line.starts_with('-');

                if starts_like_item {
                    let cleaned = line
                        .trim_start_matches(|c: char| {
                            c.is_ascii_digit() || c == '.' || c == '-' || c == ')' || c == ' '
                        })
                        .trim_matches(|c: char| c == '"' || c == '\'');
                    if !cleaned.is_empty() {
                        sub_questions.push(cleaned.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    // Fallback: parse não produziu nada — resposta inteira vira o plano
    if plan.is_empty() && sub_questions.is_empty() {
        plan = response.to_string();
        let quoted = quoted_substrings(response);
        sub_questions = if quoted.is_empty() {
            vec![response.to_string()]
        } else {
            quoted
        };
    }

    (plan.trim().to_string(), sub_questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_response() {
        let response = r#"PLAN: Search for X.

SUB-QUESTIONS:
1. "alpha"
2. "beta"
"#;
        let (plan, subs) = parse_planning_response(response);
        assert_eq!(plan, "Search for X.");
        assert_eq!(subs, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_case_insensitive_markers() {
        let response = "plan: lowercase strategy\nsub-questions:\n1. first\n2. second";
        let (plan, subs) = parse_planning_response(response);
        assert_eq!(plan, "lowercase strategy");
        assert_eq!(subs, vec!["first", "second"]);
    }

    #[test]
    fn test_sub_question_space_form_marker() {
        let response = "PLAN: strategy\nSUB QUESTIONS\n1. one";
        let (_, subs) = parse_planning_response(response);
        assert_eq!(subs, vec!["one"]);
    }

    #[test]
    fn test_plan_continuation_lines() {
        let response = "PLAN: First part.\nSecond part continues here.\nAnd a third.\n";
        let (plan, _) = parse_planning_response(response);
        assert_eq!(plan, "First part. Second part continues here. And a third.");
    }

    #[test]
    fn test_plan_marker_without_text_accumulates_continuations() {
        let response = "PLAN:\nonly continuation lines\nmake up the plan";
        let (plan, _) = parse_planning_response(response);
        assert_eq!(plan, "only continuation lines make up the plan");
    }

    #[test]
    fn test_plan_skips_list_markers() {
        let response = "PLAN: Strategy text.\n1. this is dropped\n- this too\nbut this stays";
        let (plan, _) = parse_planning_response(response);
        assert_eq!(plan, "Strategy text. but this stays");
    }

    #[test]
    fn test_sub_questions_drop_non_list_lines() {
        let response =
            "PLAN: p\nSUB-QUESTIONS:\nsome commentary the model added\n1. \"kept\"\nmore prose";
        let (_, subs) = parse_planning_response(response);
        assert_eq!(subs, vec!["kept"]);
    }

    #[test]
    fn test_non_sequential_numbering_accepted() {
        let response = "PLAN: p\nSUB-QUESTIONS:\n3. third\n7. seventh\n1. first";
        let (_, subs) = parse_planning_response(response);
        assert_eq!(subs, vec!["third", "seventh", "first"]);
    }

    #[test]
    fn test_dash_items_and_single_quotes() {
        let response = "PLAN: p\nSUB-QUESTIONS:\n- 'dash item'\n- another";
        let (_, subs) = parse_planning_response(response);
        assert_eq!(subs, vec!["dash item", "another"]);
    }

    #[test]
    fn test_fallback_quoted_substrings() {
        let response = "No markers here, but it mentions \"gamma\" and \"delta\" inline.";
        let (plan, subs) = parse_planning_response(response);
        assert_eq!(plan, response.trim());
        assert_eq!(subs, vec!["gamma", "delta"]);
    }

    #[test]
    fn test_fallback_no_quotes_single_element() {
        let response = "Plain text with no markers and no quotes at all.";
        let (plan, subs) = parse_planning_response(response);
        assert_eq!(plan, response);
        assert_eq!(subs, vec![response.to_string()]);
    }

    #[test]
    fn test_empty_input() {
        let (plan, subs) = parse_planning_response("");
        assert_eq!(plan, "");
        assert_eq!(subs, vec!["".to_string()]);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let response = "PLAN: Search for X.\nSUB-QUESTIONS:\n1. \"alpha\"\n2. \"beta\"";
        let first = parse_planning_response(response);
        let second = parse_planning_response(response);
        assert_eq!(first, second);
    }

    #[test]
    fn test_multi_item_list_not_collapsed() {
        let response = r#"PLAN: Two distinct parts need separate searches.

SUB-QUESTIONS:
1. "vector database advantages benefits"
2. "vector database vs relational database comparison"
3. "vector database scalability architecture"
"#;
        let (_, subs) = parse_planning_response(response);
        assert_eq!(subs.len(), 3);
    }
}
