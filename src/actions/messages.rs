//! User-facing reply texts (pt-BR).

use crate::github::issues::Issue;

pub const GOOD_FIRST_ISSUE_LABEL: &str = "good first issue";
pub const TOP_LABELS_COUNT: usize = 5;

pub const UPSTREAM_FAILURE: &str = "Desculpe, ocorreu um erro ao obter as informações do GitHub.";
pub const LABEL_NOT_IDENTIFIED: &str = "Desculpe, não foi possível identificar a label escolhida.";

pub fn top_labels(ranked: &[(String, usize)], project: &str) -> String {
    if ranked.is_empty() {
        return format!("Nenhuma atividade encontrada para as labels no projeto {project}.");
    }
    let mut message = String::from("As 5 labels com mais atividades associadas são:\n");
    for (label, count) in ranked {
        message.push_str(&format!("- {label}: {count} atividades\n"));
    }
    message
}

pub fn good_first_issues(issues: &[&Issue], project: &str) -> String {
    if issues.is_empty() {
        return format!(
            "Nenhuma atividade encontrada vinculada à label 'Good First Issue' no projeto {project}."
        );
    }
    issue_list(
        "Aqui estão as atividades vinculadas à label 'Good First Issue':\n",
        issues,
    )
}

pub fn issues_by_label(issues: &[&Issue], label: &str, project: &str) -> String {
    if issues.is_empty() {
        return format!(
            "Nenhuma atividade encontrada vinculada à label '{label}' no projeto {project}."
        );
    }
    issue_list(
        &format!("Aqui estão as atividades vinculadas à label '{label}':\n"),
        issues,
    )
}

fn issue_list(header: &str, issues: &[&Issue]) -> String {
    issues.iter().fold(header.to_string(), |mut message, issue| {
        message.push_str(&format!("- {}: {}\n", issue.title, issue.url));
        message
    })
}
