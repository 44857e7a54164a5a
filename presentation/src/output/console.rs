//! Console output formatter for question-chain runs

use colored::Colorize;
use qchain_domain::{LOGIC_SECTION_DELIMITER, SplitResponse};
use serde::Serialize;

/// Everything a terminal run produced, as printed in JSON mode
#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    pub subject: String,
    pub topic: String,
    pub model: String,
    /// Full questions-round reply
    pub questions: String,
    /// Reply text before the logic section
    pub questions_body: String,
    pub logic_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<String>,
}

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Questions body and logic section, for runs without live text
    pub fn format_questions(sections: &SplitResponse) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Questions"));
        output.push_str(sections.body.trim_end());
        output.push('\n');
        output.push_str(&Self::format_logic_section(sections));
        output
    }

    /// The logic section block, or a note that the reply had none
    pub fn format_logic_section(sections: &SplitResponse) -> String {
        match &sections.logic_section {
            Some(logic) => format!(
                "{}{}\n",
                Self::section_header("Logic"),
                Self::indent(logic.trim_end(), "  ")
            ),
            None => format!(
                "\n{} {}\n",
                "i".blue().bold(),
                format!("No \"{LOGIC_SECTION_DELIMITER}\" section found in the reply").dimmed()
            ),
        }
    }

    pub fn format_answers(answers: &str) -> String {
        format!(
            "{}{}\n",
            Self::section_header("Answers"),
            answers.trim_end()
        )
    }

    /// Format as JSON
    pub fn format_json(report: &ChainReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// One-line failure message for stderr
    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qchain_domain::split_logic_section;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn questions_with_logic_section() {
        plain();
        let sections = split_logic_section("1. Q1\n2. Q2\n关联逻辑说明：递进");
        let output = ConsoleFormatter::format_questions(&sections);

        assert!(output.contains("Questions"));
        assert!(output.contains("1. Q1\n2. Q2"));
        assert!(output.contains("Logic"));
        assert!(output.contains("  关联逻辑说明：递进"));
    }

    #[test]
    fn missing_logic_section_is_noted() {
        plain();
        let sections = split_logic_section("1. Q1");
        let output = ConsoleFormatter::format_logic_section(&sections);
        assert!(output.contains("No \"关联逻辑说明：\" section found"));
    }

    #[test]
    fn json_report_omits_missing_answers() {
        let report = ChainReport {
            subject: "初中物理".into(),
            topic: "凸透镜成像规律".into(),
            model: "openai/gpt-4o".into(),
            questions: "1. Q".into(),
            questions_body: "1. Q".into(),
            logic_section: None,
            answers: None,
        };
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&report)).unwrap();

        assert_eq!(value["subject"], "初中物理");
        assert!(value["logic_section"].is_null());
        assert!(value.get("answers").is_none());
    }

    #[test]
    fn indent_prefixes_every_line() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
