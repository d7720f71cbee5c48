//! Post-processing of extracted response text
//!
//! Reasoning models served through vLLM often prefix their answer with a
//! `<think>...</think>` section. Display code and parsers want it gone.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static THINK_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-tag regex"));

static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-+$").expect("valid separator regex"));

static QUESTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^###\s*\d+\.\s*").expect("valid heading regex"));

/// A question and its answer, as parsed from a numbered markdown list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Remove every `<think>...</think>` region and trim the result.
///
/// ```rust
/// use vision_chat::strip_think_tags;
///
/// let raw = "<think>\nThe user wants a greeting.\n</think>\n\nHello!";
/// assert_eq!(strip_think_tags(raw), "Hello!");
/// ```
pub fn strip_think_tags(text: &str) -> String {
    THINK_TAGS.replace_all(text, "").trim().to_string()
}

/// Parse numbered question/answer sections.
///
/// Expects the shape models produce when asked for recall questions:
///
/// ```text
/// <think>...</think>        (optional, removed)
///
/// ### 1. What did the user open first?
/// The Slack desktop app.
///
/// ---                       (optional separators, removed)
///
/// ### 2. Who replied?
/// Jonathan Li.
/// ```
///
/// The first line of each section is the question, the remaining lines the
/// answer. Sections with no content are skipped.
pub fn parse_qa_pairs(text: &str) -> Vec<QaPair> {
    let without_thinking = THINK_TAGS.replace_all(text, "");
    let normalized = without_thinking
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !SEPARATOR_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n");

    QUESTION_HEADING
        .split(&normalized)
        .map(str::trim)
        .filter(|section| !section.is_empty())
        .map(|section| {
            let (question, answer) = section.split_once('\n').unwrap_or((section, ""));
            let answer = answer
                .lines()
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n");
            QaPair {
                question: question.trim().to_string(),
                answer: answer.trim().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_think_tags_multiline() {
        let raw = "<think>\nstep one\nstep two\n</think>\nFinal answer";
        assert_eq!(strip_think_tags(raw), "Final answer");
    }

    #[test]
    fn test_strip_think_tags_multiple_regions() {
        let raw = "<think>a</think>Hello <think>b</think>world";
        assert_eq!(strip_think_tags(raw), "Hello world");
    }

    #[test]
    fn test_strip_think_tags_without_tags() {
        assert_eq!(strip_think_tags("  plain text \n"), "plain text");
        // Unclosed tag is left alone
        assert_eq!(strip_think_tags("<think>unfinished"), "<think>unfinished");
    }

    #[test]
    fn test_parse_qa_pairs() {
        let raw = "<think>\nplanning\n</think>\n\n\
                   ### 1. What app is open?\n\
                   The Slack desktop app.   \n\n\
                   ---\n\n\
                   ### 2. Who replied?\n\
                   Jonathan Li.\n\
                     He wrote \"no\".\n";

        let pairs = parse_qa_pairs(raw);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "What app is open?");
        assert_eq!(pairs[0].answer, "The Slack desktop app.");
        assert_eq!(pairs[1].question, "Who replied?");
        assert_eq!(pairs[1].answer, "Jonathan Li.\nHe wrote \"no\".");
    }

    #[test]
    fn test_parse_qa_pairs_question_without_answer() {
        let pairs = parse_qa_pairs("### 1. Only a question?");
        assert_eq!(
            pairs,
            vec![QaPair {
                question: "Only a question?".to_string(),
                answer: String::new(),
            }]
        );
    }

    #[test]
    fn test_parse_qa_pairs_empty() {
        assert!(parse_qa_pairs("").is_empty());
        assert!(parse_qa_pairs("<think>nothing to see</think>").is_empty());
    }

    #[test]
    fn test_qa_pair_serialization() {
        let pair = QaPair {
            question: "Q?".to_string(),
            answer: "A.".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&pair).unwrap(),
            r#"{"question":"Q?","answer":"A."}"#
        );
    }
}
