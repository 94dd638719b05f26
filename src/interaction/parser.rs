//! Slash-command text parsing.
//!
//! The first non-blank line is the summary, the remaining lines are the description,
//! and a bracketed severity tag anywhere in the summary (e.g. `[Alta]`) becomes the priority.

use crate::base::{
    config::EmptyCommandPolicy,
    error::{RelayError, RelayResult},
};

/// Summary used when the command text yields none.
pub const DEFAULT_SUMMARY: &str = "Ticket criado via Slack";
/// Description used when the command text is empty.
pub const DEFAULT_DESCRIPTION: &str = "Ticket criado automaticamente através do comando Slack";

/// Closed set of severity tags accepted in the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Baixa,
    Media,
    Alta,
    Critica,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Baixa, Severity::Media, Severity::Alta, Severity::Critica];

    /// Canonical spelling, as written in the tag set.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Baixa => "Baixa",
            Severity::Media => "Média",
            Severity::Alta => "Alta",
            Severity::Critica => "Crítica",
        }
    }

    /// Jira priority name this severity files as.
    pub fn tracker_priority(self) -> &'static str {
        match self {
            Severity::Baixa => "Low",
            Severity::Media => "Medium",
            Severity::Alta => "High",
            Severity::Critica => "Highest",
        }
    }

    /// Case-insensitive lookup of a tag's inner text.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.to_lowercase();
        Self::ALL.into_iter().find(|s| s.label().to_lowercase() == tag)
    }
}

/// Ticket fields derived from a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub summary: String,
    pub description: String,
    pub priority: Option<Severity>,
}

/// Parse command text into a [`TicketDraft`].
///
/// Total apart from empty input under [`EmptyCommandPolicy::Reject`].
pub fn parse(text: &str, policy: EmptyCommandPolicy) -> RelayResult<TicketDraft> {
    let mut lines = text.lines().map(str::trim_end).filter(|line| !line.trim().is_empty());

    let Some(first) = lines.next() else {
        return match policy {
            EmptyCommandPolicy::Default => Ok(TicketDraft {
                summary: DEFAULT_SUMMARY.to_string(),
                description: DEFAULT_DESCRIPTION.to_string(),
                priority: None,
            }),
            EmptyCommandPolicy::Reject => Err(RelayError::validation("Informe o título do ticket. Exemplo: /criar-ticket [Alta] Servidor fora do ar")),
        };
    };

    let first = first.trim();
    let rest = lines.collect::<Vec<_>>().join("\n");
    let rest = rest.trim();

    let description = if rest.is_empty() { first.to_string() } else { rest.to_string() };

    let (summary, priority) = strip_severity(first);
    let summary = if summary.is_empty() { DEFAULT_SUMMARY.to_string() } else { summary };

    Ok(TicketDraft { summary, description, priority })
}

/// Remove the first bracketed severity tag from `line`, collapsing the whitespace around it.
fn strip_severity(line: &str) -> (String, Option<Severity>) {
    let mut from = 0;

    while let Some(open) = line[from..].find('[').map(|i| i + from) {
        let Some(close) = line[open..].find(']').map(|i| i + open) else {
            break;
        };

        if let Some(severity) = Severity::from_tag(&line[open + 1..close]) {
            let before = line[..open].trim_end();
            let after = line[close + 1..].trim_start();

            let summary = match (before.is_empty(), after.is_empty()) {
                (true, _) => after.to_string(),
                (_, true) => before.to_string(),
                _ => format!("{before} {after}"),
            };

            return (summary, Some(severity));
        }

        from = open + 1;
    }

    (line.to_string(), None)
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_default(text: &str) -> TicketDraft {
        parse(text, EmptyCommandPolicy::Default).unwrap()
    }

    #[test]
    fn tagged_summary_with_body() {
        let draft = parse_default("[Alta] Server down\nUsers cannot log in");

        assert_eq!(
            draft,
            TicketDraft {
                summary: "Server down".to_string(),
                description: "Users cannot log in".to_string(),
                priority: Some(Severity::Alta),
            }
        );
        assert_eq!(draft.priority.map(Severity::label), Some("Alta"));
    }

    #[test]
    fn single_line_description_defaults_to_summary() {
        let draft = parse_default("Just one line");

        assert_eq!(draft.summary, "Just one line");
        assert_eq!(draft.description, "Just one line");
        assert_eq!(draft.priority, None);
    }

    #[test]
    fn empty_text_uses_placeholder_pair() {
        for text in ["", "   ", "\n \n"] {
            let draft = parse_default(text);

            assert_eq!(draft.summary, "Ticket criado via Slack");
            assert_eq!(draft.description, "Ticket criado automaticamente através do comando Slack");
            assert_eq!(draft.priority, None);
        }
    }

    #[test]
    fn empty_text_is_rejected_under_reject_policy() {
        let err = parse("", EmptyCommandPolicy::Reject).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));

        assert!(parse("x", EmptyCommandPolicy::Reject).is_ok());
    }

    #[test]
    fn tag_match_is_case_insensitive_and_canonicalized() {
        assert_eq!(parse_default("[alta] Disk full").priority, Some(Severity::Alta));
        assert_eq!(parse_default("[CRÍTICA] Disk full").priority.map(Severity::label), Some("Crítica"));
        assert_eq!(parse_default("[média] Disk full").priority.map(Severity::label), Some("Média"));
    }

    #[test]
    fn tag_in_the_middle_is_removed_with_its_spacing() {
        let draft = parse_default("Fix   [Baixa]   login page");

        assert_eq!(draft.summary, "Fix login page");
        assert_eq!(draft.priority, Some(Severity::Baixa));
    }

    #[test]
    fn unknown_tags_are_left_alone() {
        let draft = parse_default("[Urgente] [WIP] Disk full");

        assert_eq!(draft.summary, "[Urgente] [WIP] Disk full");
        assert_eq!(draft.priority, None);
    }

    #[test]
    fn only_first_severity_tag_is_consumed() {
        let draft = parse_default("[[Alta] Disk [Baixa] full");

        assert_eq!(draft.summary, "[ Disk [Baixa] full");
        assert_eq!(draft.priority, Some(Severity::Alta));
    }

    #[test]
    fn tag_only_summary_falls_back_to_placeholder() {
        let draft = parse_default("[Crítica]\nEverything is on fire");

        assert_eq!(draft.summary, DEFAULT_SUMMARY);
        assert_eq!(draft.description, "Everything is on fire");
        assert_eq!(draft.priority, Some(Severity::Critica));
    }

    #[test]
    fn description_keeps_tag_of_single_line() {
        // The description is taken before the tag is stripped.
        let draft = parse_default("[Alta] Server down");

        assert_eq!(draft.summary, "Server down");
        assert_eq!(draft.description, "[Alta] Server down");
    }

    #[test]
    fn blank_lines_are_dropped_from_description() {
        let draft = parse_default("\n  Title  \n\nline one\n   \nline two\r\n");

        assert_eq!(draft.summary, "Title");
        assert_eq!(draft.description, "line one\nline two");
    }

    #[test]
    fn severity_maps_to_tracker_priority() {
        let names: Vec<_> = Severity::ALL.into_iter().map(Severity::tracker_priority).collect();
        assert_eq!(names, ["Low", "Medium", "High", "Highest"]);
    }
}
