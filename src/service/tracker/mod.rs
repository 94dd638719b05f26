pub mod jira;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::base::error::RelayResult;

// Types.

/// A ticket description, either as plain text or as a rich-text document.
///
/// Jira Cloud's v3 API requires the document form; older deployments accept a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Plain(String),
    Document(RichTextDocument),
}

impl Description {
    /// Wrap `text` in a single-paragraph rich-text document.
    pub fn document(text: impl Into<String>) -> Self {
        Self::Document(RichTextDocument {
            kind: "doc".to_string(),
            version: 1,
            content: vec![Paragraph {
                kind: "paragraph".to_string(),
                content: vec![TextRun {
                    kind: "text".to_string(),
                    text: text.into(),
                }],
            }],
        })
    }

    /// The concatenated text of the description.
    pub fn text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Document(doc) => doc
                .content
                .iter()
                .map(|p| p.content.iter().map(|run| run.text.as_str()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Root of a rich-text document (`doc` → `paragraph` → `text`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub content: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// A ticket to be filed. The project is never part of it; the client injects the configured key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub summary: String,
    pub description: Description,
    pub issue_type: String,
    pub assignee_email: Option<String>,
    pub priority: Option<String>,
}

/// What the tracker returns for a freshly created issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_link: String,
}

/// An issue as read back from the tracker.
///
/// The field set is owned by the tracker, so it is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

impl Issue {
    pub fn summary(&self) -> Option<&str> {
        self.fields.get("summary").and_then(|s| s.as_str())
    }
}

/// A partial field set for updating an issue; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueFieldsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(rename = "issuetype", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<AssigneeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NamedRef>,
}

/// `{"name": ...}` reference used for issue types and priorities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssigneeRef {
    #[serde(rename = "emailAddress")]
    pub email_address: String,
}

// Traits.

/// Generic issue tracker trait that clients must implement.
///
/// Every call is a single attempt: failures surface immediately as [`RelayError::Tracker`](crate::base::error::RelayError::Tracker)
/// and the caller decides how to present them.
#[async_trait]
pub trait GenericTrackerClient: Send + Sync + 'static {
    /// Create an issue in the configured project.
    async fn create_issue(&self, issue: &NewIssue) -> RelayResult<CreatedIssue>;

    /// Fetch an issue by key.
    async fn get_issue(&self, key: &str) -> RelayResult<Issue>;

    /// Apply a partial field update to an issue.
    async fn update_issue(&self, key: &str, fields: &IssueFieldsUpdate) -> RelayResult<()>;
}

// Structs.

/// Tracker client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TrackerClient {
    inner: Arc<dyn GenericTrackerClient>,
}

impl Deref for TrackerClient {
    type Target = dyn GenericTrackerClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl TrackerClient {
    pub fn new(inner: Arc<dyn GenericTrackerClient>) -> Self {
        Self { inner }
    }
}

// Helpers.

/// Human-viewable link to an issue. Pure; no network call.
pub fn issue_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_url_joins_base_and_key() {
        assert_eq!(issue_url("https://acme.atlassian.net", "PROJ-7"), "https://acme.atlassian.net/browse/PROJ-7");
        assert_eq!(issue_url("https://acme.atlassian.net/", "PROJ-7"), "https://acme.atlassian.net/browse/PROJ-7");
    }

    #[test]
    fn issue_url_is_stable() {
        let base = "https://acme.atlassian.net";
        assert_eq!(issue_url(base, "OPS-1"), issue_url(base, "OPS-1"));
    }

    #[test]
    fn document_description_has_doc_paragraph_text_shape() {
        let value = serde_json::to_value(Description::document("Users cannot log in")).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "type": "doc",
                "version": 1,
                "content": [{
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "Users cannot log in" }]
                }]
            })
        );
    }

    #[test]
    fn plain_description_serializes_as_string() {
        let value = serde_json::to_value(Description::Plain("hello".to_string())).unwrap();
        assert_eq!(value, serde_json::json!("hello"));
    }

    #[test]
    fn blank_document_is_blank() {
        assert!(Description::document("  ").is_blank());
        assert!(!Description::document("x").is_blank());
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = IssueFieldsUpdate {
            priority: Some(NamedRef::new("High")),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({ "priority": { "name": "High" } }));
    }
}
