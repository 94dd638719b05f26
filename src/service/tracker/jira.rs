//! Jira Cloud REST (v3) implementation of the tracker client.
//!
//! Every request carries basic-auth credentials (account email + API token) and JSON
//! headers, configured once from [`Config`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::base::{
    config::Config,
    error::{RelayError, RelayResult},
    types::Res,
};

use super::{AssigneeRef, CreatedIssue, Description, GenericTrackerClient, Issue, IssueFieldsUpdate, NamedRef, NewIssue, TrackerClient};

// Extra methods on `TrackerClient` applied by the jira implementation.

impl TrackerClient {
    pub fn jira(config: &Config) -> Res<Self> {
        let client = JiraTrackerClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Serialize)]
struct CreateIssueBody<'a> {
    fields: CreateIssueFields<'a>,
}

#[derive(Serialize)]
struct CreateIssueFields<'a> {
    project: ProjectRef<'a>,
    summary: &'a str,
    description: &'a Description,
    #[serde(rename = "issuetype")]
    issue_type: NamedRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<AssigneeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<NamedRef>,
}

#[derive(Serialize)]
struct ProjectRef<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct UpdateIssueBody<'a> {
    fields: &'a IssueFieldsUpdate,
}

// Specific implementations.

/// Jira tracker client implementation.
#[derive(Clone)]
pub struct JiraTrackerClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
    project_key: String,
}

impl JiraTrackerClient {
    /// Create a new Jira tracker client.
    #[instrument(name = "JiraTrackerClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).timeout(config.http_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.jira_base_url.trim_end_matches('/').to_string(),
            email: config.jira_email.clone(),
            api_token: config.jira_api_token.clone(),
            project_key: config.jira_project_key.clone(),
        })
    }

    fn issue_endpoint(&self, key: Option<&str>) -> String {
        match key {
            Some(key) => format!("{}/rest/api/3/issue/{}", self.base_url, key),
            None => format!("{}/rest/api/3/issue", self.base_url),
        }
    }

    /// Turn a transport failure or a non-2xx answer into a tracker error.
    async fn check(result: Result<Response, reqwest::Error>) -> RelayResult<Response> {
        let response = result.map_err(|e| RelayError::tracker(e.to_string()))?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Jira answered {}: {}", status, body);

        Err(RelayError::tracker(format!("{status}: {body}")))
    }
}

#[async_trait]
impl GenericTrackerClient for JiraTrackerClient {
    #[instrument(skip_all)]
    async fn create_issue(&self, issue: &NewIssue) -> RelayResult<CreatedIssue> {
        if issue.summary.trim().is_empty() {
            return Err(RelayError::validation("Ticket summary must not be empty."));
        }

        if issue.description.is_blank() {
            return Err(RelayError::validation("Ticket description must not be empty."));
        }

        let body = CreateIssueBody {
            fields: CreateIssueFields {
                project: ProjectRef { key: &self.project_key },
                summary: &issue.summary,
                description: &issue.description,
                issue_type: NamedRef::new(issue.issue_type.clone()),
                assignee: issue.assignee_email.clone().map(|email_address| AssigneeRef { email_address }),
                priority: issue.priority.clone().map(NamedRef::new),
            },
        };

        let result = self.client.post(self.issue_endpoint(None)).basic_auth(&self.email, Some(&self.api_token)).json(&body).send().await;
        let response = Self::check(result).await?;

        let created: CreatedIssue = response.json().await.map_err(|e| RelayError::tracker(format!("Unreadable create response: {e}")))?;

        info!("Created issue `{}`.", created.key);

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_issue(&self, key: &str) -> RelayResult<Issue> {
        let result = self.client.get(self.issue_endpoint(Some(key))).basic_auth(&self.email, Some(&self.api_token)).send().await;
        let response = Self::check(result).await?;

        response.json().await.map_err(|e| RelayError::tracker(format!("Unreadable issue `{key}`: {e}")))
    }

    #[instrument(skip(self, fields))]
    async fn update_issue(&self, key: &str, fields: &IssueFieldsUpdate) -> RelayResult<()> {
        let body = UpdateIssueBody { fields };

        let result = self
            .client
            .put(self.issue_endpoint(Some(key)))
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&body)
            .send()
            .await;
        Self::check(result).await?;

        info!("Updated issue `{}`.", key);

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use super::*;
    use crate::base::config::ConfigInner;

    // bot@acme.test:token
    const BASIC_AUTH: &str = "Basic Ym90QGFjbWUudGVzdDp0b2tlbg==";

    fn client_for(server: &MockServer) -> JiraTrackerClient {
        let config = Config::from(ConfigInner {
            jira_base_url: server.uri(),
            jira_email: "bot@acme.test".to_string(),
            jira_api_token: "token".to_string(),
            jira_project_key: "PROJ".to_string(),
            slack_bot_token: "xoxb-test".to_string(),
            http_timeout_secs: 5,
            ..Default::default()
        });

        JiraTrackerClient::new(&config).unwrap()
    }

    fn new_issue() -> NewIssue {
        NewIssue {
            summary: "Server down".to_string(),
            description: Description::document("Users cannot log in"),
            issue_type: "Task".to_string(),
            assignee_email: None,
            priority: Some("High".to_string()),
        }
    }

    #[tokio::test]
    async fn create_issue_injects_project_key_and_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue"))
            .and(header("Authorization", BASIC_AUTH))
            .and(header("Content-Type", "application/json"))
            .and(body_partial_json(json!({
                "fields": {
                    "project": { "key": "PROJ" },
                    "summary": "Server down",
                    "issuetype": { "name": "Task" },
                    "priority": { "name": "High" },
                    "description": { "type": "doc", "version": 1 }
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "10001",
                "key": "PROJ-123",
                "self": "https://acme.atlassian.net/rest/api/3/issue/10001"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server).create_issue(&new_issue()).await.unwrap();

        assert_eq!(created.id, "10001");
        assert_eq!(created.key, "PROJ-123");
        assert_eq!(created.self_link, "https://acme.atlassian.net/rest/api/3/issue/10001");
    }

    #[tokio::test]
    async fn create_issue_surfaces_non_2xx_as_tracker_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"errors\":{\"summary\":\"required\"}}"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).create_issue(&new_issue()).await.unwrap_err();

        match err {
            RelayError::Tracker(message) => {
                assert!(message.contains("400"));
                assert!(message.contains("required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_issue_refuses_blank_description_without_calling_jira() {
        let server = MockServer::start().await;

        Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

        let issue = NewIssue {
            description: Description::Plain("   ".to_string()),
            ..new_issue()
        };

        let err = client_for(&server).create_issue(&issue).await.unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }

    #[tokio::test]
    async fn get_issue_reads_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PROJ-7"))
            .and(header("Authorization", BASIC_AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "10007",
                "key": "PROJ-7",
                "self": "https://acme.atlassian.net/rest/api/3/issue/10007",
                "fields": { "summary": "Printer on fire" }
            })))
            .mount(&server)
            .await;

        let issue = client_for(&server).get_issue("PROJ-7").await.unwrap();

        assert_eq!(issue.key, "PROJ-7");
        assert_eq!(issue.summary(), Some("Printer on fire"));
    }

    #[tokio::test]
    async fn get_missing_issue_is_tracker_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PROJ-404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Issue does not exist"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_issue("PROJ-404").await.unwrap_err();
        assert!(matches!(err, RelayError::Tracker(_)));
    }

    #[tokio::test]
    async fn update_issue_sends_only_set_fields() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/rest/api/3/issue/PROJ-7"))
            .and(header("Authorization", BASIC_AUTH))
            .and(body_partial_json(json!({ "fields": { "summary": "Renamed" } })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let update = IssueFieldsUpdate {
            summary: Some("Renamed".to_string()),
            ..Default::default()
        };

        client_for(&server).update_issue("PROJ-7", &update).await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_jira_is_tracker_error() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let err = client.get_issue("PROJ-1").await.unwrap_err();
        assert!(matches!(err, RelayError::Tracker(_)));
    }
}
