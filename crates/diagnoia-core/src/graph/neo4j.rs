//! Neo4j HTTP client
//!
//! Talks to the transactional HTTP endpoint (`/db/{database}/tx/commit`),
//! one auto-committed statement per request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GraphConfig;
use crate::error::{Error, Result};

use super::GraphStore;
use super::types::{Params, Row, Value};

#[derive(Debug, Serialize)]
struct CommitRequest<'a> {
    statements: [Statement<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Statement<'a> {
    statement: &'a str,
    parameters: &'a Params,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<DataRow>,
}

#[derive(Debug, Deserialize)]
struct DataRow {
    row: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

/// Neo4j graph store client
#[derive(Clone)]
pub struct Neo4jClient {
    http_client: HttpClient,
    endpoint: String,
    username: String,
    password: Option<String>,
}

impl std::fmt::Debug for Neo4jClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jClient")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Builder for creating a Neo4jClient
#[derive(Default)]
pub struct Neo4jClientBuilder {
    config: Option<GraphConfig>,
    password: Option<String>,
}

impl Neo4jClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the graph configuration
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the password (normally resolved from the environment)
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Build the Neo4jClient
    pub fn build(self) -> Result<Neo4jClient> {
        let config = self.config.unwrap_or_default();

        let mut builder = HttpClient::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(Error::NetworkError)?;

        Ok(Neo4jClient {
            http_client,
            endpoint: commit_endpoint(&config.uri, &config.database),
            username: config.username,
            password: self.password,
        })
    }
}

impl Neo4jClient {
    /// Create a client from configuration, resolving the password from the environment
    pub fn from_config(config: &GraphConfig) -> Result<Self> {
        let password = config
            .resolved_password()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let mut builder = Self::builder().config(config.clone());
        if let Some(password) = password {
            builder = builder.password(password);
        }
        builder.build()
    }

    pub fn builder() -> Neo4jClientBuilder {
        Neo4jClientBuilder::new()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Round-trip a trivial statement to check connectivity and credentials
    pub async fn ping(&self) -> Result<()> {
        self.query("RETURN 1 AS ok", Params::new()).await.map(|_| ())
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn query(&self, statement: &str, params: Params) -> Result<Vec<Row>> {
        debug!(
            endpoint = %self.endpoint,
            params = params.len(),
            "Running graph statement"
        );

        let body = CommitRequest {
            statements: [Statement {
                statement,
                parameters: &params,
            }],
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .basic_auth(&self.username, self.password.as_deref())
            .json(&body)
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GraphUnavailable {
                status: status.as_u16(),
                body,
            });
        }

        let commit: CommitResponse = response.json().await.map_err(Error::NetworkError)?;
        rows_from_response(commit)
    }
}

fn commit_endpoint(uri: &str, database: &str) -> String {
    format!("{}/db/{}/tx/commit", uri.trim_end_matches('/'), database)
}

fn rows_from_response(response: CommitResponse) -> Result<Vec<Row>> {
    if let Some(err) = response.errors.into_iter().next() {
        return Err(Error::GraphQuery(format!("{}: {}", err.code, err.message)));
    }

    let Some(result) = response.results.into_iter().next() else {
        return Ok(Vec::new());
    };

    let columns = result.columns;
    Ok(result
        .data
        .into_iter()
        .map(|data| {
            columns
                .iter()
                .cloned()
                .zip(data.row.into_iter().map(Value::from_json))
                .collect::<Row>()
        })
        .collect())
}
