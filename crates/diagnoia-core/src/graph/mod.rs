//! Graph store collaborator
//!
//! The assistant only depends on the query/response contract below: a
//! statement plus named parameters in, ordered rows out. [`Neo4jClient`]
//! implements it over the Neo4j HTTP API.

mod neo4j;
mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use neo4j::{Neo4jClient, Neo4jClientBuilder};
pub use types::{Params, Row, Value};

/// Read-only access to the clinical knowledge graph
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a statement with named parameters and return every row
    async fn query(&self, statement: &str, params: Params) -> Result<Vec<Row>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify trait is object-safe
    fn _assert_object_safe(_: &dyn GraphStore) {}
}
