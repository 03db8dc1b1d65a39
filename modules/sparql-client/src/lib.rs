pub mod error;

pub use error::{Result, SparqlError};

/// Getty vocabularies endpoint, RDF/XML flavour.
pub const GETTY_ENDPOINT: &str = "http://vocab.getty.edu/sparql.rdf";

const ACCEPT_RDF_XML: &str = "application/rdf+xml";

pub struct SparqlClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SparqlClient {
    /// No timeout is configured: Getty queries over large hierarchies can run for minutes.
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a query and return the raw response body.
    pub async fn query(&self, sparql: &str) -> Result<String> {
        tracing::debug!(endpoint = %self.endpoint, bytes = sparql.len(), "Submitting SPARQL query");

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Accept", ACCEPT_RDF_XML)
            .form(&[("query", sparql)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SparqlError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}
