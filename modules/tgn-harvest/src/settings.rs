use std::env;

use sparql_client::GETTY_ENDPOINT;
use tgn_common::{Result, TgnError};
use tgn_graph::Neo4jSettings;

/// Environment-specific settings. The dataset itself (parents, types,
/// relations) lives in the TOML config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub sparql_endpoint: String,
    pub neo4j_uri: Option<String>,
    pub neo4j_user: Option<String>,
    pub neo4j_password: Option<String>,
}

impl Settings {
    /// Load from the environment, reading `.env` first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let settings = Self {
            sparql_endpoint: env::var("SPARQL_ENDPOINT")
                .unwrap_or_else(|_| GETTY_ENDPOINT.to_string()),
            neo4j_uri: env::var("NEO4J_URI").ok(),
            neo4j_user: env::var("NEO4J_USER").ok(),
            neo4j_password: env::var("NEO4J_PASSWORD").ok(),
        };

        settings.log_redacted();
        settings
    }

    /// Neo4j credentials; only required when writing to Neo4j.
    pub fn neo4j(&self) -> Result<Neo4jSettings> {
        let require = |value: &Option<String>, key: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| TgnError::Config(format!("{key} environment variable is required")))
        };

        Ok(Neo4jSettings {
            uri: require(&self.neo4j_uri, "NEO4J_URI")?,
            user: require(&self.neo4j_user, "NEO4J_USER")?,
            password: require(&self.neo4j_password, "NEO4J_PASSWORD")?,
        })
    }

    fn log_redacted(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => v.clone(),
                _ => "<not set>".to_string(),
            }
        }
        fn secret(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => format!("<set>({} chars)", v.len()),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Settings loaded:");
        tracing::info!("  SPARQL_ENDPOINT: {}", self.sparql_endpoint);
        tracing::info!("  NEO4J_URI: {}", preview_opt(&self.neo4j_uri));
        tracing::info!("  NEO4J_USER: {}", preview_opt(&self.neo4j_user));
        tracing::info!("  NEO4J_PASSWORD: {}", secret(&self.neo4j_password));
    }
}
