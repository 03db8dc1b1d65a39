// Shared test scaffolding: a scripted QueryService, RDF fixture builders,
// and a config/template setup mirroring a real TGN dataset.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use tgn_common::{QueryKind, Result, TgnConfig, TgnError};
use tgn_harvest::{QueryService, TemplateStore};

pub const CONFIG: &str = r#"
parents = ["tgn:7000003", "tgn:1000080"]

[types]
"inhabited places" = "hg:Place"
"provinces" = "hg:Province"

[relations]
liesIn = "hg:liesIn"
equivalence = "hg:sameHgConcept"
"#;

pub fn config() -> TgnConfig {
    TgnConfig::from_toml(CONFIG).unwrap()
}

pub fn config_with_parents(parents: &[&str]) -> TgnConfig {
    let mut config = config();
    config.parents = parents.iter().map(|p| tgn_common::RootTerm::new(*p)).collect();
    config
}

/// Templates rendering to `<kind> <root>`, so queries are easy to assert on.
pub fn templates(dir: &Path) -> TemplateStore {
    for kind in QueryKind::ALL {
        std::fs::write(
            dir.join(format!("{}.sparql", kind.name())),
            format!("{} {{{{ parent }}}}", kind.name()),
        )
        .unwrap();
    }
    TemplateStore::from_dir(dir).unwrap()
}

// ---------------------------------------------------------------------------
// MockQueryService
// ---------------------------------------------------------------------------

/// Returns the body registered for a query, or an empty RDF document.
/// Records every query received, including the failing one.
pub struct MockQueryService {
    responses: HashMap<String, String>,
    fail_on: Option<usize>,
    queries: Mutex<Vec<String>>,
}

impl MockQueryService {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fail_on: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn on_query(mut self, query: &str, body: &str) -> Self {
        self.responses.insert(query.to_string(), body.to_string());
        self
    }

    /// Fail the Nth query (0-based).
    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn query(&self, sparql: &str) -> Result<String> {
        let call = {
            let mut queries = self.queries.lock().unwrap();
            queries.push(sparql.to_string());
            queries.len() - 1
        };

        if self.fail_on == Some(call) {
            return Err(TgnError::Query(format!("MockQueryService: call {call} failed")));
        }

        Ok(self
            .responses
            .get(sparql)
            .cloned()
            .unwrap_or_else(|| rdf(&[])))
    }
}

// ---------------------------------------------------------------------------
// RDF fixtures
// ---------------------------------------------------------------------------

pub fn rdf(records: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:dct="http://purl.org/dc/terms/"
         xmlns:gvp="http://vocab.getty.edu/ontology#"
         xmlns:tgn="http://vocab.getty.edu/tgn/"
         xmlns:wgs="http://www.w3.org/2003/01/geo/wgs84_pos#">
{}
</rdf:RDF>"#,
        records.join("\n")
    )
}

/// Builder for one `rdf:Description` record.
#[derive(Default)]
pub struct Record {
    lines: Vec<String>,
}

impl Record {
    pub fn new(uri: &str, type_term: &str) -> Self {
        Self::default()
            .resource("dct:source", uri)
            .text("tgn:typeTerm", type_term)
    }

    pub fn text(mut self, tag: &str, value: &str) -> Self {
        self.lines.push(format!("    <{tag}>{value}</{tag}>"));
        self
    }

    pub fn resource(mut self, tag: &str, uri: &str) -> Self {
        self.lines.push(format!(r#"    <{tag} rdf:resource="{uri}"/>"#));
        self
    }

    pub fn build(self) -> String {
        format!(
            "  <rdf:Description>\n{}\n  </rdf:Description>",
            self.lines.join("\n")
        )
    }
}
