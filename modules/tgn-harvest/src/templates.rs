use std::path::Path;

use tgn_common::{QueryKind, Result, RootTerm, TgnError};

/// Token replaced by the root term in every template.
pub const PLACEHOLDER: &str = "{{ parent }}";

/// One SPARQL template per query kind.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    parents: String,
    places: String,
    terms: String,
}

impl TemplateStore {
    /// Templates compiled into the binary from `sparql/`.
    pub fn embedded() -> Self {
        Self {
            parents: include_str!("../sparql/tgn-parents.sparql").to_string(),
            places: include_str!("../sparql/tgn-places.sparql").to_string(),
            terms: include_str!("../sparql/tgn-terms.sparql").to_string(),
        }
    }

    /// Load `<kind>.sparql` for every kind from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let load = |kind: QueryKind| -> Result<String> {
            let path = dir.join(format!("{}.sparql", kind.name()));
            let text = std::fs::read_to_string(&path).map_err(|e| TgnError::io(&path, e))?;
            if !text.contains(PLACEHOLDER) {
                return Err(TgnError::Template(format!(
                    "{} does not contain {PLACEHOLDER}",
                    path.display()
                )));
            }
            Ok(text)
        };

        Ok(Self {
            parents: load(QueryKind::Parents)?,
            places: load(QueryKind::Places)?,
            terms: load(QueryKind::Terms)?,
        })
    }

    pub fn template(&self, kind: QueryKind) -> &str {
        match kind {
            QueryKind::Parents => &self.parents,
            QueryKind::Places => &self.places,
            QueryKind::Terms => &self.terms,
        }
    }

    /// The query for `kind`, scoped to `root`.
    pub fn render(&self, kind: QueryKind, root: &RootTerm) -> String {
        self.template(kind).replace(PLACEHOLDER, root.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_templates_all_have_placeholder() {
        let store = TemplateStore::embedded();
        for kind in QueryKind::ALL {
            assert!(store.template(kind).contains(PLACEHOLDER), "{kind}");
        }
    }

    #[test]
    fn render_replaces_every_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        for kind in QueryKind::ALL {
            std::fs::write(
                dir.path().join(format!("{}.sparql", kind.name())),
                "SELECT * WHERE { {{ parent }} ?p ?o . ?s ?q {{ parent }} }",
            )
            .unwrap();
        }

        let store = TemplateStore::from_dir(dir.path()).unwrap();
        let query = store.render(QueryKind::Places, &RootTerm::new("tgn:7016845"));
        assert_eq!(
            query,
            "SELECT * WHERE { tgn:7016845 ?p ?o . ?s ?q tgn:7016845 }"
        );
    }

    #[test]
    fn template_without_placeholder_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for kind in QueryKind::ALL {
            std::fs::write(
                dir.path().join(format!("{}.sparql", kind.name())),
                "SELECT * WHERE { ?s ?p ?o }",
            )
            .unwrap();
        }

        let err = TemplateStore::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TgnError::Template(_)));
    }

    #[test]
    fn missing_template_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemplateStore::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TgnError::Io { .. }));
    }
}
