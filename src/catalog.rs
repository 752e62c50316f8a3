//! Type definitions for the model catalog.
//!
//! The catalog is a read-only database of providers, the models they serve, and the
//! authors who created those models. A provider (e.g., Groq or Ollama) is the service
//! which hosts a model behind an API, while an author (e.g., Meta or Mistral AI) is the
//! organization which trained it. The two frequently differ.
//!
//! ## Catalog File
//!
//! Catalogs are stored as TOML. Providers and authors are listed in arrays of tables
//! and their order in the file is the order in which they are listed:
//!
//! ```toml
//! [[providers]]
//! id = "groq"
//! name = "Groq"
//!
//! [[providers.models]]
//! id = "llama-3.1-8b-instant"
//! name = "Llama 3.1 8B Instant"
//!
//! [[authors]]
//! id = "meta"
//! name = "Meta"
//!
//! [authors.catalog.attribution]
//! patterns = ["llama*"]
//! ```
//!
//! An author may carry an [`Attribution`] rule which is used by the
//! [`crate::attribution`] module to determine which models the author created.

mod file;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub(crate) type ProviderId = String;
pub(crate) type AuthorId = String;
pub(crate) type ModelId = String;

const BUNDLED_CATALOG: &str = include_str!("../catalog/default.toml");

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("failed to read catalog \"{0}\": {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("provider \"{0}\" is defined more than once")]
    DuplicateProvider(ProviderId),
    #[error("author \"{0}\" is defined more than once")]
    DuplicateAuthor(AuthorId),
    #[error("model \"{model}\" is defined more than once by provider \"{provider}\"")]
    DuplicateModel { provider: ProviderId, model: ModelId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Model {
    /// The identifier of the model, as the provider's API knows it.
    pub id: ModelId,
    /// A human readable name.
    pub name: String,
}

impl Model {
    pub(crate) fn new(id: &str, name: &str) -> Model {
        Model {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Provider {
    pub id: ProviderId,
    pub name: String,
    /// Models keyed by their identifier. Identifiers are unique within a provider.
    pub models: BTreeMap<ModelId, Model>,
}

impl Provider {
    pub(crate) fn new(id: &str, name: &str, models: Vec<Model>) -> Result<Provider, Error> {
        let mut by_id = BTreeMap::new();

        for model in models {
            if by_id.contains_key(&model.id) {
                return Err(Error::DuplicateModel {
                    provider: id.to_string(),
                    model: model.id,
                });
            }

            by_id.insert(model.id.clone(), model);
        }

        Ok(Provider {
            id: id.to_string(),
            name: name.to_string(),
            models: by_id,
        })
    }
}

/// Describes how the models an author created can be recognized.
///
/// The populated fields select the resolution mode:
/// - `provider_id` only: every model served by that provider.
/// - `provider_id` and `patterns`: models of that provider matching a pattern.
/// - `patterns` only: models of any provider matching a pattern.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Attribution {
    pub provider_id: Option<ProviderId>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct AuthorCatalog {
    pub attribution: Option<Attribution>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Author {
    pub id: AuthorId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub catalog: Option<AuthorCatalog>,
}

impl Author {
    /// The attribution rule, if the author has one.
    pub(crate) fn attribution(&self) -> Option<&Attribution> {
        self.catalog.as_ref().and_then(|c| c.attribution.as_ref())
    }
}

#[cfg(test)]
impl Author {
    pub(crate) fn new(id: &str, name: &str) -> Author {
        Author {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            catalog: None,
        }
    }

    pub(crate) fn with_attribution(mut self, attribution: Attribution) -> Author {
        self.catalog = Some(AuthorCatalog {
            attribution: Some(attribution),
        });

        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct Providers {
    providers: Vec<Provider>,
}

impl Providers {
    pub(crate) fn list(&self) -> &[Provider] {
        &self.providers
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Authors {
    authors: Vec<Author>,
}

impl Authors {
    pub(crate) fn list(&self) -> &[Author] {
        &self.authors
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == id)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Catalog {
    providers: Providers,
    authors: Authors,
}

impl Catalog {
    pub(crate) fn new(providers: Vec<Provider>, authors: Vec<Author>) -> Result<Catalog, Error> {
        for (i, provider) in providers.iter().enumerate() {
            if providers[..i].iter().any(|p| p.id == provider.id) {
                return Err(Error::DuplicateProvider(provider.id.clone()));
            }
        }

        for (i, author) in authors.iter().enumerate() {
            if authors[..i].iter().any(|a| a.id == author.id) {
                return Err(Error::DuplicateAuthor(author.id.clone()));
            }
        }

        Ok(Catalog {
            providers: Providers { providers },
            authors: Authors { authors },
        })
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Catalog, Error> {
        let file: file::CatalogFile = toml::de::from_str(raw)?;

        file.into_catalog()
    }

    pub(crate) fn load(path: &Path) -> Result<Catalog, Error> {
        let raw =
            std::fs::read_to_string(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;

        Catalog::from_toml(&raw)
    }

    /// The catalog shipped with the binary
    pub(crate) fn bundled() -> Result<Catalog, Error> {
        Catalog::from_toml(BUNDLED_CATALOG)
    }

    pub(crate) fn providers(&self) -> &Providers {
        &self.providers
    }

    pub(crate) fn authors(&self) -> &Authors {
        &self.authors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"
[[providers]]
id = "groq"
name = "Groq"

[[providers.models]]
id = "llama-3.1-8b-instant"
name = "Llama 3.1 8B Instant"

[[providers.models]]
id = "mixtral-8x7b-32768"
name = "Mixtral 8x7B"

[[authors]]
id = "meta"
name = "Meta"
description = "Llama"

[authors.catalog.attribution]
patterns = ["llama*"]

[[authors]]
id = "groq"
name = "Groq"

[[authors]]
id = "empty"
name = "Empty"

[authors.catalog]
"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_toml(CATALOG).expect("should parse");

        let providers = catalog.providers().list();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "groq");
        assert_eq!(providers[0].models.len(), 2);
        assert_eq!(
            providers[0].models["mixtral-8x7b-32768"].name,
            "Mixtral 8x7B"
        );

        let ids: Vec<&str> = catalog
            .authors()
            .list()
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["meta", "groq", "empty"]);

        let meta = catalog.authors().get("meta").unwrap();
        assert_eq!(meta.description.as_deref(), Some("Llama"));
        assert_eq!(
            meta.attribution(),
            Some(&Attribution {
                provider_id: None,
                patterns: vec!["llama*".to_string()],
            })
        );

        assert!(catalog.authors().get("groq").unwrap().attribution().is_none());
        assert!(catalog.authors().get("empty").unwrap().catalog.is_some());
        assert!(catalog.authors().get("empty").unwrap().attribution().is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_toml("").expect("should parse");

        assert!(catalog.providers().list().is_empty());
        assert!(catalog.authors().list().is_empty());
    }

    #[test]
    fn test_duplicate_model() {
        let raw = r#"
[[providers]]
id = "ollama"
name = "Ollama"

[[providers.models]]
id = "llama3"
name = "Llama 3"

[[providers.models]]
id = "llama3"
name = "Llama 3 again"
"#;

        let err = Catalog::from_toml(raw).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateModel { ref provider, ref model } if provider == "ollama" && model == "llama3"
        ));
    }

    #[test]
    fn test_duplicate_provider_and_author() {
        let ollama = || Provider::new("ollama", "Ollama", Vec::new()).unwrap();

        let err = Catalog::new(vec![ollama(), ollama()], Vec::new()).unwrap_err();
        assert!(matches!(err, Error::DuplicateProvider(id) if id == "ollama"));

        let err = Catalog::new(
            Vec::new(),
            vec![Author::new("meta", "Meta"), Author::new("meta", "Meta")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateAuthor(id) if id == "meta"));
    }

    #[test]
    fn test_malformed_catalog() {
        let err = Catalog::from_toml("[[providers]]\nname = \"missing id\"\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_load_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).expect("should load");
        assert!(catalog.providers().get("groq").is_some());
        assert!(catalog.providers().get("openai").is_none());

        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Read(_, _)));
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = Catalog::bundled().expect("bundled catalog must be valid");

        assert!(!catalog.providers().list().is_empty());
        assert!(catalog
            .authors()
            .list()
            .iter()
            .any(|a| a.attribution().is_some()));
    }
}
