//! Attribution determines which author(s) created a model.
//!
//! A model is often served by a provider other than the organization that trained it;
//! Groq serves Llama models trained by Meta, for example. Each author in the catalog
//! may carry an attribution rule which is resolved against the providers in the catalog
//! once, producing an immutable index from model identifier to authors.
//!
//! A rule selects one of three modes depending on which fields are populated:
//! - Provider only: every model served by the provider is attributed to the author.
//! - Provider and patterns: only models of that provider matching one of the patterns.
//! - Patterns only: models of any provider matching one of the patterns.
//!
//! A rule with neither field contributes nothing. If a rule names a provider which is
//! not in the catalog, it contributes nothing as well.
//!
//! Model identifiers are not scoped by provider. If two providers serve a model under
//! the same identifier, both are attributed through a single index entry.
//!
//! Building the index fails if any pattern is malformed. No partial index is produced.

mod pattern;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use self::pattern::Pattern;
use crate::catalog::{Attribution, Author, AuthorId, Catalog, Model, ModelId};

#[derive(Error, Debug)]
pub(crate) enum Error {
    /// One of an author's attribution patterns failed to compile
    #[error("invalid attribution pattern \"{pattern}\" for author \"{author}\": {source}")]
    InvalidPattern {
        author: AuthorId,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// An author's attribution rule with its patterns compiled
struct Rule<'c> {
    author: &'c Author,
    provider_id: Option<&'c str>,
    patterns: Vec<Pattern>,
}

impl<'c> Rule<'c> {
    fn compile(author: &'c Author, attribution: &'c Attribution) -> Result<Rule<'c>, Error> {
        let patterns = attribution
            .patterns
            .iter()
            .map(|raw| {
                Pattern::compile(raw).map_err(|source| Error::InvalidPattern {
                    author: author.id.clone(),
                    pattern: raw.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<Pattern>, Error>>()?;

        Ok(Rule {
            author,
            provider_id: attribution.provider_id.as_deref(),
            patterns,
        })
    }

    /// A model matches if any of the patterns match. Rules without patterns
    /// match every model in scope.
    fn matches(&self, model: &Model) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(&model.id))
    }

    /// The models this rule claims
    fn resolve(&self, catalog: &'c Catalog) -> Vec<&'c Model> {
        let in_scope: Vec<&'c Model> = match self.provider_id {
            Some(provider_id) => match catalog.providers().get(provider_id) {
                Some(provider) => provider.models.values().collect(),
                None => {
                    debug!(
                        author = %self.author.id,
                        provider = provider_id,
                        "attribution provider is not in the catalog"
                    );

                    Vec::new()
                }
            },
            None if self.patterns.is_empty() => Vec::new(),
            None => catalog
                .providers()
                .list()
                .iter()
                .flat_map(|p| p.models.values())
                .collect(),
        };

        in_scope.into_iter().filter(|m| self.matches(m)).collect()
    }
}

/// The resolved mapping from model identifier to the authors which created it.
///
/// The index is immutable once built and may be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributions {
    index: BTreeMap<ModelId, Vec<AuthorId>>,
}

impl Attributions {
    /// Resolve the attribution rules of every author in the catalog.
    ///
    /// Authors are visited in catalog order, which determines the order in which
    /// authors are recorded for a model.
    pub(crate) fn new(catalog: &Catalog) -> Result<Attributions, Error> {
        let mut rules = Vec::new();

        for author in catalog.authors().list() {
            match author.attribution() {
                Some(attribution) => rules.push(Rule::compile(author, attribution)?),
                None => debug!(author = %author.id, "author has no attribution rule"),
            }
        }

        let mut attributions = Attributions::default();

        for rule in &rules {
            for model in rule.resolve(catalog) {
                attributions.insert(&model.id, &rule.author.id);
            }
        }

        info!(
            rules = rules.len(),
            models = attributions.len(),
            "resolved model attributions"
        );

        Ok(attributions)
    }

    fn insert(&mut self, model_id: &str, author_id: &str) {
        let authors = self.index.entry(model_id.to_string()).or_default();

        if !authors.iter().any(|a| a == author_id) {
            authors.push(author_id.to_string());
        }
    }

    /// Returns the authors of the model, or `None` if the model has no known author.
    pub(crate) fn attribute(&self, model_id: &str) -> Option<&[AuthorId]> {
        self.index.get(model_id).map(|authors| authors.as_slice())
    }

    /// Returns the identifiers of every model attributed to the author, in
    /// lexicographic order.
    pub(crate) fn models_by(&self, author_id: &str) -> Vec<&str> {
        self.index
            .iter()
            .filter(|(_, authors)| authors.iter().any(|a| a == author_id))
            .map(|(model_id, _)| model_id.as_str())
            .collect()
    }

    /// The number of attributed models
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}
