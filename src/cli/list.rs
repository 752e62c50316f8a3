pub(crate) mod table;

use std::path::Path;

use serde::Serialize;
use table::Table;

use super::{attributions_or_die, load_catalog_or_die, output_format, ColorMode};
use crate::{
    attribution::Attributions, catalog::Catalog, config::Config, die, ListArgs, ListModelArgs,
    ListObject, ListingFormat,
};

/// Placeholder for models without a known author
pub(crate) const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Serialize, Debug, PartialEq, Eq)]
struct ProvidedModel {
    model_id: String,
    name: String,
    provider: String,
    authors: Vec<String>,
}

/// Joins authors into a single whitespace-free cell
pub(crate) fn authors_cell(authors: &[String]) -> String {
    if authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        authors.join(",")
    }
}

impl From<Vec<ProvidedModel>> for Table {
    fn from(value: Vec<ProvidedModel>) -> Self {
        let mut tab = Table::new(vec!["MODEL", "PROVIDER", "AUTHORS"]);

        for model in value {
            tab.add_row(vec![
                model.model_id,
                model.provider,
                authors_cell(&model.authors),
            ]);
        }

        tab
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Provider {
    provider: String,
    name: String,
    models: usize,
}

impl From<Vec<Provider>> for Table {
    fn from(value: Vec<Provider>) -> Self {
        let mut tab = Table::new(vec!["PROVIDER", "MODELS", "NAME"]);

        for provider in value {
            tab.add_row(vec![
                provider.provider,
                provider.models.to_string(),
                provider.name,
            ]);
        }

        tab
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Author {
    author: String,
    name: String,
    description: Option<String>,
    models: Vec<String>,
}

impl From<Vec<Author>> for Table {
    fn from(value: Vec<Author>) -> Self {
        let mut tab = Table::new(vec!["AUTHOR", "MODELS", "NAME"]);

        for author in value {
            tab.add_row(vec![
                author.author,
                author.models.len().to_string(),
                author.name,
            ]);
        }

        tab
    }
}

fn get_models(
    catalog: &Catalog,
    attributions: &Attributions,
    args: &ListModelArgs,
) -> Vec<ProvidedModel> {
    if let Some(id) = &args.provider {
        if catalog.providers().get(id).is_none() {
            die!("failed to list models: provider \"{}\" is not in the catalog", id);
        }
    }

    if let Some(id) = &args.author {
        if catalog.authors().get(id).is_none() {
            die!("failed to list models: author \"{}\" is not in the catalog", id);
        }
    }

    filter_models(catalog, attributions, args)
}

fn filter_models(
    catalog: &Catalog,
    attributions: &Attributions,
    args: &ListModelArgs,
) -> Vec<ProvidedModel> {
    let mut models = Vec::new();

    for provider in catalog.providers().list() {
        if args.provider.as_ref().is_some_and(|id| *id != provider.id) {
            continue;
        }

        for model in provider.models.values() {
            let authors = attributions.attribute(&model.id).unwrap_or_default();

            if let Some(author) = &args.author {
                if !authors.contains(author) {
                    continue;
                }
            }

            models.push(ProvidedModel {
                model_id: model.id.clone(),
                name: model.name.clone(),
                provider: provider.id.clone(),
                authors: authors.to_vec(),
            });
        }
    }

    models
}

fn get_providers(catalog: &Catalog) -> Vec<Provider> {
    catalog
        .providers()
        .list()
        .iter()
        .map(|p| Provider {
            provider: p.id.clone(),
            name: p.name.clone(),
            models: p.models.len(),
        })
        .collect()
}

fn get_authors(catalog: &Catalog, attributions: &Attributions) -> Vec<Author> {
    catalog
        .authors()
        .list()
        .iter()
        .map(|a| Author {
            author: a.id.clone(),
            name: a.name.clone(),
            description: a.description.clone(),
            models: attributions
                .models_by(&a.id)
                .into_iter()
                .map(|m| m.to_string())
                .collect(),
        })
        .collect()
}

/// Render a listing in the requested format
pub(crate) fn render<O: Into<Table> + Serialize>(
    object: O,
    format: ListingFormat,
    color: ColorMode,
) -> String {
    match format {
        ListingFormat::Json => match serde_json::to_string_pretty(&object) {
            Ok(output) => format!("{}\n", output),
            Err(err) => die!("failed to serialize listing: {}", err),
        },
        ListingFormat::Table | ListingFormat::HeaderlessTable => {
            let mut tab: Table = object.into();

            tab.color(color);
            tab.print_header(format == ListingFormat::Table);

            tab.to_string()
        }
    }
}

pub(crate) fn list_cmd(color: ColorMode, config: &Config, catalog: Option<&Path>, args: &ListArgs) {
    let format = output_format(args.format, config);

    let catalog = load_catalog_or_die(catalog);

    let output = match &args.object {
        ListObject::Models(model_args) => {
            let attributions = attributions_or_die(&catalog);
            let models = get_models(&catalog, &attributions, model_args);

            render(models, format, color)
        }
        ListObject::Providers => render(get_providers(&catalog), format, color),
        ListObject::Authors => {
            let attributions = attributions_or_die(&catalog);

            render(get_authors(&catalog, &attributions), format, color)
        }
    };

    print!("{}", output);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, Attribution};

    fn catalog() -> Catalog {
        let groq = catalog::Provider::new(
            "groq",
            "Groq",
            vec![
                catalog::Model::new("llama-3.1-8b-instant", "Llama 3.1 8B"),
                catalog::Model::new("mixtral-8x7b-32768", "Mixtral 8x7B"),
            ],
        )
        .unwrap();

        let ollama = catalog::Provider::new(
            "ollama",
            "Ollama",
            vec![
                catalog::Model::new("llama3", "Llama 3"),
                catalog::Model::new("phi3", "Phi 3"),
            ],
        )
        .unwrap();

        let meta = catalog::Author::new("meta", "Meta").with_attribution(Attribution {
            provider_id: None,
            patterns: vec!["llama*".to_string()],
        });

        let mistral = catalog::Author::new("mistral", "Mistral AI").with_attribution(Attribution {
            provider_id: None,
            patterns: vec!["mixtral*".to_string()],
        });

        Catalog::new(vec![groq, ollama], vec![meta, mistral]).unwrap()
    }

    #[test]
    fn test_list_models() {
        let catalog = catalog();
        let attributions = Attributions::new(&catalog).unwrap();

        let models = filter_models(&catalog, &attributions, &ListModelArgs::default());

        let ids: Vec<(&str, &str)> = models
            .iter()
            .map(|m| (m.provider.as_str(), m.model_id.as_str()))
            .collect();

        assert_eq!(
            ids,
            vec![
                ("groq", "llama-3.1-8b-instant"),
                ("groq", "mixtral-8x7b-32768"),
                ("ollama", "llama3"),
                ("ollama", "phi3"),
            ]
        );
        assert!(models[3].authors.is_empty());
    }

    #[test]
    fn test_list_models_by_author() {
        let catalog = catalog();
        let attributions = Attributions::new(&catalog).unwrap();

        let args = ListModelArgs {
            provider: None,
            author: Some("meta".to_string()),
        };

        let ids: Vec<String> = filter_models(&catalog, &attributions, &args)
            .into_iter()
            .map(|m| m.model_id)
            .collect();

        assert_eq!(ids, vec!["llama-3.1-8b-instant", "llama3"]);

        let args = ListModelArgs {
            provider: Some("ollama".to_string()),
            author: Some("meta".to_string()),
        };

        let ids: Vec<String> = filter_models(&catalog, &attributions, &args)
            .into_iter()
            .map(|m| m.model_id)
            .collect();

        assert_eq!(ids, vec!["llama3"]);
    }

    #[test]
    fn test_render_models() {
        let catalog = catalog();
        let attributions = Attributions::new(&catalog).unwrap();

        let args = ListModelArgs {
            provider: Some("ollama".to_string()),
            author: None,
        };

        let output = render(
            filter_models(&catalog, &attributions, &args),
            ListingFormat::Table,
            ColorMode::Off,
        );

        assert_eq!(
            output,
            "MODEL   PROVIDER  AUTHORS\n\
             llama3  ollama    meta\n\
             phi3    ollama    unknown\n"
        );
    }

    #[test]
    fn test_render_authors_json() {
        let catalog = catalog();
        let attributions = Attributions::new(&catalog).unwrap();

        let output = render(
            get_authors(&catalog, &attributions),
            ListingFormat::Json,
            ColorMode::Off,
        );

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["author"], "meta");
        assert_eq!(
            value[0]["models"],
            serde_json::json!(["llama-3.1-8b-instant", "llama3"])
        );
        assert_eq!(value[1]["models"], serde_json::json!(["mixtral-8x7b-32768"]));
        assert!(value[1]["description"].is_null());
    }

    #[test]
    fn test_render_providers_headerless() {
        let output = render(
            get_providers(&catalog()),
            ListingFormat::HeaderlessTable,
            ColorMode::Off,
        );

        assert_eq!(output, "groq    2  Groq\nollama  2  Ollama\n");
    }

    #[test]
    fn test_authors_cell() {
        assert_eq!(authors_cell(&[]), "unknown");
        assert_eq!(
            authors_cell(&["first".to_string(), "second".to_string()]),
            "first,second"
        );
    }
}
