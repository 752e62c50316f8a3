use std::path::Path;

use serde::Serialize;

use super::list::{authors_cell, render, table::Table};
use super::{attributions_or_die, load_catalog_or_die, output_format, ColorMode};
use crate::{attribution::Attributions, config::Config, AttributeArgs};

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Attributed {
    model_id: String,
    found: bool,
    authors: Vec<String>,
}

impl From<Vec<Attributed>> for Table {
    fn from(value: Vec<Attributed>) -> Self {
        let mut tab = Table::new(vec!["MODEL", "AUTHORS"]);

        for attributed in value {
            tab.add_row(vec![attributed.model_id, authors_cell(&attributed.authors)]);
        }

        tab
    }
}

fn attribute_all(attributions: &Attributions, models: &[String]) -> Vec<Attributed> {
    models
        .iter()
        .map(|model_id| {
            let authors = attributions.attribute(model_id);

            Attributed {
                model_id: model_id.clone(),
                found: authors.is_some(),
                authors: authors.map(|a| a.to_vec()).unwrap_or_default(),
            }
        })
        .collect()
}

pub(crate) fn attribute_cmd(
    color: ColorMode,
    config: &Config,
    catalog: Option<&Path>,
    args: &AttributeArgs,
) {
    let format = output_format(args.format, config);

    let catalog = load_catalog_or_die(catalog);
    let attributions = attributions_or_die(&catalog);

    let attributed = attribute_all(&attributions, &args.models);

    print!("{}", render(attributed, format, color));
}
