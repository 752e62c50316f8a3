//! On-disk representation of a catalog

use serde::Deserialize;

use super::{Author, Catalog, Error, Model, Provider};

#[derive(Deserialize, Debug)]
pub(super) struct ModelEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(super) struct ProviderEntry {
    id: String,
    name: String,
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub(super) struct CatalogFile {
    #[serde(default)]
    providers: Vec<ProviderEntry>,
    #[serde(default)]
    authors: Vec<Author>,
}

impl From<ModelEntry> for Model {
    fn from(value: ModelEntry) -> Self {
        // Models without a display name are shown by their identifier
        let name = value.name.as_deref().unwrap_or(&value.id);

        Model::new(&value.id, name)
    }
}

impl CatalogFile {
    pub(super) fn into_catalog(self) -> Result<Catalog, Error> {
        let providers = self
            .providers
            .into_iter()
            .map(|p| {
                let models = p.models.into_iter().map(Model::from).collect();

                Provider::new(&p.id, &p.name, models)
            })
            .collect::<Result<Vec<Provider>, Error>>()?;

        Catalog::new(providers, self.authors)
    }
}
