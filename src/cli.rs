use std::io::{self, IsTerminal};
use std::path::Path;

use crate::attribution::Attributions;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::{die, ListingFormat, RequestedColorMode};

pub(crate) mod attribute;
pub(crate) mod list;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub(crate) enum ColorMode {
    On,
    Off,
}

impl ColorMode {
    /// Returns whether ANSI color should be used
    /// If the user has specified a preference, this is honored. This preference
    /// can be specified through the command line or the "NO_COLOR" environment
    /// variable If the user hasn't stated a preference, color is enabled if the
    /// output is a terminal.
    pub(crate) fn resolve_auto(cm: RequestedColorMode) -> ColorMode {
        match cm {
            RequestedColorMode::Auto => {
                let disable_color =
                    std::env::var_os("NO_COLOR").is_some() || !io::stdout().is_terminal();

                if disable_color {
                    ColorMode::Off
                } else {
                    ColorMode::On
                }
            }
            RequestedColorMode::On => ColorMode::On,
            RequestedColorMode::Off => ColorMode::Off,
        }
    }
}

/// Load the catalog from `path`, falling back to the bundled catalog
pub(crate) fn load_catalog_or_die(path: Option<&Path>) -> Catalog {
    let catalog = match path {
        Some(path) => Catalog::load(path),
        None => Catalog::bundled(),
    };

    match catalog {
        Ok(catalog) => catalog,
        Err(err) => die!("{}", err),
    }
}

pub(crate) fn attributions_or_die(catalog: &Catalog) -> Attributions {
    match Attributions::new(catalog) {
        Ok(attributions) => attributions,
        Err(err) => die!("failed to resolve model authors: {}", err),
    }
}

/// The format requested on the command line takes precedence over the configured one
pub(crate) fn output_format(requested: Option<ListingFormat>, config: &Config) -> ListingFormat {
    requested.or(config.format).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_color_mode() {
        assert_eq!(ColorMode::resolve_auto(RequestedColorMode::On), ColorMode::On);
        assert_eq!(
            ColorMode::resolve_auto(RequestedColorMode::Off),
            ColorMode::Off
        );
    }

    #[test]
    fn test_value_enum_strings() {
        use std::str::FromStr;

        assert_eq!(RequestedColorMode::default().to_string(), "auto");
        assert!(matches!(
            RequestedColorMode::from_str("off"),
            Ok(RequestedColorMode::Off)
        ));
        assert_eq!(ListingFormat::HeaderlessTable.to_string(), "headerless_table");
        assert_eq!(
            ListingFormat::from_str("json").unwrap(),
            ListingFormat::Json
        );
    }

    #[test]
    fn test_output_format() {
        let config = Config {
            format: Some(ListingFormat::Json),
            ..Default::default()
        };

        assert_eq!(output_format(None, &config), ListingFormat::Json);
        assert_eq!(
            output_format(Some(ListingFormat::HeaderlessTable), &config),
            ListingFormat::HeaderlessTable
        );
        assert_eq!(
            output_format(None, &Config::default()),
            ListingFormat::Table
        );
    }
}
