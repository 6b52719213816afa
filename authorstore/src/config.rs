//! Settings for connecting the record store to its database.
//!
//! Loaded with Figment, later sources overriding earlier ones:
//! 1. Compiled defaults
//! 2. `./authorstore.toml`
//! 3. `AUTHORSTORE_*` environment variables (e.g. `AUTHORSTORE_DATABASE_NAME`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use authorstore_core::{
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
};

use crate::model::{Author, Book};

const CONFIG_FILE: &str = "authorstore.toml";
const ENV_PREFIX: &str = "AUTHORSTORE_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorStoreSettings {
    pub connection_string: String,
    pub database_name: String,
    pub authors_collection_name: String,
    pub books_collection_name: String,
}

impl Default for AuthorStoreSettings {
    fn default() -> Self {
        Self {
            connection_string: "mongodb://localhost:27017".to_string(),
            database_name: "authorstore".to_string(),
            authors_collection_name: Author::collection_name().to_string(),
            books_collection_name: Book::collection_name().to_string(),
        }
    }
}

impl AuthorStoreSettings {
    /// Loads settings from defaults, `authorstore.toml` and the environment.
    pub fn load() -> DocumentStoreResult<Self> {
        Self::extract(
            Self::defaults()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Loads settings from a TOML string over the defaults, ignoring the environment.
    pub fn from_toml_str(toml: &str) -> DocumentStoreResult<Self> {
        Self::extract(Self::defaults().merge(Toml::string(toml)))
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> DocumentStoreResult<Self> {
        figment
            .extract()
            .map_err(|e| DocumentStoreError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_name_both_collections() {
        let settings = AuthorStoreSettings::default();
        assert_eq!(settings.authors_collection_name, "authors");
        assert_eq!(settings.books_collection_name, "books");
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = AuthorStoreSettings::from_toml_str(
            r#"
            database_name = "library"
            books_collection_name = "volumes"
            "#,
        )
        .unwrap();

        assert_eq!(settings.database_name, "library");
        assert_eq!(settings.books_collection_name, "volumes");
        assert_eq!(settings.authors_collection_name, "authors");
        assert_eq!(settings.connection_string, "mongodb://localhost:27017");
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let err = AuthorStoreSettings::from_toml_str("database_name = [1, 2]").unwrap_err();
        assert!(matches!(err, DocumentStoreError::Configuration(_)));
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, r#"database_name = "from-file""#)?;
            jail.set_env("AUTHORSTORE_DATABASE_NAME", "from-env");
            jail.set_env("AUTHORSTORE_AUTHORS_COLLECTION_NAME", "writers");

            let settings = AuthorStoreSettings::load().unwrap();
            assert_eq!(settings.database_name, "from-env");
            assert_eq!(settings.authors_collection_name, "writers");

            Ok(())
        });
    }
}
