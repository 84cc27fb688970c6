use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("card id must not be empty")]
    EmptyId,
    #[error("card {id} has an empty name")]
    EmptyName { id: String },
    #[error("card {id}: {field} {value:?} cannot be stored in a status table")]
    Unstorable {
        id: String,
        field: &'static str,
        value: String,
    },
}

/// Card id to display name mapping, loaded once and passed to every
/// operation that needs to resolve a name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CardCatalog {
    names: BTreeMap<String, String>,
}

impl CardCatalog {
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut names = BTreeMap::new();
        for (id, name) in entries {
            let id = id.into();
            let name = name.into();
            check_cell(&id, "id", &id)?;
            check_cell(&id, "name", &name)?;
            names.insert(id, name);
        }
        Ok(Self { names })
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.keys().map(String::as_str)
    }
}

impl TryFrom<BTreeMap<String, String>> for CardCatalog {
    type Error = CatalogError;

    fn try_from(value: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

impl From<CardCatalog> for BTreeMap<String, String> {
    fn from(value: CardCatalog) -> Self {
        value.names
    }
}

// Table cells are trimmed and split on `|` when decoded.
fn check_cell(id: &str, field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.is_empty() {
        return Err(match field {
            "id" => CatalogError::EmptyId,
            _ => CatalogError::EmptyName { id: id.to_string() },
        });
    }
    if value.trim() == value && !value.contains(['|', '`', '\n', '\r']) {
        Ok(())
    } else {
        Err(CatalogError::Unstorable {
            id: id.to_string(),
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names() {
        let catalog = CardCatalog::from_entries([("ice1", "Ice Wall"), ("gate2", "Sentry Gate")])
            .expect("catalog");
        assert_eq!(catalog.display_name("ice1"), Some("Ice Wall"));
        assert_eq!(catalog.display_name("nope"), None);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["gate2", "ice1"]);
    }

    #[test]
    fn rejects_names_that_break_the_table() {
        let err = CardCatalog::from_entries([("ice1", "Ice | Wall")]).expect_err("pipe");
        assert!(matches!(err, CatalogError::Unstorable { field: "name", .. }));
        let err = CardCatalog::from_entries([(" ice1", "Ice Wall")]).expect_err("padding");
        assert!(matches!(err, CatalogError::Unstorable { field: "id", .. }));
        let err = CardCatalog::from_entries([("", "Ice Wall")]).expect_err("empty id");
        assert_eq!(err, CatalogError::EmptyId);
        let err = CardCatalog::from_entries([("ice1", "")]).expect_err("empty name");
        assert_eq!(err, CatalogError::EmptyName { id: "ice1".to_string() });
    }
}
