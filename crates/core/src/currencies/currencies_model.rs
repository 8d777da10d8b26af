use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Opaque currency identifier as used by the sync collaborator.
pub type CurrencyId = String;

/// Immutable catalog entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: CurrencyId,
    pub name: String,
    pub code: String,
}

impl Currency {
    pub fn new(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Process-wide currency catalog, loaded once by the storage collaborator.
///
/// Keeps the insertion order of the source collection (used-currency lists are
/// reported in catalog order) and an id index for constant-time lookups.
#[derive(Debug, Clone, Default)]
pub struct CurrencyCatalog {
    currencies: Vec<Currency>,
    index: HashMap<CurrencyId, usize>,
}

impl CurrencyCatalog {
    /// Builds a catalog. When an id appears twice the first entry wins.
    pub fn new(currencies: Vec<Currency>) -> Self {
        let mut index = HashMap::with_capacity(currencies.len());
        let mut kept = Vec::with_capacity(currencies.len());
        for currency in currencies {
            if index.contains_key(&currency.id) {
                log::warn!("Duplicate currency id '{}' in catalog, ignoring", currency.id);
                continue;
            }
            index.insert(currency.id.clone(), kept.len());
            kept.push(currency);
        }
        Self {
            currencies: kept,
            index,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Currency> {
        self.index.get(id).map(|&i| &self.currencies[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Currency> {
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter()
    }

    pub fn as_slice(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

impl From<Vec<Currency>> for CurrencyCatalog {
    fn from(currencies: Vec<Currency>) -> Self {
        Self::new(currencies)
    }
}

impl Serialize for CurrencyCatalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.currencies.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CurrencyCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Currency>::deserialize(deserializer).map(CurrencyCatalog::new)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Accepts ids sent either as JSON numbers or as strings.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}
