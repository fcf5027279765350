// ── Directory query and result types ──
//
// A `Query` names the schema tree to search, an LDAP filter, and the
// attributes to fetch. Each answer is a flat `Record`: the entry DN plus
// a multi-valued attribute map, exactly as the directory returned it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Information-model generation, which also selects the search base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// GLUE 1.3, the legacy tree (`Mds-Vo-name=local,o=grid`).
    Glue1,
    /// GLUE 2.0, the current tree (`GLUE2GroupID=grid,o=glue`).
    Glue2,
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glue1 => f.write_str("glue1"),
            Self::Glue2 => f.write_str("glue2"),
        }
    }
}

/// A single subtree search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub schema: Schema,
    pub filter: String,
    pub attributes: Vec<String>,
}

impl Query {
    pub fn new(schema: Schema, filter: impl Into<String>, attributes: &[&str]) -> Self {
        Self {
            schema,
            filter: filter.into(),
            attributes: attributes.iter().map(|a| (*a).to_owned()).collect(),
        }
    }
}

/// One directory entry: distinguished name plus attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub dn: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, Vec<String>>,
}

impl Record {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter, mostly for fixtures.
    pub fn with_attr<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attrs
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// First value of `attr`.
    ///
    /// LDAP attribute names are case-insensitive, and servers do not always
    /// echo the casing that was requested, so an exact match is tried first
    /// and a case-insensitive scan second.
    pub fn first(&self, attr: &str) -> Option<&str> {
        self.attrs
            .get(attr)
            .or_else(|| {
                self.attrs
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(attr))
                    .map(|(_, v)| v)
            })
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

impl From<ldap3::SearchEntry> for Record {
    fn from(entry: ldap3::SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attrs: entry.attrs.into_iter().collect(),
        }
    }
}
