//! Enums for BI semantic models
//!
//! # Serde Casing Conventions
//!
//! `Cardinality` serializes as `PascalCase` (`ManyToOne`), matching the names used in
//! exported tables. Deserialization also accepts the camelCase spelling and the short
//! multiplicity forms (`M:1`, `1:M`, `1:1`, `M:M`) emitted by metadata extractors.

use serde::{Deserialize, Serialize};

/// Multiplicity classification of a relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(alias = "manyToOne", alias = "M:1", alias = "many_to_one")]
    ManyToOne,
    #[serde(alias = "oneToMany", alias = "1:M", alias = "one_to_many")]
    OneToMany,
    #[serde(alias = "oneToOne", alias = "1:1", alias = "one_to_one")]
    OneToOne,
    #[serde(alias = "manyToMany", alias = "M:M", alias = "many_to_many")]
    ManyToMany,
}

impl Cardinality {
    /// Short multiplicity notation (`M:1`, `1:M`, `1:1`, `M:M`)
    pub fn short_form(&self) -> &'static str {
        match self {
            Cardinality::ManyToOne => "M:1",
            Cardinality::OneToMany => "1:M",
            Cardinality::OneToOne => "1:1",
            Cardinality::ManyToMany => "M:M",
        }
    }
}

impl std::str::FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "manytoone" | "m:1" | "*:1" => Ok(Cardinality::ManyToOne),
            "onetomany" | "1:m" | "1:*" => Ok(Cardinality::OneToMany),
            "onetoone" | "1:1" => Ok(Cardinality::OneToOne),
            "manytomany" | "m:m" | "*:*" => Ok(Cardinality::ManyToMany),
            _ => Err(format!("Unknown cardinality: {}", s)),
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::ManyToOne => write!(f, "ManyToOne"),
            Cardinality::OneToMany => write!(f, "OneToMany"),
            Cardinality::OneToOne => write!(f, "OneToOne"),
            Cardinality::ManyToMany => write!(f, "ManyToMany"),
        }
    }
}
