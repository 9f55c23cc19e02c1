use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

/// Editorial domain an item belongs to. Stored as `real_estate` / `tech`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    RealEstate,
    Tech,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::RealEstate => "real_estate",
            Domain::Tech => "tech",
        }
    }

    pub fn parse(value: &str) -> Option<Domain> {
        match value.trim().to_ascii_lowercase().as_str() {
            "real_estate" => Some(Domain::RealEstate),
            "tech" => Some(Domain::Tech),
            _ => None,
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brand {
    pub key: &'static str,
    pub domain: Domain,
}

pub const BRANDS: &[Brand] = &[
    Brand {
        key: "althara",
        domain: Domain::RealEstate,
    },
    Brand {
        key: "oxono",
        domain: Domain::Tech,
    },
];

pub fn domain_for_brand(brand: &str) -> Option<Domain> {
    let brand = brand.trim();
    BRANDS
        .iter()
        .find(|b| b.key.eq_ignore_ascii_case(brand))
        .map(|b| b.domain)
}
