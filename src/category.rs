use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

use crate::brands::Domain;

/// Closed set of editorial categories across both brands.
///
/// Stored items keep the category as text so rows written with a category that
/// was later retired still load; [`Category::parse`] returns `None` for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    // Real estate: funds and investment
    FondosInversionInmobiliaria,
    GrandesInversionesInmobiliarias,
    MovimientosGrandesTenedores,
    TokenizationActivos,
    // Real estate: general news
    NoticiasInmobiliarias,
    NoticiasHipotecas,
    NoticiasLeyesOkupas,
    NoticiasBoeSubastas,
    NoticiasDesahucios,
    NoticiasConstruccion,
    // Real estate: prices
    PreciosVivienda,
    PreciosMateriales,
    PreciosSuelo,
    // Real estate: outlook
    FuturoSectorInmobiliario,
    BurbujaInmobiliaria,
    // Real estate: rentals and regulation
    AlquilerVacacional,
    NormativasViviendas,
    FaltaVivienda,
    // Real estate: construction and planning
    NoticiasUrbanizacion,
    NovedadesConstruccion,
    ConstruccionModular,
    // Tech
    ReleaseUpdate,
    ToolDiscovery,
    Research,
    AiMl,
    Startups,
    BigTech,
    Security,
    PolicyEthics,
    OtherTech,
}

impl Category {
    pub const ALL: [Category; 30] = [
        Category::FondosInversionInmobiliaria,
        Category::GrandesInversionesInmobiliarias,
        Category::MovimientosGrandesTenedores,
        Category::TokenizationActivos,
        Category::NoticiasInmobiliarias,
        Category::NoticiasHipotecas,
        Category::NoticiasLeyesOkupas,
        Category::NoticiasBoeSubastas,
        Category::NoticiasDesahucios,
        Category::NoticiasConstruccion,
        Category::PreciosVivienda,
        Category::PreciosMateriales,
        Category::PreciosSuelo,
        Category::FuturoSectorInmobiliario,
        Category::BurbujaInmobiliaria,
        Category::AlquilerVacacional,
        Category::NormativasViviendas,
        Category::FaltaVivienda,
        Category::NoticiasUrbanizacion,
        Category::NovedadesConstruccion,
        Category::ConstruccionModular,
        Category::ReleaseUpdate,
        Category::ToolDiscovery,
        Category::Research,
        Category::AiMl,
        Category::Startups,
        Category::BigTech,
        Category::Security,
        Category::PolicyEthics,
        Category::OtherTech,
    ];

    /// Storage form, e.g. `PRECIOS_VIVIENDA`.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::FondosInversionInmobiliaria => "FONDOS_INVERSION_INMOBILIARIA",
            Category::GrandesInversionesInmobiliarias => "GRANDES_INVERSIONES_INMOBILIARIAS",
            Category::MovimientosGrandesTenedores => "MOVIMIENTOS_GRANDES_TENEDORES",
            Category::TokenizationActivos => "TOKENIZATION_ACTIVOS",
            Category::NoticiasInmobiliarias => "NOTICIAS_INMOBILIARIAS",
            Category::NoticiasHipotecas => "NOTICIAS_HIPOTECAS",
            Category::NoticiasLeyesOkupas => "NOTICIAS_LEYES_OKUPAS",
            Category::NoticiasBoeSubastas => "NOTICIAS_BOE_SUBASTAS",
            Category::NoticiasDesahucios => "NOTICIAS_DESAHUCIOS",
            Category::NoticiasConstruccion => "NOTICIAS_CONSTRUCCION",
            Category::PreciosVivienda => "PRECIOS_VIVIENDA",
            Category::PreciosMateriales => "PRECIOS_MATERIALES",
            Category::PreciosSuelo => "PRECIOS_SUELO",
            Category::FuturoSectorInmobiliario => "FUTURO_SECTOR_INMOBILIARIO",
            Category::BurbujaInmobiliaria => "BURBUJA_INMOBILIARIA",
            Category::AlquilerVacacional => "ALQUILER_VACACIONAL",
            Category::NormativasViviendas => "NORMATIVAS_VIVIENDAS",
            Category::FaltaVivienda => "FALTA_VIVIENDA",
            Category::NoticiasUrbanizacion => "NOTICIAS_URBANIZACION",
            Category::NovedadesConstruccion => "NOVEDADES_CONSTRUCCION",
            Category::ConstruccionModular => "CONSTRUCCION_MODULAR",
            Category::ReleaseUpdate => "RELEASE_UPDATE",
            Category::ToolDiscovery => "TOOL_DISCOVERY",
            Category::Research => "RESEARCH",
            Category::AiMl => "AI_ML",
            Category::Startups => "STARTUPS",
            Category::BigTech => "BIG_TECH",
            Category::Security => "SECURITY",
            Category::PolicyEthics => "POLICY_ETHICS",
            Category::OtherTech => "OTHER_TECH",
        }
    }

    /// Case-insensitive lookup of the storage form.
    pub fn parse(value: &str) -> Option<Category> {
        let value = value.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
    }

    pub fn domain(self) -> Domain {
        match self {
            Category::ReleaseUpdate
            | Category::ToolDiscovery
            | Category::Research
            | Category::AiMl
            | Category::Startups
            | Category::BigTech
            | Category::Security
            | Category::PolicyEthics
            | Category::OtherTech => Domain::Tech,
            _ => Domain::RealEstate,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_storage_form() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            Category::parse(" precios_vivienda "),
            Some(Category::PreciosVivienda)
        );
        assert_eq!(Category::parse("UNKNOWN_THING"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_serde_matches_storage_form() {
        let json = serde_json::to_string(&Category::AiMl).unwrap();
        assert_eq!(json, "\"AI_ML\"");
        let back: Category = serde_json::from_str("\"NOTICIAS_BOE_SUBASTAS\"").unwrap();
        assert_eq!(back, Category::NoticiasBoeSubastas);
    }

    #[test]
    fn test_domains() {
        assert_eq!(Category::Security.domain(), Domain::Tech);
        assert_eq!(Category::PreciosSuelo.domain(), Domain::RealEstate);
    }
}
