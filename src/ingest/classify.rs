use regex::Regex;
use std::sync::LazyLock;

use crate::brands::Domain;
use crate::category::Category;

/// Keyword table for real-estate items, in precedence order.
///
/// Phrases are tried across every group before single words, so a specific
/// phrase in a later group beats a generic word in an earlier one.
const REAL_ESTATE_RULES: &[(Category, &[&str])] = &[
    (
        Category::FondosInversionInmobiliaria,
        &[
            "experto en vivienda",
            "experto inmobiliario",
            "ceo de",
            "director general de",
            "fondo de inversión",
            "fondos de inversión",
            "fondo inmobiliario",
            "fondos inmobiliarios",
            "gestión de activos inmobiliarios",
            "vehículo de inversión",
            "gestión patrimonial",
            "patrimonio inmobiliario",
            "grupo inmobiliario",
            "estrategia inversión",
            "estrategia inmobiliaria",
            "ciclo inmobiliario",
            "gestiona millones",
            "millones en patrimonio",
            "patrimonio de millones",
            "mazabi",
            "merlin",
            "colonial",
            "metrovacesa",
            "neinor",
            "azora",
            "hines",
            "silicius",
            "socimi",
            "socimis",
            "reit",
            "reits",
            "fondo cerrado",
            "fondo abierto",
            "experto",
            "expertos",
            "ceo",
            "director general",
            "directivo",
            "directivos",
            "patrimonio de",
        ],
    ),
    (
        Category::NovedadesConstruccion,
        &[
            "nueva construcción",
            "nuevas construcciones",
            "innovación construcción",
            "tecnología construcción",
            "tendencias construcción",
            "novedad construcción",
        ],
    ),
    (
        Category::TokenizationActivos,
        &[
            "tokenización",
            "tokenizacion",
            "token",
            "blockchain inmobiliario",
            "criptoactivo inmobiliario",
            "nft inmobiliario",
            "activo tokenizado",
        ],
    ),
    (
        Category::ConstruccionModular,
        &[
            "construcción modular",
            "vivienda modular",
            "prefabricada",
            "prefabricadas",
            "modular",
            "industrializada",
            "construcción industrializada",
        ],
    ),
    (
        Category::AlquilerVacacional,
        &[
            "alquiler vacacional",
            "alquileres vacacionales",
            "airbnb",
            "booking",
            "turismo residencial",
            "vivienda turística",
            "apartamento turístico",
        ],
    ),
    (
        Category::BurbujaInmobiliaria,
        &[
            "burbuja inmobiliaria",
            "burbuja",
            "sobrevaloración",
            "sobreprecio",
            "corrección mercado",
            "ajuste precios",
            "caída precios",
        ],
    ),
    (
        Category::NoticiasBoeSubastas,
        &[
            "subasta",
            "subastas",
            "subasta judicial",
            "subasta inmobiliaria",
            "boe subasta",
            "subasta pública",
            "puja",
            "remate",
        ],
    ),
    (
        Category::NoticiasUrbanizacion,
        &[
            "urbanización",
            "urbanizaciones",
            "urbanismo",
            "planeamiento",
            "plan general",
            "pgou",
            "licencia urbanística",
            "ordenación territorial",
        ],
    ),
    (
        Category::FuturoSectorInmobiliario,
        &[
            "futuro sector",
            "tendencias inmobiliarias",
            "perspectivas sector",
            "evolución sector",
            "previsión sector",
            "proyección sector",
            "sector inmobiliario futuro",
            "tendencias mercado",
        ],
    ),
    (
        Category::NoticiasDesahucios,
        &[
            "desahucio",
            "desahucios",
            "lanzamiento",
            "lanzamientos",
            "ejecución hipotecaria",
            "embargo",
            "embargos",
            "expulsión",
            "desalojo forzoso",
        ],
    ),
    (
        Category::PreciosSuelo,
        &[
            "precio suelo",
            "precios suelo",
            "precio del suelo",
            "precios del suelo",
            "valor suelo",
            "coste suelo",
            "terreno",
            "solar",
            "suelo urbanizable",
        ],
    ),
    (
        Category::NoticiasLeyesOkupas,
        &[
            "okupa",
            "okupas",
            "okupación",
            "okupaciones",
            "ocupación ilegal",
            "ley okupas",
            "ley antiokupas",
            "desalojo",
            "desalojos",
            "usurpación",
        ],
    ),
    (
        Category::FaltaVivienda,
        &[
            "falta de vivienda",
            "escasez de vivienda",
            "déficit habitacional",
            "crisis de vivienda",
            "problema de vivienda",
            "acceso a vivienda",
            "vivienda asequible",
            "vivienda social",
            "vpo",
            "vivienda protegida",
        ],
    ),
    (
        Category::NormativasViviendas,
        &[
            "normativa",
            "normativas",
            "ley vivienda",
            "ley de vivienda",
            "regulación vivienda",
            "decreto vivienda",
            "real decreto",
            "legislación inmobiliaria",
            "marco legal",
            "ley urbanística",
        ],
    ),
    (
        Category::PreciosMateriales,
        &[
            "precio materiales",
            "precios materiales",
            "coste materiales",
            "costes materiales",
            "precio construcción",
            "coste construcción",
            "materiales construcción",
            "cemento",
            "acero",
            "ladrillo",
            "precio obra",
        ],
    ),
    (
        Category::NoticiasConstruccion,
        &[
            "construcción",
            "construcciones",
            "obra",
            "obras",
            "edificación",
            "promoción inmobiliaria",
            "promociones inmobiliarias",
            "desarrollo inmobiliario",
            "obra nueva",
            "vivienda nueva",
            "nueva construcción",
        ],
    ),
    (
        Category::NoticiasHipotecas,
        &[
            "hipoteca",
            "hipotecas",
            "hipotecario",
            "hipotecaria",
            "crédito hipotecario",
            "euribor",
            "tipo de interés",
            "tasa hipotecaria",
            "préstamo hipotecario",
            "subrogación",
            "novación",
            "cancelación hipoteca",
        ],
    ),
    (
        Category::PreciosVivienda,
        &[
            "precio de vivienda",
            "precios de vivienda",
            "precio vivienda",
            "precios vivienda",
            "precio por m²",
            "precio por metro",
            "evolución precios",
            "precio medio",
            "precio medio vivienda",
            "coste vivienda",
            "valor vivienda",
            "revalorización",
        ],
    ),
    (
        Category::GrandesInversionesInmobiliarias,
        &[
            "gran inversión",
            "grandes inversiones",
            "inversión millonaria",
            "millones de inversión",
            "mega proyecto",
            "macro proyecto",
            "inversión masiva",
            "operación inmobiliaria",
            "transacción millonaria",
            "adquisición millonaria",
            "proyectos en españa",
            "proyectos en londres",
            "proyectos en parís",
        ],
    ),
    (
        Category::MovimientosGrandesTenedores,
        &[
            "gran tenedor",
            "grandes tenedores",
            "inversor institucional",
            "inversores institucionales",
            "fondo buitre",
            "fondos buitre",
            "hedge fund",
            "private equity",
            "operador inmobiliario",
            "operadores inmobiliarios",
            "rotación de activos",
            "desinversión",
            "desinvirtiendo",
            "reinversión",
        ],
    ),
];

const GENERAL_REAL_ESTATE: &[&str] = &[
    "inmobiliario",
    "inmobiliaria",
    "inmobiliarias",
    "vivienda",
    "viviendas",
    "propiedad",
    "propiedades",
    "inmueble",
    "inmuebles",
    "mercado inmobiliario",
];

/// Ordered keyword groups for tech items; the first group with a hit wins.
const TECH_RULES: &[(Category, &[&str])] = &[
    (
        Category::AiMl,
        &[
            "inteligencia artificial",
            "ia ",
            " ai ",
            "machine learning",
            "ml ",
            "deep learning",
            "neural",
            "llm",
            "gpt",
            "claude",
            "chatgpt",
            "openai",
            "anthropic",
            "modelo de lenguaje",
            "generative ai",
        ],
    ),
    (
        Category::ReleaseUpdate,
        &[
            "lanza",
            "lanzamiento",
            "actualización",
            "update",
            "release",
            "nueva versión",
            "v2",
            "v3",
            "beta",
            "ga ",
            "general availability",
        ],
    ),
    (
        Category::ToolDiscovery,
        &[
            "herramienta",
            "tool",
            "descubrimiento",
            "nuevo producto",
            "startup lanza",
            "plataforma",
            "software",
            "app ",
        ],
    ),
    (
        Category::Research,
        &[
            "investigación",
            "research",
            "estudio",
            "paper",
            "universidad",
            "laboratorio",
            "mit ",
            "stanford",
            "nature",
            "science",
        ],
    ),
    (
        Category::Startups,
        &[
            "startup",
            "seed",
            "serie a",
            "serie b",
            "funding",
            "financiación",
            "venture",
            "aceleradora",
            "incubadora",
            "unicornio",
        ],
    ),
    (
        Category::BigTech,
        &[
            "google",
            "microsoft",
            "apple",
            "amazon",
            "meta",
            "facebook",
            "alphabet",
            "nvidia",
            "tesla",
            "netflix",
        ],
    ),
    (
        Category::Security,
        &[
            "cve",
            "vulnerability",
            "vulnerabilidad",
            "patch",
            "exploit",
            "zero-day",
            "zeroday",
            "seguridad",
            "security",
            "hack",
            "ransomware",
        ],
    ),
    (
        Category::PolicyEthics,
        &[
            "regulación",
            "regulation",
            "ética",
            "ethics",
            "privacy",
            "privacidad",
            "gdpr",
            "antitrust",
            "competencia",
            "ley ",
        ],
    ),
];

const TECH_TAG_TERMS: &[&str] = &[
    "ai",
    "ia",
    "ml",
    "llm",
    "gpt",
    "startup",
    "tech",
    "software",
    "data",
    "cloud",
    "saas",
    "api",
    "blockchain",
    "crypto",
    "automation",
    "robot",
    "drone",
    "ar",
    "vr",
    "iot",
    "openai",
    "anthropic",
    "google",
    "microsoft",
    "meta",
    "nvidia",
];

const MAX_TAGS: usize = 8;

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9áéíóúüñ]+").unwrap());

fn search_text(title: &str, summary: Option<&str>) -> String {
    match summary {
        Some(summary) => format!("{title} {summary}").to_lowercase(),
        None => title.to_lowercase(),
    }
}

/// Keyword category for a real-estate item, if any rule fires.
pub fn real_estate_category(title: &str, summary: Option<&str>) -> Option<Category> {
    let text = search_text(title, summary);

    let phrase_hit = |kw: &&str| kw.contains(' ') && text.contains(*kw);
    let word_hit = |kw: &&str| !kw.contains(' ') && text.contains(*kw);

    REAL_ESTATE_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(phrase_hit))
        .or_else(|| {
            REAL_ESTATE_RULES
                .iter()
                .find(|(_, keywords)| keywords.iter().any(word_hit))
        })
        .map(|(category, _)| *category)
        .or_else(|| {
            GENERAL_REAL_ESTATE
                .iter()
                .any(|kw| text.contains(kw))
                .then_some(Category::NoticiasInmobiliarias)
        })
}

/// Tech category; always resolves, `OTHER_TECH` when nothing matches.
pub fn tech_category(title: &str, summary: Option<&str>) -> Category {
    // Padding lets the space-delimited keywords hit at either end.
    let text = format!(" {} ", search_text(title, summary));
    TECH_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::OtherTech)
}

/// Known tech terms found as whole words, in order of first appearance,
/// joined with commas. `None` when nothing is found.
pub fn tech_tags(title: &str, summary: Option<&str>) -> Option<String> {
    let text = search_text(title, summary);
    let mut tags: Vec<&str> = Vec::new();
    for word in WORD_REGEX.find_iter(&text) {
        let Some(term) = TECH_TAG_TERMS.iter().find(|t| **t == word.as_str()) else {
            continue;
        };
        if !tags.contains(term) {
            tags.push(term);
        }
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    (!tags.is_empty()).then(|| tags.join(","))
}

/// Category and tags for an admitted entry.
pub fn classify(
    domain: Domain,
    title: &str,
    summary: Option<&str>,
    default_category: Category,
) -> (Category, Option<String>) {
    match domain {
        Domain::RealEstate => (
            real_estate_category(title, summary).unwrap_or(default_category),
            None,
        ),
        Domain::Tech => (tech_category(title, summary), tech_tags(title, summary)),
    }
}
