//! Brand-voice rewriting of stored items.
//!
//! The adapted text has three lines: a neutral statement of the fact, a reading
//! of what it means for the category, and a rotating closer.

use crate::brands::Domain;
use crate::category::Category;

/// Althara closers, used for real-estate items and unknown categories.
pub const REAL_ESTATE_CLOSERS: [&str; 4] = [
    "Lo relevante no es el titular, sino quién ajusta posición antes de que el consenso llegue.",
    "La oportunidad aparece en el desfase entre el dato y la reacción del mercado visible.",
    "Donde el mercado ve ruido, Althara sólo registra el punto exacto del desplazamiento.",
    "Aquí importa menos el precio comunicado y más quién tiene acceso al siguiente movimiento.",
];

/// Oxono closers for tech items.
pub const TECH_CLOSERS: [&str; 4] = [
    "Lo relevante no es el anuncio, sino quién lo lleva a producción antes que el resto.",
    "La ventaja está en el intervalo entre la publicación y la adopción real por los equipos.",
    "Donde otros ven una novedad más, Oxono registra el cambio de base sobre el que se construirá lo siguiente.",
    "Aquí pesa menos la promesa de la demo y más quién controla la infraestructura que la hace posible.",
];

const FACT_LEAD_IN: &str = "Los últimos datos apuntan a lo siguiente: ";

// Openings that already read neutral and need no lead-in.
const NEUTRAL_OPENINGS: [&str; 5] = ["el ", "la ", "los ", "las ", "en "];

const GENERIC_READING: &str = "El dato no va solo: se suma a una secuencia de señales que reordenan quién tiene visibilidad real y quién llega tarde a cada movimiento.";

/// Compose the adapted summary for one item.
///
/// `summary` is expected to be normalized and already compacted. The category
/// is the stored tag; unknown tags get the generic reading. Never returns an
/// empty string.
pub fn adapt(title: &str, summary: Option<&str>, category: &str, seed: u64) -> String {
    let category = Category::parse(category);
    let fact = fact_line(title, summary);
    let reading = strategic_line(category);
    let domain = category.map_or(Domain::RealEstate, Category::domain);
    let closer = pick_closer(domain, seed);
    [fact.as_str(), reading, closer].join("\n")
}

fn fact_line(title: &str, summary: Option<&str>) -> String {
    let title = title.trim();
    let summary = summary.map(str::trim).filter(|s| !s.is_empty());

    let fact = match summary {
        Some(summary) if title.is_empty() => summary.to_string(),
        Some(summary) if ends_with_terminal(title) => format!("{title} {summary}"),
        Some(summary) => format!("{title}. {summary}"),
        None => title.to_string(),
    };

    let lower = fact.to_lowercase();
    if NEUTRAL_OPENINGS.iter().any(|o| lower.starts_with(o)) {
        fact
    } else {
        format!("{FACT_LEAD_IN}{fact}")
    }
}

fn ends_with_terminal(text: &str) -> bool {
    text.ends_with(['.', '?', '!', '…', ':'])
}

fn strategic_line(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::PreciosVivienda) => {
            "Detrás de la cifra, el patrón es un ajuste entre oferta limitada y demanda que aún no ha reprecificado del todo el riesgo del ciclo."
        }
        Some(
            Category::FondosInversionInmobiliaria
            | Category::MovimientosGrandesTenedores
            | Category::GrandesInversionesInmobiliarias,
        ) => {
            "El movimiento no es aislado: refleja una rotación silenciosa de capital hacia activos donde la asimetría de información sigue siendo aprovechable."
        }
        Some(Category::NoticiasHipotecas) => {
            "El repliegue y la reconfiguración del crédito redefinen quién puede seguir operando con ventaja en el próximo tramo del ciclo."
        }
        Some(Category::NoticiasBoeSubastas | Category::NoticiasDesahucios) => {
            "Estas entradas formalizan stock, pero sobre todo dibujan el mapa de activos donde el mercado aún no ha fijado un precio de consenso."
        }
        Some(
            Category::NoticiasLeyesOkupas | Category::NormativasViviendas | Category::FaltaVivienda,
        ) => {
            "La regulación no solo corrige desequilibrios aparentes, sino que reordena qué actores conservan acceso operativo real al mercado."
        }
        Some(
            Category::NoticiasConstruccion
            | Category::PreciosMateriales
            | Category::PreciosSuelo
            | Category::NovedadesConstruccion,
        ) => {
            "Los costes y las reglas del juego de la obra redefinen la frontera entre proyectos viables y meros ejercicios teóricos de rentabilidad."
        }
        Some(Category::ConstruccionModular | Category::NoticiasUrbanizacion) => {
            "La industrialización y el planeamiento no solo cambian formas, comprimen plazos y riesgos allí donde el capital esté dispuesto a anticiparse."
        }
        Some(Category::FuturoSectorInmobiliario | Category::BurbujaInmobiliaria) => {
            "Más que un dato aislado, es una línea más en el gráfico de tensiones acumuladas que el consenso aún no ha terminado de asumir."
        }
        Some(Category::NoticiasInmobiliarias) => {
            "No es una noticia suelta: es otra pieza en la secuencia que reordena precios, actores y acceso efectivo a oportunidades reales."
        }
        Some(
            Category::AlquilerVacacional
            | Category::TokenizationActivos
            | Category::ReleaseUpdate
            | Category::ToolDiscovery
            | Category::Research
            | Category::AiMl
            | Category::Startups
            | Category::BigTech
            | Category::Security
            | Category::PolicyEthics
            | Category::OtherTech,
        )
        | None => GENERIC_READING,
    }
}

fn closers(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::RealEstate => &REAL_ESTATE_CLOSERS,
        Domain::Tech => &TECH_CLOSERS,
    }
}

fn pick_closer(domain: Domain, seed: u64) -> &'static str {
    let closers = closers(domain);
    closers[(seed % closers.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_lines_with_title_and_summary_first() {
        let out = adapt(
            "Precio de la vivienda sube",
            Some("El metro cuadrado marca récord en Madrid."),
            "PRECIOS_VIVIENDA",
            0,
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Los últimos datos apuntan a lo siguiente: Precio de la vivienda sube. El metro cuadrado marca récord en Madrid."
        );
        assert!(lines[1].starts_with("Detrás de la cifra"));
        assert_eq!(lines[2], REAL_ESTATE_CLOSERS[0]);
    }

    #[test]
    fn test_every_category_and_unknown_is_total() {
        let title = "Nueva ley de vivienda";
        let summary = "El Congreso aprueba la reforma";
        let tags = Category::ALL
            .iter()
            .map(|c| c.as_str().to_string())
            .chain(["SOMETHING_ELSE".to_string(), String::new()]);
        for tag in tags {
            let out = adapt(title, Some(summary), &tag, 7);
            assert!(!out.is_empty());
            let first = out.lines().next().unwrap();
            assert!(first.contains(title), "category {tag}");
            assert!(first.contains(summary), "category {tag}");
        }
    }

    #[test]
    fn test_unknown_category_uses_generic_reading() {
        let out = adapt("Titular", None, "NOT_A_CATEGORY", 1);
        assert_eq!(out.lines().nth(1), Some(GENERIC_READING));
        let tech = adapt("Titular", None, "AI_ML", 1);
        assert_eq!(tech.lines().nth(1), Some(GENERIC_READING));
    }

    #[test]
    fn test_neutral_openings_skip_lead_in() {
        let out = adapt("El Banco de España avisa", Some("Riesgo al alza"), "", 0);
        assert!(out.starts_with("El Banco de España avisa. Riesgo al alza"));
        let out = adapt("En Valencia suben los alquileres", None, "", 0);
        assert!(out.starts_with("En Valencia"));
    }

    #[test]
    fn test_no_double_punctuation() {
        let out = adapt("¿Sube el euríbor?", Some("Los analistas creen que sí."), "", 0);
        assert!(out.lines().next().unwrap().ends_with("¿Sube el euríbor? Los analistas creen que sí."));
    }

    #[test]
    fn test_closer_rotates_with_seed() {
        for seed in 0..8u64 {
            let out = adapt("t", None, "", seed);
            assert_eq!(out.lines().last(), Some(REAL_ESTATE_CLOSERS[(seed % 4) as usize]));
        }
    }

    #[test]
    fn test_closer_follows_category_brand() {
        for seed in 0..4u64 {
            let tech = adapt("Nuevo modelo abierto", None, "AI_ML", seed);
            assert_eq!(tech.lines().last(), Some(TECH_CLOSERS[seed as usize]));
            assert!(!tech.contains("Althara"));

            let housing = adapt("Sube el alquiler", None, "PRECIOS_VIVIENDA", seed);
            assert_eq!(housing.lines().last(), Some(REAL_ESTATE_CLOSERS[seed as usize]));
            assert!(!housing.contains("Oxono"));
        }
        let unknown = adapt("Titular", None, "NOT_A_CATEGORY", 2);
        assert_eq!(unknown.lines().last(), Some(REAL_ESTATE_CLOSERS[2]));
    }

    #[test]
    fn test_empty_inputs_still_produce_text() {
        let out = adapt("", None, "", 3);
        assert!(!out.is_empty());
        assert_eq!(out.lines().count(), 3);
    }
}
