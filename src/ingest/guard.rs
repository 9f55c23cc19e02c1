use serde::Deserialize;

/// Deny/allow keyword sets plus the strictness flag for one source or domain.
///
/// Keywords are lowercased and trimmed on construction; blank entries are
/// dropped. The value is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "GuardrailsConfig")]
pub struct Guardrails {
    deny: Vec<String>,
    allow: Vec<String>,
    strict: bool,
}

#[derive(Deserialize)]
struct GuardrailsConfig {
    #[serde(default)]
    deny: Vec<String>,
    #[serde(default)]
    allow: Vec<String>,
    #[serde(default)]
    strict: bool,
}

impl From<GuardrailsConfig> for Guardrails {
    fn from(config: GuardrailsConfig) -> Self {
        Guardrails::new(config.deny, config.allow, config.strict)
    }
}

/// Why an entry was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Denied,
    Allowed,
    MissingAllow,
    Permitted,
}

impl Verdict {
    pub fn admits(self) -> bool {
        matches!(self, Verdict::Allowed | Verdict::Permitted)
    }
}

impl Guardrails {
    pub fn new<D, A>(deny: D, allow: A, strict: bool) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            deny: clean_keywords(deny),
            allow: clean_keywords(allow),
            strict,
        }
    }

    /// Admit everything.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn deny(&self) -> &[String] {
        &self.deny
    }

    pub fn allow(&self) -> &[String] {
        &self.allow
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn evaluate(&self, title: &str, summary: Option<&str>, url: Option<&str>) -> Verdict {
        let mut text = title.to_lowercase();
        for part in [summary, url].into_iter().flatten() {
            text.push(' ');
            text.push_str(&part.to_lowercase());
        }

        if self.deny.iter().any(|kw| text.contains(kw.as_str())) {
            return Verdict::Denied;
        }
        if self.allow.is_empty() {
            return Verdict::Permitted;
        }
        if self.allow.iter().any(|kw| text.contains(kw.as_str())) {
            return Verdict::Allowed;
        }
        if self.strict {
            Verdict::MissingAllow
        } else {
            Verdict::Permitted
        }
    }

    pub fn passes(&self, title: &str, summary: Option<&str>, url: Option<&str>) -> bool {
        self.evaluate(title, summary, url).admits()
    }
}

fn clean_keywords<I>(keywords: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|kw| kw.as_ref().trim().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn housing(strict: bool) -> Guardrails {
        Guardrails::new(["okupas"], ["vivienda"], strict)
    }

    #[test]
    fn test_allow_match_accepts() {
        assert!(housing(true).passes("Precio de la vivienda sube", None, None));
    }

    #[test]
    fn test_deny_wins_over_allow() {
        let guard = housing(true);
        assert_eq!(
            guard.evaluate("Noticia sobre okupas en vivienda", None, None),
            Verdict::Denied
        );
    }

    #[test]
    fn test_strict_requires_allow_match() {
        assert_eq!(
            housing(true).evaluate("Noticia sobre coches", None, None),
            Verdict::MissingAllow
        );
        assert!(housing(false).passes("Noticia sobre coches", None, None));
    }

    #[test]
    fn test_empty_allow_set_accepts_unless_denied() {
        let guard = Guardrails::new(["fútbol"], Vec::<String>::new(), true);
        assert!(guard.passes("Cualquier cosa", None, None));
        assert!(!guard.passes("Resultados de FÚTBOL", None, None));
        assert!(Guardrails::permissive().passes("", None, None));
    }

    #[test]
    fn test_summary_and_url_are_searched() {
        let guard = housing(true);
        assert!(guard.passes("Titular neutro", Some("Sube la VIVIENDA"), None));
        assert!(guard.passes("Titular neutro", None, Some("https://x.es/vivienda/1")));
        assert!(!guard.passes("Titular neutro", None, Some("https://x.es/okupas/1")));
    }

    #[test]
    fn test_substring_matching_is_not_word_bound() {
        let guard = Guardrails::new(Vec::<String>::new(), ["ia"], true);
        // "ia" matches inside "noticia".
        assert!(guard.passes("Una noticia cualquiera", None, None));
    }

    #[test]
    fn test_keywords_are_normalized() {
        let guard = Guardrails::new(["  OKUPAS "], ["Vivienda", "  "], true);
        assert_eq!(guard.deny(), ["okupas"]);
        assert_eq!(guard.allow(), ["vivienda"]);
        assert!(guard.strict());
    }

    #[test]
    fn test_deserializes_from_toml() {
        let guard: Guardrails =
            toml::from_str("deny = [\"Okupas\"]\nallow = [\"vivienda\"]\nstrict = true").unwrap();
        assert_eq!(guard, housing(true));
        let empty: Guardrails = toml::from_str("").unwrap();
        assert_eq!(empty, Guardrails::permissive());
    }
}
