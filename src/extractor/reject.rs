const MIN_CONTENT_LENGTH: usize = 200;
const MIN_WORD_COUNT: usize = 40;
const MAX_BOILERPLATE_RATIO: f64 = 0.3;

const BOILERPLATE_KEYWORDS: [&str; 32] = [
    "cookie",
    "cookies",
    "privacidad",
    "privacy",
    "aviso legal",
    "términos",
    "condiciones de uso",
    "consentimiento",
    "consent",
    "aceptar",
    "rechazar",
    "accept",
    "preferencias",
    "suscríbete",
    "suscribirse",
    "subscribe",
    "newsletter",
    "iniciar sesión",
    "login",
    "regístrate",
    "contraseña",
    "password",
    "404",
    "not found",
    "página no encontrada",
    "acceso denegado",
    "cargando",
    "javascript",
    "navegador",
    "haz clic aquí",
    "leer más",
    "read more",
];

/// Whether extracted page text is too thin or too noisy to stand in for a
/// feed summary.
pub fn should_reject(title: &str, text: &str) -> bool {
    // Reject if content is too short
    if text.chars().count() < MIN_CONTENT_LENGTH {
        return true;
    }

    let word_count = text.split_whitespace().count();

    // Reject if both title is empty and word count is too low
    if title.trim().is_empty() && word_count < MIN_WORD_COUNT {
        return true;
    }

    has_too_much_boilerplate(text, word_count)
}

fn has_too_much_boilerplate(text: &str, total_words: usize) -> bool {
    if total_words == 0 {
        return true;
    }
    let text_lower = text.to_lowercase();
    let boilerplate_count: usize = BOILERPLATE_KEYWORDS
        .iter()
        .map(|keyword| text_lower.matches(keyword).count())
        .sum();

    boilerplate_count as f64 / total_words as f64 > MAX_BOILERPLATE_RATIO
}
