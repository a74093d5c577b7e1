use crate::shared::DomainError;

/// Trim `value` and reject it when nothing is left.
pub fn require_non_blank<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, DomainError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(message)),
    }
}

/// Lowercase and strip the French diacritics used in status keywords,
/// so "Confirmée" and "confirmee" compare equal.
pub fn fold_keyword(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(require_non_blank(None, "subject is required").is_err());
        assert!(require_non_blank(Some("   "), "subject is required").is_err());
        assert_eq!(require_non_blank(Some("  Lost bag "), "x").unwrap(), "Lost bag");
    }

    #[test]
    fn folding_strips_accents_and_case() {
        assert_eq!(fold_keyword(" Annulée "), "annulee");
        assert_eq!(fold_keyword("CONFIRMÉE"), "confirmee");
    }
}
