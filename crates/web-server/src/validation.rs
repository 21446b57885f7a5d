//! Normalization of raw request input before it reaches the catalog.
//!
//! Pagination and search-limit values are coerced and clamped, never rejected.
//! Ids, stages and names either parse or produce a 400.

use crate::error::AppError;
use core_types::{PageRequest, Stage};

pub use catalog::MAX_SEARCH_LIMIT;

pub const MAX_SEARCH_TERM_CHARS: usize = 100;
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_NAME_CHARS: usize = 255;

/// Trims, strips `<` and `>`, and truncates to 100 characters.
///
/// Absent input becomes the empty string.
pub fn sanitize_search_term(term: Option<&str>) -> String {
    match term {
        Some(term) => term
            .trim()
            .chars()
            .filter(|c| !matches!(c, '<' | '>'))
            .take(MAX_SEARCH_TERM_CHARS)
            .collect(),
        None => String::new(),
    }
}

/// Coerces and clamps the list pagination parameters.
///
/// Missing or non-numeric values fall back to page 1 and limit 50; the result
/// always satisfies `page >= 1` and `1 <= limit <= 100`.
pub fn validate_pagination(page: Option<&str>, limit: Option<&str>) -> PageRequest {
    PageRequest::new(
        coerce_int(page).unwrap_or(PageRequest::DEFAULT_PAGE),
        coerce_int(limit).unwrap_or(PageRequest::DEFAULT_LIMIT),
    )
}

/// Coerces and clamps the search `limit` to `[1, 50]`, defaulting to 10.
pub fn validate_search_limit(limit: Option<&str>) -> i64 {
    coerce_int(limit)
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT)
}

/// Parses a positive integer id from a path segment.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::Validation(format!(
            "ID inválido: '{raw}'. Deve ser um inteiro positivo"
        ))),
    }
}

/// Parses the optional `stage` filter. An empty value means no filter.
pub fn parse_stage(raw: Option<&str>) -> Result<Option<Stage>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(label) => label
            .parse::<Stage>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Estágio inválido: '{label}'"))),
    }
}

/// Checks that a name path segment is 1 to 255 characters long.
pub fn validate_name(name: &str) -> Result<&str, AppError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(AppError::Validation(format!(
            "Nome inválido: deve ter entre 1 e {MAX_NAME_CHARS} caracteres"
        )));
    }
    Ok(name)
}

/// Integer coercion for query-string numbers: plain integers parse as-is,
/// finite decimals are truncated, anything else is treated as missing.
fn coerce_int(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_pagination_is_returned_unchanged() {
        for (page, limit) in [(1, 1), (1, 50), (7, 100), (42, 13)] {
            let (page_raw, limit_raw) = (page.to_string(), limit.to_string());
            let request = validate_pagination(Some(page_raw.as_str()), Some(limit_raw.as_str()));
            assert_eq!((request.page(), request.limit()), (page, limit));
        }
    }

    #[test]
    fn missing_or_non_numeric_pagination_uses_defaults() {
        let expected = PageRequest::default();
        assert_eq!(validate_pagination(None, None), expected);
        assert_eq!(validate_pagination(Some("abc"), Some("")), expected);
        assert_eq!(validate_pagination(Some("NaN"), Some("inf")), expected);
    }

    #[test]
    fn limit_is_clamped_to_bounds() {
        assert_eq!(validate_pagination(None, Some("101")).limit(), 100);
        assert_eq!(validate_pagination(None, Some("100000")).limit(), 100);
        assert_eq!(validate_pagination(None, Some("0")).limit(), 1);
        assert_eq!(validate_pagination(None, Some("-5")).limit(), 1);
    }

    #[test]
    fn page_is_clamped_to_one() {
        assert_eq!(validate_pagination(Some("0"), None).page(), 1);
        assert_eq!(validate_pagination(Some("-2"), None).page(), 1);
    }

    #[test]
    fn decimals_are_truncated() {
        assert_eq!(
            validate_pagination(Some("2.9"), Some(" 20.5 ")),
            PageRequest::new(2, 20)
        );
    }

    #[test]
    fn sanitize_strips_angle_brackets() {
        assert_eq!(
            sanitize_search_term(Some("<script>a</script>")),
            "scripta/script"
        );
    }

    #[test]
    fn sanitize_absent_input_is_empty() {
        assert_eq!(sanitize_search_term(None), "");
    }

    #[test]
    fn sanitize_trims_and_truncates() {
        assert_eq!(sanitize_search_term(Some("  Agumon \t")), "Agumon");

        let long = "é".repeat(150);
        let sanitized = sanitize_search_term(Some(long.as_str()));
        assert_eq!(sanitized.chars().count(), 100);
    }

    #[test]
    fn search_limit_defaults_and_clamps() {
        assert_eq!(validate_search_limit(None), 10);
        assert_eq!(validate_search_limit(Some("x")), 10);
        assert_eq!(validate_search_limit(Some("80")), 50);
        assert_eq!(validate_search_limit(Some("0")), 1);
        assert_eq!(validate_search_limit(Some("25")), 25);
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(parse_id("0").is_err());
        assert!(parse_id("-1").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
    }

    #[test]
    fn stage_filter_parses_known_labels() {
        assert_eq!(parse_stage(None).unwrap(), None);
        assert_eq!(parse_stage(Some("")).unwrap(), None);
        assert_eq!(parse_stage(Some("VI+")).unwrap(), Some(Stage::VIPlus));
        assert!(matches!(
            parse_stage(Some("Mega")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn names_are_length_checked() {
        assert!(validate_name("Agumon").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"a".repeat(256)).is_err());
        assert!(validate_name(&"a".repeat(255)).is_ok());
    }
}
