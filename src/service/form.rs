//! Text fields of a multipart listing form.
//!
//! Listing forms arrive as strings. A field counts as present only when it
//! holds something usable: blank text and numbers that are zero, negative, or
//! unparseable are all treated as missing.

use std::collections::HashMap;

/// Text fields keyed by name. A repeated field keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: HashMap<String, String>,
}

impl FormFields {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw value of `name`, untrimmed.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Trimmed value of `name`, `None` if absent or blank.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.raw(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// First present text among `names`.
    #[must_use]
    pub fn text_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.text(name))
    }

    /// Value of `name` as a finite number greater than zero.
    #[must_use]
    pub fn positive_number(&self, name: &str) -> Option<f64> {
        self.text(name)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|n| n.is_finite() && *n > 0.0)
    }

    /// `true` only when `name` is exactly `"true"`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.raw(name).is_some_and(|v| v.trim() == "true")
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no field was sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// Converts a positive number to a whole count, `None` if it has a
/// fractional part or does not fit.
#[must_use]
pub fn whole_count(value: f64) -> Option<u32> {
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value as u32;
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormFields {
        [
            ("name", "  Grand Hall "),
            ("blank", "   "),
            ("capacity", "100"),
            ("zero", "0"),
            ("negative", "-5"),
            ("nan", "abc"),
            ("availability", "true"),
            ("off", "yes"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn text_is_trimmed_and_blank_is_missing() {
        let f = form();
        assert_eq!(f.text("name"), Some("Grand Hall"));
        assert_eq!(f.text("blank"), None);
        assert_eq!(f.text("absent"), None);
        assert_eq!(f.text_any(&["absent", "blank", "name"]), Some("Grand Hall"));
    }

    #[test]
    fn only_positive_numbers_count() {
        let f = form();
        assert_eq!(f.positive_number("capacity"), Some(100.0));
        assert_eq!(f.positive_number("zero"), None);
        assert_eq!(f.positive_number("negative"), None);
        assert_eq!(f.positive_number("nan"), None);
    }

    #[test]
    fn flag_requires_literal_true() {
        let f = form();
        assert!(f.flag("availability"));
        assert!(!f.flag("off"));
        assert!(!f.flag("absent"));
    }

    #[test]
    fn whole_counts() {
        assert_eq!(whole_count(150.0), Some(150));
        assert_eq!(whole_count(10.5), None);
        assert_eq!(whole_count(1e12), None);
    }
}
