//! Entry parameters: the query string the wizard was opened with.
//!
//! Two parameters matter here. `reset` wipes the saved registration and is
//! stripped afterwards; `debug` only exposes the developer reset action.

use url::form_urlencoded;

pub const RESET_PARAM: &str = "reset";
pub const DEBUG_PARAM: &str = "debug";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryParams {
    pairs: Vec<(String, String)>,
}

impl EntryParams {
    /// Parse `a=1&b=2`, with or without a leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// First value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn reset_requested(&self) -> bool {
        self.get(RESET_PARAM).is_some_and(truthy)
    }

    #[must_use]
    pub fn debug_enabled(&self) -> bool {
        self.get(DEBUG_PARAM).is_some_and(truthy)
    }

    /// Same parameters with every `reset` pair removed.
    #[must_use]
    pub fn without_reset(&self) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(key, _)| key != RESET_PARAM)
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }
}

/// A bare `?reset` counts as set; explicit negatives do not.
fn truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_flag_forms() {
        assert!(EntryParams::parse("?reset=true").reset_requested());
        assert!(EntryParams::parse("reset").reset_requested());
        assert!(EntryParams::parse("reset=1&lang=fr").reset_requested());
        assert!(!EntryParams::parse("reset=false").reset_requested());
        assert!(!EntryParams::parse("lang=fr").reset_requested());
        assert!(!EntryParams::parse("").reset_requested());
    }

    #[test]
    fn strip_keeps_other_params() {
        let params = EntryParams::parse("?lang=fr&reset=true&debug=1");
        let stripped = params.without_reset();
        assert!(!stripped.reset_requested());
        assert!(stripped.debug_enabled());
        assert_eq!(stripped.to_query(), "lang=fr&debug=1");
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = EntryParams::parse("company=Caf%C3%A9+Martin");
        assert_eq!(params.get("company"), Some("Café Martin"));
    }
}
