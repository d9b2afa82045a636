//! Field selection

use std::fmt;

/// One entry of a user field selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldToken {
    /// A real field name, possibly with a nested selection
    Field(String),
    /// "Select all" UI marker
    SelectAll,
    /// "Deselect all" UI marker
    DeselectAll,
    /// Visual separator marker
    Separator,
}

impl FieldToken {
    /// Classify a raw token
    ///
    /// Markers are recognised by their `SELECT_ALL`, `DESELECT_ALL` and
    /// `SEPARATOR` prefixes, which the UI suffixes with a group name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("DESELECT_ALL") {
            Self::DeselectAll
        } else if raw.starts_with("SELECT_ALL") {
            Self::SelectAll
        } else if raw.starts_with("SEPARATOR") {
            Self::Separator
        } else {
            Self::Field(raw.to_string())
        }
    }

    /// Whether this token is a UI marker rather than a field
    pub fn is_marker(&self) -> bool {
        !matches!(self, Self::Field(_))
    }

    /// The field name, if this is a field
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for FieldToken {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Ordered, de-duplicated field projection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<String>,
}

impl FieldSet {
    /// Build from raw tokens, dropping markers and blanks
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: Vec<String> = Vec::new();
        for token in tokens {
            if let FieldToken::Field(name) = FieldToken::parse(token.as_ref()) {
                if !name.is_empty() && !fields.contains(&name) {
                    fields.push(name);
                }
            }
        }
        Self { fields }
    }

    /// Use `defaults` when the selection is empty
    #[must_use]
    pub fn or_defaults(self, defaults: &[&str]) -> Self {
        if self.fields.is_empty() {
            Self::from_tokens(defaults)
        } else {
            self
        }
    }

    /// Drop every field that carries a nested selection
    #[must_use]
    pub fn without_nested(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|f| !f.contains('{'))
                .cloned()
                .collect(),
        }
    }

    /// Whether any field carries a nested selection
    pub fn has_nested(&self) -> bool {
        self.fields.iter().any(|f| f.contains('{'))
    }

    /// Field names in selection order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the selection is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The projection fragment, one field per line
    pub fn projection(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        self.fields
            .iter()
            .map(|f| format!("{pad}{f}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join(" "))
    }
}
