//! Category legend: the `name{key}` bindings shown over the display.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Undo key used when none is configured.
pub const DEFAULT_UNDO_KEY: char = 'u';

/// One category name and the key that files a sample into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBinding {
    pub name: String,
    pub key: char,
}

impl CategoryBinding {
    pub fn new(name: impl Into<String>, key: char) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }
}

/// Errors raised while reading a legend typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("No categories provided")]
    Empty,
    #[error("Category and key mapping incorrect in \"{0}\"; format: name{{key}}")]
    Malformed(String),
    #[error("Key for \"{0}\" must be a single character; format: name{{character}}")]
    KeyLength(String),
    #[error("{0} is reserved as the undo key")]
    ReservedKey(char),
    #[error("Duplicate category name \"{0}\"")]
    DuplicateName(String),
    #[error("Duplicate category key {0}")]
    DuplicateKey(char),
}

/// Validated legend: ordered bindings plus the reserved undo key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    bindings: Vec<CategoryBinding>,
    undo_key: char,
}

impl CategoryMap {
    /// Parse `category1{key1}, category2{key2}, ...`.
    pub fn parse(text: &str, undo_key: char) -> Result<Self, CategoryError> {
        if text.trim().is_empty() {
            return Err(CategoryError::Empty);
        }
        let mut bindings = Vec::new();
        for entry in text.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            bindings.push(parse_entry(entry)?);
        }
        Self::from_bindings(bindings, undo_key)
    }

    /// Validate an already split list of bindings.
    pub fn from_bindings(
        bindings: Vec<CategoryBinding>,
        undo_key: char,
    ) -> Result<Self, CategoryError> {
        if bindings.is_empty() {
            return Err(CategoryError::Empty);
        }
        for (index, binding) in bindings.iter().enumerate() {
            if binding.name.trim().is_empty() {
                return Err(CategoryError::Malformed(format!("{{{}}}", binding.key)));
            }
            if keys_match(binding.key, undo_key) {
                return Err(CategoryError::ReservedKey(binding.key));
            }
            let earlier = &bindings[..index];
            if earlier.iter().any(|other| other.name == binding.name) {
                return Err(CategoryError::DuplicateName(binding.name.clone()));
            }
            if earlier.iter().any(|other| keys_match(other.key, binding.key)) {
                return Err(CategoryError::DuplicateKey(binding.key));
            }
        }
        Ok(Self { bindings, undo_key })
    }

    pub fn bindings(&self) -> &[CategoryBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn undo_key(&self) -> char {
        self.undo_key
    }

    /// Index of the binding that `key` selects. Letters match in either case.
    pub fn lookup(&self, key: char) -> Option<usize> {
        self.bindings
            .iter()
            .position(|binding| keys_match(binding.key, key))
    }

    pub fn is_undo_key(&self, key: char) -> bool {
        keys_match(self.undo_key, key)
    }

    /// Render back into the editable `name{key},name{key}` form.
    pub fn format(&self) -> String {
        format_bindings(&self.bindings)
    }

    /// Lines drawn over the display, with the undo hint last.
    pub fn legend_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|binding| format!("{}: {}", binding.key, binding.name))
            .collect();
        lines.push(format!("{}: Undo", self.undo_key.to_ascii_uppercase()));
        lines
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
            undo_key: DEFAULT_UNDO_KEY,
        }
    }
}

/// The starter legend: a single junk bin.
pub fn default_bindings() -> Vec<CategoryBinding> {
    vec![CategoryBinding::new("junk", '0')]
}

pub fn format_bindings(bindings: &[CategoryBinding]) -> String {
    bindings
        .iter()
        .map(|binding| format!("{}{{{}}}", binding.name, binding.key))
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_entry(entry: &str) -> Result<CategoryBinding, CategoryError> {
    let mut parts = entry.split(['{', '}']);
    let name = parts.next().unwrap_or_default().trim();
    let Some(key) = parts.next() else {
        return Err(CategoryError::Malformed(entry.to_string()));
    };
    if name.is_empty() {
        return Err(CategoryError::Malformed(entry.to_string()));
    }
    let mut chars = key.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => Ok(CategoryBinding::new(name, key)),
        _ => Err(CategoryError::KeyLength(entry.to_string())),
    }
}

fn keys_match(a: char, b: char) -> bool {
    a.eq_ignore_ascii_case(&b)
}
