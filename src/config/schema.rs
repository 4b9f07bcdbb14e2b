use crate::checks::{Check, CheckSet, Settings};
use crate::classify::TightSet;
use crate::diagnostic::ProblemKind;
use crate::session::Linter;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Config file name looked up during discovery.
pub const CONFIG_FILE_NAME: &str = ".manifest-whitespace.toml";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    #[serde(default)]
    pub lint: LintSection,
    #[serde(default)]
    pub severity: BTreeMap<String, ProblemKind>,
    #[serde(default)]
    pub closing_brace_after: ClosingBraceAfterSection,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LintSection {
    #[serde(default)]
    pub disabled: Vec<String>,
    #[serde(default)]
    pub check_expression_braces: bool,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for LintSection {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            check_expression_braces: false,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["pp".to_string()]
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClosingBraceAfterSection {
    /// Literal token texts that must follow `}` without whitespace
    #[serde(default)]
    pub extra_tight: Vec<String>,
}

impl LintConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for name in &self.lint.disabled {
            if Check::from_name(name).is_none() {
                issues.push(ValidationIssue::unknown_check("lint.disabled", name));
            }
        }
        for name in self.severity.keys() {
            if Check::from_name(name).is_none() {
                issues.push(ValidationIssue::unknown_check("severity", name));
            }
        }

        if self.lint.extensions.is_empty() {
            issues.push(ValidationIssue::EmptyList {
                field: "lint.extensions",
            });
        }
        for extension in &self.lint.extensions {
            if extension.trim().is_empty() {
                issues.push(ValidationIssue::InvalidEntry {
                    field: "lint.extensions",
                    value: extension.clone(),
                    message: "extension is empty",
                });
            }
        }

        for text in &self.closing_brace_after.extra_tight {
            if text.is_empty() {
                issues.push(ValidationIssue::InvalidEntry {
                    field: "closing_brace_after.extra_tight",
                    value: text.clone(),
                    message: "entry is empty",
                });
            } else if text.chars().any(char::is_whitespace) {
                issues.push(ValidationIssue::InvalidEntry {
                    field: "closing_brace_after.extra_tight",
                    value: text.clone(),
                    message: "entry contains whitespace",
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Checks left enabled. Unknown names are ignored; `validate` reports them.
    pub fn check_set(&self) -> CheckSet {
        self.lint
            .disabled
            .iter()
            .filter_map(|name| Check::from_name(name))
            .fold(CheckSet::all(), CheckSet::without)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            tight: TightSet::with_texts(self.closing_brace_after.extra_tight.iter().cloned()),
            check_expression_braces: self.lint.check_expression_braces,
            severity: self
                .severity
                .iter()
                .filter_map(|(name, kind)| Check::from_name(name).map(|check| (check, *kind)))
                .collect(),
        }
    }

    pub fn linter(&self) -> Linter {
        Linter::new(self.check_set(), self.settings())
    }

    /// Whether `extension` (without the dot) names a manifest file.
    pub fn is_manifest_extension(&self, extension: &str) -> bool {
        self.lint
            .extensions
            .iter()
            .any(|known| known.trim_start_matches('.') == extension)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    UnknownCheck {
        field: &'static str,
        name: String,
        suggestion: Option<&'static str>,
    },
    EmptyList {
        field: &'static str,
    },
    InvalidEntry {
        field: &'static str,
        value: String,
        message: &'static str,
    },
}

impl ValidationIssue {
    fn unknown_check(field: &'static str, name: &str) -> Self {
        ValidationIssue::UnknownCheck {
            field,
            name: name.to_string(),
            suggestion: suggest_check(name),
        }
    }
}

/// Closest check name to `name`, if any is reasonably close.
pub fn suggest_check(name: &str) -> Option<&'static str> {
    Check::all_names()
        .map(|candidate| (candidate, strsim::jaro_winkler(name, candidate)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate)
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownCheck {
                field,
                name,
                suggestion,
            } => match suggestion {
                Some(suggestion) => write!(
                    f,
                    "{field}: unknown check '{name}' (did you mean '{suggestion}'?)"
                ),
                None => write!(f, "{field}: unknown check '{name}'"),
            },
            ValidationIssue::EmptyList { field } => write!(f, "{field} must not be empty"),
            ValidationIssue::InvalidEntry {
                field,
                value,
                message,
            } => write!(f, "{field}: invalid entry '{value}': {message}"),
        }
    }
}
