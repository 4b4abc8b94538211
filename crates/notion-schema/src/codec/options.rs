//! Parse configuration.

/// How strictly rich-text annotations are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnnotationPolicy {
    /// All six annotation fields are required.
    #[default]
    Strict,
    /// Missing flags default to `false` and a missing color to
    /// `"default"`; a missing `annotations` object is all defaults.
    /// Fields that are present must still be well-formed.
    Permissive,
}

/// Options for parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub annotations: AnnotationPolicy,

    /// Report schema entries whose map key differs from the property's
    /// `name` as errors instead of only logging them.
    pub check_schema_keys: bool,
}

impl ParseOptions {
    /// Creates default options: strict annotations, schema keys logged only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict annotations and schema key checks.
    pub fn strict() -> Self {
        Self {
            annotations: AnnotationPolicy::Strict,
            check_schema_keys: true,
        }
    }

    /// Permissive annotations, schema keys logged only.
    pub fn permissive() -> Self {
        Self {
            annotations: AnnotationPolicy::Permissive,
            check_schema_keys: false,
        }
    }
}
