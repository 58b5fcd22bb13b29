use thiserror::Error;

/// Predicate a supplied or defaulted value must satisfy.
pub type Validator = fn(&str) -> bool;

/// A parameter value that cannot be used by its editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("invalid value {value:?} for {name}: expecting {expecting}")]
    Invalid {
        name: String,
        value: String,
        expecting: String,
    },
    #[error("missing value for {name}: expecting {expecting}")]
    Missing { name: String, expecting: String },
}

/// A single positional configuration slot of an editor.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    sequence: usize,
    default: String,
    required: bool,
    validator: Validator,
    expecting: String,
    value: Option<String>,
}

impl Parameter {
    /// Create an optional parameter at `sequence` (1-based) with an empty
    /// default that accepts any value.
    pub fn new(sequence: usize, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence,
            default: String::new(),
            required: false,
            validator: |_| true,
            expecting: "any value".to_string(),
            value: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub const fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn expecting(mut self, expecting: impl Into<String>) -> Self {
        self.expecting = expecting.into();
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    pub fn expecting_description(&self) -> &str {
        &self.expecting
    }

    /// The bound value, if the caller supplied one.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }

    /// Run the validator against `value`. Pure.
    pub fn validate(&self, value: &str) -> bool {
        (self.validator)(value)
    }

    /// The bound value, falling back to the declared default.
    pub fn resolved_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.default)
    }

    /// The resolved value with regex metacharacters escaped, for values that
    /// are compiled into a pattern but must match literally.
    pub fn escaped_resolved_value(&self) -> String {
        regex::escape(self.resolved_value())
    }

    /// Check the resolved value, reporting which parameter failed and what it expects.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] for a required parameter with nothing to
    /// resolve to, or [`ParameterError::Invalid`] when the validator rejects the value.
    pub fn check(&self) -> Result<(), ParameterError> {
        let resolved = self.resolved_value();
        if self.required && self.value.is_none() && self.default.is_empty() {
            return Err(ParameterError::Missing {
                name: self.name.clone(),
                expecting: self.expecting.clone(),
            });
        }
        if !self.validate(resolved) {
            return Err(ParameterError::Invalid {
                name: self.name.clone(),
                value: resolved.to_string(),
                expecting: self.expecting.clone(),
            });
        }
        Ok(())
    }
}

/// The ordered parameters an editor declares, plus the cursor used when
/// arguments arrive one at a time.
#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    params: Vec<Parameter>,
    cursor: usize,
}

impl ParameterList {
    /// Build a list from declarations, ordering them by sequence.
    ///
    /// Sequences must be unique and contiguous from 1.
    pub fn new(mut params: Vec<Parameter>) -> Self {
        params.sort_by_key(Parameter::sequence);
        debug_assert!(
            params
                .iter()
                .enumerate()
                .all(|(i, p)| p.sequence() == i + 1),
            "parameter sequences must be contiguous from 1"
        );
        Self { params, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    /// Parameter at a 1-based sequence number.
    pub fn get(&self, sequence: usize) -> Option<&Parameter> {
        sequence
            .checked_sub(1)
            .and_then(|index| self.params.get(index))
    }

    /// Resolved value at a 1-based sequence number, or empty when undeclared.
    pub fn resolved(&self, sequence: usize) -> &str {
        self.get(sequence).map_or("", Parameter::resolved_value)
    }

    /// Unset every value and rewind the cursor.
    pub fn reset(&mut self) {
        for param in &mut self.params {
            param.clear_value();
        }
        self.cursor = 0;
    }

    /// Bind positional values in order. Positions without a value keep their
    /// default. Returns how many values did not fit the declared list.
    pub fn bind<S: AsRef<str>>(&mut self, values: &[S]) -> usize {
        self.reset();
        let mut ignored = 0;
        for value in values {
            if !self.push_value(value.as_ref()) {
                ignored += 1;
            }
        }
        ignored
    }

    /// Bind the next unbound position. Returns `false` when every declared
    /// parameter already has a value.
    pub fn push_value(&mut self, value: &str) -> bool {
        let Some(param) = self.params.get_mut(self.cursor) else {
            return false;
        };
        param.set_value(value);
        self.cursor += 1;
        true
    }

    /// Check every parameter in sequence order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] encountered.
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.params.iter().try_for_each(Parameter::check)
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Accepts a non-negative 16-bit integer.
pub fn is_non_negative_i16(value: &str) -> bool {
    value.trim().parse::<i16>().is_ok_and(|n| n >= 0)
}

/// Accepts a pattern that compiles and every match of which consumes text.
///
/// Zero-width assertions such as `\b` are rejected too, even though they
/// cannot match empty text.
pub fn is_splitting_pattern(value: &str) -> bool {
    if value.is_empty() || regex::Regex::new(value).is_err() {
        return false;
    }
    regex_syntax::ParserBuilder::new()
        .case_insensitive(true)
        .build()
        .parse(value)
        .is_ok_and(|hir| hir.properties().minimum_len().is_some_and(|len| len > 0))
}

/// Accepts a value case-insensitively equal to one of `choices`.
pub fn is_one_of(value: &str, choices: &[&str]) -> bool {
    choices.iter().any(|c| c.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacing() -> Parameter {
        Parameter::new(1, "Spacing")
            .with_default("2")
            .with_validator(is_non_negative_i16)
            .expecting("a non-negative 16 bit integer")
    }

    #[test]
    fn test_resolved_value_falls_back_to_default() {
        let mut param = spacing();
        assert_eq!(param.resolved_value(), "2");
        param.set_value("5");
        assert_eq!(param.resolved_value(), "5");
        param.clear_value();
        assert_eq!(param.resolved_value(), "2");
    }

    #[test]
    fn test_escaped_resolved_value_escapes_metacharacters() {
        let mut param = Parameter::new(1, "Find");
        param.set_value("a.b|c");
        assert_eq!(param.escaped_resolved_value(), r"a\.b\|c");
    }

    #[test]
    fn test_check_reports_name_and_expecting() {
        let mut param = spacing();
        param.set_value("-1");
        let err = param.check().unwrap_err();
        assert_eq!(
            err,
            ParameterError::Invalid {
                name: "Spacing".to_string(),
                value: "-1".to_string(),
                expecting: "a non-negative 16 bit integer".to_string(),
            }
        );
    }

    #[test]
    fn test_required_without_value_is_missing() {
        let param = Parameter::new(1, "Find").required();
        assert!(matches!(param.check(), Err(ParameterError::Missing { .. })));
    }

    #[test]
    fn test_required_with_empty_supplied_value_is_bound() {
        let mut param = Parameter::new(1, "Find").required();
        param.set_value("");
        assert!(param.check().is_ok());
    }

    #[test]
    fn test_bind_keeps_defaults_for_unsupplied_positions() {
        let mut list = ParameterList::new(vec![
            Parameter::new(2, "Second").with_default("b"),
            Parameter::new(1, "First").with_default("a"),
        ]);
        let ignored = list.bind(&["x"]);
        assert_eq!(ignored, 0);
        assert_eq!(list.resolved(1), "x");
        assert_eq!(list.resolved(2), "b");
    }

    #[test]
    fn test_bind_counts_extra_values() {
        let mut list = ParameterList::new(vec![Parameter::new(1, "Only")]);
        assert_eq!(list.bind(&["a", "b", "c"]), 2);
        assert_eq!(list.resolved(1), "a");
    }

    #[test]
    fn test_rebinding_resets_previous_values() {
        let mut list = ParameterList::new(vec![
            Parameter::new(1, "First").with_default("a"),
            Parameter::new(2, "Second").with_default("b"),
        ]);
        list.bind(&["x", "y"]);
        list.bind(&["z"]);
        assert_eq!(list.resolved(1), "z");
        assert_eq!(list.resolved(2), "b");
    }

    #[test]
    fn test_push_value_advances_cursor() {
        let mut list = ParameterList::new(vec![
            Parameter::new(1, "First"),
            Parameter::new(2, "Second"),
        ]);
        assert!(list.push_value("1"));
        assert!(list.push_value("2"));
        assert!(!list.push_value("3"));
        assert_eq!(list.resolved(2), "2");
    }

    #[test]
    fn test_validators() {
        assert!(is_non_negative_i16("0"));
        assert!(is_non_negative_i16("32767"));
        assert!(!is_non_negative_i16("32768"));
        assert!(!is_non_negative_i16("-3"));
        assert!(!is_non_negative_i16("two"));

        assert!(is_splitting_pattern(","));
        assert!(is_splitting_pattern("\t"));
        assert!(!is_splitting_pattern(""));
        assert!(!is_splitting_pattern("x*"));
        assert!(!is_splitting_pattern("("));
        assert!(!is_splitting_pattern(r"\b"));
        assert!(!is_splitting_pattern(r"\B"));
        assert!(!is_splitting_pattern("(?m)^"));
        assert!(!is_splitting_pattern("a|"));
        assert!(is_splitting_pattern(r"\s+"));

        assert!(is_one_of("DESC", &["asc", "desc"]));
        assert!(!is_one_of("up", &["asc", "desc"]));
    }
}
