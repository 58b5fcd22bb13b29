use regex::RegexBuilder;

use super::{ClipEditor, EditError, Edited, Notice, Parameter, ParameterList, is_one_of};

/// Replaces every match of a pattern or literal string.
#[derive(Debug, Default)]
pub struct Replace {
    params: ParameterList,
}

impl ClipEditor for Replace {
    fn name(&self) -> &'static str {
        "replace"
    }

    fn short_description(&self) -> &'static str {
        "Replaces every occurrence of a pattern."
    }

    fn long_description(&self) -> &'static str {
        r#"replace
Syntax: clipline replace find [replacement] [mode]

Replaces every occurrence of find in the text.

find - the text or pattern to look for. Required.

replacement - what to put in its place. Defaults to nothing. In regex mode
$1, $2 ... refer to capture groups.

mode - regex or literal. In literal mode find is matched exactly, even if it
contains pattern characters. Defaults to regex.

Example:
    clipline replace "\s+$" "" regex
    strips trailing whitespace from every line.
"#
    }

    fn define_parameters(&mut self) {
        self.params = ParameterList::new(vec![
            Parameter::new(1, "Find")
                .required()
                .with_validator(|v| !v.is_empty())
                .expecting("a non-empty string or pattern"),
            Parameter::new(2, "Replacement").expecting("replacement text"),
            Parameter::new(3, "Mode")
                .with_default("regex")
                .with_validator(|v| is_one_of(v, &["regex", "literal"]))
                .expecting("regex or literal"),
        ]);
    }

    fn parameters(&self) -> &ParameterList {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterList {
        &mut self.params
    }

    fn edit(&mut self, source: &str) -> Result<Edited, EditError> {
        self.params.validate()?;
        let literal = self.params.resolved(3).eq_ignore_ascii_case("literal");
        let (pattern, replacement) = match self.params.get(1) {
            Some(find) if literal => (
                find.escaped_resolved_value(),
                self.params.resolved(2).replace('$', "$$"),
            ),
            Some(find) => (
                find.resolved_value().to_string(),
                self.params.resolved(2).to_string(),
            ),
            None => return Err(EditError::Failed("find was not declared".to_string())),
        };
        let re = RegexBuilder::new(&pattern).multi_line(true).build()?;

        let count = re.find_iter(source).count();
        let text = re.replace_all(source, replacement.as_str()).into_owned();
        let noun = if count == 1 { "replacement" } else { "replacements" };
        Ok(Edited::with_notice(
            text,
            Notice::transient(format!("{count} {noun}")),
        ))
    }
}
