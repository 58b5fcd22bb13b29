use super::{ClipEditor, EditError, Edited, Parameter, ParameterList, is_one_of, map_lines};

const SIDES: &[&str] = &["both", "start", "end"];

/// Strips surrounding whitespace from every line.
#[derive(Debug, Default)]
pub struct Trim {
    params: ParameterList,
}

impl ClipEditor for Trim {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn short_description(&self) -> &'static str {
        "Removes leading and trailing whitespace from each line."
    }

    fn long_description(&self) -> &'static str {
        "trim
Syntax: clipline trim [side]

Removes whitespace from every line of the text.

side - which side to trim: both, start or end. Defaults to both.
"
    }

    fn define_parameters(&mut self) {
        self.params = ParameterList::new(vec![
            Parameter::new(1, "Side")
                .with_default("both")
                .with_validator(|v| is_one_of(v, SIDES))
                .expecting("one of both, start, end"),
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
        let side = self.params.resolved(1).to_ascii_lowercase();
        let text = match side.as_str() {
            "start" => map_lines(source, |line| line.trim_start().to_string()),
            "end" => map_lines(source, |line| line.trim_end().to_string()),
            _ => map_lines(source, |line| line.trim().to_string()),
        };
        Ok(Edited::quiet(text))
    }
}
