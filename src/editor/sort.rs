use super::{ClipEditor, EditError, Edited, Parameter, ParameterList, is_one_of};

/// Sorts lines, ignoring ASCII case.
#[derive(Debug, Default)]
pub struct Sort {
    params: ParameterList,
}

impl ClipEditor for Sort {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn short_description(&self) -> &'static str {
        "Sorts lines alphabetically."
    }

    fn long_description(&self) -> &'static str {
        "sort
Syntax: clipline sort [direction]

Sorts the lines of the text, ignoring case. Lines that compare equal keep
their original order.

direction - asc or desc. Defaults to asc.
"
    }

    fn define_parameters(&mut self) {
        self.params = ParameterList::new(vec![
            Parameter::new(1, "Direction")
                .with_default("asc")
                .with_validator(|v| is_one_of(v, &["asc", "desc"]))
                .expecting("asc or desc"),
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
        let descending = self.params.resolved(1).eq_ignore_ascii_case("desc");
        let mut lines: Vec<&str> = source.split('\n').collect();
        lines.sort_by(|a, b| {
            let ord = a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase());
            if descending { ord.reverse() } else { ord }
        });
        Ok(Edited::quiet(lines.join("\n")))
    }
}
