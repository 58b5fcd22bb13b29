use super::{ClipEditor, EditError, Edited, ParameterList};

/// Converts the buffer to ASCII upper case.
#[derive(Debug, Default)]
pub struct Upper {
    params: ParameterList,
}

/// Converts the buffer to ASCII lower case.
#[derive(Debug, Default)]
pub struct Lower {
    params: ParameterList,
}

impl ClipEditor for Upper {
    fn name(&self) -> &'static str {
        "upper"
    }

    fn short_description(&self) -> &'static str {
        "Converts text to upper case."
    }

    fn long_description(&self) -> &'static str {
        "upper
Syntax: clipline upper

Converts every ASCII letter in the text to upper case.
"
    }

    fn define_parameters(&mut self) {
        self.params = ParameterList::default();
    }

    fn parameters(&self) -> &ParameterList {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterList {
        &mut self.params
    }

    fn edit(&mut self, source: &str) -> Result<Edited, EditError> {
        Ok(Edited::quiet(source.to_ascii_uppercase()))
    }
}

impl ClipEditor for Lower {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn short_description(&self) -> &'static str {
        "Converts text to lower case."
    }

    fn long_description(&self) -> &'static str {
        "lower
Syntax: clipline lower

Converts every ASCII letter in the text to lower case.
"
    }

    fn define_parameters(&mut self) {
        self.params = ParameterList::default();
    }

    fn parameters(&self) -> &ParameterList {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterList {
        &mut self.params
    }

    fn edit(&mut self, source: &str) -> Result<Edited, EditError> {
        Ok(Edited::quiet(source.to_ascii_lowercase()))
    }
}
