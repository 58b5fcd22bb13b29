use super::{ClipEditor, EditError, Edited, Notice, ParameterList};

/// Reports line, word and character counts without changing the text.
#[derive(Debug, Default)]
pub struct Count {
    params: ParameterList,
}

impl ClipEditor for Count {
    fn name(&self) -> &'static str {
        "count"
    }

    fn short_description(&self) -> &'static str {
        "Counts lines, words and characters."
    }

    fn long_description(&self) -> &'static str {
        "count
Syntax: clipline count

Reports how many lines, words and characters the text holds. The text is
left unchanged.
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
        let lines = if source.is_empty() {
            0
        } else {
            source.split('\n').count()
        };
        let words = source.split_whitespace().count();
        let chars = source.chars().count();
        let message = format!("{lines} lines, {words} words, {chars} characters");
        Ok(Edited::with_notice(source.to_string(), Notice::persistent(message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{ResponseKind, run_editor};

    #[test]
    fn test_count_reports_and_keeps_text() {
        let out = run_editor(&mut Count::default(), "one two\nthree", &[] as &[&str]).unwrap();
        assert_eq!(out.text, "one two\nthree");
        let notice = out.notice.unwrap();
        assert_eq!(notice.kind, ResponseKind::Persistent);
        assert_eq!(notice.message, "2 lines, 3 words, 13 characters");
    }

    #[test]
    fn test_count_empty_text() {
        let out = run_editor(&mut Count::default(), "", &[] as &[&str]).unwrap();
        assert_eq!(out.notice.unwrap().message, "0 lines, 0 words, 0 characters");
    }
}
