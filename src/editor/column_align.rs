use regex::{Regex, RegexBuilder};

use super::{
    ClipEditor, EditError, Edited, Parameter, ParameterList, is_non_negative_i16,
    is_splitting_pattern,
};

/// Reflows delimited text into fixed-width columns.
#[derive(Debug, Default)]
pub struct ColumnAlign {
    params: ParameterList,
}

impl ClipEditor for ColumnAlign {
    fn name(&self) -> &'static str {
        "columnAlign"
    }

    fn short_description(&self) -> &'static str {
        "Takes delimited text and transforms it to fixed width."
    }

    fn long_description(&self) -> &'static str {
        r#"columnAlign
Syntax: clipline columnAlign [numberOfSpaces] [originalDelimiter]

Takes delimited data (such as from a grid, or csv) and converts it to line up
the columns when printed with a fixed width font.

numberOfSpaces - the number of spaces between each column. Defaults to 2.

originalDelimiter - the delimiter of the original text, matched as a
case-insensitive pattern. For csv use ",". Defaults to the tab character.

Example:
    clipline columnAlign 3 \t
    aligns tab delimited text with 3 spaces between each column.
"#
    }

    fn define_parameters(&mut self) {
        self.params = ParameterList::new(vec![
            Parameter::new(1, "Number of spaces between columns")
                .with_default("2")
                .with_validator(is_non_negative_i16)
                .expecting("a non-negative 16 bit integer"),
            Parameter::new(2, "Original delimiter")
                .with_default("\t")
                .with_validator(is_splitting_pattern)
                .expecting("a delimiter pattern that cannot match empty text"),
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
        let spacing: usize = self
            .params
            .resolved(1)
            .trim()
            .parse()
            .map_err(|_| EditError::Failed("spacing is not a number".to_string()))?;
        // Split on the delimiter as given; it is never used to rebuild text.
        let splitter = RegexBuilder::new(self.params.resolved(2))
            .case_insensitive(true)
            .build()?;

        Ok(Edited::quiet(align_columns(source, &splitter, spacing)))
    }
}

/// Pad every cell to its column's widest cell and join with `spacing` spaces.
fn align_columns(source: &str, splitter: &Regex, spacing: usize) -> String {
    let rows: Vec<Vec<&str>> = source
        .split('\n')
        .map(|row| splitter.split(row).collect())
        .collect();

    let widths = column_widths(&rows);
    let separator = " ".repeat(spacing);

    rows.iter()
        .map(|cells| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(&separator)
                .trim()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Widest cell per column index; rows may have different column counts.
fn column_widths(rows: &[Vec<&str>]) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for cells in rows {
        for (c, cell) in cells.iter().enumerate() {
            let len = cell.chars().count();
            if c >= widths.len() {
                widths.push(len);
            }
            widths[c] = widths[c].max(len);
        }
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::run_editor;

    fn align(input: &str, args: &[&str]) -> String {
        run_editor(&mut ColumnAlign::default(), input, args)
            .unwrap()
            .text
    }

    #[test]
    fn test_widths_grow_with_wider_rows() {
        let splitter = Regex::new(",").unwrap();
        let lines = ["a,bb,ccc", "dddd,e,f"];
        let rows: Vec<Vec<&str>> = lines
            .iter()
            .map(|line| splitter.split(line).collect())
            .collect();
        assert_eq!(column_widths(&rows), vec![4, 2, 3]);
    }

    #[test]
    fn test_aligns_csv_with_spacing() {
        let out = align("a,bb,ccc\ndddd,e,f", &["2", ","]);
        assert_eq!(out, "a     bb  ccc\ndddd  e   f");
    }

    #[test]
    fn test_defaults_split_on_tab_with_two_spaces() {
        let out = align("name\tage\nbob\t7", &[]);
        assert_eq!(out, "name  age\nbob   7");
    }

    #[test]
    fn test_short_rows_only_pad_their_own_columns() {
        let out = align("a,b,c\nlonger", &["1", ","]);
        assert_eq!(out, "a      b c\nlonger");
    }

    #[test]
    fn test_zero_spacing_concatenates_padded_cells() {
        let out = align("a,bb\nccc,d", &["0", ","]);
        assert_eq!(out, "a  bb\ncccd");
    }

    #[test]
    fn test_delimiter_is_case_insensitive_pattern() {
        let out = align("1x2\n33X4", &["1", "x"]);
        assert_eq!(out, "1  2\n33 4");
    }

    #[test]
    fn test_aligned_output_is_stable_on_second_pass() {
        let once = align("a b c\nddd e ffff", &["2", " +"]);
        let twice = align(&once, &["2", " +"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_negative_spacing() {
        let err = run_editor(&mut ColumnAlign::default(), "a", &["-2"]).unwrap_err();
        assert!(matches!(err, EditError::Parameter(_)));
    }

    #[test]
    fn test_rejects_delimiter_matching_empty_text() {
        for delimiter in ["x?", r"\b", r"\B", "(?m)^"] {
            let err = run_editor(&mut ColumnAlign::default(), "ab cd\nx y", &["1", delimiter])
                .unwrap_err();
            assert!(matches!(err, EditError::Parameter(_)), "accepted {delimiter}");
        }
    }

    #[test]
    fn test_edit_validates_without_dispatcher() {
        let mut editor = ColumnAlign::default();
        editor.define_parameters();
        editor.set_next_parameter("wide");
        assert!(editor.edit("a\tb").is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn alignment_is_idempotent(
                rows in prop::collection::vec(
                    prop::collection::vec("[a-z]{1,6}", 1..5),
                    1..8,
                ),
                spacing in 1..4usize,
            ) {
                let input = rows
                    .iter()
                    .map(|cells| cells.join(" "))
                    .collect::<Vec<_>>()
                    .join("\n");
                let spacing = spacing.to_string();
                let once = align(&input, &[spacing.as_str(), " +"]);
                let twice = align(&once, &[spacing.as_str(), " +"]);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn row_count_is_preserved(
                input in "[a-z,\n]{0,60}",
            ) {
                let out = align(&input, &["1", ","]);
                prop_assert_eq!(out.split('\n').count(), input.split('\n').count());
            }
        }
    }
}
