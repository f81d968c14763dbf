//! Delimited-string encoding of select options, used by the authoring form.
//!
//! `"Red; Blue ;Green"` <-> `[Red, Blue, Green]`, each option's label equal
//! to its value. The in-memory representation is always a list of
//! [`SelectOption`]; this encoding only exists at the editor boundary.

use crate::model::SelectOption;

pub const OPTION_DELIMITER: char = ';';

/// Split on `;`, trim each piece, drop empty pieces.
pub fn parse_options(text: &str) -> Vec<SelectOption> {
    text.split(OPTION_DELIMITER)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(SelectOption::same)
        .collect()
}

/// Inverse of [`parse_options`] for the option values.
pub fn format_options(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|o| o.value.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_and_trims() {
        assert_eq!(
            parse_options("Red; Blue ;Green"),
            vec![
                SelectOption::new("Red", "Red"),
                SelectOption::new("Blue", "Blue"),
                SelectOption::new("Green", "Green"),
            ]
        );
    }

    #[test]
    fn skips_empty_pieces() {
        assert_eq!(parse_options(" ; a;;b ; "), vec![SelectOption::same("a"), SelectOption::same("b")]);
        assert!(parse_options("").is_empty());
    }

    #[test]
    fn format_joins_values() {
        let options = parse_options("x;y");
        assert_eq!(format_options(&options), "x; y");
        assert_eq!(parse_options(&format_options(&options)), options);
    }
}
