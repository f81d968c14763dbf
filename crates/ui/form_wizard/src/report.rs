use std::fmt::Write;

use form_engine::{pair_rows, FieldDefinition, FieldDescriptor, LayoutRow};

fn describe(field: &FieldDescriptor) -> String {
    let mut out = format!("{} ({})", field.name, field.kind);
    if field.required && field.is_input() {
        out.push_str(" *");
    }
    if field.hidden {
        out.push_str(" [hidden]");
    }
    out
}

/// Plain-text overview of how a definition lays out, one line per row.
pub fn layout_report(definition: &FieldDefinition) -> String {
    let mut out = String::new();
    let mut rows = 0;
    for (idx, row) in pair_rows(definition).enumerate() {
        rows += 1;
        let line = match row {
            LayoutRow::FullWidth(f) => format!("full  | {}", describe(f)),
            LayoutRow::HalfWidth(f) => format!("half  | {}", describe(f)),
            LayoutRow::Pair(a, b) => format!("pair  | {} | {}", describe(a), describe(b)),
        };
        let _ = writeln!(out, "{:>3}  {line}", idx + 1);
    }
    let inputs = definition.iter().filter(|f| f.is_input()).count();
    let _ = writeln!(
        out,
        "{} field(s), {inputs} input(s), {rows} row(s)",
        definition.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::FieldKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn report_lists_rows() {
        let definition = FieldDefinition::new(vec![
            FieldDescriptor::new("1", "intro", FieldKind::Header),
            FieldDescriptor::new("2", "first", FieldKind::Text).required(true),
            FieldDescriptor::new("3", "last", FieldKind::Text),
            FieldDescriptor::new("4", "age", FieldKind::Number),
        ]);
        assert_eq!(
            layout_report(&definition),
            "  1  full  | intro (header)\n\
             \x20 2  pair  | first (text) * | last (text)\n\
             \x20 3  half  | age (number)\n\
             4 field(s), 3 input(s), 3 row(s)\n"
        );
    }
}
