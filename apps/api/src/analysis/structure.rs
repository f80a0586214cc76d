use crate::models::report::StructureReport;

/// Sections an ATS expects to find, in report order.
pub const REQUIRED_SECTIONS: &[&str] = &["work experience", "education", "skills"];

/// Reports every required section whose name does not appear anywhere in the text.
///
/// Literal, case-insensitive substring test: "skills" inside a sentence counts
/// as present, and no heading structure is parsed. Known weakness, kept as is.
pub fn check_structure(text: &str) -> StructureReport {
    let text_lower = text.to_lowercase();

    REQUIRED_SECTIONS
        .iter()
        .filter(|section| !text_lower.contains(*section))
        .map(|section| format!("Missing section: {}", title_case(section)))
        .collect()
}

fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
