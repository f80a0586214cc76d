use serde::Serialize;

/// Used by the improve action when the form carries no `skills` field.
pub const DEFAULT_SKILLS: &str = "Python, Project Management, Revit";

/// Skills to append, in the order the user typed them. Repeats are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillList(Vec<String>);

impl SkillList {
    /// Splits a comma-separated string, trimming entries and dropping empty ones.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_keeps_order() {
        let skills = SkillList::parse(" Python,  Project Management ,Revit ");
        assert_eq!(skills.as_slice(), ["Python", "Project Management", "Revit"]);
    }

    #[test]
    fn test_parse_drops_empty_entries() {
        let skills = SkillList::parse("Go,, ,Rust,");
        assert_eq!(skills.as_slice(), ["Go", "Rust"]);
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        assert_eq!(SkillList::parse("Go, Go").len(), 2);
    }

    #[test]
    fn test_parse_blank_is_empty() {
        assert!(SkillList::parse("   ").is_empty());
    }

    #[test]
    fn test_default_skills_parse() {
        assert_eq!(SkillList::parse(DEFAULT_SKILLS).len(), 3);
    }
}
