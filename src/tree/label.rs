use std::fmt::Debug;

/// Separator joining the rule names of a collapsed single-child chain,
/// e.g. `formalParameterList|formalParameter`.
pub const LABEL_SEPARATOR: char = '|';

/// A backend-scoped, closed set of node labels.
///
/// Each backend declares the labels its extractor dispatches on as an enum
/// implementing this trait, so extraction code matches on variants instead of
/// comparing free-form strings.
pub trait BackendLabel: Copy + Eq + Debug + 'static {
    /// Every label of the vocabulary.
    const ALL: &'static [Self];

    /// The exact label string the backend emits.
    fn as_str(self) -> &'static str;

    /// Parses a single label segment, returning `None` for labels outside the vocabulary.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == label)
    }
}

/// Returns the first segment of a possibly collapsed label.
pub fn first_segment(label: &str) -> &str {
    label.split(LABEL_SEPARATOR).next().unwrap_or(label)
}

/// Returns the last segment of a possibly collapsed label.
pub fn last_segment(label: &str) -> &str {
    label.rsplit(LABEL_SEPARATOR).next().unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_of_plain_label() {
        assert_eq!(first_segment("name"), "name");
        assert_eq!(last_segment("name"), "name");
    }

    #[test]
    fn test_segments_of_collapsed_label() {
        let label = "formalParameterList|formalParameter";
        assert_eq!(first_segment(label), "formalParameterList");
        assert_eq!(last_segment(label), "formalParameter");
    }
}
