//! Cell reference handling (e.g. "AB12").

/// Returns the column key of a cell reference: its maximal leading run of letters.
///
/// `"AB12"` resolves to `"AB"`. An empty string comes back when the reference is
/// empty or does not start with a letter; callers skip such cells.
pub fn column_key(reference: &str) -> &str {
    let end = reference
        .char_indices()
        .find(|(_, character)| !character.is_alphabetic())
        .map(|(index, _)| index)
        .unwrap_or(reference.len());
    &reference[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_leading_letters() {
        assert_eq!(column_key("A1"), "A");
        assert_eq!(column_key("AB27"), "AB");
        assert_eq!(column_key("XFD1048576"), "XFD");
        assert_eq!(column_key("C"), "C");
    }

    #[test]
    fn unresolvable_references_are_empty() {
        assert_eq!(column_key("1"), "");
        assert_eq!(column_key(""), "");
        assert_eq!(column_key("$A$1"), "");
    }
}
