/// Build the practice hint for a target-language text.
///
/// The hint names the upper-cased first character and the length in
/// characters, e.g. `"Starts with 'M', letters: 4"` for `"masa"`. Empty text
/// gets an empty hint.
pub fn hint_for(target_text: &str) -> String {
    let Some(first) = target_text.chars().next() else {
        return String::new();
    };
    let letters = target_text.chars().count();
    format!("Starts with '{}', letters: {}", first.to_uppercase(), letters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_lowercase_word() {
        assert_eq!(hint_for("masa"), "Starts with 'M', letters: 4");
    }

    #[test]
    fn test_hint_empty_text() {
        assert_eq!(hint_for(""), "");
    }

    #[test]
    fn test_hint_counts_characters_not_bytes() {
        // 'ş' is two bytes in UTF-8
        assert_eq!(hint_for("Arkadaş"), "Starts with 'A', letters: 7");
        assert_eq!(hint_for("günaydın"), "Starts with 'G', letters: 8");
    }

    #[test]
    fn test_hint_counts_spaces_and_punctuation() {
        assert_eq!(hint_for("Adın ne?"), "Starts with 'A', letters: 8");
        assert_eq!(hint_for("Nerede...?"), "Starts with 'N', letters: 10");
    }

    #[test]
    fn test_hint_non_alphabetic_first_char() {
        assert_eq!(hint_for("...ve"), "Starts with '.', letters: 5");
    }

    #[test]
    fn test_hint_multi_char_uppercase() {
        assert_eq!(hint_for("ß"), "Starts with 'SS', letters: 1");
    }

    #[test]
    fn test_hint_single_char() {
        assert_eq!(hint_for("o"), "Starts with 'O', letters: 1");
    }
}
