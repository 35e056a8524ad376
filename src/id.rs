use nanoid::nanoid;

/// Alphabet for entity identifiers; lowercase plus digits, no ambiguous glyphs.
const ENTITY_ID_ALPHABET: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'k', 'm', 'n', 'p',
    'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
/// Default entity id length.
const ENTITY_ID_LENGTH: usize = 16;

/// Generates a new account/tweet/comment identifier.
pub fn generate_entity_id() -> String {
    nanoid!(ENTITY_ID_LENGTH, ENTITY_ID_ALPHABET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_expected_length_and_charset() {
        let id = generate_entity_id();
        assert_eq!(id.len(), ENTITY_ID_LENGTH);
        assert!(id.chars().all(|c| ENTITY_ID_ALPHABET.contains(&c)));
    }

    #[test]
    fn ids_are_unique_enough() {
        let a = generate_entity_id();
        let b = generate_entity_id();
        assert_ne!(a, b);
    }
}
