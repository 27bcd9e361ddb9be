//! Tag filter labels.

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn is_selected(selected: &[String], tag: &str) -> bool {
    selected.iter().any(|t| t == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("dog"), "Dog");
        assert_eq!(capitalize("TRAFFIC LIGHT"), "Traffic light");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_is_selected() {
        let selected = vec!["cat".to_string()];
        assert!(is_selected(&selected, "cat"));
        assert!(!is_selected(&selected, "dog"));
    }
}
