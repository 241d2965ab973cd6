//! Identifier case helpers used when reshaping metadata names.

/// Lower the first character: `OrgPreferenceSettings` → `orgPreferenceSettings`.
///
/// Only the first character changes, so already lower-camel input comes back
/// unchanged.
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalize each whitespace-separated word and lowercase the rest of it:
/// `DEVELOPER edition` → `Developer Edition`.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_camel_converts_type_names() {
        assert_eq!(lower_camel("OrgPreferenceSettings"), "orgPreferenceSettings");
        assert_eq!(lower_camel("AccountSettings"), "accountSettings");
    }

    #[test]
    fn lower_camel_is_idempotent() {
        let once = lower_camel("OmniChannelSettings");
        assert_eq!(lower_camel(&once), once);
        assert_eq!(lower_camel("enableCommunityWorkspaces"), "enableCommunityWorkspaces");
    }

    #[test]
    fn lower_camel_edge_cases() {
        assert_eq!(lower_camel(""), "");
        assert_eq!(lower_camel("A"), "a");
        assert_eq!(lower_camel("Packaging2"), "packaging2");
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("DEVELOPER"), "Developer");
        assert_eq!(title_case("enterprise"), "Enterprise");
        assert_eq!(title_case("contact  MANAGER"), "Contact Manager");
        assert_eq!(title_case(""), "");
    }
}
