//! Target language validation and the supported-language listing.

use anyhow::Result;

use crate::ui::Style;

/// Target languages the translation service accepts, as ISO 639-1 codes.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("nb", "Norwegian (Bokmål)"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Simplified)"),
];

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported target languages (ISO 639-1)"));
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:5} {}", Style::code(code), Style::secondary(name));
    }
}

/// Validates that the given language code is supported.
///
/// # Errors
///
/// Returns an error if the language code is not in the supported list.
pub fn validate_language(lang: &str) -> Result<()> {
    if SUPPORTED_LANGUAGES.iter().any(|(code, _)| *code == lang) {
        Ok(())
    } else {
        anyhow::bail!(
            "Invalid language code: '{lang}'\n\n\
             Valid language codes (ISO 639-1): es, ja, de, fr, zh, ...\n\
             Run 'lingo languages' to see all supported codes."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_valid() {
        assert!(validate_language("es").is_ok());
        assert!(validate_language("ja").is_ok());
        assert!(validate_language("nb").is_ok());
    }

    #[test]
    fn test_validate_language_invalid() {
        assert!(validate_language("invalid").is_err());
        assert!(validate_language("").is_err());
        assert!(validate_language("ES").is_err()); // Case sensitive
    }
}
