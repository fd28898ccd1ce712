// Sanitization utilities

/// Reduce a client- or page-supplied filename to a safe, flat name.
///
/// Path separators become underscores, everything outside `[A-Za-z0-9_.-]`
/// is dropped, and leading/trailing dots and underscores are trimmed, so the
/// result can never escape the upload directory. May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Split multi-line form text into trimmed, non-blank entries
pub fn lines_to_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("apple pie.jpg"), "apple_pie.jpg");
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\photos\\tart.png"), "C_photos_tart.png");
        assert_eq!(secure_filename("crème brûlée.webp"), "crme_brle.webp");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn test_lines_to_list() {
        let text = "  2 eggs \n\n1 cup flour\r\n   \n pinch of salt";
        assert_eq!(
            lines_to_list(text),
            vec!["2 eggs", "1 cup flour", "pinch of salt"]
        );
        assert!(lines_to_list("").is_empty());
    }
}
