// Utility functions
pub mod sanitize;
pub mod validation;

/// Resolve an image URL against the page it was found on.
/// Absolute URLs are returned as-is; relative ones are joined onto `base_url`.
pub fn resolve_image_url(image_url: &str, base_url: &str) -> Option<String> {
    if url::Url::parse(image_url).is_ok() {
        return Some(image_url.to_string());
    }

    let base = url::Url::parse(base_url).ok()?;
    base.join(image_url).ok().map(|resolved| resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_image_url() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com/a.jpg", "https://example.com/r/1"),
            Some("https://cdn.example.com/a.jpg".to_string())
        );
        assert_eq!(
            resolve_image_url("/img/pie.jpg", "https://example.com/recipes/pie"),
            Some("https://example.com/img/pie.jpg".to_string())
        );
        assert_eq!(resolve_image_url("pie.jpg", "not a url"), None);
    }
}
