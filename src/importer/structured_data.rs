use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::ImportError;

const LD_JSON_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Locate the first JSON-LD block in `html` and return the recipe object it
/// describes. A top-level array yields its first element.
pub fn find_recipe_block(html: &str) -> Result<Value, ImportError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(LD_JSON_SELECTOR)
        .map_err(|e| ImportError::NoStructuredData(format!("invalid selector: {e:?}")))?;

    let script = document.select(&selector).next().ok_or_else(|| {
        ImportError::NoStructuredData("page has no application/ld+json script".to_string())
    })?;

    let raw: String = script.text().collect();
    debug!("Found structured-data block ({} bytes)", raw.len());

    let payload: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ImportError::NoStructuredData(format!("invalid JSON-LD: {e}")))?;

    first_object(payload)
}

fn first_object(payload: Value) -> Result<Value, ImportError> {
    match payload {
        Value::Object(_) => Ok(payload),
        Value::Array(items) => match items.into_iter().next() {
            Some(first @ Value::Object(_)) => Ok(first),
            Some(_) => Err(ImportError::NoStructuredData(
                "first JSON-LD entry is not an object".to_string(),
            )),
            None => Err(ImportError::NoStructuredData(
                "JSON-LD array is empty".to_string(),
            )),
        },
        _ => Err(ImportError::NoStructuredData(
            "JSON-LD payload is not an object".to_string(),
        )),
    }
}
