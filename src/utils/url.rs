//! URL utilities for the generation endpoint
//!
//! Base URLs are normalized before the model path is appended so a trailing
//! slash in configuration never produces a double slash.

use std::error::Error;

use reqwest::Url;

const KEY_PARAM: &str = "key";
const REDACTED: &str = "***";

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use shanai::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.example.com/v1beta/models"), "https://api.example.com/v1beta/models");
/// assert_eq!(normalize_base_url("https://api.example.com/v1beta/models/"), "https://api.example.com/v1beta/models");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct the `generateContent` URL for `model` under `base_url`
///
/// The credential travels as the `key` query parameter.
///
/// # Examples
///
/// ```
/// use shanai::utils::url::construct_generate_url;
///
/// let url = construct_generate_url("https://api.example.com/v1beta/models/", "gemini-2.0-flash", "k").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://api.example.com/v1beta/models/gemini-2.0-flash:generateContent?key=k"
/// );
/// ```
pub fn construct_generate_url(
    base_url: &str,
    model: &str,
    api_key: &str,
) -> Result<Url, Box<dyn Error>> {
    let normalized_base = normalize_base_url(base_url);
    let model = model.trim_matches('/');
    let mut url = Url::parse(&format!("{normalized_base}/{model}:generateContent"))?;
    url.query_pairs_mut().append_pair(KEY_PARAM, api_key);
    Ok(url)
}

/// Render `url` with the `key` query value masked so it can be logged.
pub fn redact_key(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == KEY_PARAM {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
