//! Filename resolution helpers
//!
//! Pure parsing of the two places a destination filename can hide: a
//! content-disposition-style query parameter on a signed URL, or the final
//! path segment of a direct URL.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::core::{DownloadError, Result};

/// Query parameter some providers use to smuggle the true filename through
/// their signed redirect URLs.
const DISPOSITION_PARAM: &str = "response-content-disposition";

/// Extract the filename embedded in a signed URL's
/// `response-content-disposition` query parameter
///
/// The parameter value looks like an HTTP `Content-Disposition` header,
/// e.g. `attachment; filename="model v1.safetensors"`. The value arrives
/// percent-encoded inside the query string and the filename portion may be
/// encoded once more, so it is decoded again after unquoting.
///
/// Returns `Ok(None)` when the parameter or its `filename=` portion is
/// absent; the caller decides whether that is fatal.
pub fn disposition_filename(signed_url: &str) -> Result<Option<String>> {
    let parsed = Url::parse(signed_url).map_err(|e| DownloadError::InvalidUrl {
        url: signed_url.to_string(),
        source: e,
    })?;

    let disposition = parsed
        .query_pairs()
        .find(|(key, _)| key.as_ref() == DISPOSITION_PARAM)
        .map(|(_, value)| value.into_owned());

    let Some(disposition) = disposition else {
        return Ok(None);
    };

    let Some((_, rest)) = disposition.split_once("filename=") else {
        return Ok(None);
    };

    let name = rest.trim().trim_matches('"');
    if name.is_empty() {
        return Ok(None);
    }

    Ok(Some(percent_decode_str(name).decode_utf8_lossy().into_owned()))
}

/// Derive a filename from the final path segment of a URL, percent-decoded
///
/// Returns `Ok(None)` when the path has no usable final segment (e.g. the
/// URL ends in `/`).
pub fn filename_from_url_path(url: &str) -> Result<Option<String>> {
    let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
        url: url.to_string(),
        source: e,
    })?;

    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty());

    Ok(name.map(|n| percent_decode_str(n).decode_utf8_lossy().into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_filename_decodes_quoted_name() {
        let url = "https://cdn.example.com/123/file?Expires=1700000000\
&response-content-disposition=attachment%3B%20filename%3D%22model%20v1.safetensors%22\
&Signature=abc";
        assert_eq!(
            disposition_filename(url).unwrap(),
            Some("model v1.safetensors".to_string())
        );
    }

    #[test]
    fn disposition_filename_decodes_doubly_encoded_name() {
        // filename portion still percent-encoded after the query string
        // itself was decoded once
        let url = "https://cdn.example.com/f?response-content-disposition=attachment%3B%20filename%3D%22sp%2520ace.bin%22";
        assert_eq!(
            disposition_filename(url).unwrap(),
            Some("sp ace.bin".to_string())
        );
    }

    #[test]
    fn disposition_filename_missing_parameter() {
        let url = "https://cdn.example.com/123/file?Expires=1700000000&Signature=abc";
        assert_eq!(disposition_filename(url).unwrap(), None);
    }

    #[test]
    fn disposition_filename_parameter_without_filename() {
        let url = "https://cdn.example.com/f?response-content-disposition=inline";
        assert_eq!(disposition_filename(url).unwrap(), None);
    }

    #[test]
    fn disposition_filename_rejects_invalid_url() {
        let err = disposition_filename("not a url").unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl { .. }));
    }

    #[test]
    fn filename_from_url_path_takes_last_segment() {
        assert_eq!(
            filename_from_url_path("https://host/path/model.bin").unwrap(),
            Some("model.bin".to_string())
        );
    }

    #[test]
    fn filename_from_url_path_percent_decodes() {
        assert_eq!(
            filename_from_url_path("https://host/path/name%20file.bin?x=1").unwrap(),
            Some("name file.bin".to_string())
        );
    }

    #[test]
    fn filename_from_url_path_empty_for_trailing_slash() {
        assert_eq!(filename_from_url_path("https://host/path/").unwrap(), None);
    }

    #[test]
    fn filename_from_url_path_ignores_query() {
        assert_eq!(
            filename_from_url_path("https://host/a/b/weights.gguf?download=true").unwrap(),
            Some("weights.gguf".to_string())
        );
    }
}
