//! URL token expansion for template-addressed segments.
//!
//! Two expansion passes exist. Representation-level tokens
//! (`$RepresentationID$`, `$Bandwidth$`) are substituted once at index
//! construction; segment-level tokens (`$Time$`, `$Number$`) are filled on
//! every resolution. Numeric tokens accept a printf-style width suffix
//! (`$Number%05d$`) and `$$` escapes a literal dollar sign.

use tracing::warn;
use url::Url;

use crate::error::{IndexError, IndexResult};

/// Value a token expands to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TokenValue<'a> {
    Number(u64),
    Text(&'a str),
}

/// Expand every `$...$` token `resolve` knows about; unknown tokens pass
/// through unchanged so a later pass can handle them.
pub(crate) fn expand_tokens<'a>(
    template: &str,
    resolve: impl Fn(&str) -> Option<TokenValue<'a>>,
) -> String {
    if !template.contains('$') {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        rest = &rest[start + 1..];
        let Some(end) = rest.find('$') else {
            // Unbalanced trailing dollar; keep it literal.
            out.push('$');
            out.push_str(rest);
            return out;
        };
        let token = &rest[..end];
        rest = &rest[end + 1..];
        if token.is_empty() {
            // "$$" escape.
            out.push('$');
            continue;
        }
        match render_token(token, &resolve) {
            Some(rendered) => out.push_str(&rendered),
            None => {
                out.push('$');
                out.push_str(token);
                out.push('$');
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render one token body, honoring an optional `%0<width>d` suffix.
fn render_token<'a>(
    token: &str,
    resolve: &impl Fn(&str) -> Option<TokenValue<'a>>,
) -> Option<String> {
    let (name, width) = match token.split_once('%') {
        Some((name, format)) => (name, parse_width(format)?),
        None => (token, 0),
    };
    match resolve(name)? {
        TokenValue::Number(value) => Some(format!("{value:0width$}")),
        TokenValue::Text(value) => Some(value.to_string()),
    }
}

/// Parse the `0<width>d` part of a printf-style suffix.
fn parse_width(format: &str) -> Option<usize> {
    let digits = format.strip_prefix('0')?.strip_suffix('d')?;
    digits.parse().ok()
}

/// Substitute `$RepresentationID$` and `$Bandwidth$` from the resolution
/// context. A token left unexpanded because its value is missing is a
/// construction error: the manifest references data the caller never
/// supplied.
pub(crate) fn expand_representation_tokens(
    template: &str,
    representation_id: Option<&str>,
    representation_bitrate: Option<u64>,
) -> IndexResult<String> {
    let expanded = expand_tokens(template, |name| match name {
        "RepresentationID" => representation_id.map(TokenValue::Text),
        "Bandwidth" => representation_bitrate.map(TokenValue::Number),
        _ => None,
    });
    for token in ["RepresentationID", "Bandwidth"] {
        if expanded.contains(&format!("${token}")) {
            return Err(IndexError::MissingTemplateValue(token.to_string()));
        }
    }
    Ok(expanded)
}

/// Resolve a manifest-relative media locator against the representation
/// URL, expanding representation-level tokens first. A `None` locator
/// means the representation URL itself addresses the resource.
pub(crate) fn resolve_index_url(
    representation_url: &Url,
    media: Option<&str>,
    representation_id: Option<&str>,
    representation_bitrate: Option<u64>,
) -> IndexResult<Url> {
    match media {
        None => Ok(representation_url.clone()),
        Some(media) => {
            let expanded =
                expand_representation_tokens(media, representation_id, representation_bitrate)?;
            representation_url
                .join(&expanded)
                .map_err(|e| IndexError::InvalidUrl(format!("{expanded}: {e}")))
        }
    }
}

/// An absolute URL still carrying `$Time$` / `$Number$` tokens.
///
/// Validated once at construction so per-segment fills cannot fail on
/// well-formed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    pub fn new(template: String) -> IndexResult<Self> {
        let template = Self { template };
        // Trial fill: surfaces malformed URLs at construction instead of
        // during resolution.
        template.fill(0, 0)?;
        Ok(template)
    }

    pub fn fill(&self, time: u64, number: u64) -> IndexResult<Url> {
        let substituted = expand_tokens(&self.template, |name| match name {
            "Time" => Some(TokenValue::Number(time)),
            "Number" => Some(TokenValue::Number(number)),
            _ => None,
        });
        Url::parse(&substituted).map_err(|e| {
            warn!(url = %substituted, error = %e, "segment URL failed to parse after substitution");
            IndexError::InvalidUrl(format!("{substituted}: {e}"))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}
