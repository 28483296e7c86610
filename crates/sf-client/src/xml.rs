//! Minimal XML reading for SOAP responses.
//!
//! Salesforce SOAP responses are flat and predictable, so elements are
//! located by local name (any namespace prefix is ignored) rather than by
//! building a document tree. Text values are unescaped with quick-xml.
//!
//! Nested elements with the same local name as their parent are not
//! supported; no Salesforce response used here has them.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy)]
struct Span {
    content_start: usize,
    content_end: usize,
    end: usize,
}

fn find_element(xml: &str, tag: &str, from: usize) -> Option<(usize, Span)> {
    let mut pos = from;
    while let Some(rel) = xml[pos..].find('<') {
        let start = pos + rel;
        pos = start + 1;

        let rest = &xml[start + 1..];
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        if name.is_empty() || name.starts_with(['?', '!']) {
            continue;
        }
        let local = name.rsplit(':').next().unwrap_or(name);
        if local != tag {
            continue;
        }

        let open_end = start + 1 + rest.find('>')?;
        if xml[..open_end].ends_with('/') {
            let after = open_end + 1;
            return Some((
                start,
                Span {
                    content_start: after,
                    content_end: after,
                    end: after,
                },
            ));
        }

        let close = format!("</{}>", name);
        let content_start = open_end + 1;
        let content_end = content_start + xml[content_start..].find(&close)?;
        return Some((
            start,
            Span {
                content_start,
                content_end,
                end: content_end + close.len(),
            },
        ));
    }
    None
}

/// Raw inner content of the first element named `tag`.
pub fn element<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    find_element(xml, tag, 0).map(|(_, span)| &xml[span.content_start..span.content_end])
}

/// Raw inner content of every element named `tag`, in document order.
pub fn elements<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some((_, span)) = find_element(xml, tag, from) {
        found.push(&xml[span.content_start..span.content_end]);
        from = span.end;
    }
    found
}

/// Unescaped text of the first element named `tag`.
pub fn text(xml: &str, tag: &str) -> Option<String> {
    element(xml, tag).map(unescape)
}

/// Unescaped text of every element named `tag`.
pub fn texts(xml: &str, tag: &str) -> Vec<String> {
    elements(xml, tag).into_iter().map(unescape).collect()
}

/// `true` when the first element named `tag` holds the text `true`.
pub fn flag(xml: &str, tag: &str) -> bool {
    element(xml, tag).is_some_and(|v| v.trim() == "true")
}

/// Parse the first element named `tag` as a number, defaulting to zero.
pub fn number<T: std::str::FromStr + Default>(xml: &str, tag: &str) -> T {
    element(xml, tag)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

/// Copy of `xml` with every element named `tag` removed.
///
/// Used to read top-level fields of a result whose nested blocks reuse
/// the same field names (`id`, `success`, `fullName`).
pub fn without(xml: &str, tag: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut from = 0;
    while let Some((start, span)) = find_element(xml, tag, from) {
        out.push_str(&xml[from..start]);
        from = span.end;
    }
    out.push_str(&xml[from..]);
    out
}

/// Resolve XML entities. Malformed input is returned as-is.
pub fn unescape(raw: &str) -> String {
    match quick_xml::escape::unescape(raw) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => raw.to_string(),
    }
}

/// A SOAP fault returned instead of a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    /// Fault code as sent, e.g. `sf:INVALID_SESSION_ID`.
    pub fault_code: String,
    /// Human-readable fault message.
    pub fault_string: String,
}

impl SoapFault {
    /// Fault code without its namespace prefix.
    pub fn code(&self) -> &str {
        self.fault_code
            .rsplit(':')
            .next()
            .unwrap_or(&self.fault_code)
    }

    /// The session id in the `SessionHeader` was rejected.
    pub fn is_invalid_session(&self) -> bool {
        self.code() == "INVALID_SESSION_ID"
    }
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.fault_code, self.fault_string)
    }
}

/// Extract a SOAP fault, if the document contains one.
pub fn soap_fault(xml: &str) -> Option<SoapFault> {
    let fault = element(xml, "Fault")?;
    let fault_code = text(fault, "faultcode")?;
    let fault_string = text(fault, "faultstring").unwrap_or_else(|| "Unknown error".to_string());
    Some(SoapFault {
        fault_code: fault_code.trim().to_string(),
        fault_string,
    })
}
