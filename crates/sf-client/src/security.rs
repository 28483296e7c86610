//! Escaping and validation helpers shared by the REST and SOAP layers.
//!
//! Any value that ends up inside a SOQL literal, a URL path segment or a
//! SOAP envelope goes through one of these functions first.
//!
//! ```rust
//! use fast_sfdc_client::security::soql;
//!
//! let bundle = soql::escape_string("O'Brien");
//! let query = format!("SELECT Id FROM AuraDefinitionBundle WHERE DeveloperName = '{}'", bundle);
//! assert!(query.contains("O\\'Brien"));
//! ```

/// SOQL helpers.
pub mod soql {
    /// Escape a value for use inside a single-quoted SOQL literal.
    ///
    /// ```rust
    /// use fast_sfdc_client::security::soql;
    ///
    /// assert_eq!(soql::escape_string("O'Brien & Co."), "O\\'Brien & Co.");
    /// ```
    #[must_use]
    pub fn escape_string(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '\'' => escaped.push_str("\\'"),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Collapse runs of spaces into a single space.
    ///
    /// Queries are usually written as indented multi-line literals; the
    /// padding only inflates the encoded query string.
    #[must_use]
    pub fn collapse_spaces(query: &str) -> String {
        let mut out = String::with_capacity(query.len());
        let mut previous_space = false;
        for ch in query.chars() {
            if ch == ' ' {
                if !previous_space {
                    out.push(ch);
                }
                previous_space = true;
            } else {
                out.push(ch);
                previous_space = false;
            }
        }
        out
    }

    /// Validate that an sObject (tooling type) name contains only safe
    /// characters: a leading letter, then letters, digits or underscores.
    ///
    /// ```rust
    /// use fast_sfdc_client::security::soql;
    ///
    /// assert!(soql::is_safe_sobject_name("ApexClassMember"));
    /// assert!(!soql::is_safe_sobject_name("Bad'; DROP--"));
    /// ```
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }
}

/// URL path helpers.
pub mod url {
    /// Validate that a Salesforce ID is 15 or 18 alphanumeric characters.
    #[must_use]
    pub fn is_valid_salesforce_id(id: &str) -> bool {
        let len = id.len();
        (len == 15 || len == 18) && id.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

/// XML escaping for SOAP envelopes.
pub mod xml {
    /// Escape the five predefined XML entities.
    ///
    /// ```rust
    /// use fast_sfdc_client::security::xml;
    ///
    /// assert_eq!(xml::escape("a < b && 'c'"), "a &lt; b &amp;&amp; &apos;c&apos;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}
