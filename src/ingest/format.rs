//! Log line formats in nginx `log_format` syntax.
//!
//! A format such as `$remote_addr - - [$time_local] "$request"` is compiled
//! into an anchored regular expression. Every `$name` becomes a named group
//! that matches up to the next literal character of the format (or the end
//! of the line for a trailing variable); all other text must match literally.

use std::collections::HashMap;

use regex::Regex;

use crate::error_handling::DecodeError;

/// Field values of one line, keyed by variable name.
pub type LineFields<'f, 'l> = HashMap<&'f str, &'l str>;

/// A compiled log line format.
#[derive(Debug, Clone)]
pub struct LineFormat {
    regex: Regex,
    fields: Vec<String>,
}

impl LineFormat {
    /// Compiles `format`.
    ///
    /// # Errors
    ///
    /// `DecodeError::InvalidFormat` if the format has no variables, a `$`
    /// without a name, or the same variable twice.
    pub fn parse(format: &str) -> Result<Self, DecodeError> {
        let mut pattern = String::from("^");
        let mut fields = Vec::new();
        let mut rest = format;

        while let Some(pos) = rest.find('$') {
            pattern.push_str(&regex::escape(&rest[..pos]));
            let after = &rest[pos + 1..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if name_len == 0 {
                return Err(DecodeError::InvalidFormat(format!(
                    "'$' without a variable name at offset {} in {:?}",
                    format.len() - rest.len() + pos,
                    format
                )));
            }
            let name = &after[..name_len];
            if fields.iter().any(|f| f == name) {
                return Err(DecodeError::InvalidFormat(format!(
                    "variable ${} appears twice in {:?}",
                    name, format
                )));
            }

            rest = &after[name_len..];
            match rest.chars().next() {
                Some(delimiter) => pattern.push_str(&format!(
                    "(?P<{}>[^{}]*)",
                    name,
                    regex::escape(&delimiter.to_string())
                )),
                None => pattern.push_str(&format!("(?P<{}>.*)", name)),
            }
            fields.push(name.to_string());
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        if fields.is_empty() {
            return Err(DecodeError::InvalidFormat(format!(
                "no $variables in {:?}",
                format
            )));
        }

        let regex = Regex::new(&pattern).map_err(|e| DecodeError::InvalidFormat(e.to_string()))?;
        Ok(LineFormat { regex, fields })
    }

    /// Variable names in the order they appear in the format.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Splits `line` into its fields, or `None` if it does not match.
    pub fn split<'f, 'l>(&'f self, line: &'l str) -> Option<LineFields<'f, 'l>> {
        let captures = self.regex.captures(line)?;
        Some(
            self.fields
                .iter()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|value| (name.as_str(), value.as_str()))
                })
                .collect(),
        )
    }
}
