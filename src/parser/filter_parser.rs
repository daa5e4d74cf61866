use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

lazy_static! {
    // attribute eq "value"; embedded quotes are not supported
    static ref EQ_FILTER: Regex =
        Regex::new(r#"^\s*(\w+)\s+(?i:eq)\s+"([^"]+)"\s*$"#).expect("valid filter pattern");
}

/// A single equality predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    pub attribute: String,
    pub value: String,
}

impl FilterExpression {
    pub fn attribute_is(&self, name: &str) -> bool {
        self.attribute.eq_ignore_ascii_case(name)
    }

    /// `"true"` is true; every other literal is false
    pub fn value_as_bool(&self) -> bool {
        self.value.eq_ignore_ascii_case("true")
    }
}

/// Parse a filter of the form `attribute eq "value"`
pub fn parse_filter(input: &str) -> AppResult<FilterExpression> {
    let captures = EQ_FILTER.captures(input).ok_or_else(|| {
        AppError::MalformedFilter(format!(
            "'{}' is not of the form attribute eq \"value\"",
            input
        ))
    })?;

    Ok(FilterExpression {
        attribute: captures[1].to_string(),
        value: captures[2].to_string(),
    })
}
