use thiserror::Error;

/// Per-package failure to turn a raw license string into an expression.
///
/// Never fatal: the package is classified Unknown and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("ambiguous license expression '{expression}': mixed AND/OR without parentheses")]
    Ambiguous { expression: String },

    #[error("malformed license expression '{expression}': {details}")]
    Malformed { expression: String, details: String },
}

impl ExpressionError {
    pub fn expression(&self) -> &str {
        match self {
            ExpressionError::Ambiguous { expression }
            | ExpressionError::Malformed { expression, .. } => expression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_expression() {
        let ambiguous = ExpressionError::Ambiguous {
            expression: "MIT OR Apache-2.0 AND BSD-3-Clause".to_string(),
        };
        assert!(ambiguous.to_string().contains("mixed AND/OR"));
        assert_eq!(ambiguous.expression(), "MIT OR Apache-2.0 AND BSD-3-Clause");

        let malformed = ExpressionError::Malformed {
            expression: "(MIT".to_string(),
            details: "unbalanced parentheses".to_string(),
        };
        assert!(malformed.to_string().contains("unbalanced parentheses"));
    }
}
