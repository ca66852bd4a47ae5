//! Error types for the collection domain

/// Evaluator output that lacks the structure a verdict needs
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Missing <{tag}> block in evaluator output")]
    MissingBlock { tag: &'static str },

    #[error("Missing <result> inside <{tag}> block")]
    MissingResult { tag: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_error_missing_result() {
        let err = EvaluationError::MissingResult { tag: "sufficient" };

        assert_eq!(err.to_string(), "Missing <result> inside <sufficient> block");
    }

    #[test]
    fn test_evaluation_error_missing_block() {
        let err = EvaluationError::MissingBlock { tag: "sufficient" };

        assert!(err.to_string().contains("<sufficient>"));
    }
}
