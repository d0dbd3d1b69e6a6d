//! Request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Query request for the local pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Audience (optional, defaults to public); older clients send `source_type`
    #[serde(default, alias = "source_type")]
    pub audience: Option<String>,
}

/// Ask request routed through the backend chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Audience name
    pub audience: String,
    /// The question to answer
    pub question: String,
}

/// Raw texts to add to the vector collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub texts: Vec<String>,
}

/// Reject empty or whitespace-only questions, returning the trimmed text
pub fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("Question must be a non-empty string"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_alias() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"question": "Who funds GHC?", "source_type": "investor"}"#)
                .unwrap();
        assert_eq!(request.audience.as_deref(), Some("investor"));

        let request: QueryRequest = serde_json::from_str(r#"{"question": "Hi"}"#).unwrap();
        assert!(request.audience.is_none());
    }

    #[test]
    fn test_validate_question() {
        assert_eq!(validate_question("  What is GHC?\n").unwrap(), "What is GHC?");
        assert!(matches!(validate_question("   "), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_ingest_request_missing_texts_is_empty() {
        let request: IngestRequest = serde_json::from_str("{}").unwrap();
        assert!(request.texts.is_empty());
    }
}
