//! Sampling knobs for a model call and why the model stopped.

use bon::Builder;

/// Per-call sampling settings. Unset fields use the model's defaults.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct GenerationSettings {
    /// 0.0 to 2.0; lower keeps tool selection predictable.
    pub temperature: Option<f64>,
    /// Cap on reply length in tokens.
    pub max_output_tokens: Option<u32>,
}

/// Why the model stopped producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    /// The reply carries function calls to run before the turn can finish.
    ToolCalls,
    /// Withheld by a safety or recitation filter.
    Blocked,
    Other,
}

impl FinishReason {
    /// Map Gemini's `finishReason` string.
    pub fn from_gemini(reason: &str) -> Self {
        match reason {
            "STOP" => Self::Stop,
            "MAX_TOKENS" => Self::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
                Self::Blocked
            }
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_reasons_map_to_variants() {
        assert_eq!(FinishReason::from_gemini("STOP"), FinishReason::Stop);
        assert_eq!(FinishReason::from_gemini("MAX_TOKENS"), FinishReason::MaxTokens);
        assert_eq!(FinishReason::from_gemini("SAFETY"), FinishReason::Blocked);
        assert_eq!(FinishReason::from_gemini("MALFORMED_FUNCTION_CALL"), FinishReason::Other);
    }
}
