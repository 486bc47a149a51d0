use crate::backend::TransportError;
use crate::protocol::{LlmResponse, RunResponse};

/// The displayable result of one run, written into the output block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub text: String,
    /// Non-zero exit code or a failed request.
    pub is_error: bool,
}

impl RunOutcome {
    /// stdout first, then a `stderr:` section if there was any.
    pub fn from_execution(response: &RunResponse) -> Self {
        let mut text = response.stdout.clone();
        if !response.stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str("stderr:\n");
            text.push_str(&response.stderr);
        }
        if text.is_empty() {
            text = format!("<no output> (exit code {})", response.exit_code);
        }
        RunOutcome {
            text,
            is_error: response.exit_code != 0,
        }
    }

    pub fn from_llm(response: LlmResponse) -> Self {
        RunOutcome {
            text: response.output,
            is_error: false,
        }
    }

    pub fn from_transport(error: &TransportError, llm: bool) -> Self {
        let text = match error {
            TransportError::Network(message) if llm => {
                format!("Error contacting LLM backend:\n{message}")
            }
            TransportError::Network(message) => format!("Error contacting backend:\n{message}"),
            TransportError::Status { status, body } => format!("Error: HTTP {status}\n{body}"),
            TransportError::Malformed(message) => {
                format!("Error: unexpected backend response:\n{message}")
            }
        };
        RunOutcome {
            text,
            is_error: true,
        }
    }
}
