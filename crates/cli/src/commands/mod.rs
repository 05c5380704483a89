pub mod alerts;
pub mod config;
pub mod recommend;
pub mod score;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(command: &str, error_class: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code: 1, output: serialize_payload(payload) }
    }

    /// Collapse an `anyhow` result into a structured outcome, chaining the
    /// error causes into the message.
    pub fn from_run(command: &str, result: anyhow::Result<String>) -> Self {
        match result {
            Ok(message) => Self::success(command, message),
            Err(error) => Self::failure(command, "pipeline", format!("{error:#}")),
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_outcome_serializes_without_error_class() {
        let result = CommandResult::success("score", "scored 10 clients");
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("\"status\":\"ok\""));
        assert!(result.output.contains("\"error_class\":null"));
    }

    #[test]
    fn failure_outcome_carries_error_class_and_nonzero_exit() {
        let result = CommandResult::failure("score", "pipeline", "boom");
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("\"status\":\"error\""));
        assert!(result.output.contains("\"error_class\":\"pipeline\""));
    }
}
