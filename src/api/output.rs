use serde::Serialize;

/// Tagged result returned by every query and mutation.
///
/// Failures never escape as errors; they become `succeeded: false` plus a
/// message. Payload fields are flattened next to the tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output<T> {
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> Output<T> {
    pub fn ok(payload: T) -> Self {
        Self { succeeded: true, error: None, payload: Some(payload) }
    }

    pub fn fail(error: impl ToString) -> Self {
        Self { succeeded: false, error: Some(error.to_string()), payload: None }
    }
}

impl<T, E: ToString> From<Result<T, E>> for Output<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Output::ok(payload),
            Err(e) => Output::fail(e),
        }
    }
}
