use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

// -- Envelope --

/// Every JSON response body: exactly one of `error` and `data` is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct Payload<T> {
    pub error: Option<ErrorInfo>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
}

impl<T> Payload<T> {
    pub fn success(data: T) -> Self {
        Self {
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(err: &ApplicationError) -> Self {
        Self {
            error: Some(ErrorInfo {
                code: err.code,
                message: err.message.clone(),
            }),
            data: None,
        }
    }
}

impl From<ErrorInfo> for ApplicationError {
    fn from(info: ErrorInfo) -> Self {
        ApplicationError::new(info.code, info.message)
    }
}

// -- Codes --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueCodeRequest {
    pub subject_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeRequest {
    pub code: String,
}

// -- Chat commands --

/// A chat-platform command invocation forwarded by the bot adapter.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandInvocation {
    pub name: String,
    /// Chat identity of the user who ran the command.
    pub invoker_id: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandReply {
    pub content: String,
}

/// Registration metadata for one chat command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub required: bool,
}
