//! Chat-platform commands: `bind <code>` and `unbind`.
//!
//! The chat bot adapter forwards each invocation here and relays the returned
//! text to the user verbatim.

use std::collections::HashMap;

use tracing::error;

use tether_core::BindingService;
use tether_types::api::{CommandDefinition, CommandInvocation, CommandOption};
use tether_types::error::{ApplicationError, ServiceError};

pub const BIND_SUCCESS: &str = "Binding has been created successfully";
pub const UNBIND_SUCCESS: &str = "Binding has been removed successfully";
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Bind { code: String },
    Unbind,
}

impl ChatCommand {
    pub fn parse(name: &str, options: &HashMap<String, String>) -> Result<Self, ApplicationError> {
        match name {
            "bind" => {
                let code = options
                    .get("code")
                    .map(|c| c.trim().to_ascii_uppercase())
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| ApplicationError::bad_request("Code is not specified"))?;
                Ok(Self::Bind { code })
            }
            "unbind" => Ok(Self::Unbind),
            other => Err(ApplicationError::bad_request(format!(
                "Unknown command: {}",
                other
            ))),
        }
    }
}

pub fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition {
            name: "bind".into(),
            description: "Bind your game account to your chat account".into(),
            options: vec![CommandOption {
                name: "code".into(),
                description: "Code shown in game".into(),
                required: true,
            }],
        },
        CommandDefinition {
            name: "unbind".into(),
            description: "Unbind your game account from your chat account".into(),
            options: vec![],
        },
    ]
}

/// Parse and run one invocation, returning the reply text.
pub fn dispatch(service: &BindingService, invocation: &CommandInvocation) -> String {
    match ChatCommand::parse(&invocation.name, &invocation.options) {
        Ok(command) => execute(service, &invocation.invoker_id, command),
        Err(e) => e.message,
    }
}

pub fn execute(service: &BindingService, invoker_id: &str, command: ChatCommand) -> String {
    let result = match command {
        ChatCommand::Bind { code } => service
            .redeem_code(invoker_id, &code)
            .map(|_| BIND_SUCCESS),
        ChatCommand::Unbind => service.delete_by_chat(invoker_id).map(|_| UNBIND_SUCCESS),
    };

    match result {
        Ok(reply) => reply.to_string(),
        Err(e) => reply_for(e),
    }
}

fn reply_for(err: ServiceError) -> String {
    match err {
        ServiceError::Application(e) => e.message,
        ServiceError::Internal(e) => {
            error!("Chat command failed: {:#}", e);
            GENERIC_FAILURE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tether_core::MemoryCodeStore;
    use tether_db::Database;

    fn service() -> BindingService {
        BindingService::new(
            Arc::new(MemoryCodeStore::new()),
            Arc::new(Database::open_in_memory().unwrap()),
        )
    }

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ChatCommand::parse("bind", &options(&[("code", " ab12cd ")])).unwrap(),
            ChatCommand::Bind {
                code: "AB12CD".into()
            }
        );
        assert_eq!(
            ChatCommand::parse("unbind", &HashMap::new()).unwrap(),
            ChatCommand::Unbind
        );
        assert_eq!(
            ChatCommand::parse("bind", &options(&[("code", "  ")]))
                .unwrap_err()
                .status_code(),
            400
        );
        assert!(ChatCommand::parse("ban", &HashMap::new()).is_err());
    }

    #[test]
    fn test_bind_then_unbind() {
        let svc = service();
        let info = svc.issue_code("XUID-1").unwrap();

        let reply = execute(
            &svc,
            "disc-1",
            ChatCommand::Bind {
                code: info.code.clone(),
            },
        );
        assert_eq!(reply, BIND_SUCCESS);
        assert_eq!(svc.get_by_chat("disc-1").unwrap().game_id, "XUID-1");
        assert!(svc.check_code(&info.code).is_err());

        assert_eq!(execute(&svc, "disc-1", ChatCommand::Unbind), UNBIND_SUCCESS);
        assert_eq!(execute(&svc, "disc-1", ChatCommand::Unbind), "Binding not found");
    }

    #[test]
    fn test_bind_with_unknown_code_replies_with_error_message() {
        let svc = service();
        let reply = execute(
            &svc,
            "disc-1",
            ChatCommand::Bind {
                code: "ZZZZZZ".into(),
            },
        );
        assert_eq!(reply, "Code doesn't exist");
    }

    #[test]
    fn test_dispatch_lowercase_code() {
        let svc = service();
        let info = svc.issue_code("XUID-1").unwrap();
        let invocation = CommandInvocation {
            name: "bind".into(),
            invoker_id: "disc-1".into(),
            options: options(&[("code", &info.code.to_ascii_lowercase())]),
        };
        assert_eq!(dispatch(&svc, &invocation), BIND_SUCCESS);
    }

    #[test]
    fn test_internal_errors_are_not_shown() {
        let err = ServiceError::Internal(anyhow::anyhow!("database is locked"));
        assert_eq!(reply_for(err), GENERIC_FAILURE);
    }

    #[test]
    fn test_definitions() {
        let defs = definitions();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["bind", "unbind"]);
        assert!(defs[0].options[0].required);
    }
}
