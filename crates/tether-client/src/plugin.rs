//! Player-facing `bind` command for the game server.

use tracing::error;

use crate::{ClientError, TetherClient};

/// Who ran a game command.
#[derive(Debug, Clone)]
pub enum CommandSource {
    Player { xuid: String, name: String },
    Console,
}

/// Run `/bind` for `source` and return the text to show them.
pub async fn bind_command(client: &TetherClient, source: &CommandSource) -> String {
    let CommandSource::Player { xuid, name } = source else {
        return "You must run this command as a player".to_string();
    };

    match client.issue_code(xuid).await {
        Ok(info) => format!("Your code is {}", info.code),
        Err(ClientError::Application(e)) => e.message,
        Err(e) => {
            error!(player = %name, "Failed to issue bind code: {}", e);
            "Something went wrong".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::client;

    fn player(xuid: &str) -> CommandSource {
        CommandSource::Player {
            xuid: xuid.to_string(),
            name: "Steve".to_string(),
        }
    }

    #[tokio::test]
    async fn test_console_cannot_bind() {
        let (client, _) = client().await;
        assert_eq!(
            bind_command(&client, &CommandSource::Console).await,
            "You must run this command as a player"
        );
    }

    #[tokio::test]
    async fn test_player_gets_code_then_conflict() {
        let (client, service) = client().await;

        let reply = bind_command(&client, &player("XUID-1")).await;
        let code = reply.strip_prefix("Your code is ").unwrap();
        assert_eq!(service.check_code(code).unwrap().subject_id, "XUID-1");

        let reply = bind_command(&client, &player("XUID-1")).await;
        assert_eq!(reply, format!("Code {} is already issued", code));
    }

    #[tokio::test]
    async fn test_bound_player_sees_chat_id() {
        let (client, service) = client().await;
        service.create_binding("disc-1", "XUID-1").unwrap();

        let reply = bind_command(&client, &player("XUID-1")).await;
        assert_eq!(reply, "Game account is already bound to disc-1");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_generic_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TetherClient::new(&format!("http://{}", addr), "token").unwrap();
        assert_eq!(bind_command(&client, &player("XUID-1")).await, "Something went wrong");
    }
}
