use anyhow::Context;

use tether_db::Database;
use tether_db::models::{BindingRow, InsertOutcome};
use tether_types::error::{ApplicationError, ServiceResult};
use tether_types::models::Binding;

/// Durable store of game ↔ chat bindings. Both identities are unique across
/// all bindings.
pub trait BindingRepository: Send + Sync {
    fn get_by_chat(&self, chat_id: &str) -> ServiceResult<Binding>;
    fn get_by_game(&self, game_id: &str) -> ServiceResult<Binding>;
    fn create(&self, chat_id: &str, game_id: &str) -> ServiceResult<Binding>;
    fn delete_by_chat(&self, chat_id: &str) -> ServiceResult<()>;
    fn delete_by_game(&self, game_id: &str) -> ServiceResult<()>;
}

fn binding_not_found() -> ApplicationError {
    ApplicationError::not_found("Binding not found")
}

fn to_binding(row: BindingRow) -> Binding {
    Binding {
        game_id: row.game_id,
        chat_id: row.chat_id,
    }
}

impl BindingRepository for Database {
    fn get_by_chat(&self, chat_id: &str) -> ServiceResult<Binding> {
        let row = self
            .get_binding_by_chat(chat_id)
            .context("looking up binding by chat id")?
            .ok_or_else(binding_not_found)?;
        Ok(to_binding(row))
    }

    fn get_by_game(&self, game_id: &str) -> ServiceResult<Binding> {
        let row = self
            .get_binding_by_game(game_id)
            .context("looking up binding by game id")?
            .ok_or_else(binding_not_found)?;
        Ok(to_binding(row))
    }

    fn create(&self, chat_id: &str, game_id: &str) -> ServiceResult<Binding> {
        match self
            .insert_binding(chat_id, game_id)
            .context("inserting binding")?
        {
            InsertOutcome::Inserted(row) => Ok(to_binding(row)),
            InsertOutcome::Taken(_) => Err(ApplicationError::conflict(
                "Either the chat or the game identity is already bound",
            )
            .into()),
        }
    }

    fn delete_by_chat(&self, chat_id: &str) -> ServiceResult<()> {
        if self
            .delete_binding_by_chat(chat_id)
            .context("deleting binding by chat id")?
        {
            Ok(())
        } else {
            Err(binding_not_found().into())
        }
    }

    fn delete_by_game(&self, game_id: &str) -> ServiceResult<()> {
        if self
            .delete_binding_by_game(game_id)
            .context("deleting binding by game id")?
        {
            Ok(())
        } else {
            Err(binding_not_found().into())
        }
    }
}
