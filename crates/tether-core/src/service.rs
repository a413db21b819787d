use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use tether_types::error::{ApplicationError, ServiceResult};
use tether_types::models::{Binding, CodeInfo};

use crate::codes::CodeStore;
use crate::repository::BindingRepository;

/// Callback run after every successful binding.
pub type BindObserver = Arc<dyn Fn(&Binding) + Send + Sync>;

/// Issue/check/bind/unbind use cases over a code store and a binding
/// repository. Owns neither; both are shared with whoever built them.
pub struct BindingService {
    codes: Arc<dyn CodeStore>,
    repo: Arc<dyn BindingRepository>,
    observers: RwLock<Vec<BindObserver>>,
}

impl BindingService {
    pub fn new(codes: Arc<dyn CodeStore>, repo: Arc<dyn BindingRepository>) -> Self {
        Self {
            codes,
            repo,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback for new bindings. Observers run in registration
    /// order and cannot be removed.
    pub fn add_observer<F>(&self, observer: F)
    where
        F: Fn(&Binding) + Send + Sync + 'static,
    {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    // -- Codes --

    pub fn issue_code(&self, game_id: &str) -> ServiceResult<CodeInfo> {
        match self.repo.get_by_game(game_id) {
            Ok(existing) => {
                return Err(ApplicationError::conflict(format!(
                    "Game account is already bound to {}",
                    existing.chat_id
                ))
                .into());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let info = self.codes.issue(game_id)?;
        info!(subject = %game_id, "Issued bind code");
        Ok(info)
    }

    /// Look a code up without consuming it.
    pub fn check_code(&self, code: &str) -> ServiceResult<CodeInfo> {
        self.codes.get_info(code)
    }

    pub fn revoke_code(&self, code: &str) -> ServiceResult<()> {
        self.codes.revoke(code)
    }

    // -- Bindings --

    pub fn create_binding(&self, chat_id: &str, game_id: &str) -> ServiceResult<Binding> {
        let binding = self.repo.create(chat_id, game_id)?;

        // Snapshot so an observer may register further observers.
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            observer(&binding);
        }

        Ok(binding)
    }

    /// Check `code`, bind its subject to `chat_id`, then revoke the code.
    ///
    /// Not atomic. A failed create leaves the code in place so the user can
    /// retry. A failed revoke after a successful create is only logged; the
    /// leftover code lingers until revoked.
    pub fn redeem_code(&self, chat_id: &str, code: &str) -> ServiceResult<Binding> {
        let info = self.check_code(code)?;
        let binding = self.create_binding(chat_id, &info.subject_id)?;

        if let Err(e) = self.revoke_code(&info.code) {
            warn!(code = %info.code, "Binding created but code was not revoked: {}", e);
        }

        Ok(binding)
    }

    pub fn get_by_game(&self, game_id: &str) -> ServiceResult<Binding> {
        self.repo.get_by_game(game_id)
    }

    pub fn get_by_chat(&self, chat_id: &str) -> ServiceResult<Binding> {
        self.repo.get_by_chat(chat_id)
    }

    pub fn delete_by_chat(&self, chat_id: &str) -> ServiceResult<()> {
        self.repo.delete_by_chat(chat_id)?;
        info!(chat_id = %chat_id, "Binding removed");
        Ok(())
    }

    pub fn delete_by_game(&self, game_id: &str) -> ServiceResult<()> {
        self.repo.delete_by_game(game_id)?;
        info!(game_id = %game_id, "Binding removed");
        Ok(())
    }
}
