use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::debug;

use tether_types::error::{ApplicationError, ServiceResult};
use tether_types::models::CodeInfo;

/// Characters a code is drawn from: digits and uppercase letters without the
/// easily confused `I` and `O`.
pub const CODE_ALPHABET: &[u8; 34] = b"0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";
pub const CODE_LENGTH: usize = 6;

/// How long a code is advertised as valid. Recorded on the code, not enforced.
pub const CODE_TTL_MINUTES: i64 = 15;

/// Bytes at or above this are discarded so `byte % 34` stays uniform.
const REJECT_FROM: u8 = (256 - 256 % CODE_ALPHABET.len()) as u8;

pub trait CodeStore: Send + Sync {
    fn issue(&self, subject_id: &str) -> ServiceResult<CodeInfo>;
    fn get_info(&self, code: &str) -> ServiceResult<CodeInfo>;
    fn get_for_subject(&self, subject_id: &str) -> ServiceResult<CodeInfo>;
    fn revoke(&self, code: &str) -> ServiceResult<()>;
}

/// Process-local code table. Codes do not survive a restart and expired
/// codes stay in the table until they are revoked.
#[derive(Default)]
pub struct MemoryCodeStore {
    codes: Mutex<HashMap<String, CodeInfo>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> ServiceResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> ServiceResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, HashMap<String, CodeInfo>>> {
        self.codes
            .lock()
            .map_err(|e| anyhow!("Code store lock poisoned: {}", e).into())
    }
}

fn find_for_subject<'a>(
    codes: &'a HashMap<String, CodeInfo>,
    subject_id: &str,
) -> Option<&'a CodeInfo> {
    codes.values().find(|info| info.subject_id == subject_id)
}

impl MemoryCodeStore {
    /// Issue with an explicit randomness source. Draws until the candidate
    /// does not collide with a stored code.
    pub(crate) fn issue_with<R: RngCore + ?Sized>(
        &self,
        subject_id: &str,
        rng: &mut R,
    ) -> ServiceResult<CodeInfo> {
        let mut codes = self.lock()?;

        if let Some(existing) = find_for_subject(&codes, subject_id) {
            return Err(ApplicationError::conflict(format!(
                "Code {} is already issued",
                existing.code
            ))
            .into());
        }

        let code = loop {
            let candidate = generate_code(rng);
            if !codes.contains_key(&candidate) {
                break candidate;
            }
            debug!("Generated code collided with an active one, retrying");
        };

        let issued_at = Utc::now();
        let info = CodeInfo {
            code: code.clone(),
            subject_id: subject_id.to_string(),
            issued_at,
            expires_at: issued_at + Duration::minutes(CODE_TTL_MINUTES),
        };
        codes.insert(code, info.clone());
        Ok(info)
    }
}

impl CodeStore for MemoryCodeStore {
    fn issue(&self, subject_id: &str) -> ServiceResult<CodeInfo> {
        self.issue_with(subject_id, &mut rand::rng())
    }

    fn get_info(&self, code: &str) -> ServiceResult<CodeInfo> {
        self.lock()?
            .get(code)
            .cloned()
            .ok_or_else(|| ApplicationError::not_found("Code doesn't exist").into())
    }

    fn get_for_subject(&self, subject_id: &str) -> ServiceResult<CodeInfo> {
        let codes = self.lock()?;
        find_for_subject(&codes, subject_id)
            .cloned()
            .ok_or_else(|| ApplicationError::not_found("There is no code for this subject").into())
    }

    fn revoke(&self, code: &str) -> ServiceResult<()> {
        match self.lock()?.remove(code) {
            Some(_) => Ok(()),
            None => Err(ApplicationError::not_found("Code doesn't exist").into()),
        }
    }
}

/// Draw a code of [`CODE_LENGTH`] characters from [`CODE_ALPHABET`], using
/// rejection sampling on raw bytes.
pub fn generate_code<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(CODE_LENGTH);
    let mut buf = [0u8; CODE_LENGTH];

    while code.len() < CODE_LENGTH {
        rng.fill_bytes(&mut buf);
        for &b in buf.iter().filter(|&&b| b < REJECT_FROM) {
            code.push(CODE_ALPHABET[b as usize % CODE_ALPHABET.len()] as char);
            if code.len() == CODE_LENGTH {
                break;
            }
        }
    }

    code
}
