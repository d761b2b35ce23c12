//! In-memory host for tests

use super::{AdminShell, ShellError, UserInfo};
use crate::account::AccountRecord;
use async_trait::async_trait;
use std::sync::Mutex;

/// Credential store keyed by `(database, username)`, rejecting duplicates the
/// way the server does.
#[derive(Default)]
pub struct MemoryShell {
    users: Mutex<Vec<UserInfo>>,
    attempts: Mutex<Vec<String>>,
    pings_until_ready: Mutex<u32>,
    pings: Mutex<u32>,
    denied: Mutex<Vec<String>>,
}

impl MemoryShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `ping` with false this many times first.
    pub fn unready_for(self, pings: u32) -> Self {
        *self.pings_until_ready.lock().unwrap() = pings;
        self
    }

    /// Reject every creation on `database` with a permission error.
    pub fn deny(self, database: &str) -> Self {
        self.denied.lock().unwrap().push(database.to_string());
        self
    }

    pub fn insert(&self, database: &str, user: UserInfo) {
        assert_eq!(user.db, database);
        self.users.lock().unwrap().push(user);
    }

    /// Principals `create_user` was called for, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn pings(&self) -> u32 {
        *self.pings.lock().unwrap()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl AdminShell for MemoryShell {
    async fn ping(&self) -> Result<bool, ShellError> {
        *self.pings.lock().unwrap() += 1;
        let mut remaining = self.pings_until_ready.lock().unwrap();
        if *remaining == 0 {
            Ok(true)
        } else {
            *remaining -= 1;
            Ok(false)
        }
    }

    async fn create_user(
        &self,
        database: &str,
        account: &AccountRecord,
    ) -> Result<(), ShellError> {
        self.attempts
            .lock()
            .unwrap()
            .push(account.principal(database));

        if self.denied.lock().unwrap().iter().any(|d| d == database) {
            return Err(ShellError::Rejected {
                database: database.to_string(),
                message: "not authorized".to_string(),
            });
        }

        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.db == database && u.user == account.username)
        {
            return Err(ShellError::AlreadyExists {
                username: account.username.clone(),
                database: database.to_string(),
            });
        }

        users.push(UserInfo {
            user: account.username.clone(),
            db: database.to_string(),
            roles: account.roles.clone(),
        });
        Ok(())
    }

    async fn users_info(&self, database: &str) -> Result<Vec<UserInfo>, ShellError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.db == database)
            .cloned()
            .collect())
    }
}
