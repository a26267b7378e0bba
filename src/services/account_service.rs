//! 账号服务 - 业务能力层
//!
//! 注册与登录。密码以 SHA-256(用户名:密码) 的十六进制摘要保存。

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{AccountError, AppResult, StoreError};
use crate::infrastructure::SqliteStore;
use crate::models::{Role, User};

/// 账号服务
pub struct AccountService {
    admin_username: String,
}

impl AccountService {
    pub fn new(admin_username: impl Into<String>) -> Self {
        Self {
            admin_username: admin_username.into(),
        }
    }

    /// 注册，返回分配的角色
    ///
    /// 用户名等于配置的管理员名时分配 `admin`，否则为 `user`。
    pub fn signup(&self, store: &SqliteStore, username: &str, password: &str) -> AppResult<Role> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::BlankField { field: "username" }.into());
        }
        if password.is_empty() {
            return Err(AccountError::BlankField { field: "password" }.into());
        }

        let role = if username == self.admin_username {
            Role::Admin
        } else {
            Role::User
        };

        match store.create_user(username, &hash_password(username, password), role) {
            Ok(()) => {
                info!("👤 新用户注册: {} ({})", username, role);
                Ok(role)
            }
            Err(StoreError::Conflict { .. }) => Err(AccountError::UsernameTaken {
                username: username.to_string(),
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    /// 登录校验
    pub fn login(&self, store: &SqliteStore, username: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        let stored = store
            .find_user(username)?
            .ok_or(AccountError::InvalidCredentials)?;

        if stored.password_hash != hash_password(username, password) {
            return Err(AccountError::InvalidCredentials.into());
        }

        Ok(stored.user)
    }
}

fn hash_password(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
