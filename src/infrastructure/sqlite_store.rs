//! SQLite 存储 - 基础设施层
//!
//! 唯一持有数据库连接的模块。连接放在 `Mutex` 里，所有写入串行执行；
//! 批量写入在单个事务中完成。

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::infrastructure::store::QuestionStore;
use crate::models::{AnswerRecord, HistoryEntry, NewQuestion, Question, Role, User};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user'
);

CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL CHECK (length(trim(question)) > 0),
    difficulty TEXT NOT NULL DEFAULT 'medium',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    question_id INTEGER NOT NULL,
    answer TEXT NOT NULL,
    feedback TEXT NOT NULL,
    confidence REAL NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (question_id) REFERENCES questions (id)
);
"#;

/// 存储中的用户行（含密码摘要）
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// SQLite 存储
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// 打开（或创建）数据库文件并初始化表结构
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("📂 已打开数据库: {}", path.display());
        Self::with_connection(conn)
    }

    /// 内存数据库，测试用
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    // ========== 用户 ==========

    /// 新建用户，用户名重复时返回 `Conflict`
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let result = conn.execute(
            "INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role.as_str()],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Conflict {
                    entity: "user",
                    key: username.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_user(&self, username: &str) -> Result<Option<StoredUser>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT username, role, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| {
                    let role: String = row.get(1)?;
                    Ok(StoredUser {
                        user: User {
                            username: row.get(0)?,
                            role: Role::from_db(&role),
                        },
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT username, role FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |row| {
                let role: String = row.get(1)?;
                Ok(User {
                    username: row.get(0)?,
                    role: Role::from_db(&role),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    // ========== 题目 ==========

    /// 写入单道题目，返回新题目 ID
    pub fn add_question(&self, question: &NewQuestion) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO questions (question, difficulty, created_at) VALUES (?1, ?2, ?3)",
            params![
                question.text,
                question.difficulty,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn random_question(&self) -> Result<Option<Question>, StoreError> {
        let conn = self.lock()?;
        let question = conn
            .query_row(
                "SELECT id, question, difficulty FROM questions ORDER BY RANDOM() LIMIT 1",
                [],
                map_question,
            )
            .optional()?;
        Ok(question)
    }

    pub fn get_question(&self, id: i64) -> Result<Option<Question>, StoreError> {
        let conn = self.lock()?;
        let question = conn
            .query_row(
                "SELECT id, question, difficulty FROM questions WHERE id = ?1",
                params![id],
                map_question,
            )
            .optional()?;
        Ok(question)
    }

    /// 按写入顺序列出全部题目
    pub fn list_questions(&self) -> Result<Vec<Question>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, question, difficulty FROM questions ORDER BY id")?;
        let questions = stmt
            .query_map([], map_question)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    pub fn count_questions(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== 作答 ==========

    /// 保存作答，题目不存在时返回 `NotFound`
    pub fn insert_answer(&self, record: &AnswerRecord) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM questions WHERE id = ?1",
                params![record.question_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::NotFound {
                entity: "question",
                key: record.question_id.to_string(),
            });
        }

        conn.execute(
            "INSERT INTO answers (username, question_id, answer, feedback, confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.username,
                record.question_id,
                record.answer,
                record.feedback,
                record.confidence,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 某用户的作答历史，按提交顺序
    pub fn history(&self, username: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT q.question, a.answer, a.feedback
             FROM answers a
             JOIN questions q ON a.question_id = q.id
             WHERE a.username = ?1
             ORDER BY a.id",
        )?;
        let entries = stmt
            .query_map(params![username], |row| {
                Ok(HistoryEntry {
                    question: row.get(0)?,
                    answer: row.get(1)?,
                    feedback: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl QuestionStore for SqliteStore {
    fn add_many(&self, records: &[NewQuestion]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let created_at = chrono::Utc::now().to_rfc3339();
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO questions (question, difficulty, created_at) VALUES (?1, ?2, ?3)",
            )?;
            for record in records {
                stmt.execute(params![record.text, record.difficulty, created_at])?;
            }
        }
        // 任何一步出错时 tx 被 drop，自动回滚
        tx.commit()?;

        debug!("事务提交完成，写入 {} 道题目", records.len());
        Ok(records.len())
    }
}

fn map_question(row: &rusqlite::Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        text: row.get(1)?,
        difficulty: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question(text: &str, difficulty: &str) -> NewQuestion {
        NewQuestion {
            text: text.to_string(),
            difficulty: difficulty.to_string(),
        }
    }

    #[test]
    fn test_add_many_commits_in_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let batch = vec![
            new_question("What is a stack?", "easy"),
            new_question("Explain recursion", "medium"),
        ];

        assert_eq!(store.add_many(&batch).unwrap(), 2);

        let stored = store.list_questions().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].text, "What is a stack?");
        assert_eq!(stored[0].difficulty, "easy");
        assert_eq!(stored[1].text, "Explain recursion");
        assert!(stored[0].id < stored[1].id);
    }

    #[test]
    fn test_add_many_rolls_back_whole_batch() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.add_many(&[new_question("existing", "hard")]).unwrap();

        // 第二条违反 CHECK 约束，整批都不应写入
        let batch = vec![new_question("valid", "easy"), new_question("   ", "easy")];
        let result = store.add_many(&batch);

        assert!(matches!(result, Err(StoreError::Database(_))));
        let stored = store.list_questions().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, "existing");
    }

    #[test]
    fn test_add_many_empty_batch() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.add_many(&[]).unwrap(), 0);
        assert_eq!(store.count_questions().unwrap(), 0);
    }

    #[test]
    fn test_create_user_conflict() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_user("alice", "hash", Role::User).unwrap();

        let err = store.create_user("alice", "other", Role::User).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "user", .. }));

        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::User);
    }

    #[test]
    fn test_random_question_on_empty_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.random_question().unwrap().is_none());

        let id = store.add_question(&new_question("Only one", "medium")).unwrap();
        let picked = store.random_question().unwrap().unwrap();
        assert_eq!(picked.id, id);
    }

    #[test]
    fn test_answer_requires_existing_question() {
        let store = SqliteStore::open_in_memory().unwrap();
        let record = AnswerRecord {
            username: "bob".to_string(),
            question_id: 42,
            answer: "a stack is LIFO".to_string(),
            feedback: "Good attempt!".to_string(),
            confidence: 0.75,
        };

        let err = store.insert_answer(&record).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "question", .. }));
    }

    #[test]
    fn test_history_follows_submission_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let q1 = store.add_question(&new_question("Q1", "easy")).unwrap();
        let q2 = store.add_question(&new_question("Q2", "hard")).unwrap();

        for (qid, answer) in [(q2, "second first"), (q1, "then first")] {
            store
                .insert_answer(&AnswerRecord {
                    username: "carol".to_string(),
                    question_id: qid,
                    answer: answer.to_string(),
                    feedback: "Good attempt!".to_string(),
                    confidence: 0.9,
                })
                .unwrap();
        }

        let history = store.history("carol").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "Q2");
        assert_eq!(history[1].question, "Q1");
        assert!(store.history("nobody").unwrap().is_empty());
    }
}
