pub mod answer;
pub mod format;
pub mod question;
pub mod user;

pub use answer::{AnswerRecord, HistoryEntry};
pub use format::UploadFormat;
pub use question::{NewQuestion, Question, RawCandidate, DEFAULT_DIFFICULTY};
pub use user::{Role, User};
