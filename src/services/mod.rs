pub mod account_service;
pub mod document_extractor;
pub mod feedback;
pub mod normalizer;
pub mod tabular_extractor;

pub use account_service::AccountService;
pub use document_extractor::DocumentExtractor;
pub use feedback::{Feedback, FeedbackService};
pub use normalizer::{normalize, normalize_all};
pub use tabular_extractor::TabularExtractor;
