pub mod classifier;
pub mod conversation;
pub mod database;
pub mod extract;
pub mod extractor;
pub mod locks;
pub mod providers;
pub mod storage;

pub use classifier::{LeadClassifier, LeadInsights};
pub use conversation::{ConversationEngine, ConversationTurn};
pub use database::LeadformDb;
pub use extractor::{ExtractError, PlainTextExtractor, TextExtractor};
pub use locks::SessionLocks;
pub use storage::{LocalStorage, Storage};
