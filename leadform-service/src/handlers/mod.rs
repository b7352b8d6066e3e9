pub mod analytics;
pub mod chat;
pub mod documents;
pub mod forms;
pub mod health;
pub mod leads;
