pub mod analytics;
pub mod document;
pub mod form;
pub mod lead;
pub mod session;

pub use analytics::AnalyticsEvent;
pub use document::Document;
pub use form::{EmbedSettings, Form, FormField};
pub use lead::{ContactInfo, Lead, Qualification};
pub use session::{ChatSession, SessionMessage};
