pub mod analytics;
pub mod chat;
pub mod documents;
pub mod forms;
pub mod leads;

pub use analytics::{DashboardStatsResponse, FormAnalyticsResponse, TrackEventRequest};
pub use chat::{ChatRequest, ChatResponse, SubmitRequest};
pub use documents::DocumentResponse;
pub use forms::{CreateFormRequest, FormResponse, UpdateFormRequest};
pub use leads::{CreateLeadRequest, LeadResponse};
