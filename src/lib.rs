pub mod app;
pub mod config;
pub mod cookie;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod page;
pub mod paths;
pub mod state;
pub mod storage;
pub mod toggle;
pub mod ui;

pub use app::router;
pub use config::{ClientConfig, Labels, ServerConfig};
pub use cookie::CsrfToken;
pub use errors::ToggleError;
pub use models::ToggleResult;
pub use page::{ActionTarget, Page};
pub use state::AppState;
pub use storage::load_data;
pub use toggle::{SharedPage, ToggleAction, ToggleOutcome, reconcile};
