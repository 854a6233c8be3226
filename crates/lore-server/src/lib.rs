pub mod compose;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod validate;

pub use error::AppError;
pub use server::{app_config, run_server};
pub use state::AppState;
