mod app;
mod middleware;
mod run;
mod state;

pub use app::create_app;
pub use middleware::{api_key_auth, API_KEY_HEADER};
pub use run::{run, ServeError};
pub use state::AppState;
