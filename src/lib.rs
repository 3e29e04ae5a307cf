pub mod bus;
pub mod constants;
pub mod diagnostics;
pub mod handlers;
pub mod host;
pub mod jobs;
pub mod policy;
pub mod rendering;
pub mod session;
pub mod settings;
pub mod shell;
pub mod state;
pub mod uncaught;
pub mod views;

pub use handlers::Message;
pub use host::Host;
pub use session::Session;
pub use settings::Settings;
