pub mod backend;
pub mod dispatch;
pub mod error;
pub mod outcome;
pub mod protocol;
pub mod session;
pub mod settings;

pub use backend::{Backend, HttpBackend, TransportError};
pub use dispatch::{Route, RouteError, Target, route};
pub use error::RunError;
pub use outcome::RunOutcome;
pub use session::{RunReport, run_all, run_block};
pub use settings::Settings;
