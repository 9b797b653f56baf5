pub mod error;
pub mod model;
pub mod state;

pub use error::AppError;
pub use model::{CaptureRequest, OutputFormat, Stage, Status};
pub use state::FormState;
