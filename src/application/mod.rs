// Application layer - the harness around the domain core.
// The core never prompts or prints; these use cases drive it from text input
// and turn its results into reports.

pub mod error;
pub mod period;
pub mod registration;
pub mod script;

pub use error::*;
pub use period::*;
pub use registration::*;
pub use script::*;
