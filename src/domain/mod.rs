mod account;
mod money;
mod savings;
mod user;
mod validation;

pub use account::*;
pub use money::*;
pub use savings::*;
pub use user::*;
pub use validation::*;
