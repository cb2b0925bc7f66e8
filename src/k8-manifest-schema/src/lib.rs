mod attribute;
mod diagnostic;
mod path;
mod validate;
mod validator;

pub use attribute::*;
pub use diagnostic::*;
pub use path::*;
pub use validator::*;
