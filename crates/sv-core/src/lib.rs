pub mod error;
pub mod flag;
pub mod path;
pub mod text;
pub mod types;

pub use error::{ErrorKind, StorylineError};
pub use flag::FlagKey;
pub use path::DocPath;
pub use text::TextValue;
pub use types::*;
