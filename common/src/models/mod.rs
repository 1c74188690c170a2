pub mod account;
pub mod content;
pub mod file;
pub mod publication;
pub mod session;

pub use account::*;
pub use content::*;
pub use file::*;
pub use publication::*;
pub use session::*;
