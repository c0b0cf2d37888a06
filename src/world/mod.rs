pub mod data;
pub mod host;
pub mod layout;

pub use self::data::*;
pub use self::host::*;
pub use self::layout::*;
