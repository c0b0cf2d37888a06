pub mod colony;

pub use self::colony::*;
