pub mod battalion;

pub use self::battalion::*;
