pub mod agent;

pub use self::agent::*;
