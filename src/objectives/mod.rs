pub mod data;
pub mod defend;
pub mod harvest;
pub mod idle;
pub mod maintain;
pub mod objectivesystem;
pub mod reachlevel;
pub mod refillcontainers;
pub mod refillproduction;
pub mod utility;

pub use self::data::*;
pub use self::objectivesystem::*;
