pub mod actions;
pub mod attack;
pub mod build;
pub mod construction;
pub mod data;
pub mod fetch;
pub mod harvest;
pub mod haul;
pub mod heal;
pub mod produce;
pub mod reach;
pub mod repair;
pub mod tasksystem;
pub mod upgrade;
pub mod utility;

pub use self::data::*;
pub use self::tasksystem::*;
