pub mod movebehavior;
pub mod targetbehavior;
