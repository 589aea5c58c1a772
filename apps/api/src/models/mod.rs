pub mod account;
pub mod interview;
pub mod skill;
