pub mod factory;
pub mod git;
pub mod performer;
pub mod services;
pub mod verify;
