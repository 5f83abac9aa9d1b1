pub mod actions;
pub mod consistency;
pub mod php;
pub mod registry;
