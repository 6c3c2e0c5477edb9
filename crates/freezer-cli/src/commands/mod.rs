pub mod dump;
pub mod freeze;
