pub mod keys;
pub mod memory;
pub mod repository;
pub mod traits;
