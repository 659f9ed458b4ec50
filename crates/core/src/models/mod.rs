pub mod aggregate;
pub mod alert;
pub mod budget;
pub mod digest;
pub mod expense;
pub mod item;
pub mod overview;
pub mod receipt;
pub mod settings;
pub mod summary;
pub mod window;
