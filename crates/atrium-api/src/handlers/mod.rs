pub mod list;
pub mod resource;
pub mod uploads;
