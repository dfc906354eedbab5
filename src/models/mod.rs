pub mod dtos;
pub mod resume;
