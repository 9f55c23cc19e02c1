pub mod access;
pub mod dtos;
pub mod handlers;
