pub mod gateway;
pub mod utils;
pub mod web;
