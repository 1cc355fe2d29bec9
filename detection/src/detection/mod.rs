pub mod detection;
pub mod detector_manager;
pub mod pipeline;
pub mod utils;
