pub mod detector;
pub mod label_table;
pub mod normalizer;
pub mod process_detector;
pub mod renderer;
