pub mod forwarder;
pub mod gateway;
pub mod result_store;
