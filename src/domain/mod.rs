pub mod entities;
pub mod errors;
pub mod events;
pub mod hooks;
pub mod normalizer;
pub mod ports;
