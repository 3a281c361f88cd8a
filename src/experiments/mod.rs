pub mod analysis;
pub mod bootstrap;
pub mod config;
pub mod events;
pub mod interleaving;
pub mod stats;
