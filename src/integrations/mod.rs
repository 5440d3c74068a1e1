// src/integrations/mod.rs
//
// External Integrations Module

pub mod player;

pub use player::{MediaLauncher, SystemLauncher};

#[cfg(test)]
pub use player::MockMediaLauncher;
