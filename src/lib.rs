//! Real-time combat simulation core for a mech-roguelite browser game:
//! fixed-timestep engine, damage and ability resolution, enemy ATB AI,
//! status effects, boss phases, wave generation, and replay output, plus a
//! small HTTP surface and a batch balancing harness around it.

pub mod balance;
pub mod cli;
pub mod combat;
pub mod data;
pub mod server;
pub mod sim;
