// Jeedom JSON-RPC client modules
//
// Hand-written client for the `core/api/jeeApi.php` endpoint: equipment
// discovery, per-equipment command directories, command execution and the
// `event::changes` long-poll feed.

pub mod client;
pub mod commands;
pub mod equipment;
pub mod events;
pub mod models;
pub mod rpc;

pub use client::JeedomClient;
pub use rpc::JeedomRpc;
