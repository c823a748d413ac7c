// homeweave-api: Async Rust client for the Jeedom JSON-RPC API

pub mod error;
pub mod jeedom;
pub mod transport;

pub use error::Error;
pub use jeedom::models::{
    ChangeEvent, EventChanges, Equipment, ExecOptions, RawCommand, RpcError, RpcResponse,
};
pub use jeedom::{JeedomClient, JeedomRpc};
pub use transport::{TlsMode, TransportConfig};
