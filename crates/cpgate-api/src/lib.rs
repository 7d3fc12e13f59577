// cpgate-api: Async Rust client for the Check Point Management Web API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{SID_HEADER, SessionId};
pub use client::{ApiResponse, ManagementClient};
pub use error::Error;
pub use models::{
    AddSimpleGatewayRequest, AddedObject, LoginResponse, PublishResponse, ShowGatewaysRequest,
};
pub use transport::{TlsMode, TransportConfig};
