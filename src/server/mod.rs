pub mod api;

pub use api::{AppState, router};

use anyhow::Result;
use std::net::SocketAddr;

pub async fn start(addr: SocketAddr, state: AppState) -> Result<()> {
    api::serve(addr, state).await
}
