//! Clients of the services a migration session talks to.

mod chain;
mod enso;
mod layerzero;
mod stargate;
mod subgraph;

pub use chain::*;
pub use enso::*;
pub use layerzero::*;
pub use stargate::*;
pub use subgraph::*;

use crate::error::Error;
use std::time::Duration;

/// Timeout of every HTTP request unless configured otherwise.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Keeps a response with a success status.
fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::HttpStatus(status))
    }
}
