//! Connection establishment
//!
//! A [`Session`] is a connected and bound [`DirectoryClient`]. It is created
//! by [`Session::establish`] and must be finished with [`Session::release`].

use tracing::{debug, info, instrument, warn};

use crate::config::ConnectionConfig;
use crate::error::ConnectorResult;
use crate::traits::DirectoryClient;

/// A connected, bound directory client.
#[derive(Debug)]
pub struct Session<C: DirectoryClient> {
    client: C,
    url: String,
}

impl<C: DirectoryClient> Session<C> {
    /// Validate `config`, connect and bind.
    ///
    /// Configuration errors are returned before `connect` is called. If the
    /// connect or bind fails, the client is closed before returning.
    #[instrument(skip(client, config), fields(host = %config.host))]
    pub async fn establish(mut client: C, config: &ConnectionConfig) -> ConnectorResult<Self> {
        config.validate()?;
        config.warn_if_insecure();

        let url = config.url();
        debug!(url = %url, tls_mode = ?config.tls_mode, "Connecting to directory");

        if let Err(e) = client.connect(config).await {
            release(&mut client, &url).await;
            return Err(e);
        }

        let credentials = config.credentials();
        debug!(credentials = ?credentials, "Binding");

        if let Err(e) = client.bind(&credentials).await {
            release(&mut client, &url).await;
            return Err(e);
        }

        info!(url = %url, "Directory session established");

        Ok(Self { client, url })
    }

    /// The bound client.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Close the session, logging instead of returning a close failure.
    pub async fn release(mut self) -> C {
        release(&mut self.client, &self.url).await;
        self.client
    }
}

async fn release<C: DirectoryClient>(client: &mut C, url: &str) {
    if let Err(e) = client.close().await {
        warn!(url = %url, error = %e, "Error while closing directory connection");
    }
}
