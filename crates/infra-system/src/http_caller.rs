// Outbound HTTP caller (reqwest)
use async_trait::async_trait;
use relayq_core::port::url_caller::{CallResponse, TransportError, UrlCaller};
use tracing::debug;

/// Issues a plain GET per attempt over one shared connection pool
///
/// No custom headers and no timeout beyond the client defaults. The
/// response body is never read; dropping the response releases the
/// connection.
#[derive(Clone, Default)]
pub struct HttpUrlCaller {
    client: reqwest::Client,
}

impl HttpUrlCaller {
    pub fn new() -> Self {
        Self::default()
    }

    fn classify(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl UrlCaller for HttpUrlCaller {
    async fn call(&self, url: &str) -> Result<CallResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(Self::classify)?;
        let status = response.status();
        debug!(url = %url, status = %status, "Received response");
        drop(response);

        Ok(CallResponse {
            status: status.as_u16(),
        })
    }
}
