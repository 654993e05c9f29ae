use pdfops_auth::{Credentials, ServiceTokenAuthenticator};
use pdfops_config::ClientConfig;
use pdfops_http::ServiceClient;
use pdfops_types::{Result, TokenProvider};
use std::sync::Arc;

/// Everything an operation needs to reach the service.
///
/// Cheap to clone. Operations running concurrently on one context share the
/// authenticator, so they also share a single token refresh.
#[derive(Clone)]
pub struct ExecutionContext {
    credentials: Arc<Credentials>,
    auth: Arc<ServiceTokenAuthenticator>,
    client: ServiceClient,
}

impl ExecutionContext {
    /// # Errors
    ///
    /// Returns [`pdfops_types::PdfOpsError::Config`] if the HTTP client cannot
    /// be built from `config`.
    pub fn create(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = ServiceClient::build_http(&config)?;
        let credentials = Arc::new(credentials);
        let auth = Arc::new(ServiceTokenAuthenticator::new(
            Arc::clone(&credentials),
            http.clone(),
            config.app_info.clone(),
        ));
        let provider: Arc<dyn TokenProvider> = auth.clone();
        let client = ServiceClient::with_http(http, provider, config);
        tracing::debug!(
            client_id = %credentials.client_id(),
            api = %credentials.api_base_uri(),
            "execution context created"
        );
        Ok(Self {
            credentials,
            auth,
            client,
        })
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn authenticator(&self) -> &Arc<ServiceTokenAuthenticator> {
        &self.auth
    }

    #[must_use]
    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    pub(crate) fn base_uri(&self) -> &str {
        self.credentials.api_base_uri()
    }
}
