//! Credential variants accepted by the identity service.

use pdfops_config::{CredentialsFile, DEFAULT_API_BASE_URI, DEFAULT_IMS_URI};
use pdfops_types::{PdfOpsError, Result};
use secrecy::{ExposeSecret as _, SecretString};
use std::path::Path;

/// How the long-lived credentials are exchanged for a session token.
#[derive(Debug)]
pub enum Grant {
    /// `grant_type=authorization_code` with a pre-issued auth code.
    AuthorizationCode { code: SecretString },
    /// `grant_type=client_credentials` (server-to-server).
    ClientCredentials { scopes: Option<String> },
}

/// Long-lived credentials plus the endpoints they are valid for.
///
/// Immutable once constructed; share it behind an `Arc`.
#[derive(Debug)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
    grant: Grant,
    ims_uri: String,
    api_base_uri: String,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PdfOpsError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

impl Credentials {
    /// Authorization-code credentials against the default endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if any argument is empty.
    pub fn auth_code(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        auth_code: impl Into<String>,
    ) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        let auth_code = auth_code.into();
        let mut errors = Vec::new();
        for (field, value) in [
            ("client_id", &client_id),
            ("client_secret", &client_secret),
            ("auth_code", &auth_code),
        ] {
            if let Err(PdfOpsError::Validation(mut msgs)) = require(field, value) {
                errors.append(&mut msgs);
            }
        }
        if !errors.is_empty() {
            return Err(PdfOpsError::Validation(errors));
        }
        Ok(Self {
            client_id,
            client_secret: SecretString::from(client_secret),
            grant: Grant::AuthorizationCode {
                code: SecretString::from(auth_code),
            },
            ims_uri: DEFAULT_IMS_URI.to_string(),
            api_base_uri: DEFAULT_API_BASE_URI.to_string(),
        })
    }

    /// Client-credentials (server-to-server) credentials against the default endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if any argument is empty.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        require("client_id", &client_id)?;
        require("client_secret", &client_secret)?;
        Ok(Self {
            client_id,
            client_secret: SecretString::from(client_secret),
            grant: Grant::ClientCredentials { scopes: None },
            ims_uri: DEFAULT_IMS_URI.to_string(),
            api_base_uri: DEFAULT_API_BASE_URI.to_string(),
        })
    }

    /// Builds credentials from a parsed [`CredentialsFile`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if a required field is empty.
    pub fn from_credentials_file(file: CredentialsFile) -> Result<Self> {
        let creds = match file.auth_code {
            Some(code) => Self::auth_code(file.client_id, file.client_secret, code)?,
            None => {
                let mut c = Self::client_credentials(file.client_id, file.client_secret)?;
                c.grant = Grant::ClientCredentials {
                    scopes: file.scopes,
                };
                c
            }
        };
        creds
            .with_ims_uri(file.ims_uri)?
            .with_api_base_uri(file.api_base_uri)
    }

    /// Loads credentials from a JSON file (see [`CredentialsFile`]).
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Config`] if the file cannot be read or parsed,
    /// or [`PdfOpsError::Validation`] if a field is empty.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = CredentialsFile::from_file(path).map_err(|e| {
            PdfOpsError::Config(format!(
                "failed to load credentials from {}: {e}",
                path.display()
            ))
        })?;
        Self::from_credentials_file(file)
    }

    /// Overrides the identity-service token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if `uri` is empty.
    pub fn with_ims_uri(mut self, uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        require("ims_uri", &uri)?;
        self.ims_uri = uri;
        Ok(self)
    }

    /// Overrides the operation API base URI.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if `uri` is empty.
    pub fn with_api_base_uri(mut self, uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        require("api_base_uri", &uri)?;
        self.api_base_uri = uri.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Requests the given scopes; only meaningful for client-credentials grants.
    #[must_use]
    pub fn with_scopes(mut self, scopes: impl Into<String>) -> Self {
        if let Grant::ClientCredentials { scopes: s } = &mut self.grant {
            *s = Some(scopes.into());
        }
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn grant(&self) -> &Grant {
        &self.grant
    }

    #[must_use]
    pub fn ims_uri(&self) -> &str {
        &self.ims_uri
    }

    #[must_use]
    pub fn api_base_uri(&self) -> &str {
        &self.api_base_uri
    }

    /// Url-encoded token exchange body.
    pub(crate) fn token_request_body(&self) -> Result<String> {
        let secret = self.client_secret.expose_secret();
        let params: Vec<(&str, &str)> = match &self.grant {
            Grant::AuthorizationCode { code } => vec![
                ("grant_type", "authorization_code"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", secret),
                ("code", code.expose_secret()),
            ],
            Grant::ClientCredentials { scopes } => {
                let mut p = vec![
                    ("grant_type", "client_credentials"),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", secret),
                ];
                if let Some(scope) = scopes {
                    p.push(("scope", scope.as_str()));
                }
                p
            }
        };
        serde_urlencoded::to_string(params).map_err(|e| PdfOpsError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_code_body_order() {
        let c = Credentials::auth_code("cid", "secret", "code123").unwrap();
        assert_eq!(
            c.token_request_body().unwrap(),
            "grant_type=authorization_code&client_id=cid&client_secret=secret&code=code123"
        );
    }

    #[test]
    fn test_body_is_url_encoded() {
        let c = Credentials::auth_code("cid", "s&cr=t", "c").unwrap();
        let body = c.token_request_body().unwrap();
        assert!(body.contains("client_secret=s%26cr%3Dt"));
    }

    #[test]
    fn test_client_credentials_body_with_scopes() {
        let c = Credentials::client_credentials("cid", "secret")
            .unwrap()
            .with_scopes("openid,AdobeID");
        let body = c.token_request_body().unwrap();
        assert!(body.starts_with("grant_type=client_credentials&client_id=cid"));
        assert!(body.contains("scope=openid%2CAdobeID"));
    }

    #[test]
    fn test_auth_code_reports_every_empty_field() {
        let err = Credentials::auth_code("", "", "").unwrap_err();
        match err {
            PdfOpsError::Validation(msgs) => assert_eq!(msgs.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_endpoints_and_overrides() {
        let c = Credentials::auth_code("cid", "s", "c").unwrap();
        assert_eq!(c.ims_uri(), DEFAULT_IMS_URI);
        let c = c
            .with_api_base_uri("http://127.0.0.1:9000/")
            .unwrap()
            .with_ims_uri("http://127.0.0.1:9000/ims/token")
            .unwrap();
        assert_eq!(c.api_base_uri(), "http://127.0.0.1:9000");
        assert_eq!(c.ims_uri(), "http://127.0.0.1:9000/ims/token");
    }

    #[test]
    fn test_empty_uri_rejected() {
        let c = Credentials::client_credentials("cid", "s").unwrap();
        assert!(matches!(
            c.with_ims_uri(" ").unwrap_err(),
            PdfOpsError::Validation(_)
        ));
    }

    #[test]
    fn test_from_file_selects_grant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(
            &path,
            r#"{"client_id":"cid","client_secret":"s","auth_code":"abc","api_base_uri":"https://api.test"}"#,
        )
        .unwrap();
        let c = Credentials::from_file(&path).unwrap();
        assert!(matches!(c.grant(), Grant::AuthorizationCode { .. }));
        assert_eq!(c.api_base_uri(), "https://api.test");

        std::fs::write(&path, r#"{"client_id":"cid","client_secret":"s","scopes":"openid"}"#)
            .unwrap();
        let c = Credentials::from_file(&path).unwrap();
        assert!(matches!(
            c.grant(),
            Grant::ClientCredentials { scopes: Some(s) } if s == "openid"
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Credentials::from_file(Path::new("/nonexistent/creds.json")).unwrap_err();
        assert!(matches!(err, PdfOpsError::Config(_)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let c = Credentials::auth_code("cid", "hunter2", "c0de").unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(!dbg.contains("c0de"));
    }
}
