use crate::wire::{Validate, non_empty, wire_enum};
use pdfops_types::Result;
use serde::Serialize;
use std::fmt;

wire_enum! {
    pub enum EncryptionAlgorithm {
        Aes128 => "AES_128",
        Aes256 => "AES_256",
    }
}

wire_enum! {
    /// Which parts of the document the encryption covers.
    pub enum ContentEncryption {
        AllContent => "ALL_CONTENT",
        /// Leaves metadata readable for search indexing. Requires AES-256.
        AllContentExceptMetadata => "ALL_CONTENT_EXCEPT_METADATA",
    }
}

wire_enum! {
    /// Actions granted to holders of the user password.
    pub enum Permission {
        PrintLowQuality => "PRINT_LOW_QUALITY",
        PrintHighQuality => "PRINT_HIGH_QUALITY",
        EditContent => "EDIT_CONTENT",
        EditDocumentAssembly => "EDIT_DOCUMENT_ASSEMBLY",
        EditAnnotations => "EDIT_ANNOTATIONS",
        EditFillAndSignFormFields => "EDIT_FILL_AND_SIGN_FORM_FIELDS",
        CopyContent => "COPY_CONTENT",
    }
}

/// An insertion-ordered set of [`Permission`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Permissions(Vec<Permission>);

impl Permissions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a permission; duplicates are ignored.
    pub fn add(&mut self, permission: Permission) {
        if !self.0.contains(&permission) {
            self.0.push(permission);
        }
    }

    #[must_use]
    pub fn with(mut self, permission: Permission) -> Self {
        self.add(permission);
        self
    }

    #[must_use]
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = Self::new();
        for p in iter {
            set.add(p);
        }
        set
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordProtection {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_password: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProtectOptions {
    password_protection: PasswordProtection,
    #[serde(skip_serializing_if = "Option::is_none")]
    encryption_algorithm: Option<EncryptionAlgorithm>,
    #[serde(rename = "contentToEncrypt", skip_serializing_if = "Option::is_none")]
    content_encryption: Option<ContentEncryption>,
    #[serde(skip_serializing_if = "Permissions::is_empty")]
    permissions: Permissions,
}

impl fmt::Debug for PasswordProtectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |p: &Option<String>| p.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("PasswordProtectOptions")
            .field("user_password", &redact(&self.password_protection.user_password))
            .field("owner_password", &redact(&self.password_protection.owner_password))
            .field("encryption_algorithm", &self.encryption_algorithm)
            .field("content_encryption", &self.content_encryption)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl PasswordProtectOptions {
    #[must_use]
    pub fn builder() -> PasswordProtectOptionsBuilder {
        PasswordProtectOptionsBuilder::default()
    }

    #[must_use]
    pub fn user_password(&self) -> Option<&str> {
        self.password_protection.user_password.as_deref()
    }

    #[must_use]
    pub fn owner_password(&self) -> Option<&str> {
        self.password_protection.owner_password.as_deref()
    }

    #[must_use]
    pub fn encryption_algorithm(&self) -> Option<EncryptionAlgorithm> {
        self.encryption_algorithm
    }

    #[must_use]
    pub fn content_encryption(&self) -> Option<ContentEncryption> {
        self.content_encryption
    }

    #[must_use]
    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }
}

impl Validate for PasswordProtectOptions {
    fn violations(&self) -> Vec<String> {
        let mut v = Vec::new();
        if self.encryption_algorithm.is_none() {
            v.push("encryption algorithm cannot be null or empty".to_string());
        }
        if self.user_password().is_none() && self.owner_password().is_none() {
            v.push("either a user password or an owner password must be set".to_string());
        }
        if !self.permissions.is_empty() && self.owner_password().is_none() {
            v.push("permissions require an owner password".to_string());
        }
        if self.encryption_algorithm == Some(EncryptionAlgorithm::Aes128)
            && self.content_encryption == Some(ContentEncryption::AllContentExceptMetadata)
        {
            v.push("AES_128 cannot encrypt all content except metadata".to_string());
        }
        v
    }
}

#[derive(Default)]
pub struct PasswordProtectOptionsBuilder {
    user_password: Option<String>,
    owner_password: Option<String>,
    encryption_algorithm: Option<EncryptionAlgorithm>,
    content_encryption: Option<ContentEncryption>,
    permissions: Permissions,
}

impl PasswordProtectOptionsBuilder {
    /// # Errors
    ///
    /// Returns a validation error if `password` is empty.
    pub fn user_password(mut self, password: impl Into<String>) -> Result<Self> {
        self.user_password = Some(non_empty("user password", password)?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns a validation error if `password` is empty.
    pub fn owner_password(mut self, password: impl Into<String>) -> Result<Self> {
        self.owner_password = Some(non_empty("owner password", password)?);
        Ok(self)
    }

    #[must_use]
    pub fn encryption_algorithm(mut self, algorithm: EncryptionAlgorithm) -> Self {
        self.encryption_algorithm = Some(algorithm);
        self
    }

    #[must_use]
    pub fn content_encryption(mut self, content: ContentEncryption) -> Self {
        self.content_encryption = Some(content);
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    #[must_use]
    pub fn build(self) -> PasswordProtectOptions {
        PasswordProtectOptions {
            password_protection: PasswordProtection {
                user_password: self.user_password,
                owner_password: self.owner_password,
            },
            encryption_algorithm: self.encryption_algorithm,
            content_encryption: self.content_encryption,
            permissions: self.permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfops_types::PdfOpsError;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let permissions = Permissions::new()
            .with(Permission::PrintHighQuality)
            .with(Permission::EditAnnotations);
        let opts = PasswordProtectOptions::builder()
            .user_password("user-pw")
            .unwrap()
            .owner_password("owner-pw")
            .unwrap()
            .encryption_algorithm(EncryptionAlgorithm::Aes128)
            .content_encryption(ContentEncryption::AllContent)
            .permissions(permissions.clone())
            .build();

        assert_eq!(opts.user_password(), Some("user-pw"));
        assert_eq!(opts.owner_password(), Some("owner-pw"));
        assert_eq!(opts.encryption_algorithm(), Some(EncryptionAlgorithm::Aes128));
        assert_eq!(opts.content_encryption(), Some(ContentEncryption::AllContent));
        assert_eq!(opts.permissions(), &permissions);
        assert!(opts.permissions().contains(Permission::EditAnnotations));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_payload() {
        let opts = PasswordProtectOptions::builder()
            .owner_password("owner")
            .unwrap()
            .encryption_algorithm(EncryptionAlgorithm::Aes256)
            .content_encryption(ContentEncryption::AllContentExceptMetadata)
            .permissions(
                Permissions::new()
                    .with(Permission::PrintLowQuality)
                    .with(Permission::CopyContent)
                    .with(Permission::PrintLowQuality),
            )
            .build();
        assert!(opts.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({
                "passwordProtection": {"ownerPassword": "owner"},
                "encryptionAlgorithm": "AES_256",
                "contentToEncrypt": "ALL_CONTENT_EXCEPT_METADATA",
                "permissions": ["PRINT_LOW_QUALITY", "COPY_CONTENT"],
            })
        );
    }

    #[test]
    fn test_empty_builder_lists_every_violation() {
        let err = PasswordProtectOptions::builder().build().validate().unwrap_err();
        match err {
            PdfOpsError::Validation(msgs) => {
                assert_eq!(msgs.len(), 2);
                assert!(msgs[0].contains("encryption algorithm"));
                assert!(msgs[1].contains("password"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_permissions_need_owner_password() {
        let opts = PasswordProtectOptions::builder()
            .user_password("user")
            .unwrap()
            .encryption_algorithm(EncryptionAlgorithm::Aes256)
            .permissions(Permissions::new().with(Permission::EditContent))
            .build();
        let msgs = opts.violations();
        assert_eq!(msgs, vec!["permissions require an owner password".to_string()]);
    }

    #[test]
    fn test_aes128_cannot_skip_metadata() {
        let opts = PasswordProtectOptions::builder()
            .user_password("user")
            .unwrap()
            .encryption_algorithm(EncryptionAlgorithm::Aes128)
            .content_encryption(ContentEncryption::AllContentExceptMetadata)
            .build();
        assert_eq!(opts.violations().len(), 1);
    }

    #[test]
    fn test_empty_password_rejected_eagerly() {
        assert!(PasswordProtectOptions::builder().user_password("").is_err());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let opts = PasswordProtectOptions::builder()
            .user_password("hunter2")
            .unwrap()
            .build();
        let dbg = format!("{opts:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
