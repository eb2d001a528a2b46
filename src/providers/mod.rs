// Providers layer - Work performers
//
// Providers perform the actual work (hashing, code allocation, file intake,
// notification delivery, employee matching) that coordinators orchestrate.

pub mod credential_provider;
pub mod crypto_provider;
pub mod document_provider;
pub mod employee_resolver;
pub mod identifier_provider;
pub mod notification_provider;
pub mod token_provider;

pub use credential_provider::{CredentialProvider, IssuedCredential};
pub use crypto_provider::CryptoProvider;
pub use document_provider::DocumentProvider;
pub use employee_resolver::EmployeeResolver;
pub use identifier_provider::{CodeAllocator, IdentifierProvider};
pub use notification_provider::{
    HttpNotificationSender, LogNotificationSender, NotificationResult, NotificationSender, NotificationTemplate,
};
pub use token_provider::TokenProvider;
