// ABOUTME: Signed URL generation module
// ABOUTME: Exposes the tamper-evident query-string signer for derived resources

pub mod signer;

pub use signer::{UrlSigner, SIGNATURE_PARAM};
