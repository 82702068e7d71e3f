//! Configuration management for sdkup.
//!
//! A single optional TOML file ([`SdkConfig`]) describes where the SDK is
//! published and how an installation is laid out. The CLI layers its flags
//! on top; nothing reads configuration from ambient state after startup.

mod global;

pub use global::SdkConfig;
