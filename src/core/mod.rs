//! Core types shared by every part of sdkup.
//!
//! At the moment this is the error taxonomy ([`SdkError`]) and its
//! terminal-friendly rendering ([`ErrorContext`], [`user_friendly_error`]).

pub mod error;

pub use error::{ErrorContext, SdkError, user_friendly_error};
