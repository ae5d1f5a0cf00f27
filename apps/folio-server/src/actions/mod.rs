//! Action handlers
//!
//! One function per remote-callable action. Each runs the same sequence:
//! validate the input shape, require an authenticated caller, check ownership,
//! perform a single store operation, and wrap the result in an [`Envelope`].

pub mod annotations;
pub mod documents;
pub mod pages;

use serde::Serialize;

/// Uniform success response
///
/// Failures never produce an envelope; they travel as `AppError`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl Envelope<()> {
    /// Success with no payload
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}
