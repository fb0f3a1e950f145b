//! # Response Envelope
//!
//! Every JSON response is wrapped as `{"status", "message", "data"}`. The
//! HTTP status is always 200; clients read the outcome from `status`.

use serde::{Deserialize, Serialize};

/// The request succeeded.
pub const STATUS_OK: u16 = 200;

/// The request was understood but rejected: bad upload, unknown artifact.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// The server failed while handling the request.
pub const STATUS_SERVER_ERROR: u16 = 500;

/// JSON body shared by all routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T = ()> {
  pub status: u16,
  pub message: String,
  pub data: Option<T>,
}

impl<T> Envelope<T> {
  /// Success carrying `data`.
  pub fn ok(data: T) -> Self {
    Self {
      status: STATUS_OK,
      message: "OK".to_string(),
      data: Some(data),
    }
  }
}

impl Envelope {
  /// Success without a payload.
  pub fn ok_empty() -> Self {
    Self {
      status: STATUS_OK,
      message: "OK".to_string(),
      data: None,
    }
  }

  /// Failure with `status` and a human readable `message`.
  pub fn fail(status: u16, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
      data: None,
    }
  }
}
