//! Heuristic failure classification for log enrichment.
//!
//! The categories drive troubleshooting hints in the log narrative only;
//! they never change the stored result.

/// Closed set of failure causes recognized from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ConnectionRefused,
    Timeout,
    WebSocket,
    Other,
}

impl FailureKind {
    /// Classify an error message. Categories are mutually exclusive and
    /// checked in order: refused, then timeout, then websocket.
    pub fn from_message(message: &str) -> Self {
        let msg = message.to_lowercase();
        if msg.contains("econnrefused") || msg.contains("connection refused") {
            Self::ConnectionRefused
        } else if msg.contains("timeout") {
            Self::Timeout
        } else if msg.contains("websocket") {
            Self::WebSocket
        } else {
            Self::Other
        }
    }

    /// Troubleshooting hints for this failure category.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            Self::ConnectionRefused => &[
                "check that the browser service is running",
                "verify both services share the same private network",
                "check the browser service logs for errors",
            ],
            Self::Timeout => &[
                "the browser service might be overloaded",
                "increase the timeout value",
                "check the browser service memory allocation (2GB minimum)",
                "check the browser service logs for errors",
            ],
            Self::WebSocket => &[
                "verify the WebSocket endpoint URL is correct",
                "check that the auth token is included in the URL",
                "ensure the browser service exposes the correct port",
            ],
            Self::Other => &[],
        }
    }
}
