//! # divvy-service: Collaborators Around the Split Engine
//!
//! Everything Divvy does that touches the outside world lives here, kept
//! away from the pure calculation in `divvy-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ★ divvy-service (THIS CRATE) ★                      │
//! │                                                                         │
//! │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────────────┐  │
//! │   │   auth    │  │  limiter  │  │  upload   │  │      receipt      │  │
//! │   │JwtManager │  │  sliding  │  │  magic-   │  │  model JSON ───►  │  │
//! │   │OAuth ports│  │  windows  │  │  byte     │  │  cents, items     │  │
//! │   │           │  │  per key  │  │  sniffing │  │                   │  │
//! │   └───────────┘  └───────────┘  └───────────┘  └───────────────────┘  │
//! │                                                                         │
//! │   The HTTP framework and the database live in the host application;    │
//! │   this crate hands it ready-made pieces wired to divvy-core.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - OAuth verification ports and JWT issuance
//! - [`limiter`] - Sliding-window request budgets
//! - [`upload`] - Receipt image validation
//! - [`receipt`] - Vision-model output parsing into cents
//! - [`config`] - Environment-driven configuration
//! - [`error`] - The service error funnel

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod config;
pub mod error;
pub mod limiter;
pub mod receipt;
pub mod upload;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{
    authenticate, extract_bearer_token, AuthResponse, Claims, IdentityVerifier, JwtManager,
    UserDirectory, UserProfile, VerifiedIdentity,
};
pub use config::{ConfigError, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use limiter::{ip_key, user_key, RateLimitPolicy, SlidingWindowLimiter};
pub use receipt::{
    extract_receipt, parse_extraction, ExtractedItem, ExtractedReceipt, ExtractionError,
    ReceiptImage, ReceiptModel,
};
pub use upload::{
    detect_image_format, validate_receipt_image, ImageFormat, UploadError, MAX_UPLOAD_BYTES,
};

// =============================================================================
// Telemetry
// =============================================================================

/// Install the default tracing subscriber for hosts embedding this crate.
///
/// Respects `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
