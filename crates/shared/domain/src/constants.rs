//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum name length requirement (usernames, category and product names)
pub const MIN_NAME_LENGTH: usize = 1;

/// Fractional digits a stored price may carry (matches the `NUMERIC(12, 2)` column)
pub const PRICE_SCALE: u32 = 2;

/// Largest storable price, in hundredths
pub const MAX_PRICE_CENTS: i64 = 999_999_999_999;

// =============================================================================
// Paging
// =============================================================================

/// Default number of records skipped by list operations
pub const DEFAULT_PAGE_OFFSET: u64 = 0;

/// Default number of records returned by list operations
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Upper bound on a single page
pub const MAX_PAGE_LIMIT: u64 = 1000;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_TOKEN_EXPIRATION_MINUTES: i64 = 30;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per minute (for token expiration calculation)
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Token type reported to clients after login
pub const TOKEN_TYPE_BEARER: &str = "bearer";
