//! Header names and problem kinds shared across the HTTP layer.

/// Header carrying the admin shared secret on mutating routes.
pub(crate) const HEADER_ADMIN_TOKEN: &str = "x-admin-token";
/// Header carrying the request correlation id.
pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_BAD_REQUEST: &str = "bad_request";
pub(crate) const PROBLEM_INTERNAL: &str = "internal_error";
pub(crate) const PROBLEM_NOT_FOUND: &str = "not_found";
pub(crate) const PROBLEM_UNAUTHORIZED: &str = "unauthorized";
pub(crate) const PROBLEM_UPSTREAM: &str = "upstream_error";
pub(crate) const PROBLEM_VALIDATION: &str = "validation_error";
