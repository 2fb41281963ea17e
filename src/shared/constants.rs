/// Default number of rows on the authority dashboard
pub const DEFAULT_AUTHORITY_LIST_LIMIT: i64 = 20;

/// Maximum number of rows a single list request may return
pub const MAX_LIST_LIMIT: i64 = 100;

/// Storage folder for evidence objects (below the public prefix)
pub const EVIDENCE_STORAGE_PURPOSE: &str = "violations";

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Global admin - implies every other role
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Traffic authority - reviews violations and records status changes
pub const ROLE_AUTHORITY: &str = "authority";
