// src/constants.rs
//
// Application-wide constants. Each one documents where it is used.

/// Base URL of the public NoteHub service.
///
/// Can be overridden by the `api_url` config key or `NOTEHUB_API_URL`.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_API_URL: &str = "https://notehub-public.goit.study/api";

/// Environment variable holding the bearer token. Required at startup.
///
/// Used in: `infrastructure/config.rs`
pub const TOKEN_ENV_VAR: &str = "NOTEHUB_TOKEN";

/// Environment variable overriding the base URL.
///
/// Used in: `infrastructure/config.rs`
pub const API_URL_ENV_VAR: &str = "NOTEHUB_API_URL";

/// Notes per list page. Fixed; part of every query key.
///
/// Used in: `domain/query.rs`
pub const PAGE_SIZE: u32 = 12;

/// Quiet period before a typed search term is considered settled.
///
/// Used in: `infrastructure/config.rs`, `util/debounce.rs`
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// How long a fetched page counts as fresh and is served without refetching.
///
/// Used in: `infrastructure/config.rs`, `application/query_cache.rs`
pub const STALE_TIME_SECS: u64 = 30;

/// Per-request timeout for the HTTP client.
///
/// Used in: `infrastructure/config.rs`
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Title length bounds, in characters.
///
/// Used in: `domain/validation.rs`
pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;

/// Content length limit, in characters.
///
/// Used in: `domain/validation.rs`
pub const CONTENT_MAX_CHARS: usize = 500;

/// Pagination window: pages always shown at each end, and around the current page.
///
/// Used in: `ports/pagination.rs`
pub const PAGINATION_MARGIN_PAGES: u32 = 1;
pub const PAGINATION_RANGE_PAGES: u32 = 2;
