/// Service identity reported by the hello endpoint and the API docs
pub const SERVICE_NAME: &str = "Appointment Sync API";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Version string the mock upstream reports in its envelope
pub const MOCK_API_VERSION: &str = "2.1";

// Routes
pub const MOCK_SLOTS_PATH: &str = "/mock-external-api/slots";
pub const AVAILABLE_SLOTS_PATH: &str = "/api/available-slots";
pub const API_DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

// Pagination
pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

// Defaults for configuration
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];
pub const DEFAULT_MOCK_USERNAME: &str = "admin@example.com";
pub const DEFAULT_MOCK_PASSWORD: &str = "admin123";
pub const DEFAULT_APPOINTMENTS_PATH: &str = "data/appointments.json";
pub const DEFAULT_OPENAPI_PATH: &str = "docs/openapi.json";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const CORS_MAX_AGE_SECS: u64 = 86_400;

/// Length of every emulated appointment slot
pub const SLOT_DURATION_MINUTES: u32 = 30;
