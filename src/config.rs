use crate::error::{QueryError, Result};

/// Engine-level defaults applied before any per-call parameters.
///
/// The timezone is used when casting timestamp columns for date predicates;
/// date-only columns are never timezone-converted.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub timezone: String,
    pub default_page: i64,
    pub default_page_size: i64,
    pub default_order_by: String,
    pub default_order_direction: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Bogota".to_string(),
            default_page: 1,
            default_page_size: 10,
            default_order_by: "id".to_string(),
            default_order_direction: "ASC".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(timezone) = std::env::var("DYNAQUERY_TIMEZONE") {
            config.timezone = timezone;
        }

        if let Ok(page_size) = std::env::var("DYNAQUERY_DEFAULT_PAGE_SIZE") {
            config.default_page_size = page_size.parse().map_err(|e| {
                QueryError::Configuration(format!("Invalid default_page_size: {e}"))
            })?;
        }

        if let Ok(order_by) = std::env::var("DYNAQUERY_DEFAULT_ORDER_BY") {
            config.default_order_by = order_by;
        }

        if let Ok(direction) = std::env::var("DYNAQUERY_DEFAULT_ORDER_DIRECTION") {
            config.default_order_direction = direction;
        }

        Ok(config)
    }
}
