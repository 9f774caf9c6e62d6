use anyhow::{Context, Result, bail};
use platform_db::DatabaseSettings;
use products_hr::{
    PageSettings,
    pagination::{DEFAULT_NAVIGATE_PAGES, DEFAULT_PAGE_SIZE},
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub pages: PageSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database = DatabaseSettings::from_env();

        let page_size = env_positive("EMPLOYEE_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let navigate_pages = env_positive("EMPLOYEE_NAVIGATE_PAGES", DEFAULT_NAVIGATE_PAGES)?;

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        Ok(Self {
            database,
            pages: PageSettings::new(page_size, navigate_pages),
            cors_allowed_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_positive(key: &str, default: u64) -> Result<u64> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    let value: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer"))?;
    if value == 0 {
        bail!("{key} must be at least 1");
    }
    Ok(value)
}
