#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub influence_floor: f64,
    pub decay_scale: f64,
    pub min_review_rating: f64,
    pub max_review_rating: f64,
    pub progress_every: usize,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            influence_floor: 0.3,
            decay_scale: 10.0, // admin and users weigh the same at this many reviews
            min_review_rating: 1.0,
            max_review_rating: 10.0,
            progress_every: 25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "content_ratings.db".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerSettings {
    /// Bearer token for the admin routes. Admin routes reject everything when unset.
    pub admin_token: Option<String>,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self {
            admin_token: std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub storage: StorageSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            storage: StorageSettings::default(),
            server: ServerSettings::from_env(),
        }
    }
}
