use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

/// Runtime configuration, read from the environment at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub cors_origin: String,
    pub media_dir: PathBuf,
    pub media_base_url: String,
    pub bcrypt_cost: u32,
    pub production: bool,
}

impl Config {
    pub fn load() -> Self {
        Self {
            redis_url: try_load("CHIRP_REDIS_URL", "redis://127.0.0.1:6379"),
            port: try_load("CHIRP_PORT", "8080"),
            jwt_secret: load_secret("CHIRP_JWT_SECRET"),
            cors_origin: try_load("CHIRP_CORS_ORIGIN", "http://localhost:5173"),
            media_dir: PathBuf::from(try_load::<String>("CHIRP_MEDIA_DIR", "media")),
            media_base_url: try_load("CHIRP_MEDIA_BASE_URL", "http://localhost:8080/media"),
            bcrypt_cost: try_load("CHIRP_BCRYPT_COST", "12"),
            production: try_load::<String>("CHIRP_ENV", "development") == "production",
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| ())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn load_secret(key: &str) -> String {
    var(key).unwrap_or_else(|_| {
        warn!("{key} not set, falling back to an insecure development secret");
        "insecure-dev-secret".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        // Runs without any CHIRP_* variables exported.
        let config = Config::load();
        assert_eq!(config.port, 8080);
        assert!(!config.production);
        assert_eq!(config.media_dir, PathBuf::from("media"));
    }
}
