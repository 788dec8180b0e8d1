use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// 运行环境（对应 NODE_ENV）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Only the literal `production` selects production mode, everything else
    /// (including `test`) behaves as development.
    pub fn from_node_env(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Environment variable prefix for structured overrides, e.g. `IMPERIAL__SERVER__PORT`
pub const ENV_PREFIX: &str = "IMPERIAL";

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：旧版环境变量 > IMPERIAL__* > config.toml > 默认值
    pub fn load_from(path: &str) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &str) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment as EnvSource, File};

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                EnvSource::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            // 兼容前端项目使用的环境变量名
            .set_override_option("auth.password_hash", non_empty_env("ADMIN_PASSWORD_HASH"))?
            .set_override_option("auth.jwt_secret", non_empty_env("JWT_SECRET"))?
            .set_override_option("site.base_url", non_empty_env("NEXT_PUBLIC_BASE_URL"))?
            .set_override_option(
                "environment",
                non_empty_env("NODE_ENV").map(|v| Environment::from_node_env(&v).to_string()),
            )?;

        builder.build()?.try_deserialize::<StaticConfig>()
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public origin of the site, used in robots.txt and the sitemap
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            pages: default_pages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Argon2 hash of the admin password
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,
    #[serde(default = "default_failure_delay_ms")]
    pub failure_delay_ms: u64,
    /// Accepted only in development when no hash is configured
    #[serde(default = "default_dev_password")]
    pub dev_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_hash: None,
            jwt_secret: None,
            token_ttl_minutes: default_token_ttl_minutes(),
            failure_delay_ms: default_failure_delay_ms(),
            dev_password: default_dev_password(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendKind,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_max_events")]
    pub max_events: usize,
    #[serde(default = "default_days")]
    pub default_days: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_events: default_max_events(),
            default_days: default_days(),
            max_days: default_max_days(),
        }
    }
}

/// 商店模拟的内存上限，超出时淘汰最旧的购物车/订单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default = "default_max_carts")]
    pub max_carts: usize,
    #[serde(default = "default_max_orders")]
    pub max_orders: usize,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            max_carts: default_max_carts(),
            max_orders: default_max_orders(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: default_log_format(),
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_pages() -> Vec<String> {
    ["/", "/#about", "/#skills", "/#projects", "/#contact"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_token_ttl_minutes() -> u64 {
    120
}

fn default_failure_delay_ms() -> u64 {
    1000
}

fn default_dev_password() -> String {
    "darth2024".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_max_events() -> usize {
    10_000
}

fn default_days() -> u32 {
    7
}

fn default_max_days() -> u32 {
    365
}

fn default_max_carts() -> usize {
    5_000
}

fn default_max_orders() -> usize {
    10_000
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_node_env() {
        assert_eq!(Environment::from_node_env("production"), Environment::Production);
        assert_eq!(Environment::from_node_env(" Production "), Environment::Production);
        assert_eq!(Environment::from_node_env("development"), Environment::Development);
        assert_eq!(Environment::from_node_env("test"), Environment::Development);
    }

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.auth.token_ttl_minutes, 120);
        assert_eq!(config.auth.failure_delay_ms, 1000);
        assert_eq!(config.storage.backend, StorageBackendKind::File);
        assert_eq!(config.shop.max_carts, 5_000);
        assert_eq!(config.shop.max_orders, 10_000);
        assert!(!config.environment.is_production());
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[server]"));
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config should parse");
        assert_eq!(parsed.server.port, 8080);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.toml");
        std::fs::write(
            &path,
            "environment = \"production\"\n[server]\nport = 9123\n[storage]\nbackend = \"memory\"\n",
        )
        .unwrap();

        let config = StaticConfig::try_load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9123);
        assert_eq!(config.storage.backend, StorageBackendKind::Memory);
    }
}
