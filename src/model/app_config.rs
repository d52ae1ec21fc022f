use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub static APP_CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().expect("Failed to load configuration"));

#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    pub log: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FetchConfig {
    /// 单个请求的超时时间（秒）。
    pub timeout: u64,
    /// 整轮采集的总时限（秒），到点后在途请求一律视为该源失败。
    pub deadline: u64,
    /// 并发抓取的信号量上限。
    pub semaphore: usize,
    /// 请求头里带的 UA 标识。
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    pub file: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub console_levels: Vec<String>,
}


impl AppConfig {
    fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Config"))
            .build()?;
        let config = config.try_deserialize()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config() {
        assert!(APP_CONFIG.fetch.timeout <= APP_CONFIG.fetch.deadline);
        assert!(APP_CONFIG.fetch.semaphore > 0);
    }
}
