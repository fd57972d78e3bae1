use std::path::PathBuf;

use chrono::NaiveDate;
use config::{Config, ConfigError};
use serde::Deserialize;

use crate::domain::core::Currency;

pub mod domain;
pub mod infrastructure;

#[derive(Clone, Debug, Deserialize)]
pub struct InnkeepConfig {
    pub logger: Logger,
    pub data: Data,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl InnkeepConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("innkeep.toml"))
            .add_source(config::Environment::with_prefix("INNKEEP").separator("_"))
            .build()?
            .try_deserialize::<InnkeepConfig>()
    }
}

/// エクスポートされたJSONファイルの場所
#[derive(Clone, Debug, Deserialize)]
pub struct Data {
    pub rooms: PathBuf,
    pub reservations: PathBuf,
    pub customers: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub currency: Currency,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportConfig {
    /// 基準日。未指定ならローカル日付
    pub today: Option<NaiveDate>,
    /// 空室照会する宿泊期間
    pub candidate: Option<Candidate>,
    /// 宿泊履歴を表示するお客様のメールアドレス
    pub customer_email: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Candidate {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}
