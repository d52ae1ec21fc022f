mod common;
mod fetcher;
mod model;
mod service;

use tracing::{error, info};

use crate::common::error::CollectError;
use crate::common::log::init_logging;
use crate::model::APP_CONFIG;
use crate::service::aggregator;
use crate::service::storage::{FileStore, ProxyStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 必须是程序第一个调用！
    init_logging().expect("Failed to initialize logging");

    info!("========== [代理采集阶段] ==========");
    info!("🚀 开始抓取，共 {} 个源", fetcher::sources::ALL.len());

    let proxies = match aggregator::collect_all(fetcher::sources::ALL).await {
        Ok(list) => list,
        Err(e @ CollectError::Empty) => {
            error!("❌ 一条可用代理都没收集到（所有源失败或全被过滤）");
            return Err(e.into());
        }
        Err(e) => {
            error!("❌ 采集失败：{}", e);
            return Err(e.into());
        }
    };

    info!("========== [结果落盘阶段] ==========");
    let store = FileStore::new(APP_CONFIG.output.file.clone());
    if let Err(e) = store.save(&proxies).await {
        error!("❌ 写入 {} 失败：{}", APP_CONFIG.output.file, e);
        return Err(e);
    }

    info!("========== [采集完成 ✅] ==========");
    info!("✅ 共收集 {} 条代理，已保存到 {}", proxies.len(), APP_CONFIG.output.file);
    Ok(())
}
