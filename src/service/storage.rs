//! 结果落盘：把最终代理集合一行一条写进文本文件。

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use crate::model::Proxy;

/// 最终结果的持久化接口。
///
/// 目前只有文本文件一种介质，留出 trait 是让调用方不必关心落地方式。
#[async_trait]
pub trait ProxyStore: Send + Sync {
    /// 整体写入代理列表，一行一条规范化字符串。
    async fn save(&self, proxies: &[Proxy]) -> Result<()>;
}

/// 写本地文本文件的实现。
pub struct FileStore {
    path: String,
}

impl FileStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProxyStore for FileStore {
    async fn save(&self, proxies: &[Proxy]) -> Result<()> {
        let file = File::create(&self.path).await?;
        let mut writer = BufWriter::new(file);
        for proxy in proxies {
            writer.write_all(proxy.to_string().as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;

        info!("已写入 {} 条代理到 {}", proxies.len(), self.path);
        Ok(())
    }
}
