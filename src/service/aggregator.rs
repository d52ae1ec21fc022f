//! # aggregator 模块
//!
//! 并发抓取全部源，规范化、去重、打乱，产出最终的代理集合。
//!
//! ## 工作方式
//!
//! - 每个源一个任务，信号量限流，整体受配置里的总时限约束；
//! - 所有任务把 [`FetchOutcome`] 投递到 mpsc 通道，唯一的收集端按完成
//!   顺序折叠进结果集，先见者保留，热路径上不需要任何锁；
//! - 源失败只影响它自己：跳过、记日志、不重试；
//! - 全部源处理完后若一条可用代理都没有，返回 [`CollectError::Empty`]，
//!   调用方必须把这种情况当作失败上报，而不是悄悄写个空文件。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::common::error::CollectError;
use crate::fetcher;
use crate::model::{APP_CONFIG, Proxy};
use crate::service::normalizer;

/// 单个源的抓取结果。经通道送进收集端，只消费一次，失败不重试。
struct FetchOutcome {
    url: String,
    lines: Result<Vec<String>, CollectError>,
}

/// 并发抓取所有源并汇总，返回打乱后的去重代理列表。
pub async fn collect_all(srcs: &[&str]) -> Result<Vec<Proxy>, CollectError> {
    let mut list = collect_dedup(srcs).await?;
    info!("🎲 汇总完成，共 {} 条，打乱顺序", list.len());
    shuffle(&mut list, &mut rand::rng());
    Ok(list)
}

/// 抓取与折叠：产出尚未打乱的首见序列。
async fn collect_dedup(srcs: &[&str]) -> Result<Vec<Proxy>, CollectError> {
    let client = fetcher::build_client()?;
    let deadline = Duration::from_secs(APP_CONFIG.fetch.deadline);
    let semaphore = Arc::new(Semaphore::new(APP_CONFIG.fetch.semaphore));
    let (tx, mut rx) = mpsc::channel::<FetchOutcome>(srcs.len().max(1));

    let handles: Vec<_> = srcs
        .iter()
        .map(|&u| {
            let client = client.clone();
            let url = u.to_string();
            let tx = tx.clone();
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();
                let lines = match timeout(deadline, fetcher::fetch_source(&client, &url)).await {
                    Ok(res) => res,
                    Err(elapsed) => Err(elapsed.into()),
                };
                // 收集端已退出时投递会失败，丢弃即可
                let _ = tx.send(FetchOutcome { url, lines }).await;
            })
        })
        .collect();
    drop(tx);

    // 唯一的写入端：按完成顺序折叠，键是规范化字符串，先见者保留
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<Proxy> = Vec::new();
    while let Some(outcome) = rx.recv().await {
        let lines = match outcome.lines {
            Ok(lines) => lines,
            Err(e) => {
                warn!("源 {} 抓取失败，跳过：{}", outcome.url, e);
                continue;
            }
        };
        let hint = fetcher::classify_source(&outcome.url);
        let total = lines.len();
        let mut kept = 0usize;
        for raw in &lines {
            if let Ok(proxy) = normalizer::normalize_line(raw, hint) {
                if seen.insert(proxy.key()) {
                    out.push(proxy);
                    kept += 1;
                }
            }
        }
        info!("源 {} 共 {} 行，收下 {} 条新代理", outcome.url, total, kept);
    }

    // 通道关闭说明所有生产者都投递完了，这里只为兜住任务本身
    futures::future::join_all(handles).await;

    if out.is_empty() {
        return Err(CollectError::Empty);
    }
    Ok(out)
}

/// 用注入的随机源就地打乱。生产走系统熵，测试可以用固定种子。
pub fn shuffle<R: Rng + ?Sized>(list: &mut [Proxy], rng: &mut R) {
    list.shuffle(rng);
}
