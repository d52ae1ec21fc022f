use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::common::error::CollectError;
use crate::model::{Protocol, APP_CONFIG};

/// 公开代理清单源，全部是按行排列的纯文本。
pub mod sources {
    pub const ALL: &[&str] = &[
        "https://raw.githubusercontent.com/TheSpeedX/SOCKS-List/master/socks5.txt",
        "https://raw.githubusercontent.com/TheSpeedX/SOCKS-List/master/socks4.txt",
        "https://raw.githubusercontent.com/TheSpeedX/SOCKS-List/master/http.txt",
        "https://cdn.jsdelivr.net/gh/proxifly/free-proxy-list@main/proxies/all/data.txt",
        "https://github.com/monosans/proxy-list/raw/refs/heads/main/proxies/all.txt",
        "https://github.com/mmpx12/proxy-list/raw/refs/heads/master/proxies.txt",
        "https://github.com/zloi-user/hideip.me/raw/refs/heads/master/http.txt",
        "https://github.com/zloi-user/hideip.me/raw/refs/heads/master/https.txt",
        "https://github.com/zloi-user/hideip.me/raw/refs/heads/master/socks4.txt",
        "https://github.com/zloi-user/hideip.me/raw/refs/heads/master/socks5.txt",
        "https://github.com/iplocate/free-proxy-list/raw/refs/heads/main/all-proxies.txt",
        "https://github.com/Zaeem20/FREE_PROXIES_LIST/raw/refs/heads/master/http.txt",
        "https://github.com/Zaeem20/FREE_PROXIES_LIST/raw/refs/heads/master/https.txt",
        "https://github.com/Zaeem20/FREE_PROXIES_LIST/raw/refs/heads/master/socks4.txt",
        "https://raw.githubusercontent.com/ALIILAPRO/Proxy/main/http.txt",
        "https://raw.githubusercontent.com/ALIILAPRO/Proxy/main/socks4.txt",
        "https://raw.githubusercontent.com/ALIILAPRO/Proxy/main/socks5.txt",
        "https://github.com/rdavydov/proxy-list/raw/refs/heads/main/proxies/http.txt",
        "https://github.com/rdavydov/proxy-list/raw/refs/heads/main/proxies/socks4.txt",
        "https://github.com/rdavydov/proxy-list/raw/refs/heads/main/proxies/socks5.txt",
        "https://github.com/ShiftyTR/Proxy-List/raw/refs/heads/master/proxy.txt",
        "https://github.com/Vann-Dev/proxy-list/raw/refs/heads/main/proxies/http.txt",
        "https://github.com/Vann-Dev/proxy-list/raw/refs/heads/main/proxies/https.txt",
    ];
}

/// 构建共享的 HTTP 客户端，统一超时与 UA。
pub fn build_client() -> Result<Client, CollectError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(APP_CONFIG.fetch.timeout))
        .user_agent(APP_CONFIG.fetch.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// 根据源地址里的文字线索推断缺省协议。
///
/// socks5、socks4 必须先于 http/https 判断：路径里经常同时
/// 出现 http 和 https 字样。
pub fn classify_source(url: &str) -> Option<Protocol> {
    let lu = url.to_lowercase();
    if lu.contains("socks5") {
        Some(Protocol::Socks5)
    } else if lu.contains("socks4") {
        Some(Protocol::Socks4)
    } else if lu.contains("/https") || lu.contains("https.txt") {
        Some(Protocol::Https)
    } else if lu.contains("/http") || lu.contains("http.txt") {
        Some(Protocol::Http)
    } else {
        None
    }
}

/// 抓取单个源，整体读下响应再按行切开。
///
/// 非 2xx 状态与网络错误只算该源失败，绝不影响其他源。
pub async fn fetch_source(client: &Client, url: &str) -> Result<Vec<String>, CollectError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CollectError::BadStatus(status.as_u16()));
    }
    let text = resp.text().await?;
    let lines: Vec<String> = text.lines().map(str::to_owned).collect();
    debug!("{} 返回 {} 行", url, lines.len());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_classify_socks_wins_over_http() {
        // 路径里同时有 socks5 和 http 字样
        let url = "https://example.com/proxy-list/http/socks5.txt";
        assert_eq!(classify_source(url), Some(Protocol::Socks5));
    }

    #[test]
    fn test_classify_https_before_http() {
        assert_eq!(
            classify_source("https://example.com/lists/https.txt"),
            Some(Protocol::Https)
        );
        assert_eq!(
            classify_source("https://example.com/lists/http.txt"),
            Some(Protocol::Http)
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify_source("https://example.com/all-proxies.txt"), None);
        assert_eq!(classify_source("https://example.com/SOCKS4/list"), Some(Protocol::Socks4));
    }

    #[tokio::test]
    async fn test_fetch_source_splits_lines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list.txt"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1.2.3.4:80\n5.6.7.8:1080\n"))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let lines = fetch_source(&client, &format!("{}/list.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(lines, vec!["1.2.3.4:80", "5.6.7.8:1080"]);
    }

    #[tokio::test]
    async fn test_fetch_source_rejects_bad_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let err = fetch_source(&client, &format!("{}/gone.txt", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, CollectError::BadStatus(404)));
    }
}
