//! # normalizer 模块
//!
//! 把来源各异、格式混乱的文本行统一成 `scheme://host:port` 规范形式。
//!
//! ## 功能简介
//!
//! - 清洗空行与 `#` / `;` 注释行；
//! - 已带 scheme 的行校验协议白名单，缺端口时补协议缺省端口；
//! - 裸 host 或 host:port 的行套用来源推断出的缺省协议；
//! - 组装结果最后过一遍正则语法校验，端口限定 1~65535。
//!
//! 公共源的数据常年无人维护，脏行是常态，所以任何拒绝都不向上抛错，
//! 单行失败绝不能中断整源的处理。拒绝原因以 [`Discard`] 的形式返回，
//! 生产路径可以无视它，测试则能精确断言。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Protocol, Proxy};

/// 规范化结果的最终校验：协议白名单、host 形态、端口位数。
static PROXY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(http|https|socks4|socks5)://[^:/\s]+:\d{1,5}$")
        .expect("proxy regex must compile")
});

/// 一行被丢弃的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// 空行。
    Empty,
    /// `#` 或 `;` 开头的注释行。
    Comment,
    /// scheme 不在 http/https/socks4/socks5 之内。
    BadScheme,
    /// host 缺失。
    NoHost,
    /// 端口不是 1~65535 范围内的十进制数。
    BadPort,
    /// 组装结果没有通过最终语法校验。
    Malformed,
}

/// 把一行原始文本规范化成 [`Proxy`]。
///
/// `fallback` 是来源分类推断出的缺省协议，行内没写 scheme 时生效，
/// 连 fallback 都没有就按 http 处理。
pub fn normalize_line(raw: &str, fallback: Option<Protocol>) -> Result<Proxy, Discard> {
    let line = raw.trim();
    if line.is_empty() {
        return Err(Discard::Empty);
    }
    if line.starts_with('#') || line.starts_with(';') {
        return Err(Discard::Comment);
    }

    // 行内已带 scheme
    if let Some(idx) = line.find("://") {
        let proto = Protocol::parse(&line[..idx]).ok_or(Discard::BadScheme)?;
        let rest = line[idx + 3..].trim();
        if rest.is_empty() {
            return Err(Discard::NoHost);
        }
        let host_port = if rest.contains(':') {
            rest.to_string()
        } else {
            format!("{}:{}", rest, proto.default_port())
        };
        return validate(proto, &host_port);
    }

    let proto = fallback.unwrap_or(Protocol::Http);

    // 裸 host，没有端口
    if !line.contains(':') {
        return validate(proto, &format!("{}:{}", line, proto.default_port()));
    }

    // host:port，从最后一个冒号切开，容忍 [::1]:8080 这类写法
    let (host, port_str) = match line.rsplit_once(':') {
        Some(pair) => pair,
        None => return Err(Discard::BadPort),
    };
    let host = host.trim();
    let port_str = port_str.trim();
    if host.is_empty() {
        return Err(Discard::NoHost);
    }
    let port = match port_str.parse::<u32>() {
        Ok(p) if (1..=65535).contains(&p) => p,
        _ => return Err(Discard::BadPort),
    };

    validate(proto, &format!("{}:{}", host, port))
}

/// 最终校验并拆解成 [`Proxy`]。
fn validate(proto: Protocol, host_port: &str) -> Result<Proxy, Discard> {
    let candidate = format!("{}://{}", proto.as_str(), host_port);
    if !PROXY_RE.is_match(&candidate) {
        return Err(Discard::Malformed);
    }
    // 正则只限制了位数，端口值域要重新确认一遍
    let (host, port_str) = host_port.rsplit_once(':').ok_or(Discard::Malformed)?;
    let port = match port_str.parse::<u32>() {
        Ok(p) if (1..=65535).contains(&p) => p as u16,
        _ => return Err(Discard::BadPort),
    };
    Ok(Proxy::new(proto, host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_port_uses_fallback() {
        let p = normalize_line("1.2.3.4:8080", Some(Protocol::Http)).unwrap();
        assert_eq!(p.to_string(), "http://1.2.3.4:8080");
    }

    #[test]
    fn test_no_fallback_defaults_to_http() {
        let p = normalize_line("1.2.3.4:8080", None).unwrap();
        assert_eq!(p.protocol, Protocol::Http);
    }

    #[test]
    fn test_scheme_line_without_port_gets_default() {
        let p = normalize_line("socks5://8.8.8.8", None).unwrap();
        assert_eq!(p.to_string(), "socks5://8.8.8.8:1080");
    }

    #[test]
    fn test_scheme_overrides_fallback() {
        let p = normalize_line("https://9.9.9.9", Some(Protocol::Socks4)).unwrap();
        assert_eq!(p.to_string(), "https://9.9.9.9:443");
    }

    #[test]
    fn test_uppercase_scheme_is_canonicalized() {
        let p = normalize_line("HTTP://1.2.3.4:80", None).unwrap();
        assert_eq!(p.to_string(), "http://1.2.3.4:80");
    }

    #[test]
    fn test_bare_host_without_colon() {
        let p = normalize_line("proxy.example.com", Some(Protocol::Socks5)).unwrap();
        assert_eq!(p.to_string(), "socks5://proxy.example.com:1080");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let p = normalize_line("  1.2.3.4:8080 \r", Some(Protocol::Http)).unwrap();
        assert_eq!(p.to_string(), "http://1.2.3.4:8080");
    }

    #[test]
    fn test_empty_and_comments_discarded() {
        assert_eq!(normalize_line("", None), Err(Discard::Empty));
        assert_eq!(normalize_line("   ", None), Err(Discard::Empty));
        assert_eq!(normalize_line("# comment", None), Err(Discard::Comment));
        assert_eq!(normalize_line("; comment", None), Err(Discard::Comment));
    }

    #[test]
    fn test_unknown_scheme_discarded() {
        assert_eq!(normalize_line("ftp://1.2.3.4:21", None), Err(Discard::BadScheme));
    }

    #[test]
    fn test_scheme_without_host_discarded() {
        assert_eq!(normalize_line("http://", None), Err(Discard::NoHost));
        assert_eq!(normalize_line("http://   ", None), Err(Discard::NoHost));
    }

    #[test]
    fn test_bad_port_discarded() {
        assert_eq!(normalize_line("badhost:notaport", None), Err(Discard::BadPort));
        assert_eq!(normalize_line("1.2.3.4:0", None), Err(Discard::BadPort));
        assert_eq!(normalize_line("1.2.3.4:70000", None), Err(Discard::BadPort));
        assert_eq!(normalize_line(":8080", None), Err(Discard::NoHost));
    }

    #[test]
    fn test_host_with_inner_colon_fails_grammar() {
        // 括号形式的 IPv6 在最后校验时被拒：host 段不允许出现冒号
        assert_eq!(normalize_line("[::1]:8080", None), Err(Discard::Malformed));
    }

    #[test]
    fn test_scheme_line_with_bad_port_discarded() {
        assert_eq!(normalize_line("http://1.2.3.4:abc", None), Err(Discard::Malformed));
        assert_eq!(normalize_line("http://1.2.3.4:99999", None), Err(Discard::BadPort));
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let a = normalize_line("5.6.7.8:3128", Some(Protocol::Https)).unwrap();
        let b = normalize_line("5.6.7.8:3128", Some(Protocol::Https)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonical_form_is_idempotent() {
        let first = normalize_line("socks4://1.2.3.4", None).unwrap();
        let again = normalize_line(&first.to_string(), None).unwrap();
        assert_eq!(first, again);
    }
}
