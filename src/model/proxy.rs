use std::fmt;

/// 支持的代理协议集合。
///
/// 输出时恒为小写，因此协议段的大小写差异在类型层面就被抹平了。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
    Socks4,
    Socks5,
}

impl Protocol {
    /// 从 scheme 文本解析协议，忽略大小写。
    ///
    /// 不在白名单内的（如 `ftp`）返回 `None`。
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Some(Protocol::Http),
            "https" => Some(Protocol::Https),
            "socks4" => Some(Protocol::Socks4),
            "socks5" => Some(Protocol::Socks5),
            _ => None,
        }
    }

    /// 协议的小写名称。
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Socks4 => "socks4",
            Protocol::Socks5 => "socks5",
        }
    }

    /// 无端口行的缺省端口：http→80，https→443，socks4/socks5→1080。
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
            Protocol::Socks4 | Protocol::Socks5 => 1080,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一条规范化后的代理记录。
///
/// 由 normalizer 构造，之后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Proxy {
    /// 代理协议。
    pub protocol: Protocol,

    /// 主机部分（IPv4 或域名），不含冒号、斜杠与空白。
    pub host: String,

    /// 端口号，1-65535。
    pub port: u16,
}

impl Proxy {
    pub fn new(protocol: Protocol, host: String, port: u16) -> Self {
        Self { protocol, host, port }
    }

    /// 去重用的键。协议恒为小写，所以键就是规范化字符串本身。
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.host, self.port)
    }
}
