//! Raw HTTP request parsing

use once_cell::sync::Lazy;
use regex::Regex;

static COOKIE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Cookie:\s(.+)?\r\n").expect("cookie header pattern"));
static USER_AGENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^User-Agent:\s(.+)?\r\n").expect("user agent header pattern"));
static REFERER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Referer:\s(.+)?\r\n").expect("referer header pattern"));

/// `method uri version` of a request, with the URL made absolute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub url: String,
    pub version: String,
}

impl RequestLine {
    /// Parse the first line of `request`.
    ///
    /// Exactly three space-separated tokens are required; the URL becomes
    /// `<protocol>://<host><uri>`.
    pub fn parse(request: &str, protocol: &str, host: &str) -> Option<Self> {
        let line = request.split(['\r', '\n']).next().unwrap_or_default();
        let parts: Vec<&str> = line.split(' ').collect();

        match parts.as_slice() {
            [method, uri, version] => Some(Self {
                method: method.to_string(),
                url: format!("{protocol}://{host}{uri}"),
                version: version.to_string(),
            }),
            _ => None,
        }
    }
}

/// Request line and selected headers of a WAF raw request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WafRequest {
    pub line: Option<RequestLine>,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl WafRequest {
    pub fn parse(request: &str, protocol: &str, host: &str) -> Self {
        let header = |re: &Regex| {
            re.captures(request)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        };

        Self {
            line: RequestLine::parse(request, protocol, host),
            cookie: header(&COOKIE),
            user_agent: header(&USER_AGENT),
            referer: header(&REFERER),
        }
    }
}
