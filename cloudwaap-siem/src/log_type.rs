//! Log families exported by Cloud WAAP

use serde::{Deserialize, Serialize};

/// Log family of a record, as named by its export directory
///
/// Deserialization also takes the lower/camel spellings environment
/// overrides produce (`waf`, `webDdos`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogType {
    /// HTTP access logs (`rdwr_log*` files)
    #[serde(alias = "access")]
    Access,
    /// Web application firewall events
    #[serde(rename = "WAF", alias = "waf")]
    Waf,
    /// Bot manager events
    #[serde(alias = "bot")]
    Bot,
    /// Network DDoS events
    #[serde(rename = "DDoS", alias = "ddos")]
    Ddos,
    /// Layer 7 DDoS events
    #[serde(rename = "WebDDoS", alias = "webDdos", alias = "webddos")]
    WebDdos,
    /// Client-side protection events
    #[serde(rename = "CSP", alias = "csp")]
    Csp,
    /// Anything the key grammar does not recognize
    #[serde(alias = "unknown")]
    Unknown,
}

impl LogType {
    /// Every family, in declaration order
    pub const ALL: [LogType; 7] = [
        LogType::Access,
        LogType::Waf,
        LogType::Bot,
        LogType::Ddos,
        LogType::WebDdos,
        LogType::Csp,
        LogType::Unknown,
    ];

    /// Name used in keys, configuration and enriched records
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Access => "Access",
            LogType::Waf => "WAF",
            LogType::Bot => "Bot",
            LogType::Ddos => "DDoS",
            LogType::WebDdos => "WebDDoS",
            LogType::Csp => "CSP",
            LogType::Unknown => "Unknown",
        }
    }

    /// Map a log-type directory name; unknown names yield `Unknown`.
    ///
    /// Matching is exact first, then case-insensitive (`waf`, `ddos`).
    pub fn from_dir_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .find(|t| t.as_str() == name)
            .or_else(|| Self::ALL.iter().find(|t| t.as_str().eq_ignore_ascii_case(name)))
            .copied()
            .unwrap_or(LogType::Unknown)
    }

    /// CEF signature id
    pub fn class_id(&self) -> u8 {
        match self {
            LogType::Access => 1,
            LogType::Waf => 2,
            LogType::Bot => 3,
            LogType::Ddos => 4,
            LogType::WebDdos => 5,
            LogType::Csp | LogType::Unknown => 0,
        }
    }

    /// Event name used in CEF and LEEF headers (`WAFLog`)
    pub fn event_name(&self) -> String {
        format!("{}Log", self.as_str())
    }
}

impl std::fmt::Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_name() {
        assert_eq!(LogType::from_dir_name("WAF"), LogType::Waf);
        assert_eq!(LogType::from_dir_name("waf"), LogType::Waf);
        assert_eq!(LogType::from_dir_name("WebDDoS"), LogType::WebDdos);
        assert_eq!(LogType::from_dir_name("DDoS"), LogType::Ddos);
        assert_eq!(LogType::from_dir_name("logs"), LogType::Unknown);
        assert_eq!(LogType::from_dir_name(""), LogType::Unknown);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&LogType::WebDdos).unwrap(), r#""WebDDoS""#);
        let parsed: LogType = serde_json::from_str(r#""CSP""#).unwrap();
        assert_eq!(parsed, LogType::Csp);

        let parsed: LogType = serde_json::from_str(r#""webDdos""#).unwrap();
        assert_eq!(parsed, LogType::WebDdos);
        let parsed: LogType = serde_json::from_str(r#""waf""#).unwrap();
        assert_eq!(parsed, LogType::Waf);
    }

    #[test]
    fn test_header_metadata() {
        assert_eq!(LogType::Access.class_id(), 1);
        assert_eq!(LogType::WebDdos.class_id(), 5);
        assert_eq!(LogType::Csp.class_id(), 0);
        assert_eq!(LogType::Waf.event_name(), "WAFLog");
        assert_eq!(LogType::Ddos.to_string(), "DDoS");
    }
}
