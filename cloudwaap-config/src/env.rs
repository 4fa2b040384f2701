// Environment variable loading

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Environment variable loader
///
/// With a prefix of `CLOUDWAAP`, only variables named `CLOUDWAAP_*` are
/// considered and the prefix is stripped. Overrides map variable names to
/// camelCase configuration keys, with `__` descending one level:
///
/// | Variable                               | Key                          |
/// |----------------------------------------|------------------------------|
/// | `CLOUDWAAP_OUTPUT_FORMAT=cef`          | `outputFormat`               |
/// | `CLOUDWAAP_ENABLE_FILTERING=false`     | `enableFiltering`            |
/// | `CLOUDWAAP_OUTPUT__SUFFIX_MODE=add`    | `output.suffixMode`          |
///
/// Segments matching a key already in the document (ignoring case and
/// underscores) keep that key's spelling, so map keys such as `WAF` or an
/// application name loaded from a file survive:
/// `CLOUDWAAP_DEFAULT_FILTER_POLICY__WAF__ENABLE=false` sets
/// `defaultFilterPolicy.WAF.enable`.
///
/// Values that parse as JSON (`false`, `42`, `["a","b"]`, `{..}`) are taken
/// as JSON; anything else is a string.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Create a loader for variables starting with `<prefix>_`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new(Some(prefix.into()))
    }

    /// Overlay matching variables onto an existing document, returning how
    /// many were applied
    pub fn apply<I>(&self, root: &mut Value, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides = self.filter(vars);
        for (key, value) in &overrides {
            insert_override(root, key, value);
        }
        overrides.len()
    }

    fn filter<I>(&self, vars: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = BTreeMap::new();

        for (key, value) in vars {
            match self.prefix {
                Some(ref prefix) => {
                    if let Some(rest) = key
                        .strip_prefix(prefix.as_str())
                        .and_then(|rest| rest.strip_prefix('_'))
                        && !rest.is_empty()
                    {
                        config.insert(rest.to_string(), value);
                    }
                }
                None => {
                    config.insert(key, value);
                }
            }
        }

        config
    }
}

/// Insert one `SNAKE__CASE=value` override into a JSON document.
///
/// Each segment first matches an existing key ignoring case and
/// underscores (`WAF` finds `WAF`, `WEB_DDOS` finds `WebDDoS`); only
/// segments with no match are camel-cased.
pub(crate) fn insert_override(root: &mut Value, key: &str, raw: &str) {
    let segments: Vec<&str> = key.split("__").filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            return;
        };
        let name = resolve_key(map, segment);
        node = map
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let name = resolve_key(map, last);
        let value = coerce(raw);
        match map.get_mut(&name) {
            Some(existing) => crate::merge_values(existing, value),
            None => {
                map.insert(name, value);
            }
        }
    }
}

fn resolve_key(map: &Map<String, Value>, segment: &str) -> String {
    let wanted = fold_key(segment);
    map.keys()
        .find(|existing| fold_key(existing) == wanted)
        .cloned()
        .unwrap_or_else(|| camel_case(segment))
}

fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for (i, word) in segment.split('_').filter(|w| !w.is_empty()).enumerate() {
        let word = word.to_lowercase();
        if i == 0 {
            out.push_str(&word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

fn coerce(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
