use std::{fmt, str::FromStr};

use url::Url;

use crate::{
    error::{KeyError, ModelError},
    variant::Tintability,
};

/// Default endpoint serving `/<namespace>/<name>.svg`.
pub const DEFAULT_API_BASE: &str = "https://api.iconify.design";

/// Identity of a remote icon, written as `namespace:name`.
///
/// Both segments are stored trimmed; the remote URL and the cache paths are
/// derived from them on demand so they can never drift from the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct IconKey {
    namespace: String,
    name: String,
}

impl IconKey {
    /// Parse `namespace:name`. Exactly one `:` is allowed and both segments
    /// must be non-empty once surrounding whitespace is trimmed.
    pub fn parse(input: &str) -> Result<Self, KeyError> {
        let invalid = || KeyError::InvalidFormat(input.to_string());

        let mut parts = input.split(':');
        let (Some(namespace), Some(name), None) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let namespace = namespace.trim();
        let name = name.trim();
        if namespace.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote location of the SVG document, `<base>/<namespace>/<name>.svg?width=100%25`.
    ///
    /// Only used to fetch; cache addressing never depends on the base.
    pub fn remote_url(&self, base: &ApiBase) -> Url {
        let mut url = base.as_url().clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.namespace)
                .push(&format!("{}.svg", self.name));
        }
        url.query_pairs_mut().append_pair("width", "100%");
        url
    }

    /// Cache-relative path of a plain (non-tintable) entry.
    pub fn cache_path(&self) -> String {
        format!("{}/{}.svg", self.namespace, self.name)
    }

    /// Cache-relative path of a tintable entry.
    pub fn cache_tintable_path(&self) -> String {
        format!("{}/{}.t.svg", self.namespace, self.name)
    }

    pub fn cache_path_for(&self, tintability: Tintability) -> String {
        match tintability {
            Tintability::Plain => self.cache_path(),
            Tintability::Tintable => self.cache_tintable_path(),
        }
    }

    /// Directory both cache paths live in.
    pub fn cache_dir(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for IconKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for IconKey {
    type Error = KeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for IconKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IconKey> for String {
    fn from(key: IconKey) -> Self {
        key.to_string()
    }
}

/// Absolute http(s) base URL of the icon API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    pub fn parse(value: &str) -> crate::error::Result<Self> {
        let mut url = Url::parse(value.trim())
            .map_err(|err| ModelError::InvalidApiBase(format!("{value}: {err}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ModelError::InvalidApiBase(format!(
                "{value}: scheme must be http or https"
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ModelError::InvalidApiBase(format!(
                "{value}: not a base url"
            )));
        }

        url.set_query(None);
        url.set_fragment(None);
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_API_BASE).expect("default api base is valid"))
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
