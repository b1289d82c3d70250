//! Request descriptors and response payloads exchanged with a transport.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named string values, used both for URL template interpolation and for
/// query parameters.
pub type Params = HashMap<String, String>;

/// HTTP method of a request descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET (the default for string-configured requesters).
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
}

impl Method {
    /// Uppercase wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            _ => Err(ConfigError::InvalidMethod(s.to_string())),
        }
    }
}

/// A fully resolved request, ready for a transport to dispatch.
///
/// Issuers build one fresh descriptor per invocation from their immutable
/// endpoint config; a descriptor is never reused across calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Target URL, already interpolated.
    pub url: String,
    /// Query parameters.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: Params,
    /// Request headers as name/value pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    /// Descriptor for a plain GET of `url`.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Descriptor for `method` against `url`, with nothing else set.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Response payload produced by a transport.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: String,
}

impl Response {
    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns the decode error if the body is not valid JSON for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trips_through_strings() {
        for method in [
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Patch,
            Method::Delete,
            Method::Head,
        ] {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn unknown_method_is_a_config_error() {
        let err = "TRACE".parse::<Method>().unwrap_err();
        assert_eq!(err, ConfigError::InvalidMethod("TRACE".to_string()));
    }

    #[test]
    fn get_descriptor_defaults_everything_else() {
        let request = RequestDescriptor::get("/todos");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "/todos");
        assert!(request.params.is_empty());
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let request: RequestDescriptor =
            serde_json::from_str(r#"{"method":"POST","url":"/todos"}"#).unwrap();
        assert_eq!(request.method, Method::Post);
        assert!(request.params.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn response_json_decodes_body() {
        let response = Response {
            status: 200,
            headers: Vec::new(),
            body: r#"{"id":7}"#.to_string(),
        };
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], 7);

        let bad = Response {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        assert!(bad.json::<serde_json::Value>().is_err());
    }
}
