//! URL template interpolation and protocol splitting.
//!
//! Issuers never hardcode a placeholder syntax: they go through the
//! [`UrlTools`] trait, injected at factory construction. The shipped
//! [`ColonUrlTools`] understands colon-prefixed segments (`/items/:id`).

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::request::Params;

/// An absolute URL split into its scheme prefix and the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitUrl {
    /// Scheme prefix through the `://` separator (e.g. `"http://"`).
    /// Empty when the input carries no separator.
    pub protocol: String,
    /// Everything after the separator (host, path, query).
    pub rest: String,
}

/// URL utilities an issuer needs: placeholder substitution and
/// protocol/remainder splitting for absolute templates.
pub trait UrlTools: Send + Sync {
    /// Substitute named placeholders in `template` with values from
    /// `options`. Placeholders without a matching option are left to the
    /// implementation; the shipped implementation keeps them verbatim.
    fn interpolate(&self, template: &str, options: &Params) -> String;

    /// Split an absolute URL into protocol and remainder.
    fn split_protocol(&self, url: &str) -> SplitUrl;
}

/// Colon-prefixed placeholder names: `:id`, `:user_name`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Default [`UrlTools`]: colon-prefixed placeholders, split after `://`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonUrlTools;

impl UrlTools for ColonUrlTools {
    fn interpolate(&self, template: &str, options: &Params) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                match options.get(&caps[1]) {
                    Some(value) => value.clone(),
                    // Unmatched placeholders stay in place.
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn split_protocol(&self, url: &str) -> SplitUrl {
        match url.find("://") {
            Some(index) => {
                let boundary = index + "://".len();
                SplitUrl {
                    protocol: url[..boundary].to_string(),
                    rest: url[boundary..].to_string(),
                }
            }
            None => SplitUrl {
                protocol: String::new(),
                rest: url.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn interpolates_single_placeholder() {
        let url = ColonUrlTools.interpolate("/items/:id", &options(&[("id", "5")]));
        assert_eq!(url, "/items/5");
    }

    #[test]
    fn interpolates_multiple_placeholders() {
        let url = ColonUrlTools.interpolate(
            "/users/:user_id/posts/:post_id",
            &options(&[("user_id", "3"), ("post_id", "14")]),
        );
        assert_eq!(url, "/users/3/posts/14");
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim() {
        let url = ColonUrlTools.interpolate("/items/:id/:field", &options(&[("id", "5")]));
        assert_eq!(url, "/items/5/:field");
    }

    #[test]
    fn extra_options_are_ignored() {
        let url = ColonUrlTools.interpolate("/items/:id", &options(&[("id", "5"), ("q", "x")]));
        assert_eq!(url, "/items/5");
    }

    #[test]
    fn scheme_colon_is_not_a_placeholder() {
        // "://" is not followed by an identifier character.
        let url = ColonUrlTools.interpolate("http://host/:id", &options(&[("id", "9")]));
        assert_eq!(url, "http://host/9");
    }

    #[test]
    fn splits_after_scheme_separator() {
        let split = ColonUrlTools.split_protocol("http://api.example.com/:id");
        assert_eq!(
            split,
            SplitUrl {
                protocol: "http://".to_string(),
                rest: "api.example.com/:id".to_string(),
            }
        );

        let split = ColonUrlTools.split_protocol("https://host/path?q=1");
        assert_eq!(split.protocol, "https://");
        assert_eq!(split.rest, "host/path?q=1");
    }

    #[test]
    fn split_without_separator_yields_empty_protocol() {
        let split = ColonUrlTools.split_protocol("/relative/:id");
        assert_eq!(split.protocol, "");
        assert_eq!(split.rest, "/relative/:id");
    }
}
