//! PR reference parsing and clone URL helpers

use crate::error::{Error, Result};
use crate::types::RepoRef;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SHORT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<owner>[\w.-]+)/(?P<repo>[\w.-]+)#(?P<number>\d+)$")
        .expect("static regex is valid")
});

static URL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^/]+/(?P<owner>[\w.-]+)/(?P<repo>[\w.-]+)/pull/(?P<number>\d+)/?$")
        .expect("static regex is valid")
});

// userinfo of any scheme://user[:password]@ occurrence inside free text
static URL_USERINFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*://)[^/@\s'\x22]+@")
        .expect("static regex is valid")
});

const REDACTED: &str = "***";

/// A single PR addressed on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrReference {
    /// Repository the PR belongs to
    pub repository: RepoRef,
    /// PR number
    pub number: u64,
}

/// Parse `owner/repo#123` or a PR web URL
pub fn parse_pr_reference(input: &str) -> Result<PrReference> {
    let input = input.trim();
    let caps = SHORT_REF
        .captures(input)
        .or_else(|| URL_REF.captures(input))
        .ok_or_else(|| {
            Error::InvalidReference(format!(
                "{input} (expected owner/repo#123 or a pull request URL)"
            ))
        })?;

    let number = caps["number"]
        .parse()
        .map_err(|_| Error::InvalidReference(format!("{input} (PR number out of range)")))?;

    Ok(PrReference {
        repository: RepoRef::new(&caps["owner"], &caps["repo"]),
        number,
    })
}

/// Embed an access token into an HTTPS clone URL
pub fn authenticated_clone_url(clone_url: &str, token: &str) -> Result<String> {
    let mut url = Url::parse(clone_url)
        .map_err(|e| Error::Config(format!("invalid clone URL {clone_url}: {e}")))?;
    if url.scheme() != "https" {
        return Err(Error::Config(format!(
            "refusing to embed credentials in non-HTTPS clone URL {clone_url}"
        )));
    }
    url.set_username("x-access-token")
        .and_then(|()| url.set_password(Some(token)))
        .map_err(|()| Error::Config(format!("cannot add credentials to {clone_url}")))?;
    Ok(url.into())
}

/// Strip URL credentials wherever they appear in `text`, for logs and
/// error messages. Works on single arguments and on multi-line git output.
pub fn redact_credentials(text: &str) -> String {
    URL_USERINFO.replace_all(text, "$scheme").into_owned()
}

/// Replace every occurrence of `secret` in `text`
pub fn redact_secret(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}
