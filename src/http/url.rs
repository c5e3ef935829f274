//! Server URL construction.

use std::fmt::Display;
use std::net::Ipv6Addr;

use thiserror::Error;
use url::Url;

/// Errors building a server URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("invalid server address `{input}`: {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("server address `{0}` has no host")]
    MissingHost(String),

    #[error("invalid port `{0}`")]
    InvalidPort(String),
}

/// Build `protocol://hostname[:port]`.
///
/// The scheme and host are checked by the WHATWG parser and normalized
/// (lowercased, bare IPv6 addresses bracketed). A given port is always
/// printed, even when it is the scheme default. No trailing slash.
pub fn build_server_url<P: Display>(
    protocol: &str,
    hostname: &str,
    port: Option<P>,
) -> Result<String, UrlError> {
    let input = match hostname.parse::<Ipv6Addr>() {
        Ok(_) => format!("{}://[{}]", protocol, hostname),
        Err(_) => format!("{}://{}", protocol, hostname),
    };
    let url = Url::parse(&input).map_err(|source| UrlError::Parse {
        input: input.clone(),
        source,
    })?;
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| UrlError::MissingHost(input.clone()))?;

    match port {
        Some(port) => {
            let port = port.to_string();
            let port: u16 = port.parse().map_err(|_| UrlError::InvalidPort(port))?;
            Ok(format!("{}://{}:{}", url.scheme(), host, port))
        }
        None => Ok(format!("{}://{}", url.scheme(), host)),
    }
}
