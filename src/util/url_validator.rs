use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors from checking a media resource locator.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL points at this machine or a private network.
    #[error("Non-public host not allowed: {0}")]
    NonPublicHost(String),
}

/// Validates a media URL (image, video, or thumbnail).
///
/// A card's locator must be an absolute `http(s)` URL with a public host.
/// The same check gates `open` so the feed never hands a `file://` or
/// loopback target to the system browser.
///
/// # Examples
///
/// ```
/// use reels::util::validate_url;
///
/// assert!(validate_url("https://images.example.com/photo.jpg").is_ok());
/// assert!(validate_url("http://localhost/video.mp4").is_err());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    let host = url.host_str().ok_or(UrlValidationError::MissingHost)?;
    if host.eq_ignore_ascii_case("localhost") {
        return Err(UrlValidationError::NonPublicHost(host.to_owned()));
    }

    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        if !is_public_ip(&ip) {
            return Err(UrlValidationError::NonPublicHost(ip.to_string()));
        }
    }

    Ok(url)
}

fn is_public_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            // fc00::/7 unique local, fe80::/10 link local
            let local = (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_media_urls_accepted() {
        assert!(validate_url(
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&h=1200&fit=crop"
        )
        .is_ok());
        assert!(validate_url(
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4"
        )
        .is_ok());
        assert!(validate_url("http://example.com:8080/clip.mp4").is_ok());
    }

    #[test]
    fn test_unparseable_rejected() {
        assert!(matches!(
            validate_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_url("ftp://example.com/a.jpg").is_err());
        assert!(validate_url("data:image/png;base64,AAAA").is_err());
    }

    #[test]
    fn test_local_hosts_rejected() {
        assert!(validate_url("http://localhost/a.jpg").is_err());
        assert!(validate_url("http://127.0.0.1/a.jpg").is_err());
        assert!(validate_url("http://[::1]/a.jpg").is_err());
        assert!(validate_url("http://0.0.0.0/a.jpg").is_err());
    }

    #[test]
    fn test_private_ranges_rejected() {
        assert!(validate_url("http://192.168.1.1/a.jpg").is_err());
        assert!(validate_url("http://10.0.0.1:3000/a.jpg").is_err());
        assert!(validate_url("http://169.254.1.1/a.jpg").is_err());
        assert!(validate_url("http://[fe80::1]/a.jpg").is_err());
        assert!(validate_url("http://[fd00::1]/a.jpg").is_err());
    }
}
