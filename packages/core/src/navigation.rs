//! Where the embedded webview may go

use crate::bridge::{is_bridge_url, parse_message, BridgeMessage};
use crate::error::BridgeError;
use url::Url;

/// The remote MathPaste application (must end with a slash)
pub const MATHPASTE_URL: &str = "https://akuli.github.io/mathpaste/";

/// What to do with a navigation request from the webview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Let the webview load it
    Allow,
    /// A message from the page; handle it and cancel the navigation
    Bridge(Result<BridgeMessage, BridgeError>),
    /// Cancel it and open the URL in the system browser
    OpenExternally,
}

/// Decides a navigation request
pub fn classify(url: &Url) -> Navigation {
    if is_bridge_url(url) {
        Navigation::Bridge(parse_message(url))
    } else if url.as_str().starts_with(MATHPASTE_URL) || url.scheme() == "about" {
        Navigation::Allow
    } else {
        Navigation::OpenExternally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://akuli.github.io/mathpaste/")]
    #[case("https://akuli.github.io/mathpaste/#abc")]
    #[case("https://akuli.github.io/mathpaste/index.html")]
    #[case("about:blank")]
    fn test_mathpaste_pages_allowed(#[case] url: &str) {
        assert_eq!(classify(&Url::parse(url).unwrap()), Navigation::Allow);
    }

    #[rstest]
    #[case("https://github.com/akuli/mathpaste")]
    #[case("https://akuli.github.io/other/")]
    #[case("http://akuli.github.io/mathpaste/")]
    fn test_other_pages_open_externally(#[case] url: &str) {
        assert_eq!(
            classify(&Url::parse(url).unwrap()),
            Navigation::OpenExternally
        );
    }

    #[test]
    fn test_bridge_urls_are_messages() {
        let url = Url::parse("mathpaste-bridge://changed").unwrap();
        assert_eq!(classify(&url), Navigation::Bridge(Ok(BridgeMessage::Changed)));
    }

    #[test]
    fn test_mathpaste_url_ends_with_slash() {
        assert!(MATHPASTE_URL.ends_with('/'));
        assert!(Url::parse(MATHPASTE_URL).is_ok());
    }
}
