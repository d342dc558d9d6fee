//! Opens gateway links from the webview.

use dioxus::prelude::*;
use fileshare_core::UrlOpener;

/// Asks the webview to open a URL in a new window.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebviewOpener;

impl UrlOpener for WebviewOpener {
    fn open_in_new_context(&self, url: &str) {
        // Debug formatting yields a quoted, escaped string literal for JS.
        let js = format!("window.open({:?}, '_blank')", url);
        document::eval(&js);
    }
}
