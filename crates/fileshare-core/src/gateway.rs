//! Public gateway URLs for content hashes.

use tracing::debug;

use crate::types::FileRecord;

/// Gateway used when none is configured.
pub const DEFAULT_GATEWAY_ORIGIN: &str = "https://ipfs.io";

/// Builds `<origin>/ipfs/<hash>` links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    origin: String,
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_ORIGIN)
    }
}

impl Gateway {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The gateway URL for a content hash. The hash is not validated; a
    /// malformed one simply yields a dead link.
    pub fn url_for(&self, content_hash: &str) -> String {
        format!("{}/ipfs/{}", self.origin, content_hash)
    }
}

/// Opens URLs outside the current view.
pub trait UrlOpener {
    /// Requests that `url` be opened in a new viewing context.
    fn open_in_new_context(&self, url: &str);
}

/// Opens a record's content at the gateway and returns the URL used.
pub fn open_file(record: &FileRecord, gateway: &Gateway, opener: &dyn UrlOpener) -> String {
    let url = gateway.url_for(&record.content_hash);
    debug!(file = %record.file_name, %url, "Opening shared file");
    opener.open_in_new_context(&url);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingOpener;
    use crate::types::FileId;

    #[test]
    fn test_default_gateway_url() {
        assert_eq!(Gateway::default().url_for("Qm123"), "https://ipfs.io/ipfs/Qm123");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let gateway = Gateway::new("https://dweb.link/");
        assert_eq!(gateway.origin(), "https://dweb.link");
        assert_eq!(gateway.url_for("bafy"), "https://dweb.link/ipfs/bafy");
    }

    #[test]
    fn test_malformed_hash_is_not_rejected() {
        assert_eq!(
            Gateway::default().url_for("not a hash"),
            "https://ipfs.io/ipfs/not a hash"
        );
    }

    #[test]
    fn test_open_file_requests_new_context() {
        let opener = RecordingOpener::new();
        let record = FileRecord {
            file_id: FileId::from(1),
            file_name: "a.txt".into(),
            content_hash: "QmA".into(),
        };

        let url = open_file(&record, &Gateway::default(), &opener);
        assert_eq!(url, "https://ipfs.io/ipfs/QmA");
        assert_eq!(opener.opened(), vec![url]);
    }
}
