//! File registry contract capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::abi;
use crate::artifact::ContractArtifact;
use crate::error::{AbiError, RpcError};
use crate::types::{Account, Address, FileId, FileRecord};

/// The `getFile` return tuple, named.
///
/// Field order on the wire: position 0 is the content hash, position 1 is
/// the file name. Any further positions are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub content_hash: String,
    pub file_name: String,
}

impl FileEntry {
    /// Decodes raw `getFile` return data.
    pub fn decode(data: &[u8]) -> Result<Self, AbiError> {
        let mut fields = abi::decode_leading_strings(data, 2)?.into_iter();
        let content_hash = fields.next().ok_or(AbiError::Empty)?;
        let file_name = fields.next().ok_or(AbiError::Empty)?;
        Ok(Self {
            content_hash,
            file_name,
        })
    }

    pub fn into_record(self, file_id: FileId) -> FileRecord {
        FileRecord {
            file_id,
            file_name: self.file_name,
            content_hash: self.content_hash,
        }
    }
}

/// Read and write calls on the deployed file-sharing contract.
#[async_trait]
pub trait FileRegistry: Send + Sync {
    /// Ids of every file `caller` is permitted to view, in contract order.
    async fn list_visible_files(&self, caller: &Account) -> Result<Vec<FileId>, RpcError>;

    /// Metadata for one file.
    async fn get_file(&self, file_id: &FileId) -> Result<FileEntry, RpcError>;

    /// Registers an uploaded file for `owner`; returns the transaction hash.
    async fn register_file(
        &self,
        owner: &Account,
        content_hash: &str,
        file_name: &str,
    ) -> Result<String, RpcError>;
}

/// Creates contract handles.
pub trait ContractBinder: Send + Sync {
    /// Binds the artifact's interface to a deployment address.
    fn bind(&self, artifact: &ContractArtifact, address: Address) -> Arc<dyn FileRegistry>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn FileRegistry, _: &dyn ContractBinder) {}

    fn word(value: usize) -> Vec<u8> {
        let mut w = vec![0u8; 32];
        w[24..].copy_from_slice(&(value as u64).to_be_bytes());
        w
    }

    #[test]
    fn test_file_entry_field_order() {
        let mut data = word(0x40);
        data.extend(word(0x80));
        data.extend(word(5));
        data.extend(b"Qm123");
        data.extend(vec![0u8; 27]);
        data.extend(word(8));
        data.extend(b"cat.jpeg");
        data.extend(vec![0u8; 24]);

        let entry = FileEntry::decode(&data).unwrap();
        assert_eq!(entry.content_hash, "Qm123");
        assert_eq!(entry.file_name, "cat.jpeg");

        let record = entry.into_record(FileId::from(9));
        assert_eq!(record.file_id, FileId::from(9));
        assert_eq!(record.content_hash, "Qm123");
        assert_eq!(record.file_name, "cat.jpeg");
    }

    #[test]
    fn test_file_entry_rejects_empty() {
        assert_eq!(FileEntry::decode(&[]), Err(AbiError::Empty));
    }
}
