//! Minimal Solidity ABI codec.
//!
//! Covers exactly what the file registry needs: `uint256` and `string`
//! arguments, `uint256[]` returns, and tuples whose leading positions are
//! strings. All offsets in return data are relative to its start.

use sha3::{Digest, Keccak256};

use crate::error::AbiError;

/// Size of one ABI word.
pub const WORD: usize = 32;

/// First four bytes of the Keccak-256 hash of a canonical signature.
pub type Selector = [u8; 4];

/// Computes the selector for a signature such as `getFile(uint256)`.
pub fn selector(signature: &str) -> Selector {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// A call argument.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Uint(&'a [u8; WORD]),
    Str(&'a str),
}

/// Encodes a call: selector, head words, then the dynamic tail.
pub fn encode_call(selector: Selector, args: &[Arg<'_>]) -> Vec<u8> {
    let head_len = args.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for arg in args {
        match arg {
            Arg::Uint(word) => head.extend_from_slice(*word),
            Arg::Str(s) => {
                head.extend_from_slice(&usize_word(head_len + tail.len()));
                tail.extend_from_slice(&usize_word(s.len()));
                tail.extend_from_slice(s.as_bytes());
                let padding = (WORD - s.len() % WORD) % WORD;
                tail.resize(tail.len() + padding, 0);
            }
        }
    }

    let mut out = Vec::with_capacity(4 + head.len() + tail.len());
    out.extend_from_slice(&selector);
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    out
}

/// Decodes a single `uint256[]` return value.
pub fn decode_uint_array(data: &[u8]) -> Result<Vec<[u8; WORD]>, AbiError> {
    if data.is_empty() {
        return Err(AbiError::Empty);
    }
    let offset = read_usize(data, 0)?;
    let len = read_usize(data, offset)?;
    let start = offset.checked_add(WORD).ok_or(AbiError::Overflow)?;

    let mut items = Vec::with_capacity(len.min(data.len() / WORD));
    for i in 0..len {
        let at = i
            .checked_mul(WORD)
            .and_then(|o| o.checked_add(start))
            .ok_or(AbiError::Overflow)?;
        items.push(*read_word(data, at)?);
    }
    Ok(items)
}

/// Decodes the first `count` positions of a tuple as strings.
///
/// Later positions are left untouched, whatever their type.
pub fn decode_leading_strings(data: &[u8], count: usize) -> Result<Vec<String>, AbiError> {
    if data.is_empty() {
        return Err(AbiError::Empty);
    }
    (0..count)
        .map(|position| {
            let offset = read_usize(data, position * WORD)?;
            read_string(data, offset)
        })
        .collect()
}

/// Parses `0x`-prefixed hex into bytes.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, AbiError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| AbiError::InvalidHex(e.to_string()))
}

/// Formats bytes as `0x`-prefixed hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn usize_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8; WORD], AbiError> {
    let end = at.checked_add(WORD).ok_or(AbiError::Overflow)?;
    data.get(at..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(AbiError::OutOfBounds {
            needed: end,
            actual: data.len(),
        })
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let word = read_word(data, at)?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow);
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(low)).map_err(|_| AbiError::Overflow)
}

fn read_string(data: &[u8], offset: usize) -> Result<String, AbiError> {
    let len = read_usize(data, offset)?;
    let start = offset.checked_add(WORD).ok_or(AbiError::Overflow)?;
    let end = start.checked_add(len).ok_or(AbiError::Overflow)?;
    let bytes = data.get(start..end).ok_or(AbiError::OutOfBounds {
        needed: end,
        actual: data.len(),
    })?;
    String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_of(value: usize) -> Vec<u8> {
        usize_word(value).to_vec()
    }

    fn padded(s: &str) -> Vec<u8> {
        let mut out = s.as_bytes().to_vec();
        out.resize(s.len().div_ceil(WORD) * WORD, 0);
        out
    }

    #[test]
    fn test_known_selectors() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_encode_uint_argument() {
        let mut id = [0u8; WORD];
        id[WORD - 1] = 7;
        let data = encode_call([1, 2, 3, 4], &[Arg::Uint(&id)]);
        assert_eq!(data.len(), 4 + WORD);
        assert_eq!(&data[..4], &[1, 2, 3, 4]);
        assert_eq!(data[4 + WORD - 1], 7);
    }

    #[test]
    fn test_encode_two_strings() {
        let data = encode_call([0; 4], &[Arg::Str("Qm123"), Arg::Str("report.pdf")]);
        let body = &data[4..];

        assert_eq!(body.len(), 2 * WORD + 2 * 2 * WORD);
        assert_eq!(&body[..WORD], word_of(0x40).as_slice());
        assert_eq!(&body[WORD..2 * WORD], word_of(0x80).as_slice());
        assert_eq!(&body[0x40..0x60], word_of(5).as_slice());
        assert_eq!(&body[0x60..0x65], b"Qm123");
        assert_eq!(&body[0x80..0xa0], word_of(10).as_slice());
        assert_eq!(&body[0xa0..0xaa], b"report.pdf");
    }

    #[test]
    fn test_decode_uint_array() {
        let mut data = word_of(0x20);
        data.extend(word_of(3));
        data.extend(word_of(1));
        data.extend(word_of(2));
        data.extend(word_of(3));

        let items = decode_uint_array(&data).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0][WORD - 1], 1);
        assert_eq!(items[2][WORD - 1], 3);
    }

    #[test]
    fn test_decode_empty_uint_array() {
        let mut data = word_of(0x20);
        data.extend(word_of(0));
        assert!(decode_uint_array(&data).unwrap().is_empty());
    }

    #[test]
    fn test_decode_leading_strings_skips_trailing_fields() {
        // (string hash, string name, address owner)
        let mut data = word_of(0x60);
        data.extend(word_of(0xa0));
        data.extend(word_of(0xdead));
        data.extend(word_of(5));
        data.extend(padded("Qm123"));
        data.extend(word_of(9));
        data.extend(padded("notes.txt"));

        let fields = decode_leading_strings(&data, 2).unwrap();
        assert_eq!(fields, vec!["Qm123".to_string(), "notes.txt".to_string()]);
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        assert_eq!(decode_uint_array(&[]), Err(AbiError::Empty));

        let mut data = word_of(0x20);
        data.extend(word_of(2));
        data.extend(word_of(1));
        assert!(matches!(
            decode_uint_array(&data),
            Err(AbiError::OutOfBounds { .. })
        ));

        let mut data = word_of(0x20);
        data.extend(word_of(64));
        data.extend(padded("short"));
        assert!(matches!(
            decode_leading_strings(&data, 1),
            Err(AbiError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_huge_offsets() {
        let mut data = vec![0xff; WORD];
        data.extend(word_of(0));
        assert_eq!(decode_uint_array(&data), Err(AbiError::Overflow));
    }

    #[test]
    fn test_hex_round_trip_prefix() {
        assert_eq!(decode_hex("0x0a0b").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(encode_hex(&[0x0a, 0x0b]), "0x0a0b");
        assert!(decode_hex("0xzz").is_err());
    }
}
