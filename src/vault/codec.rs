//! Binary encoding of the transaction log.
//!
//! All integers are little-endian.
//!
//! ```text
//! log    = version:u8 count:u32 record*
//! record = digest_len:u16 digest kind:u8 timestamp:i64
//!          id:str title:str secret:str created_at:i64 updated_at:i64
//! str    = len:u32 utf8-bytes
//! ```
//!
//! Timestamps are nanoseconds since the Unix epoch.  The encoding is
//! self-delimiting: anything after the last record (e.g. zero padding left
//! by block decryption) is ignored.  An empty input decodes to an empty log.

use chrono::{DateTime, Utc};

use super::entry::Entry;
use super::tx::{Tx, TxKind};
use crate::errors::{Result, TxVaultError};

/// Current encoding version.
pub const CODEC_VERSION: u8 = 1;

/// Smallest possible encoded record, used to bound preallocation.
const MIN_RECORD_LEN: usize = 2 + 1 + 8 + 4 * 3 + 8 * 2;

/// Convert a timestamp to nanoseconds since the epoch.
pub(crate) fn to_nanos(ts: DateTime<Utc>) -> Result<i64> {
    ts.timestamp_nanos_opt().ok_or_else(|| {
        TxVaultError::Serialization(format!("timestamp {ts} is outside the representable range"))
    })
}

pub(crate) fn from_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_nanos(nanos)
}

/// Encode `txs` into a self-delimiting buffer.
pub fn encode(txs: &[Tx]) -> Result<Vec<u8>> {
    let count = u32::try_from(txs.len()).map_err(|_| {
        TxVaultError::Serialization(format!("{} transactions exceed u32::MAX", txs.len()))
    })?;

    let mut buf = Vec::with_capacity(5 + txs.len() * (MIN_RECORD_LEN + 64));
    buf.push(CODEC_VERSION);
    buf.extend_from_slice(&count.to_le_bytes());

    for tx in txs {
        let digest_len = u16::try_from(tx.digest.len()).map_err(|_| {
            TxVaultError::Serialization(format!("digest of {} bytes is too long", tx.digest.len()))
        })?;
        buf.extend_from_slice(&digest_len.to_le_bytes());
        buf.extend_from_slice(&tx.digest);
        buf.push(tx.kind.code());
        buf.extend_from_slice(&to_nanos(tx.timestamp)?.to_le_bytes());

        let entry = &tx.payload;
        put_str(&mut buf, &entry.id)?;
        put_str(&mut buf, &entry.title)?;
        put_str(&mut buf, &entry.secret)?;
        buf.extend_from_slice(&to_nanos(entry.created_at)?.to_le_bytes());
        buf.extend_from_slice(&to_nanos(entry.updated_at)?.to_le_bytes());
    }

    Ok(buf)
}

/// Decode a buffer produced by [`encode`], ignoring trailing bytes.
pub fn decode(data: &[u8]) -> Result<Vec<Tx>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = Reader::new(data);

    let version = reader.u8("version")?;
    if version != CODEC_VERSION {
        return Err(TxVaultError::Serialization(format!(
            "unsupported log version {version}, expected {CODEC_VERSION}"
        )));
    }

    let count = reader.u32("record count")? as usize;
    let mut txs = Vec::with_capacity(count.min(reader.remaining() / MIN_RECORD_LEN));

    for index in 0..count {
        txs.push(
            read_record(&mut reader).map_err(|e| match e {
                TxVaultError::Serialization(msg) => {
                    TxVaultError::Serialization(format!("record {index}: {msg}"))
                }
                other => other,
            })?,
        );
    }

    Ok(txs)
}

fn read_record(reader: &mut Reader<'_>) -> Result<Tx> {
    let digest_len = reader.u16("digest length")? as usize;
    let digest = reader.bytes(digest_len, "digest")?.to_vec();

    let code = reader.u8("kind")?;
    let kind = TxKind::from_code(code).ok_or_else(|| {
        TxVaultError::Serialization(format!("unknown transaction kind 0x{code:02x}"))
    })?;

    let timestamp = from_nanos(reader.i64("timestamp")?);

    let payload = Entry {
        id: reader.string("id")?,
        title: reader.string("title")?,
        secret: reader.string("secret")?,
        created_at: from_nanos(reader.i64("created_at")?),
        updated_at: from_nanos(reader.i64("updated_at")?),
    };

    Ok(Tx {
        digest,
        kind,
        timestamp,
        payload,
    })
}

fn put_str(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u32::try_from(s.len()).map_err(|_| {
        TxVaultError::Serialization(format!("string of {} bytes is too long", s.len()))
    })?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Bounds-checked cursor over the input.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(TxVaultError::Serialization(format!(
                "unexpected end of data reading {what} ({len} bytes needed, {} left)",
                self.remaining()
            )));
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N, what)?);
        Ok(out)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.array::<1>(what)?[0])
    }

    fn u16(&mut self, what: &str) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array(what)?))
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array(what)?))
    }

    fn i64(&mut self, what: &str) -> Result<i64> {
        Ok(i64::from_le_bytes(self.array(what)?))
    }

    fn string(&mut self, what: &str) -> Result<String> {
        let len = self.u32(what)? as usize;
        let raw = self.bytes(len, what)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| TxVaultError::Serialization(format!("{what} is not valid UTF-8")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::tx::{compute_digest, HashAlgorithm};

    fn tx(kind: TxKind, id: &str, title: &str, secret: &str) -> Tx {
        let payload = Entry::new(id, title, secret);
        let timestamp = Utc::now();
        Tx {
            digest: compute_digest(HashAlgorithm::Sha1, kind, timestamp, &payload).unwrap(),
            kind,
            timestamp,
            payload,
        }
    }

    fn sample() -> Vec<Tx> {
        vec![
            tx(TxKind::Add, "id-0", "title title title", "title title"),
            tx(TxKind::Delete, "id-1", "title1 title1 title1", "title1 title1"),
            tx(TxKind::Add, "id-2", "ünïcødé", ""),
            tx(TxKind::Add, "id-3", "", "p@ss\0word"),
        ]
    }

    #[test]
    fn roundtrip_preserves_every_field() {
        let txs = sample();
        let decoded = decode(&encode(&txs).unwrap()).unwrap();
        assert_eq!(decoded, txs);
    }

    #[test]
    fn empty_input_is_empty_log() {
        assert!(decode(&[]).unwrap().is_empty());
        assert_eq!(decode(&encode(&[]).unwrap()).unwrap(), Vec::<Tx>::new());
    }

    #[test]
    fn trailing_zero_padding_is_ignored() {
        let txs = sample();
        let mut bytes = encode(&txs).unwrap();
        bytes.extend_from_slice(&[0u8; 15]);
        assert_eq!(decode(&bytes).unwrap(), txs);
    }

    #[test]
    fn truncated_input_is_an_error() {
        let bytes = encode(&sample()).unwrap();
        for cut in [1, 3, 5, 10, bytes.len() - 1] {
            let result = decode(&bytes[..cut]);
            assert!(
                matches!(result, Err(TxVaultError::Serialization(_))),
                "cut at {cut} should fail"
            );
        }
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[0] = 9;
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let txs = vec![tx(TxKind::Add, "id", "t", "s")];
        let mut bytes = encode(&txs).unwrap();
        // version(1) + count(4) + digest_len(2) + digest(20) -> kind byte
        bytes[1 + 4 + 2 + 20] = 0x05;
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("unknown transaction kind"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let txs = vec![tx(TxKind::Add, "ab", "t", "s")];
        let mut bytes = encode(&txs).unwrap();
        // ... kind(1) + ts(8) + id_len(4) -> first id byte
        let id_start = 1 + 4 + 2 + 20 + 1 + 8 + 4;
        bytes[id_start] = 0xFF;
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        let mut bytes = vec![CODEC_VERSION];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(decode(&bytes).is_err());
    }
}
