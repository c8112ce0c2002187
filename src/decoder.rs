use anyhow::{anyhow, Result};
use bytes::Bytes;
use encoding_rs::SHIFT_JIS;
use flate2::read::{DeflateDecoder, GzDecoder};
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Zstd,
}

impl ContentEncoding {
    /// Reads a `content-encoding` header value. Only the first coding of a
    /// list is honoured; unknown codings are treated as identity.
    pub fn from_header(value: Option<&str>) -> Self {
        let first = value
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match first.as_str() {
            "gzip" | "x-gzip" => ContentEncoding::Gzip,
            "deflate" => ContentEncoding::Deflate,
            "zstd" => ContentEncoding::Zstd,
            _ => ContentEncoding::Identity,
        }
    }
}

fn inflate(mut reader: impl Read) -> Result<Bytes> {
    let mut decoded = Vec::new();
    reader.read_to_end(&mut decoded)?;
    Ok(Bytes::from(decoded))
}

pub fn decompress(data: &[u8], encoding: ContentEncoding) -> Result<Bytes> {
    match encoding {
        ContentEncoding::Identity => Ok(Bytes::copy_from_slice(data)),
        ContentEncoding::Gzip => inflate(GzDecoder::new(data)),
        ContentEncoding::Deflate => inflate(DeflateDecoder::new(data)),
        ContentEncoding::Zstd => Ok(Bytes::from(zstd::decode_all(data)?)),
    }
}

/// Decompresses a response body and decodes it as UTF-8, falling back to
/// Shift_JIS for servers that still send it.
pub fn decode_body(data: &[u8], encoding: ContentEncoding) -> Result<String> {
    let body = decompress(data, encoding)?;

    match String::from_utf8(body.to_vec()) {
        Ok(s) => Ok(s),
        Err(utf8e) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(&body);
            if had_errors {
                return Err(anyhow!(
                    "Failed to decode body with utf8/shift-jis: {}",
                    utf8e
                ));
            }
            Ok(text.into_owned())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use flate2::write::{DeflateEncoder, GzEncoder};
    use flate2::Compression;
    use std::io::Write;

    const TEST_BODY: &str = r#"{"data":{"hero":{"name":"R2-D2"}}}"#;

    #[test]
    fn test_content_encoding_from_header() {
        assert_eq!(ContentEncoding::from_header(None), ContentEncoding::Identity);
        assert_eq!(ContentEncoding::from_header(Some("")), ContentEncoding::Identity);
        assert_eq!(ContentEncoding::from_header(Some("GZIP")), ContentEncoding::Gzip);
        assert_eq!(ContentEncoding::from_header(Some(" deflate ")), ContentEncoding::Deflate);
        assert_eq!(ContentEncoding::from_header(Some("zstd, gzip")), ContentEncoding::Zstd);
        assert_eq!(ContentEncoding::from_header(Some("br")), ContentEncoding::Identity);
    }

    #[test]
    fn test_decode_gzip_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(TEST_BODY.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode_body(&compressed, ContentEncoding::Gzip).unwrap(), TEST_BODY);
    }

    #[test]
    fn test_decode_deflate_body() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(TEST_BODY.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode_body(&compressed, ContentEncoding::Deflate).unwrap(), TEST_BODY);
    }

    #[test]
    fn test_decode_zstd_body() {
        let compressed = zstd::encode_all(TEST_BODY.as_bytes(), 0).unwrap();
        assert_eq!(decode_body(&compressed, ContentEncoding::Zstd).unwrap(), TEST_BODY);
    }

    #[test]
    fn test_decode_identity_body() {
        let body = r#"{"data":{"名前":"R2-D2"}}"#;
        assert_eq!(decode_body(body.as_bytes(), ContentEncoding::Identity).unwrap(), body);
    }

    #[test]
    fn test_decode_shift_jis_fallback() {
        let (encoded, _, _) = SHIFT_JIS.encode("{\"name\":\"日本語\"}");
        let body = decode_body(&encoded, ContentEncoding::Identity).unwrap();
        assert_eq!(body, "{\"name\":\"日本語\"}");
    }

    #[test]
    fn test_corrupted_bodies_fail() {
        let corrupted = [1, 2, 3, 4, 5];
        assert!(decode_body(&[31, 139, 8, 0, 0, 0, 0, 0, 0, 255, 1, 2, 3], ContentEncoding::Gzip).is_err());
        assert!(decode_body(&corrupted, ContentEncoding::Deflate).is_err());
        assert!(decode_body(&corrupted, ContentEncoding::Zstd).is_err());
    }
}
