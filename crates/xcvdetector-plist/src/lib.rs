pub mod ascii;

use plist::Value;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("plist error: {0}")]
    Plist(#[from] plist::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ASCII parse error: {0}")]
    Ascii(#[from] ascii::ParseError),
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("unknown format")]
    UnknownFormat,
}

/// Plist encodings an Info.plist may be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlistFormat {
    Xml,
    Binary,
    Ascii,
    Json,
}

impl PlistFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PlistFormat::Xml => "xml1",
            PlistFormat::Binary => "binary1",
            PlistFormat::Ascii => "openstep1",
            PlistFormat::Json => "json",
        }
    }
}

/// The version keys of a target's Info.plist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InfoPlist {
    #[serde(rename = "CFBundleShortVersionString", default)]
    pub version: Option<String>,
    #[serde(rename = "CFBundleVersion", default)]
    pub build: Option<String>,
}

/// Detect the format of a plist file from its contents.
pub fn identify_format(data: &[u8]) -> Option<PlistFormat> {
    if data.starts_with(b"bplist00") {
        return Some(PlistFormat::Binary);
    }

    let trimmed = skip_whitespace_and_bom(data);

    if trimmed.starts_with(b"<?xml")
        || trimmed.starts_with(b"<plist")
        || trimmed.starts_with(b"<!DOCTYPE")
    {
        return Some(PlistFormat::Xml);
    }

    match trimmed.first().copied() {
        Some(b'{' | b'[') => Some(PlistFormat::Json),
        Some(first) if first == b'"' || first == b'(' || first.is_ascii_alphanumeric() => {
            Some(PlistFormat::Ascii)
        }
        _ => None,
    }
}

fn skip_whitespace_and_bom(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

impl InfoPlist {
    fn from_value(value: &Value) -> InfoPlist {
        let dict = value.as_dictionary();
        let field = |key: &str| {
            dict.and_then(|d| d.get(key))
                .and_then(Value::as_string)
                .map(str::to_string)
        };
        InfoPlist {
            version: field("CFBundleShortVersionString"),
            build: field("CFBundleVersion"),
        }
    }
}

fn decode_ascii(data: &[u8]) -> Result<InfoPlist, PlistError> {
    let text = std::str::from_utf8(data)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(InfoPlist::from_value(&ascii::parse(text)?))
}

/// Decode the version keys from Info.plist data in any supported format.
pub fn decode_info_plist(data: &[u8]) -> Result<InfoPlist, PlistError> {
    match identify_format(data).ok_or(PlistError::UnknownFormat)? {
        PlistFormat::Xml | PlistFormat::Binary => Ok(plist::from_bytes(data)?),
        PlistFormat::Ascii => decode_ascii(data),
        // OpenStep dictionaries also open with `{`.
        PlistFormat::Json => match serde_json::from_slice(data) {
            Ok(info) => Ok(info),
            Err(json_err) => decode_ascii(data).map_err(|_| PlistError::Json(json_err)),
        },
    }
}

/// Read and decode an Info.plist file.
pub fn read_info_plist(path: &Path) -> Result<InfoPlist, PlistError> {
    let data = fs::read(path)?;
    decode_info_plist(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML_INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDevelopmentRegion</key>
	<string>$(DEVELOPMENT_LANGUAGE)</string>
	<key>CFBundleShortVersionString</key>
	<string>3.4.0</string>
	<key>CFBundleVersion</key>
	<string>118</string>
	<key>LSRequiresIPhoneOS</key>
	<true/>
</dict>
</plist>
"#;

    #[test]
    fn test_identify_xml() {
        let data = b"<?xml version=\"1.0\"?><plist><dict/></plist>";
        assert_eq!(identify_format(data), Some(PlistFormat::Xml));
    }

    #[test]
    fn test_identify_xml_after_bom() {
        let mut data = vec![0xEF, 0xBB, 0xBF, b'\n'];
        data.extend_from_slice(b"<plist><dict/></plist>");
        assert_eq!(identify_format(&data), Some(PlistFormat::Xml));
    }

    #[test]
    fn test_identify_binary() {
        let mut data = vec![0u8; 32];
        data[..8].copy_from_slice(b"bplist00");
        assert_eq!(identify_format(&data), Some(PlistFormat::Binary));
    }

    #[test]
    fn test_identify_json_and_ascii() {
        assert_eq!(identify_format(b"{ \"a\": 1 }"), Some(PlistFormat::Json));
        assert_eq!(identify_format(b"(a, b)"), Some(PlistFormat::Ascii));
        assert_eq!(identify_format(b"   "), None);
    }

    #[test]
    fn test_decode_xml() {
        let info = decode_info_plist(XML_INFO_PLIST.as_bytes()).unwrap();
        assert_eq!(info.version.as_deref(), Some("3.4.0"));
        assert_eq!(info.build.as_deref(), Some("118"));
    }

    #[test]
    fn test_decode_binary() {
        let mut dict = plist::Dictionary::new();
        dict.insert(
            "CFBundleShortVersionString".to_string(),
            plist::Value::String("2.0".to_string()),
        );
        let mut data = Vec::new();
        plist::Value::Dictionary(dict)
            .to_writer_binary(&mut data)
            .unwrap();

        let info = decode_info_plist(&data).unwrap();
        assert_eq!(info.version.as_deref(), Some("2.0"));
        assert_eq!(info.build, None);
    }

    #[test]
    fn test_decode_json() {
        let data = br#"{ "CFBundleVersion": "7", "CFBundleName": "demo" }"#;
        let info = decode_info_plist(data).unwrap();
        assert_eq!(info.version, None);
        assert_eq!(info.build.as_deref(), Some("7"));
    }

    #[test]
    fn test_decode_ascii() {
        let info = decode_info_plist(b"\"CFBundleVersion\" = \"1\";").unwrap();
        assert_eq!(info.version, None);
        assert_eq!(info.build.as_deref(), Some("1"));
    }

    #[test]
    fn test_decode_ascii_dictionary_braces() {
        let data = b"{\n\tCFBundleShortVersionString = \"2.4\";\n\tCFBundleVersion = 31;\n}\n";
        assert_eq!(identify_format(data), Some(PlistFormat::Json));
        let info = decode_info_plist(data).unwrap();
        assert_eq!(info.version.as_deref(), Some("2.4"));
        assert_eq!(info.build.as_deref(), Some("31"));
    }

    #[test]
    fn test_decode_broken_json_reports_json_error() {
        let err = decode_info_plist(b"{ \"CFBundleVersion\": }").unwrap_err();
        assert!(matches!(err, PlistError::Json(_)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_info_plist(b"\x00\x01\x02"),
            Err(PlistError::UnknownFormat)
        ));
        assert!(decode_info_plist(b"<plist><dict><key>").is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_info_plist(Path::new("/nonexistent/Info.plist")).unwrap_err();
        assert!(matches!(err, PlistError::Io(_)));
    }
}
