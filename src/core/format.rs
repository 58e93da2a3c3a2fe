use crate::utils::error::{ImportError, Result};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Unsupported,
}

impl SourceFormat {
    /// 只看副檔名，不讀檔案內容；副檔名大小寫不敏感
    pub fn detect(path: &str) -> Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => SourceFormat::Csv,
            Some("json") => SourceFormat::Json,
            _ => SourceFormat::Unsupported,
        }
    }

    /// Like `detect`, but turns `Unsupported` into the fatal error.
    pub fn require(path: &str) -> Result<Self> {
        match Self::detect(path) {
            SourceFormat::Unsupported => Err(ImportError::UnsupportedFormat {
                path: path.to_string(),
            }),
            format => Ok(format),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Json => "json",
            SourceFormat::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
