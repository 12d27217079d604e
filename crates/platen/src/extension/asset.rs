//! Cache-busted asset URLs.

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use serde_json::Value;

use crate::engine::Engine;
use crate::error::{PlatenError, Result};
use crate::extension::Extension;
use crate::template::renderer::Template;

/// Extension that adds an `asset` template function producing "cache busted"
/// asset URLs.
///
/// The version stamp is the asset file's last-modified time in seconds since
/// the Unix epoch. By default it is appended as a query string
/// (`style.css?v=123`); with the filename method enabled it is embedded in
/// the filename instead (`style.123.css`), for servers configured to rewrite
/// such paths.
#[derive(Debug, Clone)]
pub struct Asset {
    path: PathBuf,
    filename_method: bool,
}

impl Asset {
    /// Creates the extension rooted at the asset directory.
    pub fn new(path: impl Into<PathBuf>, filename_method: bool) -> Self {
        Self {
            path: path.into(),
            filename_method,
        }
    }

    /// Builds the cache-busted URL for an asset.
    ///
    /// # Errors
    ///
    /// Returns [`PlatenError::AssetNotFound`] if the asset file does not
    /// exist under the configured directory.
    pub fn cached_url(&self, url: &str) -> Result<String> {
        let file_path = self.path.join(url.trim_start_matches('/'));
        if !file_path.is_file() {
            return Err(PlatenError::AssetNotFound {
                url: url.to_string(),
                directory: self.path.clone(),
            });
        }

        let modified = std::fs::metadata(&file_path)?.modified()?;
        let version = modified
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let (directory, file) = match url.rsplit_once('/') {
            None => (String::new(), url),
            Some(("", file)) => ("/".to_string(), file),
            Some((dir, file)) => (format!("{dir}/"), file),
        };
        let (stem, extension) = file.rsplit_once('.').unwrap_or((file, ""));

        if self.filename_method {
            Ok(format!("{directory}{stem}.{version}.{extension}"))
        } else {
            Ok(format!("{directory}{stem}.{extension}?v={version}"))
        }
    }
}

impl Extension for Asset {
    fn register(&self, engine: &mut Engine) -> Result<()> {
        let asset = self.clone();
        engine.register_function("asset", move |_t: &mut Template, args: &[Value]| {
            let url = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| PlatenError::program("asset() expects a URL argument"))?;
            asset.cached_url(url).map(Value::String)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_query_string_version() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("style.css"), "body{}").unwrap();

        let asset = Asset::new(dir.path(), false);
        let url = asset.cached_url("style.css").unwrap();

        assert!(url.starts_with("style.css?v="), "got {url}");
        let version: u64 = url.rsplit_once('=').unwrap().1.parse().unwrap();
        assert!(version > 0);
    }

    #[test]
    fn test_filename_method_version() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("style.css"), "body{}").unwrap();

        let asset = Asset::new(dir.path(), true);
        let url = asset.cached_url("style.css").unwrap();

        assert!(url.starts_with("style."), "got {url}");
        assert!(url.ends_with(".css"), "got {url}");
        let middle = &url["style.".len()..url.len() - ".css".len()];
        assert!(middle.parse::<u64>().is_ok(), "got {url}");
    }

    #[test]
    fn test_preserves_leading_slash_and_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/all.css"), "").unwrap();
        fs::write(dir.path().join("root.css"), "").unwrap();

        let asset = Asset::new(dir.path(), false);

        let nested = asset.cached_url("/css/all.css").unwrap();
        assert!(nested.starts_with("/css/all.css?v="), "got {nested}");

        let rooted = asset.cached_url("/root.css").unwrap();
        assert!(rooted.starts_with("/root.css?v="), "got {rooted}");
    }

    #[test]
    fn test_missing_asset_fails() {
        let dir = tempdir().unwrap();
        let asset = Asset::new(dir.path(), false);

        let result = asset.cached_url("ghost.css");
        assert!(matches!(result, Err(PlatenError::AssetNotFound { .. })));
    }

    #[test]
    fn test_registers_asset_function() {
        let dir = tempdir().unwrap();
        let mut engine = Engine::new();
        engine.load_extension(&Asset::new(dir.path(), false)).unwrap();

        assert!(engine.functions().exists("asset"));
    }
}
