use std::path::{Path, PathBuf};

/// URL prefix under which the uploads directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Local directory holding uploaded images.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `data` under a timestamp-derived name and returns its public URL.
    /// Two uploads in the same millisecond with the same extension collide.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> std::io::Result<String> {
        let filename = filename_for(original_name, chrono::Utc::now().timestamp_millis());
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&filename), data).await?;
        tracing::debug!("Stored upload {} ({} bytes)", filename, data.len());
        Ok(public_url(&filename))
    }
}

/// `<epoch-millis><original-extension>`, e.g. `1700000000000.jpg`.
pub fn filename_for(original_name: &str, millis: i64) -> String {
    // Only the final path component counts; browsers may send full paths.
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    match Path::new(base).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{millis}.{ext}"),
        _ => millis.to_string(),
    }
}

pub fn public_url(filename: &str) -> String {
    format!("{PUBLIC_PREFIX}/{filename}")
}
