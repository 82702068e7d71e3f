use anyhow::{Result, bail};
use sdkup::core::SdkError;
use sdkup::fetch::Fetcher;
use sdkup::version::Version;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;
use zip::write::SimpleFileOptions;

/// One entry of a test archive.
pub enum Entry<'a> {
    Dir(&'a str, u32),
    File(&'a str, &'a [u8], u32),
}

pub fn build_zip(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        match entry {
            Entry::Dir(name, mode) => {
                let options = SimpleFileOptions::default().unix_permissions(*mode);
                writer.add_directory(*name, options).unwrap();
            }
            Entry::File(name, content, mode) => {
                let options = SimpleFileOptions::default().unix_permissions(*mode);
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// A release archive shaped like the published SDK.
pub fn sdk_zip(version: &str) -> Vec<u8> {
    let marker = marker_text(version);
    build_zip(&[
        Entry::Dir("go_appengine/", 0o755),
        Entry::File("go_appengine/VERSION", marker.as_bytes(), 0o644),
        Entry::File("go_appengine/goapp", b"#!/bin/sh\nexec go \"$@\"\n", 0o755),
        Entry::File("go_appengine/appcfg.py", b"print('appcfg')\n", 0o750),
        Entry::File("go_appengine/goroot/src/net/http/server.go", b"package http\n", 0o644),
    ])
}

pub fn marker_text(version: &str) -> String {
    format!("release: \"{version}\"\ntimestamp: 1481571235\napi_versions: ['go1']\n")
}

/// Lay down an installed SDK of `version` under `install_dir/go_appengine`.
pub fn install_sdk(install_dir: &Path, version: &str) {
    let sdk = install_dir.join("go_appengine");
    std::fs::create_dir_all(sdk.join("goroot/src")).unwrap();
    std::fs::write(sdk.join("VERSION"), marker_text(version)).unwrap();
    std::fs::write(sdk.join(format!("only-in-{version}")), version).unwrap();
}

pub fn read_marker(install_dir: &Path) -> String {
    std::fs::read_to_string(install_dir.join("go_appengine/VERSION")).unwrap()
}

pub fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Serves a manifest and a set of archives from memory.
pub struct MemoryFetcher {
    manifest: String,
    archives: HashMap<String, Vec<u8>>,
    archive_requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new(latest: &str) -> Self {
        Self {
            manifest: marker_text(latest),
            archives: HashMap::new(),
            archive_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_archive(mut self, version: &str, bytes: Vec<u8>) -> Self {
        self.archives.insert(version.to_string(), bytes);
        self
    }

    pub fn archive_requests(&self) -> Vec<String> {
        self.archive_requests.lock().unwrap().clone()
    }
}

impl Fetcher for MemoryFetcher {
    fn manifest_location(&self) -> String {
        "memory://featured/VERSION".to_string()
    }

    async fn fetch_manifest(&self) -> Result<String> {
        Ok(self.manifest.clone())
    }

    async fn fetch_archive(&self, version: &Version, destination: &Path) -> Result<u64> {
        self.archive_requests.lock().unwrap().push(version.to_string());
        let Some(bytes) = self.archives.get(version.as_str()) else {
            bail!(SdkError::NetworkError {
                operation: format!("download SDK archive {version}"),
                reason: "404 Not Found".to_string(),
            });
        };
        tokio::fs::write(destination, bytes).await?;
        Ok(bytes.len() as u64)
    }
}
