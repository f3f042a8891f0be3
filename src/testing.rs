//! In-memory collaborators shared by the unit tests.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use image::{ImageBuffer, ImageFormat, Rgba};

use crate::helpers::transport::{FetchResponse, Transport, TransportError};
use crate::steam::{LookupError, MetadataLookup};

/// Serves canned responses by exact URL; anything else is a 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, FetchResponse>,
    requested: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn serve(mut self, url: impl Into<String>, status: u16, body: Vec<u8>) -> Self {
        self.routes.insert(url.into(), FetchResponse::new(status, body));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        self.requested.lock().unwrap().push(url.to_string());
        Ok(self
            .routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| FetchResponse::new(404, Vec::new())))
    }
}

/// Knows a fixed set of client icons and records every query.
#[derive(Default)]
pub struct FakeLookup {
    icons: HashMap<u64, String>,
    queried: Mutex<Vec<u64>>,
}

impl FakeLookup {
    pub fn with_icon(mut self, game_id: u64, icon: &str) -> Self {
        self.icons.insert(game_id, icon.to_string());
        self
    }

    pub fn queried(&self) -> Vec<u64> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataLookup for FakeLookup {
    async fn client_icon(&self, game_id: u64) -> Result<String, LookupError> {
        self.queried.lock().unwrap().push(game_id);
        self.icons
            .get(&game_id)
            .cloned()
            .ok_or(LookupError::MissingClientIcon(game_id))
    }
}

/// A 16x16 ICO, the format Steam serves client icons in.
pub fn tiny_ico() -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(16, 16, Rgba([200, 30, 30, 255]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Ico).unwrap();
    bytes.into_inner()
}

pub fn write_shortcut(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
