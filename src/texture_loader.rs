use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use raylib::prelude::*;
use exif::{Reader, Tag, Value, In};
use thiserror::Error;
use tracing::{debug, warn};

use crate::slide::SlideKey;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("failed to create texture for {path:?}: {reason}")]
    Upload { path: PathBuf, reason: String },
}

pub fn is_image_path(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg" | "bmp" | "gif"),
        None => false,
    }
}

/// Image file contents read off the render thread, not yet decoded.
#[derive(Debug)]
pub struct RawImage {
    pub path: PathBuf,
    pub extension: String,
    pub bytes: Vec<u8>,
    pub orientation: u16,     // EXIF orientation, 1 when absent
}

/// Outcome of one load request, tagged with the slide it was made for.
#[derive(Debug)]
pub struct LoadedImage {
    pub section: usize,
    pub position: usize,
    pub key: SlideKey,
    pub image_ref: String,
    pub image: Result<RawImage, LoadError>,
}

struct LoadRequest {
    section: usize,
    position: usize,
    key: SlideKey,
    image_ref: String,
}

// EXIF orientation (only read reliably for JPEG)
// 1 = Top-left (Normal)
// 3 = Bottom-right (180 deg)
// 6 = Top-right (90 deg clockwise)
// 8 = Bottom-left (270 deg clockwise / 90 deg counter-clockwise)
// Others involve flips and are ignored.
pub fn read_orientation(path: &Path, bytes: &[u8]) -> u16 {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
            Some(Value::Short(values)) if !values.is_empty() => values[0],
            _ => 1,
        },
        Err(e) => {
            debug!(path = ?path, error = %e, "no EXIF orientation");
            1
        }
    }
}

pub fn read_image(path: &Path) -> Result<RawImage, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let orientation = read_orientation(path, &bytes);
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    Ok(RawImage {
        path: path.to_path_buf(),
        extension,
        bytes,
        orientation,
    })
}

/// Reads image files on a worker thread. Results are polled from the render
/// thread, which owns the GPU textures.
pub struct ImageLoader {
    requests: Option<Sender<LoadRequest>>,
    results: Receiver<LoadedImage>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ImageLoader {
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            for request in request_rx {
                let image = read_image(Path::new(&request.image_ref));
                let loaded = LoadedImage {
                    section: request.section,
                    position: request.position,
                    key: request.key,
                    image_ref: request.image_ref,
                    image,
                };
                if result_tx.send(loaded).is_err() {
                    break;
                }
            }
        });
        Self {
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
        }
    }

    pub fn request(&self, section: usize, position: usize, key: SlideKey, image_ref: impl Into<String>) {
        let request = LoadRequest { section, position, key, image_ref: image_ref.into() };
        if let Some(tx) = &self.requests {
            if tx.send(request).is_err() {
                warn!(position, "image loader worker is gone");
            }
        }
    }

    /// Everything that finished since the last poll.
    pub fn poll(&self) -> Vec<LoadedImage> {
        self.results.try_iter().collect()
    }

    #[cfg(test)]
    fn recv_timeout(&self, timeout: std::time::Duration) -> Option<LoadedImage> {
        self.results.recv_timeout(timeout).ok()
    }
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

// --- Decode, Apply EXIF Rotation, Create Texture ---
pub fn create_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    raw: &RawImage,
) -> Result<Texture2D, LoadError> {
    let mut image = Image::load_image_from_mem(&(".".to_string() + &raw.extension), &raw.bytes)
        .map_err(|e| LoadError::Decode { path: raw.path.clone(), reason: e.to_string() })?;

    match raw.orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }

    let texture = rl.load_texture_from_image(thread, &image)
        .map_err(|e| LoadError::Upload { path: raw.path.clone(), reason: e.to_string() })?;

    // Unload the CPU copy
    drop(image);

    Ok(texture)
}
