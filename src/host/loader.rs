//! Background image loader.
//!
//! Hosts that read sprite sheets from disk can hand [`LoadRequest`]s to an
//! [`ImageLoader`]. A worker thread resolves each request and sends a
//! [`LoadOutcome`] back; the host polls outcomes from its frame loop and
//! forwards them to
//! [`PetController::image_loaded`](crate::controller::PetController::image_loaded).
//!
//! Resolution order for a request:
//! 1. the user-supplied path, relative to the asset directory, if it exists;
//! 2. the embedded sheet registered under the sprite's name;
//! 3. the embedded sheet of the default sprite.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};

use crate::error::AssetError;
use crate::host::{ImageOrigin, LoadRequest, LoadTicket, SpriteImage};
use crate::resources::spriteconfig::DEFAULT_SPRITE;

/// Commands sent *to* the loader thread.
#[derive(Debug)]
pub enum LoaderCmd {
    Load(LoadRequest),
    Shutdown,
}

/// Results sent *back* from the loader thread.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub result: Result<SpriteImage, AssetError>,
}

pub struct ImageLoader {
    tx_cmd: Sender<LoaderCmd>,
    rx_out: Receiver<LoadOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl ImageLoader {
    /// Spawn the worker. `embedded` lists the sprite names that have a sheet
    /// bundled with the host.
    pub fn spawn(asset_dir: impl Into<PathBuf>, embedded: Vec<String>) -> Self {
        let asset_dir = asset_dir.into();
        let (tx_cmd, rx_cmd) = unbounded::<LoaderCmd>();
        let (tx_out, rx_out) = unbounded::<LoadOutcome>();
        let handle = std::thread::spawn(move || loader_thread(asset_dir, embedded, rx_cmd, tx_out));
        Self {
            tx_cmd,
            rx_out,
            handle: Some(handle),
        }
    }

    /// Queue a request. Returns the failure outcome right away when the
    /// worker has already stopped.
    pub fn submit(&self, request: LoadRequest) -> Option<LoadOutcome> {
        let ticket = request.ticket;
        match self.tx_cmd.send(LoaderCmd::Load(request)) {
            Ok(()) => None,
            Err(_) => Some(LoadOutcome {
                ticket,
                result: Err(AssetError::LoaderGone),
            }),
        }
    }

    /// Outcomes that arrived since the last poll. Never blocks.
    pub fn poll(&self) -> Vec<LoadOutcome> {
        self.rx_out.try_iter().collect()
    }

    /// Block until one outcome arrives or the worker is gone.
    pub fn wait(&self) -> Option<LoadOutcome> {
        self.rx_out.recv().ok()
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx_cmd.send(LoaderCmd::Shutdown);
            let _ = handle.join();
        }
    }
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn loader_thread(
    asset_dir: PathBuf,
    embedded: Vec<String>,
    rx_cmd: Receiver<LoaderCmd>,
    tx_out: Sender<LoadOutcome>,
) {
    debug!("Image loader started (id={:?})", std::thread::current().id());
    for cmd in rx_cmd.iter() {
        match cmd {
            LoaderCmd::Load(request) => {
                let result = resolve(&asset_dir, &embedded, &request);
                match &result {
                    Ok(image) => info!("Loaded sheet for '{}' from {:?}", image.sprite, image.origin),
                    Err(e) => warn!("Sheet for '{}' failed: {}", request.sprite, e),
                }
                if tx_out
                    .send(LoadOutcome {
                        ticket: request.ticket,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
            LoaderCmd::Shutdown => break,
        }
    }
    debug!("Image loader stopped");
}

fn resolve(
    asset_dir: &Path,
    embedded: &[String],
    request: &LoadRequest,
) -> Result<SpriteImage, AssetError> {
    if let Some(path) = &request.path {
        let full = asset_dir.join(path);
        if full.is_file() {
            let bytes =
                std::fs::read(&full).map_err(|e| AssetError::Unreadable(format!("{:?}: {}", full, e)))?;
            return Ok(SpriteImage {
                sprite: request.sprite.clone(),
                origin: ImageOrigin::File {
                    path: full,
                    byte_len: bytes.len(),
                },
            });
        }
        debug!("{:?} not found, trying embedded sheets", full);
    }

    [request.sprite.as_str(), DEFAULT_SPRITE]
        .into_iter()
        .find(|name| embedded.iter().any(|e| e == name))
        .map(|name| SpriteImage {
            sprite: request.sprite.clone(),
            origin: ImageOrigin::Embedded(name.to_string()),
        })
        .ok_or_else(|| AssetError::NotFound(request.sprite.clone()))
}
