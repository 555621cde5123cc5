use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use axolotl_engine::scene::LightProbe;

use crate::animation::CharacterAsset;
use crate::config::AssetPaths;

use super::{AssetError, AssetLoader, HeightMap};

/// Completion of one asset load.
#[derive(Debug)]
pub enum AssetEvent {
    Character(Result<CharacterAsset, AssetError>),
    LightProbe(Result<LightProbe, AssetError>),
    Displacement(Result<HeightMap, AssetError>),
}

/// In-flight load of the three scene assets.
///
/// A worker thread performs the loads and sends one event per asset.
/// Dropping the request drops the receiver; the worker's remaining sends
/// then fail silently.
pub struct AssetRequest {
    rx: Receiver<AssetEvent>,
    remaining: usize,
}

impl AssetRequest {
    pub const ASSET_COUNT: usize = 3;

    pub fn spawn(loader: Arc<dyn AssetLoader>, paths: AssetPaths) -> Self {
        let (tx, rx) = unbounded();

        let worker_loader = Arc::clone(&loader);
        let worker_paths = paths.clone();
        let worker_tx = tx.clone();
        let spawned = std::thread::Builder::new()
            .name("axolotl-assets".into())
            .spawn(move || load_all(worker_loader.as_ref(), &worker_paths, &worker_tx));

        if let Err(err) = spawned {
            log::warn!("asset worker could not start ({err}); loading on the calling thread");
            load_all(loader.as_ref(), &paths, &tx);
        }

        Self {
            rx,
            remaining: Self::ASSET_COUNT,
        }
    }

    /// Drains completed loads without blocking.
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let events: Vec<AssetEvent> = self.rx.try_iter().collect();
        self.remaining = self.remaining.saturating_sub(events.len());
        events
    }

    /// Blocks for the next completed load, up to `timeout`.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<AssetEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.remaining = self.remaining.saturating_sub(1);
                Some(event)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.remaining = 0;
                None
            }
        }
    }

    /// Whether every asset has reported.
    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

fn load_all(loader: &dyn AssetLoader, paths: &AssetPaths, tx: &Sender<AssetEvent>) {
    // The character and probe are attached together, so load them first.
    let _ = tx.send(AssetEvent::Character(loader.load_character(&paths.character)));
    let _ = tx.send(AssetEvent::LightProbe(loader.load_light_probe(&paths.light_probe)));
    let _ = tx.send(AssetEvent::Displacement(loader.load_displacement(&paths.displacement)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use axolotl_engine::scene::Color;

    struct FlatLoader;

    impl AssetLoader for FlatLoader {
        fn load_character(&self, _: &Path) -> Result<CharacterAsset, AssetError> {
            Err(AssetError::Format("no model".into()))
        }

        fn load_light_probe(&self, _: &Path) -> Result<LightProbe, AssetError> {
            Ok(LightProbe {
                sky: Color::WHITE,
                ground: Color::BLACK,
            })
        }

        fn load_displacement(&self, _: &Path) -> Result<HeightMap, AssetError> {
            HeightMap::new(1, 1, vec![0.5])
        }
    }

    #[test]
    fn every_asset_reports_once() {
        let mut request = AssetRequest::spawn(Arc::new(FlatLoader), AssetPaths::default());
        let mut events = Vec::new();
        while !request.is_done() {
            match request.wait_timeout(Duration::from_secs(5)) {
                Some(event) => events.push(event),
                None => break,
            }
        }

        assert_eq!(events.len(), AssetRequest::ASSET_COUNT);
        assert!(matches!(events[0], AssetEvent::Character(Err(_))));
        assert!(matches!(events[1], AssetEvent::LightProbe(Ok(_))));
        assert!(matches!(events[2], AssetEvent::Displacement(Ok(_))));
        assert!(request.poll().is_empty());
    }
}
