use std::{
    cell::RefCell,
    rc::Rc,
    sync::Arc,
};
use bus::{Bus, BusReader};
use three_d::CpuTexture;

use crate::log; // macro import
use crate::assets::TextureBinding;
use crate::error::{DemoError, Result};
use crate::utils::execute_future;


type ItemCallback = Box<dyn FnMut(&str, usize, usize)>;


/// Snapshot of the loading counters for display
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadingStatus {
    pub loaded: usize,
    pub total: usize,
    pub failed: usize,
}
impl LoadingStatus {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f32 / self.total as f32
        }
    }

    pub fn is_done(&self) -> bool {
        self.loaded == self.total
    }
}


/// Counts tracked loading items and reports their lifecycle.
///
/// Callbacks fire as `start, progress*, load`. A failed item reports `error`
/// right before its `progress`, and `load` still fires once every item of the
/// batch has ended.
#[derive(Default)]
pub struct LoadingManager {
    total: usize,
    loaded: usize,
    failed: usize,
    is_loading: bool,
    on_start: Option<ItemCallback>,
    on_progress: Option<ItemCallback>,
    on_load: Option<Box<dyn FnMut()>>,
    on_error: Option<Box<dyn FnMut(&str)>>,
}
impl LoadingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, f: impl FnMut(&str, usize, usize) + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_progress(mut self, f: impl FnMut(&str, usize, usize) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_load(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_load = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn item_start(&mut self, url: &str) {
        self.total += 1;
        if !self.is_loading {
            if let Some(f) = self.on_start.as_mut() {
                f(url, self.loaded, self.total);
            }
        }
        self.is_loading = true;
    }

    pub fn item_end(&mut self, url: &str) {
        self.loaded += 1;
        if let Some(f) = self.on_progress.as_mut() {
            f(url, self.loaded, self.total);
        }
        if self.loaded == self.total {
            self.is_loading = false;
            if let Some(f) = self.on_load.as_mut() {
                f();
            }
        }
    }

    pub fn item_error(&mut self, url: &str) {
        self.failed += 1;
        if let Some(f) = self.on_error.as_mut() {
            f(url);
        }
    }

    pub fn status(&self) -> LoadingStatus {
        LoadingStatus {
            loaded: self.loaded,
            total: self.total,
            failed: self.failed,
        }
    }
}


/// Manager that reports to the console and nothing else
pub fn logging_manager() -> LoadingManager {
    LoadingManager::new()
        .on_start(|url, loaded, total| log!("loading started: {} ({}/{})", url, loaded, total))
        .on_progress(|url, loaded, total| log!("loading in progress.. {} ({}/{})", url, loaded, total))
        .on_load(|| log!("loading complete"))
        .on_error(|url| log!("loading failed: {}", url))
}


/// Decoded image data on its way to the render loop
#[derive(Clone)]
pub enum Loaded {
    Texture {
        binding: TextureBinding,
        texture: Arc<CpuTexture>,
    },
    /// Faces in +x, -x, +y, -y, +z, -z order
    Environment {
        faces: Arc<[CpuTexture; 6]>,
    },
}


/// Fetches images without blocking the frame loop.
///
/// Each request is registered with the manager immediately; the decoded
/// result is broadcast on the bus once its future completes. Failures are only
/// logged and counted.
pub struct TextureLoader {
    manager: Rc<RefCell<LoadingManager>>,
    bus: Rc<RefCell<Bus<Loaded>>>,
}
impl TextureLoader {
    /// `capacity` must cover every request so broadcasting never has to wait
    pub fn new(manager: Rc<RefCell<LoadingManager>>, capacity: usize) -> (Self, BusReader<Loaded>) {
        let mut bus = Bus::<Loaded>::new(capacity.max(1));
        let rx = bus.add_rx();
        let loader = Self {
            manager,
            bus: Rc::new(RefCell::new(bus)),
        };
        (loader, rx)
    }

    pub fn load(&self, binding: TextureBinding) {
        let Some(url) = binding.url() else {
            log!("TextureLoader::load(): {:?} has no {:?} map", binding.set, binding.slot);
            return;
        };
        self.manager.borrow_mut().item_start(&url);

        let manager = Rc::clone(&self.manager);
        let bus = Rc::clone(&self.bus);
        execute_future(async move {
            match fetch_texture(&url).await {
                Ok(texture) => deliver(&bus, Loaded::Texture { binding, texture: Arc::new(texture) }),
                Err(e) => {
                    log!("TextureLoader::load(): {}", e);
                    manager.borrow_mut().item_error(&url);
                }
            }
            manager.borrow_mut().item_end(&url);
        });
    }

    /// Loads six faces as a single tracked item
    pub fn load_cube(&self, urls: [String; 6]) {
        let item = urls[0].clone();
        self.manager.borrow_mut().item_start(&item);

        let manager = Rc::clone(&self.manager);
        let bus = Rc::clone(&self.bus);
        execute_future(async move {
            match fetch_cube(&urls).await {
                Ok(faces) => deliver(&bus, Loaded::Environment { faces: Arc::new(faces) }),
                Err(e) => {
                    log!("TextureLoader::load_cube(): {}", e);
                    manager.borrow_mut().item_error(&item);
                }
            }
            manager.borrow_mut().item_end(&item);
        });
    }
}


fn deliver(bus: &Rc<RefCell<Bus<Loaded>>>, msg: Loaded) {
    // non-blocking (i.e., no atomic.wait)
    if bus.borrow_mut().try_broadcast(msg).is_err() {
        log!("TextureLoader: bus is full, dropping a decoded texture");
    }
}


async fn fetch_texture(url: &str) -> Result<CpuTexture> {
    let mut raw = three_d_asset::io::load_async(&[url])
        .await
        .map_err(|source| DemoError::Asset { url: url.to_string(), source })?;
    raw.deserialize(url)
        .map_err(|source| DemoError::Asset { url: url.to_string(), source })
}


async fn fetch_cube(urls: &[String; 6]) -> Result<[CpuTexture; 6]> {
    let mut raw = three_d_asset::io::load_async(urls)
        .await
        .map_err(|source| DemoError::Asset { url: urls[0].clone(), source })?;

    let mut faces = Vec::with_capacity(6);
    for url in urls {
        let face: CpuTexture = raw
            .deserialize(url)
            .map_err(|source| DemoError::Asset { url: url.clone(), source })?;
        faces.push(face);
    }
    faces
        .try_into()
        .map_err(|_| DemoError::UnsupportedTexels(urls[0].clone()))
}
