#![allow(dead_code)]

use std::{
    fs,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use iconvault_core::{
    ApiBase, FetchCoordinator, HttpResponse, IconCacheStore, IconKey,
    IconFileSystem, IconLoader, IconTransport, LocalFileSystem,
    MemoryFileSystem, TransportError,
};
use tempfile::{TempDir, tempdir};
use tokio::sync::Semaphore;
use url::Url;

pub const TINTABLE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M10 20v-6h4v6h5v-8h3L12 3L2 12h3v8z"/></svg>"#;
pub const PLAIN_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="#e53935" d="M12 2L2 22h20z"/></svg>"##;

/// Fake icon API: counts requests and holds every response until the test
/// opens the gate.
pub struct GatedTransport {
    calls: AtomicUsize,
    gate: Semaphore,
    response: Mutex<Result<HttpResponse, TransportError>>,
    requested: Mutex<Vec<String>>,
}

impl GatedTransport {
    /// Responses are released immediately.
    pub fn open(response: Result<HttpResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
            response: Mutex::new(response),
            requested: Mutex::new(Vec::new()),
        })
    }

    /// Responses wait for [`GatedTransport::release`].
    pub fn closed(response: Result<HttpResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(0),
            response: Mutex::new(response),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(200, body))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn set_response(&self, response: Result<HttpResponse, TransportError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn release(&self, requests: usize) {
        self.gate.add_permits(requests);
    }
}

#[async_trait]
impl IconTransport for GatedTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        self.gate
            .acquire()
            .await
            .expect("gate never closes")
            .forget();
        self.response.lock().unwrap().clone()
    }
}

/// Cache backing for a [`Harness`].
pub enum Backing {
    Memory(Arc<MemoryFileSystem>),
    /// `LocalFileSystem` under a temp dir; its existence checks suspend.
    Disk(TempDir),
}

pub struct Harness {
    pub backing: Backing,
    pub transport: Arc<GatedTransport>,
    pub loader: IconLoader,
}

impl Harness {
    pub fn new(transport: Arc<GatedTransport>) -> Self {
        let fs = Arc::new(MemoryFileSystem::new());
        Self::build(Backing::Memory(fs.clone()), fs, transport)
    }

    pub fn on_disk(transport: Arc<GatedTransport>) -> Self {
        let dir = tempdir().expect("tempdir");
        let fs = Arc::new(LocalFileSystem::new(dir.path()));
        Self::build(Backing::Disk(dir), fs, transport)
    }

    fn build(
        backing: Backing,
        fs: Arc<dyn IconFileSystem>,
        transport: Arc<GatedTransport>,
    ) -> Self {
        let coordinator = FetchCoordinator::new(
            IconCacheStore::new(fs),
            transport.clone(),
            ApiBase::default(),
        );
        Self {
            backing,
            transport,
            loader: IconLoader::new(coordinator),
        }
    }

    pub fn coordinator(&self) -> &FetchCoordinator {
        self.loader.coordinator()
    }

    /// Every cached file, relative to the cache root, sorted.
    pub fn files(&self) -> Vec<String> {
        match &self.backing {
            Backing::Memory(fs) => fs.files(),
            Backing::Disk(dir) => {
                let mut files = Vec::new();
                collect_files(dir.path(), dir.path(), &mut files);
                files.sort();
                files
            }
        }
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("read cache dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let relative = path.strip_prefix(root).expect("under root");
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
}

pub fn key(raw: &str) -> IconKey {
    IconKey::parse(raw).expect("valid key")
}

/// Poll `condition` until it holds, yielding to the runtime in between.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
