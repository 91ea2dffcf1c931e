use crate::config::EngineConfig;
use btree::IndexFile;
use btree::errors::TreeError;
use buffer::buffer::BufferManager;
use file::disk_file_manager::DiskFileManager;
use file::file_catalog::FileCatalog;
use file::index_catalog::IndexCatalog;
use std::rc::Rc;
use std::sync::Arc;
use storage_api::storage_manager::StorageManager;

/// Owner of the singleton-like instances that are needed for the entire
/// lifetime of the REPL: one buffer pool and one pair of catalogs shared by
/// every index opened by name.
#[derive(Debug)]
pub struct EngineEnvironment {
    pub file_manager: Rc<DiskFileManager>,
    pub buffer: Rc<BufferManager<DiskFileManager>>,
    pub storage: Rc<StorageManager<DiskFileManager>>,
    pub file_catalog: Arc<FileCatalog>,
    pub index_catalog: Rc<IndexCatalog>,
    pub engine_config: EngineConfig,
}

impl EngineEnvironment {
    pub fn new(config: EngineConfig) -> Self {
        let file_catalog = Arc::new(FileCatalog::new());
        let file_manager = Rc::new(DiskFileManager::new(file_catalog.clone()));
        let buffer = Rc::new(BufferManager::new(
            file_manager.clone(),
            config.storage.buffer_pages.get(),
        ));
        let storage = Rc::new(StorageManager::new(buffer.clone()));
        Self {
            file_manager,
            buffer,
            storage,
            file_catalog,
            index_catalog: Rc::new(IndexCatalog::new()),
            engine_config: config,
        }
    }

    /// Opens (creating on first use) the named index under `data_dir`.
    pub fn open_index(&self, name: &str) -> Result<IndexFile<DiskFileManager>, TreeError> {
        let path = self.engine_config.storage.data_dir.join(format!("{name}.tbl"));
        IndexFile::open(
            name,
            self.storage.clone(),
            self.index_catalog.clone(),
            &self.file_catalog,
            path,
        )
    }
}
