//! Durable local storage: one JSON file per key under the app data
//! directory. This is the desktop counterpart of the browser localStorage
//! the screens used to stage drafts and remember committed dates.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tauri::{AppHandle, Manager};

use crate::errors::ErroRascunho;

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(app_handle: &AppHandle) -> Result<Self, String> {
        let base = app_handle
            .path()
            .app_data_dir()
            .map_err(|e| format!("Falha ao resolver o diretório de dados: {e}"))?;
        let dir = base.join("local");
        fs::create_dir_all(&dir).map_err(|e| format!("Falha ao criar {}: {e}", dir.display()))?;
        Ok(LocalStore { dir })
    }

    pub fn at(dir: PathBuf) -> Result<Self, String> {
        fs::create_dir_all(&dir).map_err(|e| format!("Falha ao criar {}: {e}", dir.display()))?;
        Ok(LocalStore { dir })
    }

    fn caminho(&self, chave: &str) -> PathBuf {
        self.dir.join(format!("{chave}.json"))
    }

    /// Loads a key, `None` when it was never written. A corrupt file is a
    /// storage error, not a silent reset.
    pub fn carregar<T: DeserializeOwned>(&self, chave: &str) -> Result<Option<T>, ErroRascunho> {
        let caminho = self.caminho(chave);
        if !caminho.exists() {
            return Ok(None);
        }
        let texto = fs::read_to_string(&caminho).map_err(|e| ErroRascunho::Storage(e.to_string()))?;
        let valor = serde_json::from_str(&texto).map_err(|e| ErroRascunho::Storage(e.to_string()))?;
        Ok(Some(valor))
    }

    pub fn salvar<T: Serialize>(&self, chave: &str, valor: &T) -> Result<(), ErroRascunho> {
        let texto =
            serde_json::to_string_pretty(valor).map_err(|e| ErroRascunho::Storage(e.to_string()))?;
        fs::write(self.caminho(chave), texto).map_err(|e| ErroRascunho::Storage(e.to_string()))
    }

    pub fn remover(&self, chave: &str) -> Result<(), ErroRascunho> {
        let caminho = self.caminho(chave);
        if caminho.exists() {
            fs::remove_file(caminho).map_err(|e| ErroRascunho::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

pub trait LocalStoreExt {
    fn local_store(&self) -> &LocalStore;
}

impl LocalStoreExt for AppHandle {
    fn local_store(&self) -> &LocalStore {
        self.state::<LocalStore>().inner()
    }
}
