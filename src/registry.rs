//! Memory of which dates were already committed to the store, the last
//! committed values per date, and the last outcome shown for each date.
//! Persisted to local storage so it survives restarts; it never expires.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate};
use log::warn;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::errors::ErroRascunho;
use crate::local::LocalStore;
use crate::models::{ItemRascunho, Nivel, TipoRascunho};

/// One committed line as last written, keyed by product within its date.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LinhaRegistrada {
    pub chave_produto: String,
    pub quantidade: i64,
    pub valor_unitario: f64,
}

impl LinhaRegistrada {
    pub fn de_item(item: &ItemRascunho) -> Self {
        LinhaRegistrada {
            chave_produto: item.detalhe.chave_produto(),
            quantidade: item.quantidade,
            valor_unitario: item.valor_unitario,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatusData {
    pub nivel: Nivel,
    pub mensagem: String,
    pub registrado_em: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistroDatas {
    datas: BTreeSet<String>,
    instantaneos: BTreeMap<String, Vec<LinhaRegistrada>>,
    status: BTreeMap<String, StatusData>,
}

impl RegistroDatas {
    /// A corrupt or unreadable file reads as an empty registry; the date
    /// set is re-seeded from the store's distinct dates on screen load.
    pub fn carregar(tipo: TipoRascunho, store: &LocalStore) -> Self {
        match store.carregar(tipo.chave_registro()) {
            Ok(registro) => registro.unwrap_or_default(),
            Err(erro) => {
                warn!("falha ao carregar registro de datas {:?}: {erro}", tipo);
                RegistroDatas::default()
            }
        }
    }

    pub fn salvar(&self, tipo: TipoRascunho, store: &LocalStore) -> Result<(), ErroRascunho> {
        store.salvar(tipo.chave_registro(), self)
    }

    pub fn ja_registrada(&self, data: NaiveDate) -> bool {
        self.datas.contains(&chave(data))
    }

    pub fn datas(&self) -> Vec<String> {
        self.datas.iter().cloned().collect()
    }

    pub fn instantaneo(&self, data: NaiveDate) -> &[LinhaRegistrada] {
        self.instantaneos
            .get(&chave(data))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn status(&self, data: NaiveDate) -> Option<&StatusData> {
        self.status.get(&chave(data))
    }

    /// Marks a date as committed and remembers the values just written.
    pub fn marcar_registrada(&mut self, data: NaiveDate, linhas: Vec<LinhaRegistrada>) {
        let chave = chave(data);
        self.datas.insert(chave.clone());
        self.instantaneos.insert(chave, linhas);
    }

    pub fn anotar_status(&mut self, data: NaiveDate, nivel: Nivel, mensagem: impl Into<String>) {
        self.status.insert(
            chave(data),
            StatusData {
                nivel,
                mensagem: mensagem.into(),
                registrado_em: Local::now().to_rfc3339(),
            },
        );
    }

    /// Re-seeds the committed set from the distinct dates already present
    /// in the remote table, the way the production screen did on load.
    pub fn sincronizar_do_banco(
        &mut self,
        conn: &Connection,
        tipo: TipoRascunho,
    ) -> rusqlite::Result<()> {
        let coluna = match tipo {
            TipoRascunho::Producao => "data_venda",
            TipoRascunho::Despesa | TipoRascunho::Sobra => "data",
        };
        let sql = format!(
            "SELECT DISTINCT {coluna} FROM {} ORDER BY {coluna}",
            tipo.tabela()
        );
        let mut stmt = conn.prepare(&sql)?;
        let datas = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        self.datas.extend(datas);
        Ok(())
    }
}

fn chave(data: NaiveDate) -> String {
    data.format("%Y-%m-%d").to_string()
}
