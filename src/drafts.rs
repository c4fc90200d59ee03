//! Locally staged line items for one date, held before the batch commit.
//!
//! The ledger mirrors the old web screens: items live in local storage
//! under one key per screen, newest first, and every mutation writes the
//! whole list back. A single batch never mixes dates.

use chrono::{NaiveDate, Utc};
use log::warn;

use crate::errors::ErroRascunho;
use crate::local::LocalStore;
use crate::models::{DetalheItem, ItemRascunho, NovoItem, TipoRascunho};

pub struct LivroRascunho {
    tipo: TipoRascunho,
    itens: Vec<ItemRascunho>,
    data_ativa: Option<NaiveDate>,
    proximo_id: i64,
    aviso_carga: Option<String>,
}

impl LivroRascunho {
    /// Restores the staged items for a screen. The active date is whatever
    /// the first (most recent) stored item carries. A corrupt or unreadable
    /// file starts the screen empty with a warning instead of blocking it.
    pub fn carregar(tipo: TipoRascunho, store: &LocalStore) -> Self {
        let (itens, aviso_carga) = match store.carregar::<Vec<ItemRascunho>>(tipo.chave_itens()) {
            Ok(itens) => (itens.unwrap_or_default(), None),
            Err(erro) => {
                warn!("falha ao carregar rascunho {:?}: {erro}", tipo);
                (
                    Vec::new(),
                    Some("Erro ao carregar itens temporários".to_string()),
                )
            }
        };
        let data_ativa = itens.first().map(|item| item.data);
        let maior_id = itens.iter().map(|item| item.id).max().unwrap_or(0);
        // Local ids only need to be unique within the draft; seed them the
        // way the web UI did, from the clock.
        let proximo_id = maior_id.max(Utc::now().timestamp_millis()) + 1;
        LivroRascunho {
            tipo,
            itens,
            data_ativa,
            proximo_id,
            aviso_carga,
        }
    }

    pub fn vazio(tipo: TipoRascunho) -> Self {
        LivroRascunho {
            tipo,
            itens: Vec::new(),
            data_ativa: None,
            proximo_id: Utc::now().timestamp_millis(),
            aviso_carga: None,
        }
    }

    pub fn itens(&self) -> &[ItemRascunho] {
        &self.itens
    }

    pub fn data_ativa(&self) -> Option<NaiveDate> {
        self.data_ativa
    }

    /// Warning from a failed restore, shown once by the next screen build.
    pub fn tomar_aviso(&mut self) -> Option<String> {
        self.aviso_carga.take()
    }

    pub fn itens_da_data(&self, data: NaiveDate) -> Vec<&ItemRascunho> {
        self.itens.iter().filter(|item| item.data == data).collect()
    }

    /// Validates, assigns a local id, derives the total and prepends the
    /// item. The first item of an empty ledger fixes the active date.
    /// Returns the local id of the staged item.
    pub fn adicionar(&mut self, store: &LocalStore, novo: NovoItem) -> Result<i64, ErroRascunho> {
        self.validar(&novo)?;
        self.conferir_data(novo.data)?;

        if self.itens.is_empty() {
            self.data_ativa = Some(novo.data);
        }

        let id = self.proximo_id;
        self.proximo_id += 1;
        let item = montar_item(id, novo);
        self.itens.insert(0, item);
        self.persistir(store)?;
        Ok(id)
    }

    /// Applies the patched values to an existing item under the same rules
    /// as `adicionar`; the derived total is recomputed.
    pub fn editar(&mut self, store: &LocalStore, id: i64, novo: NovoItem) -> Result<(), ErroRascunho> {
        self.validar(&novo)?;
        self.conferir_data(novo.data)?;

        let posicao = self
            .itens
            .iter()
            .position(|item| item.id == id)
            .ok_or(ErroRascunho::ItemNaoEncontrado(id))?;

        self.itens[posicao] = montar_item(id, novo);
        self.persistir(store)
    }

    /// Removes by local id. The active date is kept even when the ledger
    /// becomes empty; the next `adicionar` on an empty ledger resets it.
    pub fn remover(&mut self, store: &LocalStore, id: i64) -> Result<(), ErroRascunho> {
        let antes = self.itens.len();
        self.itens.retain(|item| item.id != id);
        if self.itens.len() == antes {
            return Err(ErroRascunho::ItemNaoEncontrado(id));
        }
        self.persistir(store)
    }

    /// Empties the ledger after a successful commit.
    pub fn limpar(&mut self, store: &LocalStore) -> Result<(), ErroRascunho> {
        self.itens.clear();
        self.data_ativa = None;
        store.remover(self.tipo.chave_itens())
    }

    fn conferir_data(&self, data: NaiveDate) -> Result<(), ErroRascunho> {
        if !self.itens.is_empty() && Some(data) != self.data_ativa {
            return Err(ErroRascunho::ConflitoDeData);
        }
        Ok(())
    }

    fn validar(&self, novo: &NovoItem) -> Result<(), ErroRascunho> {
        if novo.detalhe.tipo() != self.tipo {
            return Err(ErroRascunho::Validacao(
                "tipo de item não corresponde à tela".into(),
            ));
        }
        if novo.quantidade <= 0 {
            return Err(ErroRascunho::Validacao("Quantidade inválida".into()));
        }
        if !novo.valor_unitario.is_finite() || novo.valor_unitario < 0.0 {
            return Err(ErroRascunho::Validacao("Valor unitário inválido".into()));
        }
        match &novo.detalhe {
            DetalheItem::Producao { produto_id, .. } | DetalheItem::Sobra { produto_id, .. } => {
                if *produto_id <= 0 {
                    return Err(ErroRascunho::Validacao("Selecione um produto".into()));
                }
            }
            DetalheItem::Despesa { produto, categoria } => {
                if produto.trim().is_empty() {
                    return Err(ErroRascunho::Validacao("Selecione um produto".into()));
                }
                if categoria.trim().is_empty() {
                    return Err(ErroRascunho::Validacao("Selecione uma categoria".into()));
                }
                // Expenses always cost something; a zero line is a typo.
                if novo.valor_unitario <= 0.0 {
                    return Err(ErroRascunho::Validacao("Valor unitário inválido".into()));
                }
            }
        }
        Ok(())
    }

    fn persistir(&self, store: &LocalStore) -> Result<(), ErroRascunho> {
        if let Err(erro) = store.salvar(self.tipo.chave_itens(), &self.itens) {
            warn!("falha ao persistir rascunho {:?}: {erro}", self.tipo);
            return Err(erro);
        }
        Ok(())
    }
}

fn montar_item(id: i64, novo: NovoItem) -> ItemRascunho {
    ItemRascunho {
        id,
        data: novo.data,
        quantidade: novo.quantidade,
        valor_unitario: novo.valor_unitario,
        total: novo.quantidade as f64 * novo.valor_unitario,
        detalhe: novo.detalhe,
    }
}
