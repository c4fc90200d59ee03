use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    pub preco_venda: f64,
    pub imagem_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProduto {
    pub nome: String,
    pub preco_venda: f64,
    pub imagem_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProduto {
    pub id: i64,
    pub nome: String,
    pub preco_venda: f64,
    pub imagem_url: Option<String>,
}

/// Row of the `producao` table. `vendas` shares the same shape since sales
/// are a copy of a day's production.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Lancamento {
    pub id: i64,
    pub produto_id: i64,
    pub produto_nome: Option<String>,
    pub quantidade: i64,
    pub preco_unitario: f64,
    pub data_venda: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Despesa {
    pub id: i64,
    pub data: String,
    pub produto: String,
    pub categoria: Option<String>,
    pub quantidade: i64,
    pub valor: f64,
    pub total: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Sobra {
    pub id: i64,
    pub produto_id: Option<i64>,
    pub produto_nome: Option<String>,
    pub quantidade_vendida: i64,
    pub valor_total: f64,
    pub data: String,
}

/// Which staging screen a draft belongs to. Each kind commits to its own
/// remote table and keeps its own local-storage files.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TipoRascunho {
    Producao,
    Despesa,
    Sobra,
}

impl TipoRascunho {
    /// Local-storage key for the staged items (mirrors the
    /// `vendasTemporarias` / `despesasTemporarias` keys of the web UI).
    pub fn chave_itens(self) -> &'static str {
        match self {
            TipoRascunho::Producao => "producao_temporarias",
            TipoRascunho::Despesa => "despesas_temporarias",
            TipoRascunho::Sobra => "sobras_temporarias",
        }
    }

    pub fn chave_registro(self) -> &'static str {
        match self {
            TipoRascunho::Producao => "registro_producao",
            TipoRascunho::Despesa => "registro_despesas",
            TipoRascunho::Sobra => "registro_sobras",
        }
    }

    pub fn tabela(self) -> &'static str {
        match self {
            TipoRascunho::Producao => "producao",
            TipoRascunho::Despesa => "despesas",
            TipoRascunho::Sobra => "sobras",
        }
    }
}

/// Kind-specific fields of a staged line item. Expenses carry a free-text
/// product and category instead of a product id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum DetalheItem {
    Producao {
        produto_id: i64,
        produto_nome: Option<String>,
    },
    Despesa {
        produto: String,
        categoria: String,
    },
    Sobra {
        producao_id: i64,
        produto_id: i64,
        produto_nome: Option<String>,
    },
}

impl DetalheItem {
    /// Natural key of the line within its date. Local draft ids are not
    /// remote ids, so reconciliation matches on product + date instead.
    pub fn chave_produto(&self) -> String {
        match self {
            DetalheItem::Producao { produto_id, .. } => produto_id.to_string(),
            DetalheItem::Despesa { produto, .. } => produto.clone(),
            DetalheItem::Sobra { produto_id, .. } => produto_id.to_string(),
        }
    }

    pub fn tipo(&self) -> TipoRascunho {
        match self {
            DetalheItem::Producao { .. } => TipoRascunho::Producao,
            DetalheItem::Despesa { .. } => TipoRascunho::Despesa,
            DetalheItem::Sobra { .. } => TipoRascunho::Sobra,
        }
    }
}

/// Candidate line item as submitted by a form, before validation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NovoItem {
    pub data: NaiveDate,
    pub quantidade: i64,
    pub valor_unitario: f64,
    #[serde(flatten)]
    pub detalhe: DetalheItem,
}

/// A staged line item. `total` is derived and recomputed on every mutation,
/// never trusted from storage.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItemRascunho {
    pub id: i64,
    pub data: NaiveDate,
    pub quantidade: i64,
    pub valor_unitario: f64,
    pub total: f64,
    #[serde(flatten)]
    pub detalhe: DetalheItem,
}

/// Everything a staging screen needs to render: the draft, its active date
/// and which dates were already committed.
#[derive(Debug, Serialize, Deserialize)]
pub struct TelaRascunho {
    pub itens: Vec<ItemRascunho>,
    pub data_ativa: Option<NaiveDate>,
    pub datas_registradas: Vec<String>,
    pub aviso: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Nivel {
    Sucesso,
    Aviso,
    Erro,
}

/// Outcome of a "registrar" action, shown transiently by the UI.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResultadoRegistro {
    pub nivel: Nivel,
    pub mensagem: String,
    pub linhas_gravadas: usize,
}
