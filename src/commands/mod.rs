pub mod balanco;
pub mod despesas;
pub mod producao;
pub mod produtos;
pub mod sobras;
pub mod vendas;

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tauri::{AppHandle, Manager};

use crate::commit;
use crate::db::DatabaseExt;
use crate::drafts::LivroRascunho;
use crate::errors::{ErroRascunho, ErroRegistro};
use crate::local::{LocalStore, LocalStoreExt};
use crate::models::{Nivel, NovoItem, ResultadoRegistro, TelaRascunho, TipoRascunho};
use crate::registry::RegistroDatas;

/// Session-held ledgers, one per staging screen. Keeping them in memory
/// preserves a draft within the session even when the disk write failed.
#[derive(Default)]
pub struct Rascunhos(pub Mutex<HashMap<TipoRascunho, LivroRascunho>>);

/// Screens currently running a commit. A second "registrar" click on the
/// same screen gets a soft warning instead of a duplicate write.
#[derive(Default)]
pub struct TravasRegistro(pub Mutex<HashSet<TipoRascunho>>);

impl TravasRegistro {
    /// Claims the screen's commit slot; false when one is already running.
    pub(crate) fn travar(&self, tipo: TipoRascunho) -> bool {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(tipo)
    }

    /// Releases the slot, even when a previous holder panicked with the
    /// lock held; otherwise the screen could never commit again.
    pub(crate) fn destravar(&self, tipo: TipoRascunho) {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&tipo);
    }
}

pub(crate) enum Mutacao {
    Adicionar(NovoItem),
    Editar(i64, NovoItem),
    Remover(i64),
}

/// Runs `f` against the session ledger of a screen, loading it from local
/// storage on first use.
pub(crate) fn com_livro<T>(
    app: &AppHandle,
    tipo: TipoRascunho,
    f: impl FnOnce(&mut LivroRascunho, &LocalStore) -> Result<T, ErroRegistro>,
) -> Result<T, ErroRegistro> {
    let store = app.local_store();
    let rascunhos = app.state::<Rascunhos>();
    let mut mapa = rascunhos
        .0
        .lock()
        .map_err(|_| ErroRascunho::Storage("rascunhos indisponíveis".into()))?;
    if !mapa.contains_key(&tipo) {
        mapa.insert(tipo, LivroRascunho::carregar(tipo, store));
    }
    let livro = mapa.get_mut(&tipo).expect("livro recém inserido");
    f(livro, store)
}

/// Applies one draft mutation and returns the refreshed screen state.
/// Validation and date-conflict failures surface as command errors;
/// storage failures keep the mutation and surface as a transient warning.
pub(crate) fn mutar_rascunho(
    app: &AppHandle,
    tipo: TipoRascunho,
    mutacao: Mutacao,
) -> Result<TelaRascunho, String> {
    com_livro(app, tipo, |livro, store| {
        let resultado = match mutacao {
            Mutacao::Adicionar(item) => livro.adicionar(store, item).map(|_| ()),
            Mutacao::Editar(id, item) => livro.editar(store, id, item),
            Mutacao::Remover(id) => livro.remover(store, id),
        };
        let aviso = match resultado {
            Ok(()) => livro.tomar_aviso(),
            Err(erro @ ErroRascunho::Storage(_)) => Some(erro.to_string()),
            Err(erro) => return Err(erro.into()),
        };
        Ok(montar_tela(livro, store, tipo, aviso))
    })
    .map_err(|e| e.to_string())
}

/// Screen state on load: restored draft plus the committed-date memory,
/// re-seeded from the store's distinct dates like the web screen did.
pub(crate) fn carregar_tela(app: &AppHandle, tipo: TipoRascunho) -> Result<TelaRascunho, String> {
    com_livro(app, tipo, |livro, store| {
        let mut aviso = livro.tomar_aviso();
        let mut registro = RegistroDatas::carregar(tipo, store);
        {
            let db = app.db();
            let conn = db
                .conn
                .lock()
                .map_err(|_| ErroRascunho::Storage("banco indisponível".into()))?;
            if let Err(erro) = registro.sincronizar_do_banco(&conn, tipo) {
                log::warn!("falha ao verificar datas registradas: {erro}");
                aviso = Some("Erro ao verificar datas com registros".to_string());
            }
        }
        if let Err(erro) = registro.salvar(tipo, store) {
            log::warn!("registro de datas não persistido: {erro}");
        }
        Ok(TelaRascunho {
            itens: livro.itens().to_vec(),
            data_ativa: livro.data_ativa(),
            datas_registradas: registro.datas(),
            aviso,
        })
    })
    .map_err(|e| e.to_string())
}

fn montar_tela(
    livro: &LivroRascunho,
    store: &LocalStore,
    tipo: TipoRascunho,
    aviso: Option<String>,
) -> TelaRascunho {
    let datas_registradas = RegistroDatas::carregar(tipo, store).datas();
    TelaRascunho {
        itens: livro.itens().to_vec(),
        data_ativa: livro.data_ativa(),
        datas_registradas,
        aviso,
    }
}

/// The "Registrar" action: takes the per-screen lock, runs the committer
/// against the ledger's active date, releases the lock, and folds soft
/// failures into warning-level results.
pub(crate) fn registrar_tipo(
    app: &AppHandle,
    tipo: TipoRascunho,
) -> Result<ResultadoRegistro, String> {
    if !app.state::<TravasRegistro>().travar(tipo) {
        return Ok(ResultadoRegistro {
            nivel: Nivel::Aviso,
            mensagem: ErroRegistro::RegistroEmAndamento.to_string(),
            linhas_gravadas: 0,
        });
    }

    let resultado = com_livro(app, tipo, |livro, store| {
        let data = livro
            .data_ativa()
            .ok_or(ErroRegistro::NadaParaRegistrar)?;
        let mut registro = RegistroDatas::carregar(tipo, store);
        let db = app.db();
        let conn = db
            .conn
            .lock()
            .map_err(|_| ErroRascunho::Storage("banco indisponível".into()))?;
        commit::registrar(&conn, store, livro, &mut registro, tipo, data)
    });

    app.state::<TravasRegistro>().destravar(tipo);

    match resultado {
        Ok(resultado) => Ok(resultado),
        Err(erro) if erro.eh_aviso() => Ok(ResultadoRegistro {
            nivel: Nivel::Aviso,
            mensagem: erro.to_string(),
            linhas_gravadas: 0,
        }),
        Err(erro) => Err(erro.to_string()),
    }
}
