use chrono::NaiveDate;
use tauri::AppHandle;

use super::{carregar_tela, com_livro, registrar_tipo};
use crate::db::DatabaseExt;
use crate::errors::{ErroRascunho, ErroRegistro};
use crate::models::{
    DetalheItem, NovoItem, ResultadoRegistro, Sobra, TelaRascunho, TipoRascunho,
};
use crate::registry::RegistroDatas;

#[tauri::command]
pub fn carregar_sobras(app: AppHandle) -> Result<TelaRascunho, String> {
    carregar_tela(&app, TipoRascunho::Sobra)
}

/// Stages the leftover of one production row. The quantity is clamped to
/// what was produced; a zero leftover stages nothing. Re-staging the same
/// production row replaces the previous entry.
#[tauri::command]
pub fn lancar_sobra(
    app: AppHandle,
    producao_id: i64,
    quantidade: i64,
) -> Result<TelaRascunho, String> {
    let (produto_id, produto_nome, produzida, preco_unitario, data_venda) = {
        let db = app.db();
        let conn = db.conn.lock().map_err(|e| e.to_string())?;
        conn.query_row(
            "SELECT pr.produto_id, p.nome, pr.quantidade, pr.preco_unitario, pr.data_venda
             FROM producao pr
             LEFT JOIN produtos p ON pr.produto_id = p.id
             WHERE pr.id = ?1",
            [producao_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .map_err(|_| "Produção não encontrada".to_string())?
    };

    let data = NaiveDate::parse_from_str(&data_venda, "%Y-%m-%d")
        .map_err(|_| format!("Data inválida na produção: {data_venda}"))?;
    let quantidade = quantidade.clamp(0, produzida);

    com_livro(&app, TipoRascunho::Sobra, |livro, store| {
        if quantidade == 0 {
            return Ok(tela_sobras(livro, store));
        }

        let novo = NovoItem {
            data,
            quantidade,
            valor_unitario: preco_unitario,
            detalhe: DetalheItem::Sobra {
                producao_id,
                produto_id,
                produto_nome: produto_nome.clone(),
            },
        };

        let existente = livro.itens().iter().find_map(|item| match &item.detalhe {
            DetalheItem::Sobra { producao_id: id, .. } if *id == producao_id => Some(item.id),
            _ => None,
        });

        let resultado = match existente {
            Some(id) => livro.editar(store, id, novo),
            None => livro.adicionar(store, novo).map(|_| ()),
        };
        match resultado {
            Ok(()) => Ok(tela_sobras(livro, store)),
            Err(erro @ ErroRascunho::Storage(_)) => {
                let mut tela = tela_sobras(livro, store);
                tela.aviso = Some(erro.to_string());
                Ok(tela)
            }
            Err(erro) => Err(erro.into()),
        }
    })
    .map_err(|e: ErroRegistro| e.to_string())
}

fn tela_sobras(livro: &crate::drafts::LivroRascunho, store: &crate::local::LocalStore) -> TelaRascunho {
    let datas_registradas = RegistroDatas::carregar(TipoRascunho::Sobra, store).datas();
    TelaRascunho {
        itens: livro.itens().to_vec(),
        data_ativa: livro.data_ativa(),
        datas_registradas,
        aviso: None,
    }
}

#[tauri::command]
pub fn registrar_sobras(app: AppHandle) -> Result<ResultadoRegistro, String> {
    registrar_tipo(&app, TipoRascunho::Sobra)
}

#[tauri::command]
pub fn consultar_sobras(
    app: AppHandle,
    inicio: Option<String>,
    fim: Option<String>,
) -> Result<Vec<Sobra>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut sql = String::from(
        "SELECT s.id, s.produto_id, p.nome, s.quantidade_vendida, s.valor_total, s.data
         FROM sobras s
         LEFT JOIN produtos p ON s.produto_id = p.id",
    );
    let mut filtros: Vec<String> = Vec::new();
    if inicio.is_some() {
        filtros.push("s.data >= ?1".to_string());
    }
    if fim.is_some() {
        filtros.push(format!("s.data <= ?{}", filtros.len() + 1));
    }
    if !filtros.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filtros.join(" AND "));
    }
    sql.push_str(" ORDER BY s.data DESC, s.id DESC");

    let parametros: Vec<String> = inicio.into_iter().chain(fim).collect();
    let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;

    let sobras = stmt
        .query_map(rusqlite::params_from_iter(parametros.iter()), |row| {
            Ok(Sobra {
                id: row.get(0)?,
                produto_id: row.get(1)?,
                produto_nome: row.get(2)?,
                quantidade_vendida: row.get(3)?,
                valor_total: row.get(4)?,
                data: row.get(5)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(sobras)
}
