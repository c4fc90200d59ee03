use tauri::AppHandle;

use super::{carregar_tela, mutar_rascunho, registrar_tipo, Mutacao};
use crate::db::DatabaseExt;
use crate::models::{Lancamento, NovoItem, ResultadoRegistro, TelaRascunho, TipoRascunho};

#[tauri::command]
pub fn carregar_producao(app: AppHandle) -> Result<TelaRascunho, String> {
    carregar_tela(&app, TipoRascunho::Producao)
}

#[tauri::command]
pub fn adicionar_producao(app: AppHandle, item: NovoItem) -> Result<TelaRascunho, String> {
    mutar_rascunho(&app, TipoRascunho::Producao, Mutacao::Adicionar(item))
}

#[tauri::command]
pub fn editar_producao(app: AppHandle, id: i64, item: NovoItem) -> Result<TelaRascunho, String> {
    mutar_rascunho(&app, TipoRascunho::Producao, Mutacao::Editar(id, item))
}

#[tauri::command]
pub fn excluir_producao(app: AppHandle, id: i64) -> Result<TelaRascunho, String> {
    mutar_rascunho(&app, TipoRascunho::Producao, Mutacao::Remover(id))
}

#[tauri::command]
pub fn registrar_producao(app: AppHandle) -> Result<ResultadoRegistro, String> {
    registrar_tipo(&app, TipoRascunho::Producao)
}

/// Committed production, optionally restricted to `[inicio, fim]`
/// (inclusive, ISO dates). Totals per date are derived by the screen.
#[tauri::command]
pub fn consultar_producao(
    app: AppHandle,
    inicio: Option<String>,
    fim: Option<String>,
) -> Result<Vec<Lancamento>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut sql = String::from(
        "SELECT pr.id, pr.produto_id, p.nome, pr.quantidade, pr.preco_unitario, pr.data_venda
         FROM producao pr
         LEFT JOIN produtos p ON pr.produto_id = p.id",
    );
    let mut filtros: Vec<String> = Vec::new();
    if inicio.is_some() {
        filtros.push("pr.data_venda >= ?1".to_string());
    }
    if fim.is_some() {
        filtros.push(format!("pr.data_venda <= ?{}", filtros.len() + 1));
    }
    if !filtros.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filtros.join(" AND "));
    }
    sql.push_str(" ORDER BY pr.data_venda DESC, pr.id DESC");

    let parametros: Vec<String> = inicio.into_iter().chain(fim).collect();
    let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;

    let linhas = stmt
        .query_map(rusqlite::params_from_iter(parametros.iter()), |row| {
            Ok(Lancamento {
                id: row.get(0)?,
                produto_id: row.get(1)?,
                produto_nome: row.get(2)?,
                quantidade: row.get(3)?,
                preco_unitario: row.get(4)?,
                data_venda: row.get(5)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(linhas)
}
