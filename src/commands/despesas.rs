use tauri::AppHandle;

use super::{carregar_tela, mutar_rascunho, registrar_tipo, Mutacao};
use crate::db::DatabaseExt;
use crate::models::{Despesa, NovoItem, ResultadoRegistro, TelaRascunho, TipoRascunho};

#[tauri::command]
pub fn carregar_despesas(app: AppHandle) -> Result<TelaRascunho, String> {
    carregar_tela(&app, TipoRascunho::Despesa)
}

#[tauri::command]
pub fn adicionar_despesa(app: AppHandle, item: NovoItem) -> Result<TelaRascunho, String> {
    mutar_rascunho(&app, TipoRascunho::Despesa, Mutacao::Adicionar(item))
}

#[tauri::command]
pub fn editar_despesa(app: AppHandle, id: i64, item: NovoItem) -> Result<TelaRascunho, String> {
    mutar_rascunho(&app, TipoRascunho::Despesa, Mutacao::Editar(id, item))
}

#[tauri::command]
pub fn excluir_despesa(app: AppHandle, id: i64) -> Result<TelaRascunho, String> {
    mutar_rascunho(&app, TipoRascunho::Despesa, Mutacao::Remover(id))
}

#[tauri::command]
pub fn registrar_despesas(app: AppHandle) -> Result<ResultadoRegistro, String> {
    registrar_tipo(&app, TipoRascunho::Despesa)
}

#[tauri::command]
pub fn consultar_despesas(
    app: AppHandle,
    inicio: Option<String>,
    fim: Option<String>,
) -> Result<Vec<Despesa>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut sql = String::from(
        "SELECT id, data, produto, categoria, quantidade, valor, total FROM despesas",
    );
    let mut filtros: Vec<String> = Vec::new();
    if inicio.is_some() {
        filtros.push("data >= ?1".to_string());
    }
    if fim.is_some() {
        filtros.push(format!("data <= ?{}", filtros.len() + 1));
    }
    if !filtros.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filtros.join(" AND "));
    }
    sql.push_str(" ORDER BY data DESC, id DESC");

    let parametros: Vec<String> = inicio.into_iter().chain(fim).collect();
    let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;

    let despesas = stmt
        .query_map(rusqlite::params_from_iter(parametros.iter()), |row| {
            Ok(Despesa {
                id: row.get(0)?,
                data: row.get(1)?,
                produto: row.get(2)?,
                categoria: row.get(3)?,
                quantidade: row.get(4)?,
                valor: row.get(5)?,
                total: row.get(6)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(despesas)
}
