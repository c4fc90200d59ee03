use tauri::AppHandle;

use crate::db::DatabaseExt;
use crate::models::{Lancamento, Nivel, ResultadoRegistro};

/// Copies one date's production rows into `vendas`, confirming the day as
/// sold. An empty date is a warning, not an error.
#[tauri::command]
pub fn registrar_vendas(app: AppHandle, data: String) -> Result<ResultadoRegistro, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let copiadas =
        crate::commit::copiar_producao_para_vendas(&conn, &data).map_err(|e| e.to_string())?;

    if copiadas == 0 {
        return Ok(ResultadoRegistro {
            nivel: Nivel::Aviso,
            mensagem: "Nenhuma venda para registrar para esta data".to_string(),
            linhas_gravadas: 0,
        });
    }

    Ok(ResultadoRegistro {
        nivel: Nivel::Sucesso,
        mensagem: "Venda registrada".to_string(),
        linhas_gravadas: copiadas,
    })
}

#[tauri::command]
pub fn consultar_vendas(
    app: AppHandle,
    inicio: Option<String>,
    fim: Option<String>,
) -> Result<Vec<Lancamento>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut sql = String::from(
        "SELECT v.id, v.produto_id, p.nome, v.quantidade, v.preco_unitario, v.data_venda
         FROM vendas v
         LEFT JOIN produtos p ON v.produto_id = p.id",
    );
    let mut filtros: Vec<String> = Vec::new();
    if inicio.is_some() {
        filtros.push("v.data_venda >= ?1".to_string());
    }
    if fim.is_some() {
        filtros.push(format!("v.data_venda <= ?{}", filtros.len() + 1));
    }
    if !filtros.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filtros.join(" AND "));
    }
    sql.push_str(" ORDER BY v.data_venda ASC, v.id ASC");

    let parametros: Vec<String> = inicio.into_iter().chain(fim).collect();
    let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;

    let vendas = stmt
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

    Ok(vendas)
}

#[tauri::command]
pub fn editar_venda(
    app: AppHandle,
    id: i64,
    quantidade: i64,
    preco_unitario: f64,
) -> Result<Lancamento, String> {
    if quantidade <= 0 {
        return Err("Quantidade inválida".to_string());
    }
    if !preco_unitario.is_finite() || preco_unitario < 0.0 {
        return Err("Preço unitário inválido".to_string());
    }

    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let alteradas = conn
        .execute(
            "UPDATE vendas SET quantidade = ?1, preco_unitario = ?2 WHERE id = ?3",
            rusqlite::params![quantidade, preco_unitario, id],
        )
        .map_err(|e| e.to_string())?;

    if alteradas == 0 {
        return Err("Venda não encontrada".to_string());
    }

    conn.query_row(
        "SELECT v.id, v.produto_id, p.nome, v.quantidade, v.preco_unitario, v.data_venda
         FROM vendas v
         LEFT JOIN produtos p ON v.produto_id = p.id
         WHERE v.id = ?1",
        [id],
        |row| {
            Ok(Lancamento {
                id: row.get(0)?,
                produto_id: row.get(1)?,
                produto_nome: row.get(2)?,
                quantidade: row.get(3)?,
                preco_unitario: row.get(4)?,
                data_venda: row.get(5)?,
            })
        },
    )
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn excluir_venda(app: AppHandle, id: i64) -> Result<(), String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute("DELETE FROM vendas WHERE id = ?1", [id])
        .map_err(|e| e.to_string())?;

    Ok(())
}
