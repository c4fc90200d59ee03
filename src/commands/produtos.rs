use crate::db::DatabaseExt;
use crate::models::{CreateProduto, Produto, UpdateProduto};
use tauri::{AppHandle, Manager};

#[tauri::command]
pub fn get_produtos(app: AppHandle) -> Result<Vec<Produto>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT id, nome, preco_venda, imagem_url, created_at
             FROM produtos
             ORDER BY nome",
        )
        .map_err(|e| e.to_string())?;

    let produtos = stmt
        .query_map([], |row| {
            Ok(Produto {
                id: row.get(0)?,
                nome: row.get(1)?,
                preco_venda: row.get(2)?,
                imagem_url: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(produtos)
}

#[tauri::command]
pub fn create_produto(app: AppHandle, produto: CreateProduto) -> Result<Produto, String> {
    if produto.nome.trim().is_empty() {
        return Err("Informe o nome do produto".to_string());
    }
    if !produto.preco_venda.is_finite() || produto.preco_venda < 0.0 {
        return Err("Preço de venda inválido".to_string());
    }

    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO produtos (nome, preco_venda, imagem_url) VALUES (?1, ?2, ?3)",
        rusqlite::params![produto.nome, produto.preco_venda, produto.imagem_url],
    )
    .map_err(|e| e.to_string())?;

    let id = conn.last_insert_rowid();

    conn.query_row(
        "SELECT id, nome, preco_venda, imagem_url, created_at FROM produtos WHERE id = ?1",
        [id],
        |row| {
            Ok(Produto {
                id: row.get(0)?,
                nome: row.get(1)?,
                preco_venda: row.get(2)?,
                imagem_url: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_produto(app: AppHandle, produto: UpdateProduto) -> Result<Produto, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute(
        "UPDATE produtos SET nome = ?1, preco_venda = ?2, imagem_url = ?3 WHERE id = ?4",
        rusqlite::params![produto.nome, produto.preco_venda, produto.imagem_url, produto.id],
    )
    .map_err(|e| e.to_string())?;

    conn.query_row(
        "SELECT id, nome, preco_venda, imagem_url, created_at FROM produtos WHERE id = ?1",
        [produto.id],
        |row| {
            Ok(Produto {
                id: row.get(0)?,
                nome: row.get(1)?,
                preco_venda: row.get(2)?,
                imagem_url: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_produto(app: AppHandle, id: i64) -> Result<(), String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute("DELETE FROM produtos WHERE id = ?1", [id])
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Stores the product photo under the app data dir and records its path.
/// The web version uploaded to a storage bucket and kept the public URL;
/// on the desktop the file path plays that role.
#[tauri::command]
pub fn salvar_imagem_produto(
    app: AppHandle,
    id: i64,
    nome_arquivo: String,
    bytes: Vec<u8>,
) -> Result<String, String> {
    let dir = app
        .path()
        .app_data_dir()
        .map_err(|e| e.to_string())?
        .join("imagens");
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;

    let nome_limpo: String = nome_arquivo
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    let destino = dir.join(format!("{id}_{nome_limpo}"));
    std::fs::write(&destino, bytes).map_err(|e| e.to_string())?;

    let url = destino.to_string_lossy().to_string();

    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    conn.execute(
        "UPDATE produtos SET imagem_url = ?1 WHERE id = ?2",
        rusqlite::params![url, id],
    )
    .map_err(|e| e.to_string())?;

    Ok(url)
}
