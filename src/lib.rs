mod commands;
mod commit;
mod db;
mod drafts;
mod errors;
mod local;
mod models;
mod period;
mod registry;

#[cfg(test)]
mod tests;

use commands::{balanco, despesas, producao, produtos, sobras, vendas};
use db::Database;
use local::LocalStore;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_log::Builder::default().build())
        .setup(|app| {
            // Initialize the store and the local draft storage
            let db = Database::new(&app.handle()).expect("Failed to create database");
            db.initialize().expect("Failed to initialize database");
            app.manage(db);

            let store = LocalStore::new(&app.handle()).expect("Failed to create local store");
            app.manage(store);

            app.manage(commands::Rascunhos::default());
            app.manage(commands::TravasRegistro::default());

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Produtos
            produtos::get_produtos,
            produtos::create_produto,
            produtos::update_produto,
            produtos::delete_produto,
            produtos::salvar_imagem_produto,
            // Produção
            producao::carregar_producao,
            producao::adicionar_producao,
            producao::editar_producao,
            producao::excluir_producao,
            producao::registrar_producao,
            producao::consultar_producao,
            // Despesas
            despesas::carregar_despesas,
            despesas::adicionar_despesa,
            despesas::editar_despesa,
            despesas::excluir_despesa,
            despesas::registrar_despesas,
            despesas::consultar_despesas,
            // Sobras
            sobras::carregar_sobras,
            sobras::lancar_sobra,
            sobras::registrar_sobras,
            sobras::consultar_sobras,
            // Vendas
            vendas::registrar_vendas,
            vendas::consultar_vendas,
            vendas::editar_venda,
            vendas::excluir_venda,
            // Balanço
            balanco::balanco_periodo,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
