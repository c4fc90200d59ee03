use rusqlite::{Connection, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tauri::AppHandle;

/// The hosted store the web version reached through its query API. Here it
/// is a local SQLite file with the same five tables.
pub struct Database {
    pub conn: Mutex<Connection>,
}

pub(crate) const SCHEMA: &str = "
    -- Product catalog
    CREATE TABLE IF NOT EXISTS produtos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        preco_venda REAL NOT NULL,
        imagem_url TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );

    -- Daily production, committed from the staging screen
    CREATE TABLE IF NOT EXISTS producao (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        produto_id INTEGER NOT NULL,
        quantidade INTEGER NOT NULL,
        preco_unitario REAL NOT NULL,
        data_venda DATE NOT NULL,
        FOREIGN KEY (produto_id) REFERENCES produtos(id)
    );

    -- Sales, copied from production once a day is confirmed sold
    CREATE TABLE IF NOT EXISTS vendas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        produto_id INTEGER NOT NULL,
        quantidade INTEGER NOT NULL,
        preco_unitario REAL NOT NULL,
        data_venda DATE NOT NULL,
        FOREIGN KEY (produto_id) REFERENCES produtos(id)
    );

    -- Expenses (free-text product, no catalog link)
    CREATE TABLE IF NOT EXISTS despesas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data DATE NOT NULL,
        produto TEXT NOT NULL,
        categoria TEXT,
        quantidade INTEGER NOT NULL,
        valor REAL NOT NULL,
        total REAL NOT NULL
    );

    -- Leftovers: unsold production, a negative adjustment to profit
    CREATE TABLE IF NOT EXISTS sobras (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        produto_id INTEGER,
        quantidade_vendida INTEGER NOT NULL,
        valor_total REAL NOT NULL,
        data DATE NOT NULL,
        FOREIGN KEY (produto_id) REFERENCES produtos(id)
    );
";

impl Database {
    pub fn new(app_handle: &AppHandle) -> Result<Self> {
        let app_dir = app_handle
            .path()
            .app_data_dir()
            .expect("Failed to get app data dir");

        std::fs::create_dir_all(&app_dir).expect("Failed to create app data directory");

        let db_path: PathBuf = app_dir.join("babauje.db");
        let conn = Connection::open(db_path)?;
        // A hung write should fail instead of leaving the screen stuck.
        conn.busy_timeout(Duration::from_secs(5))?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(SCHEMA)?;

        // Run migrations for existing databases (pass connection to avoid deadlock)
        Self::migrate_conn(&conn)?;

        Ok(())
    }

    fn migrate_conn(conn: &Connection) -> Result<()> {
        // imagem_url arrived after the first release; add it if missing
        let colunas: Vec<String> = conn
            .prepare("PRAGMA table_info(produtos)")?
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|r| r.ok())
            .collect();

        if !colunas.contains(&"imagem_url".to_string()) {
            conn.execute("ALTER TABLE produtos ADD COLUMN imagem_url TEXT", [])?;
        }

        let colunas_despesas: Vec<String> = conn
            .prepare("PRAGMA table_info(despesas)")?
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|r| r.ok())
            .collect();

        if !colunas_despesas.contains(&"categoria".to_string()) {
            conn.execute("ALTER TABLE despesas ADD COLUMN categoria TEXT", [])?;
        }

        Ok(())
    }
}

use tauri::Manager;

pub trait DatabaseExt {
    fn db(&self) -> &Database;
}

impl DatabaseExt for AppHandle {
    fn db(&self) -> &Database {
        self.state::<Database>().inner()
    }
}
