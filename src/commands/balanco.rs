use chrono::Local;
use rusqlite::types::Value;
use rusqlite::Connection;
use serde::Serialize;
use tauri::AppHandle;

use crate::db::DatabaseExt;
use crate::period::{
    self, computar_totais, DespesaPeriodo, Periodo, SobraPeriodo, TotaisPeriodo, VendaPeriodo,
};

/// Everything the balance screen renders for one period: the totals, how
/// many rows fed each card, and the growth badges.
#[derive(Debug, Serialize)]
pub struct BalancoPeriodo {
    pub inicio: String,
    pub fim: String,
    pub totais: TotaisPeriodo,
    pub registros_vendas: usize,
    pub registros_despesas: usize,
    pub registros_sobras: usize,
    pub crescimento_vendas: String,
    pub crescimento_despesas: String,
    pub crescimento_sobras: String,
}

#[tauri::command]
pub fn balanco_periodo(app: AppHandle, periodo: Periodo) -> Result<BalancoPeriodo, String> {
    let hoje = Local::now().date_naive();
    let (inicio, fim) = period::intervalo(periodo, hoje);
    let inicio = inicio.format("%Y-%m-%d").to_string();
    let fim = fim.format("%Y-%m-%d").to_string();

    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let vendas = buscar_vendas(&conn, &inicio, &fim).map_err(|e| e.to_string())?;
    let despesas = buscar_despesas(&conn, &inicio, &fim).map_err(|e| e.to_string())?;
    let sobras = buscar_sobras(&conn, &inicio, &fim).map_err(|e| e.to_string())?;

    let totais = computar_totais(&vendas, &despesas, &sobras);

    Ok(BalancoPeriodo {
        inicio,
        fim,
        registros_vendas: vendas.len(),
        registros_despesas: despesas.len(),
        registros_sobras: sobras.len(),
        crescimento_vendas: period::crescimento(totais.total_vendas).to_string(),
        crescimento_despesas: period::crescimento(totais.total_despesas).to_string(),
        crescimento_sobras: period::crescimento(totais.total_sobras).to_string(),
        totais,
    })
}

// The three range queries read their numeric columns as raw values and
// coerce at the boundary, so one bad row zeroes itself instead of turning
// the whole balance into NaN.

fn buscar_vendas(conn: &Connection, inicio: &str, fim: &str) -> rusqlite::Result<Vec<VendaPeriodo>> {
    let mut stmt = conn.prepare(
        "SELECT quantidade, preco_unitario FROM vendas
         WHERE data_venda >= ?1 AND data_venda <= ?2",
    )?;
    let linhas = stmt
        .query_map([inicio, fim], |row| {
            let quantidade: Value = row.get(0)?;
            let preco: Value = row.get(1)?;
            Ok(VendaPeriodo {
                quantidade: period::numero_ou_zero(&quantidade),
                preco_unitario: period::numero_ou_zero(&preco),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(linhas)
}

fn buscar_despesas(
    conn: &Connection,
    inicio: &str,
    fim: &str,
) -> rusqlite::Result<Vec<DespesaPeriodo>> {
    let mut stmt = conn.prepare(
        "SELECT total FROM despesas WHERE data >= ?1 AND data <= ?2",
    )?;
    let linhas = stmt
        .query_map([inicio, fim], |row| {
            let total: Value = row.get(0)?;
            Ok(DespesaPeriodo {
                total: period::numero_ou_zero(&total),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(linhas)
}

fn buscar_sobras(conn: &Connection, inicio: &str, fim: &str) -> rusqlite::Result<Vec<SobraPeriodo>> {
    let mut stmt = conn.prepare(
        "SELECT valor_total FROM sobras WHERE data >= ?1 AND data <= ?2",
    )?;
    let linhas = stmt
        .query_map([inicio, fim], |row| {
            let valor: Value = row.get(0)?;
            Ok(SobraPeriodo {
                valor_total: period::numero_ou_zero(&valor),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(linhas)
}
