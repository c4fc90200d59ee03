//! Date-range resolution for the balance screen and the period totals.

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodo {
    #[serde(rename = "Hoje")]
    Hoje,
    #[serde(rename = "Esta Semana")]
    EstaSemana,
    #[serde(rename = "Este Mês")]
    EsteMes,
    #[serde(rename = "Este Ano")]
    EsteAno,
}

/// Maps a period to the inclusive `[inicio, fim]` range ending today.
/// The week starts on the most recent Sunday.
pub fn intervalo(periodo: Periodo, hoje: NaiveDate) -> (NaiveDate, NaiveDate) {
    let inicio = match periodo {
        Periodo::Hoje => hoje,
        Periodo::EstaSemana => {
            hoje - Duration::days(i64::from(hoje.weekday().num_days_from_sunday()))
        }
        Periodo::EsteMes => hoje.with_day(1).unwrap_or(hoje),
        Periodo::EsteAno => NaiveDate::from_ymd_opt(hoje.year(), 1, 1).unwrap_or(hoje),
    };
    (inicio, hoje)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VendaPeriodo {
    pub quantidade: f64,
    pub preco_unitario: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DespesaPeriodo {
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SobraPeriodo {
    pub valor_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotaisPeriodo {
    pub total_vendas: f64,
    pub total_despesas: f64,
    pub total_sobras: f64,
    pub lucro: f64,
    pub margem_lucro: f64,
}

/// Sums the three row sets of a period. Rows carrying garbage contribute
/// zero instead of poisoning the totals with NaN, and the margin is 0
/// (not infinite) when there were no sales.
pub fn computar_totais(
    vendas: &[VendaPeriodo],
    despesas: &[DespesaPeriodo],
    sobras: &[SobraPeriodo],
) -> TotaisPeriodo {
    let total_vendas: f64 = vendas
        .iter()
        .map(|v| finito_ou_zero(v.quantidade * v.preco_unitario))
        .sum();
    let total_despesas: f64 = despesas.iter().map(|d| finito_ou_zero(d.total)).sum();
    let total_sobras: f64 = sobras.iter().map(|s| finito_ou_zero(s.valor_total)).sum();

    let lucro = total_vendas - total_despesas - total_sobras;
    let margem_lucro = if total_vendas > 0.0 {
        lucro / total_vendas * 100.0
    } else {
        0.0
    };

    TotaisPeriodo {
        total_vendas,
        total_despesas,
        total_sobras,
        lucro,
        margem_lucro,
    }
}

fn finito_ou_zero(valor: f64) -> f64 {
    if valor.is_finite() {
        valor
    } else {
        0.0
    }
}

/// Boundary coercion for loosely-typed store columns: anything that is not
/// a number reads as 0.
pub fn numero_ou_zero(valor: &Value) -> f64 {
    match valor {
        Value::Integer(n) => *n as f64,
        Value::Real(x) => finito_ou_zero(*x),
        Value::Text(texto) => texto.trim().parse::<f64>().map(finito_ou_zero).unwrap_or(0.0),
        Value::Null | Value::Blob(_) => 0.0,
    }
}

/// Growth badge shown on each balance card. This is a placeholder kept
/// from the original screen, not a period-over-period comparison.
pub fn crescimento(total: f64) -> &'static str {
    if total > 0.0 {
        "+5%"
    } else {
        "0%"
    }
}
