//! Batch commit of a staged date: insert when the date was never sent,
//! update only the changed lines when it was, no-op when nothing changed.
//! Repeating the action with the same draft always lands on the no-op
//! path, so the button can be pressed twice without duplicating rows.

use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::{params, Connection};

use crate::drafts::LivroRascunho;
use crate::errors::ErroRegistro;
use crate::local::LocalStore;
use crate::models::{DetalheItem, ItemRascunho, Nivel, ResultadoRegistro, TipoRascunho};
use crate::registry::{LinhaRegistrada, RegistroDatas};

pub fn registrar(
    conn: &Connection,
    store: &LocalStore,
    livro: &mut LivroRascunho,
    registro: &mut RegistroDatas,
    tipo: TipoRascunho,
    data: NaiveDate,
) -> Result<ResultadoRegistro, ErroRegistro> {
    let itens: Vec<ItemRascunho> = livro
        .itens_da_data(data)
        .into_iter()
        .cloned()
        .collect();

    if itens.is_empty() {
        return Err(ErroRegistro::NadaParaRegistrar);
    }

    let resultado = if registro.ja_registrada(data) {
        atualizar_data(conn, registro, data, &itens)
    } else {
        inserir_data(conn, registro, data, &itens)
    };

    match resultado {
        Ok(resultado) => {
            // The remote write landed; local bookkeeping failures from here
            // on degrade to warnings instead of undoing a real commit.
            if let Err(erro) = registro.salvar(tipo, store) {
                warn!("registro de datas não persistido: {erro}");
            }
            if let Err(erro) = livro.limpar(store) {
                warn!("rascunho não limpo após registro: {erro}");
            }
            info!(
                "registro {:?} {}: {} ({} linhas)",
                tipo,
                data,
                resultado.mensagem,
                resultado.linhas_gravadas
            );
            Ok(resultado)
        }
        Err(erro) => {
            if !erro.eh_aviso() {
                registro.anotar_status(data, Nivel::Erro, erro.to_string());
                if let Err(e) = registro.salvar(tipo, store) {
                    warn!("status de erro não persistido: {e}");
                }
            }
            Err(erro)
        }
    }
}

fn inserir_data(
    conn: &Connection,
    registro: &mut RegistroDatas,
    data: NaiveDate,
    itens: &[ItemRascunho],
) -> Result<ResultadoRegistro, ErroRegistro> {
    let tx = conn.unchecked_transaction()?;
    for item in itens {
        inserir_linha(&tx, item)?;
    }
    tx.commit()?;

    registro.marcar_registrada(data, itens.iter().map(LinhaRegistrada::de_item).collect());
    let mensagem = format!(
        "{} itens registrados com sucesso para {}",
        itens.len(),
        formatar_data(data)
    );
    registro.anotar_status(data, Nivel::Sucesso, mensagem.clone());

    Ok(ResultadoRegistro {
        nivel: Nivel::Sucesso,
        mensagem,
        linhas_gravadas: itens.len(),
    })
}

fn atualizar_data(
    conn: &Connection,
    registro: &mut RegistroDatas,
    data: NaiveDate,
    itens: &[ItemRascunho],
) -> Result<ResultadoRegistro, ErroRegistro> {
    let instantaneo = registro.instantaneo(data).to_vec();

    let alterados: Vec<&ItemRascunho> = itens
        .iter()
        .filter(|item| {
            let chave = item.detalhe.chave_produto();
            match instantaneo.iter().find(|linha| linha.chave_produto == chave) {
                Some(linha) => {
                    linha.quantidade != item.quantidade
                        || linha.valor_unitario != item.valor_unitario
                }
                None => true,
            }
        })
        .collect();

    if alterados.is_empty() {
        return Err(ErroRegistro::SemAlteracoes(formatar_data(data)));
    }

    let tx = conn.unchecked_transaction()?;
    for item in &alterados {
        let chave = item.detalhe.chave_produto();
        let ja_existia = instantaneo.iter().any(|linha| linha.chave_produto == chave);
        if ja_existia {
            atualizar_linha(&tx, item)?;
        } else {
            // A line staged after the first commit has no remote row yet.
            inserir_linha(&tx, item)?;
        }
    }
    tx.commit()?;

    registro.marcar_registrada(data, itens.iter().map(LinhaRegistrada::de_item).collect());
    let mensagem = format!(
        "{} itens atualizados para {}",
        alterados.len(),
        formatar_data(data)
    );
    registro.anotar_status(data, Nivel::Sucesso, mensagem.clone());

    Ok(ResultadoRegistro {
        nivel: Nivel::Sucesso,
        mensagem,
        linhas_gravadas: alterados.len(),
    })
}

fn inserir_linha(conn: &Connection, item: &ItemRascunho) -> rusqlite::Result<()> {
    let data = item.data.format("%Y-%m-%d").to_string();
    match &item.detalhe {
        DetalheItem::Producao { produto_id, .. } => {
            conn.execute(
                "INSERT INTO producao (produto_id, quantidade, preco_unitario, data_venda) VALUES (?1, ?2, ?3, ?4)",
                params![produto_id, item.quantidade, item.valor_unitario, data],
            )?;
        }
        DetalheItem::Despesa { produto, categoria } => {
            conn.execute(
                "INSERT INTO despesas (data, produto, categoria, quantidade, valor, total) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![data, produto, categoria, item.quantidade, item.valor_unitario, item.total],
            )?;
        }
        DetalheItem::Sobra { produto_id, .. } => {
            conn.execute(
                "INSERT INTO sobras (produto_id, quantidade_vendida, valor_total, data) VALUES (?1, ?2, ?3, ?4)",
                params![produto_id, item.quantidade, item.total, data],
            )?;
        }
    }
    Ok(())
}

fn atualizar_linha(conn: &Connection, item: &ItemRascunho) -> rusqlite::Result<()> {
    let data = item.data.format("%Y-%m-%d").to_string();
    match &item.detalhe {
        DetalheItem::Producao { produto_id, .. } => {
            conn.execute(
                "UPDATE producao SET quantidade = ?1, preco_unitario = ?2 WHERE produto_id = ?3 AND data_venda = ?4",
                params![item.quantidade, item.valor_unitario, produto_id, data],
            )?;
        }
        DetalheItem::Despesa { produto, .. } => {
            conn.execute(
                "UPDATE despesas SET quantidade = ?1, valor = ?2, total = ?3 WHERE produto = ?4 AND data = ?5",
                params![item.quantidade, item.valor_unitario, item.total, produto, data],
            )?;
        }
        DetalheItem::Sobra { produto_id, .. } => {
            conn.execute(
                "UPDATE sobras SET quantidade_vendida = ?1, valor_total = ?2 WHERE produto_id = ?3 AND data = ?4",
                params![item.quantidade, item.total, produto_id, data],
            )?;
        }
    }
    Ok(())
}

/// Copies one date's production rows into `vendas`, confirming the day as
/// sold. Returns how many rows were copied; zero means there was nothing
/// staged under that date.
pub fn copiar_producao_para_vendas(conn: &Connection, data: &str) -> rusqlite::Result<usize> {
    let linhas: Vec<(i64, i64, f64)> = {
        let mut stmt = conn.prepare(
            "SELECT produto_id, quantidade, preco_unitario
             FROM producao WHERE data_venda = ?1",
        )?;
        let linhas = stmt
            .query_map([data], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        linhas
    };

    if linhas.is_empty() {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    for (produto_id, quantidade, preco_unitario) in &linhas {
        tx.execute(
            "INSERT INTO vendas (produto_id, quantidade, preco_unitario, data_venda) VALUES (?1, ?2, ?3, ?4)",
            params![produto_id, quantidade, preco_unitario, data],
        )?;
    }
    tx.commit()?;
    Ok(linhas.len())
}

/// dd/mm/yyyy, the format every message of the old UI used.
pub fn formatar_data(data: NaiveDate) -> String {
    data.format("%d/%m/%Y").to_string()
}
