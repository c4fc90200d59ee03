//! Integration tests for the staging, commit and balance logic
//! These tests use an in-memory SQLite database and a temp-dir local store

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusqlite::types::Value;
    use rusqlite::Connection;
    use tempfile::TempDir;

    use crate::commands::TravasRegistro;
    use crate::commit;
    use crate::drafts::LivroRascunho;
    use crate::errors::{ErroRascunho, ErroRegistro};
    use crate::local::LocalStore;
    use crate::models::{DetalheItem, Nivel, NovoItem, TipoRascunho};
    use crate::period::{self, DespesaPeriodo, Periodo, SobraPeriodo, VendaPeriodo};
    use crate::registry::RegistroDatas;

    /// Create a test database with the production schema
    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
        conn.execute_batch(crate::db::SCHEMA)
            .expect("Failed to create schema");
        conn
    }

    /// Local store backed by a temp dir; keep the guard alive for the test
    fn setup_store() -> (TempDir, LocalStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store =
            LocalStore::at(dir.path().join("local")).expect("Failed to create local store");
        (dir, store)
    }

    fn seed_produtos(conn: &Connection) {
        conn.execute(
            "INSERT INTO produtos (nome, preco_venda) VALUES ('Pão Francês', 0.75)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO produtos (nome, preco_venda) VALUES ('Bolo de Fubá', 25.0)",
            [],
        )
        .unwrap();
    }

    fn dia(texto: &str) -> NaiveDate {
        NaiveDate::parse_from_str(texto, "%Y-%m-%d").unwrap()
    }

    fn item_producao(data: &str, produto_id: i64, quantidade: i64, preco: f64) -> NovoItem {
        NovoItem {
            data: dia(data),
            quantidade,
            valor_unitario: preco,
            detalhe: DetalheItem::Producao {
                produto_id,
                produto_nome: Some(format!("Produto {produto_id}")),
            },
        }
    }

    fn item_despesa(data: &str, produto: &str, quantidade: i64, valor: f64) -> NovoItem {
        NovoItem {
            data: dia(data),
            quantidade,
            valor_unitario: valor,
            detalhe: DetalheItem::Despesa {
                produto: produto.to_string(),
                categoria: "Insumos".to_string(),
            },
        }
    }

    fn item_sobra(data: &str, producao_id: i64, produto_id: i64, quantidade: i64, preco: f64) -> NovoItem {
        NovoItem {
            data: dia(data),
            quantidade,
            valor_unitario: preco,
            detalhe: DetalheItem::Sobra {
                producao_id,
                produto_id,
                produto_nome: None,
            },
        }
    }

    // ===== DRAFT LEDGER TESTS =====

    #[test]
    fn test_adicionar_fixa_data_ativa() {
        let (_dir, store) = setup_store();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);

        assert!(livro.data_ativa().is_none());

        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        assert_eq!(livro.data_ativa(), Some(dia("2025-08-20")));
        assert_eq!(livro.itens().len(), 1);

        // Same date is fine; newest item goes first
        let id = livro
            .adicionar(&store, item_producao("2025-08-20", 2, 1, 25.0))
            .unwrap();
        assert_eq!(livro.itens().len(), 2);
        assert_eq!(livro.itens()[0].id, id);
    }

    #[test]
    fn test_total_derivado_no_adicionar() {
        let (_dir, store) = setup_store();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);

        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        assert_eq!(livro.itens()[0].total, 15.0);
    }

    #[test]
    fn test_editar_recalcula_total() {
        let (_dir, store) = setup_store();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);

        let id = livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        livro
            .editar(&store, id, item_producao("2025-08-20", 1, 4, 5.0))
            .unwrap();

        assert_eq!(livro.itens()[0].quantidade, 4);
        assert_eq!(livro.itens()[0].total, 20.0);
    }

    #[test]
    fn test_data_diferente_rejeitada() {
        let (_dir, store) = setup_store();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);

        let id = livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();

        let erro = livro
            .adicionar(&store, item_producao("2025-08-21", 2, 1, 25.0))
            .unwrap_err();
        assert!(matches!(erro, ErroRascunho::ConflitoDeData));
        assert!(erro.to_string().contains("misturar datas"));

        // Editing to another date hits the same rule
        let erro = livro
            .editar(&store, id, item_producao("2025-08-21", 1, 3, 5.0))
            .unwrap_err();
        assert!(matches!(erro, ErroRascunho::ConflitoDeData));

        // The draft is untouched either way
        assert_eq!(livro.itens().len(), 1);
        assert_eq!(livro.itens()[0].quantidade, 3);
        assert_eq!(livro.data_ativa(), Some(dia("2025-08-20")));
    }

    #[test]
    fn test_validacao_rejeita_valores_invalidos() {
        let (_dir, store) = setup_store();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);

        let casos = [
            item_producao("2025-08-20", 1, 0, 5.0),
            item_producao("2025-08-20", 1, -2, 5.0),
            item_producao("2025-08-20", 1, 3, -1.0),
            item_producao("2025-08-20", 1, 3, f64::NAN),
            item_producao("2025-08-20", 0, 3, 5.0),
            // Wrong kind for this screen
            item_despesa("2025-08-20", "Farinha", 1, 30.0),
        ];
        for caso in casos {
            let erro = livro.adicionar(&store, caso).unwrap_err();
            assert!(matches!(erro, ErroRascunho::Validacao(_)));
        }
        assert!(livro.itens().is_empty());

        let mut despesas = LivroRascunho::vazio(TipoRascunho::Despesa);
        let casos = [
            item_despesa("2025-08-20", "", 1, 30.0),
            item_despesa("2025-08-20", "Farinha", 1, 0.0),
            NovoItem {
                detalhe: DetalheItem::Despesa {
                    produto: "Farinha".to_string(),
                    categoria: "  ".to_string(),
                },
                ..item_despesa("2025-08-20", "Farinha", 1, 30.0)
            },
        ];
        for caso in casos {
            let erro = despesas.adicionar(&store, caso).unwrap_err();
            assert!(matches!(erro, ErroRascunho::Validacao(_)));
        }
    }

    #[test]
    fn test_remover_mantem_data_ativa() {
        let (_dir, store) = setup_store();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);

        let a = livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let b = livro
            .adicionar(&store, item_producao("2025-08-20", 2, 1, 25.0))
            .unwrap();

        livro.remover(&store, a).unwrap();
        livro.remover(&store, b).unwrap();

        // Emptied by removal, not by commit: the date sticks around
        assert!(livro.itens().is_empty());
        assert_eq!(livro.data_ativa(), Some(dia("2025-08-20")));

        // But the next item on an empty ledger is free to pick a new date
        livro
            .adicionar(&store, item_producao("2025-08-22", 1, 2, 5.0))
            .unwrap();
        assert_eq!(livro.data_ativa(), Some(dia("2025-08-22")));
    }

    #[test]
    fn test_remover_id_inexistente() {
        let (_dir, store) = setup_store();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);

        let erro = livro.remover(&store, 99).unwrap_err();
        assert!(matches!(erro, ErroRascunho::ItemNaoEncontrado(99)));
    }

    #[test]
    fn test_rascunho_sobrevive_recarga() {
        let (_dir, store) = setup_store();

        let mut livro = LivroRascunho::vazio(TipoRascunho::Despesa);
        livro
            .adicionar(&store, item_despesa("2025-08-20", "Farinha", 2, 30.0))
            .unwrap();
        let id_ovos = livro
            .adicionar(&store, item_despesa("2025-08-20", "Ovos", 1, 12.5))
            .unwrap();

        let mut recarregado = LivroRascunho::carregar(TipoRascunho::Despesa, &store);
        assert_eq!(recarregado.itens(), livro.itens());
        assert_eq!(recarregado.data_ativa(), Some(dia("2025-08-20")));

        // Fresh ids never collide with the restored ones
        let novo = recarregado
            .adicionar(&store, item_despesa("2025-08-20", "Leite", 1, 6.0))
            .unwrap();
        assert!(novo > id_ovos);
    }

    #[test]
    fn test_arquivo_corrompido_comeca_vazio() {
        let (dir, store) = setup_store();
        let pasta = dir.path().join("local");
        std::fs::write(pasta.join("producao_temporarias.json"), "{ isto não é json").unwrap();

        // The screen opens empty with a warning instead of erroring forever
        let mut livro = LivroRascunho::carregar(TipoRascunho::Producao, &store);
        assert!(livro.itens().is_empty());
        assert!(livro.data_ativa().is_none());
        let aviso = livro.tomar_aviso().unwrap();
        assert!(aviso.contains("Erro ao carregar"));
        assert!(livro.tomar_aviso().is_none());

        // Staging over the corrupt file replaces it and works normally
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let recarregado = LivroRascunho::carregar(TipoRascunho::Producao, &store);
        assert_eq!(recarregado.itens().len(), 1);

        // Same rule for the committed-date registry
        std::fs::write(pasta.join("registro_producao.json"), "nada").unwrap();
        let registro = RegistroDatas::carregar(TipoRascunho::Producao, &store);
        assert!(registro.datas().is_empty());
    }

    #[test]
    fn test_limpar_remove_tudo() {
        let (_dir, store) = setup_store();

        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        livro.limpar(&store).unwrap();

        assert!(livro.itens().is_empty());
        assert!(livro.data_ativa().is_none());

        let recarregado = LivroRascunho::carregar(TipoRascunho::Producao, &store);
        assert!(recarregado.itens().is_empty());
        assert!(recarregado.data_ativa().is_none());
    }

    #[test]
    fn test_trava_de_registro_sobrevive_a_panico() {
        let travas = TravasRegistro::default();
        assert!(travas.travar(TipoRascunho::Producao));
        assert!(!travas.travar(TipoRascunho::Producao));
        travas.destravar(TipoRascunho::Producao);
        assert!(travas.travar(TipoRascunho::Producao));
        travas.destravar(TipoRascunho::Producao);

        // Poison the mutex the way a panicking holder would
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ocupadas = travas.0.lock().unwrap();
            panic!("registro interrompido");
        }));

        // The slot can still be claimed and released afterwards
        assert!(travas.travar(TipoRascunho::Producao));
        travas.destravar(TipoRascunho::Producao);
        assert!(travas.travar(TipoRascunho::Producao));
    }

    // ===== DATE REGISTRY TESTS =====

    #[test]
    fn test_registro_datas_roundtrip() {
        let (_dir, store) = setup_store();
        let data = dia("2025-08-20");

        let mut registro = RegistroDatas::default();
        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        registro.marcar_registrada(
            data,
            livro
                .itens()
                .iter()
                .map(crate::registry::LinhaRegistrada::de_item)
                .collect(),
        );
        registro.anotar_status(data, Nivel::Sucesso, "1 itens registrados");
        registro.salvar(TipoRascunho::Producao, &store).unwrap();

        let recarregado = RegistroDatas::carregar(TipoRascunho::Producao, &store);
        assert!(recarregado.ja_registrada(data));
        assert_eq!(recarregado.datas(), vec!["2025-08-20".to_string()]);
        assert_eq!(recarregado.instantaneo(data).len(), 1);
        assert_eq!(recarregado.instantaneo(data)[0].quantidade, 3);
        assert_eq!(recarregado.status(data).unwrap().nivel, Nivel::Sucesso);

        // Each screen keeps its own registry
        let outro = RegistroDatas::carregar(TipoRascunho::Despesa, &store);
        assert!(!outro.ja_registrada(data));
    }

    #[test]
    fn test_sincronizar_do_banco() {
        let conn = setup_test_db();
        seed_produtos(&conn);
        conn.execute(
            "INSERT INTO producao (produto_id, quantidade, preco_unitario, data_venda) VALUES (1, 3, 5.0, '2025-08-18')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO producao (produto_id, quantidade, preco_unitario, data_venda) VALUES (1, 2, 5.0, '2025-08-19')",
            [],
        )
        .unwrap();

        let mut registro = RegistroDatas::default();
        registro
            .sincronizar_do_banco(&conn, TipoRascunho::Producao)
            .unwrap();

        assert!(registro.ja_registrada(dia("2025-08-18")));
        assert!(registro.ja_registrada(dia("2025-08-19")));
        assert!(!registro.ja_registrada(dia("2025-08-20")));
    }

    // ===== COMMIT TESTS =====

    #[test]
    fn test_primeiro_registro_insere() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        seed_produtos(&conn);
        let data = dia("2025-08-20");

        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let mut registro = RegistroDatas::default();

        let resultado = commit::registrar(
            &conn,
            &store,
            &mut livro,
            &mut registro,
            TipoRascunho::Producao,
            data,
        )
        .unwrap();

        assert_eq!(resultado.nivel, Nivel::Sucesso);
        assert_eq!(resultado.linhas_gravadas, 1);
        assert!(resultado.mensagem.contains("20/08/2025"));

        let (quantidade, preco): (i64, f64) = conn
            .query_row(
                "SELECT quantidade, preco_unitario FROM producao WHERE produto_id = 1 AND data_venda = '2025-08-20'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(quantidade, 3);
        assert_eq!(preco, 5.0);

        // Draft cleared, date remembered with a success status
        assert!(livro.itens().is_empty());
        assert!(registro.ja_registrada(data));
        assert_eq!(registro.status(data).unwrap().nivel, Nivel::Sucesso);
    }

    #[test]
    fn test_registro_identico_e_noop() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        seed_produtos(&conn);
        let data = dia("2025-08-20");

        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let mut registro = RegistroDatas::default();
        commit::registrar(&conn, &store, &mut livro, &mut registro, TipoRascunho::Producao, data)
            .unwrap();

        // Stage the exact same line again and press the button again
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let erro = commit::registrar(
            &conn,
            &store,
            &mut livro,
            &mut registro,
            TipoRascunho::Producao,
            data,
        )
        .unwrap_err();

        assert!(matches!(erro, ErroRegistro::SemAlteracoes(_)));
        assert!(erro.eh_aviso());
        assert!(erro.to_string().contains("20/08/2025"));

        let linhas: i64 = conn
            .query_row("SELECT COUNT(*) FROM producao", [], |row| row.get(0))
            .unwrap();
        assert_eq!(linhas, 1);
    }

    #[test]
    fn test_registro_editado_atualiza() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        seed_produtos(&conn);
        let data = dia("2025-08-20");

        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let mut registro = RegistroDatas::default();
        commit::registrar(&conn, &store, &mut livro, &mut registro, TipoRascunho::Producao, data)
            .unwrap();

        // Same product and date, different quantity
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 4, 5.0))
            .unwrap();
        let resultado = commit::registrar(
            &conn,
            &store,
            &mut livro,
            &mut registro,
            TipoRascunho::Producao,
            data,
        )
        .unwrap();
        assert_eq!(resultado.linhas_gravadas, 1);

        // Updated in place, no duplicate row
        let (linhas, quantidade): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), MAX(quantidade) FROM producao WHERE produto_id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(linhas, 1);
        assert_eq!(quantidade, 4);

        // The snapshot followed the update: repeating it is now a no-op
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 4, 5.0))
            .unwrap();
        let erro = commit::registrar(
            &conn,
            &store,
            &mut livro,
            &mut registro,
            TipoRascunho::Producao,
            data,
        )
        .unwrap_err();
        assert!(matches!(erro, ErroRegistro::SemAlteracoes(_)));
    }

    #[test]
    fn test_linha_nova_apos_registro_e_inserida() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        seed_produtos(&conn);
        let data = dia("2025-08-20");

        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let mut registro = RegistroDatas::default();
        commit::registrar(&conn, &store, &mut livro, &mut registro, TipoRascunho::Producao, data)
            .unwrap();

        // Product 1 unchanged, product 2 staged for the first time
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        livro
            .adicionar(&store, item_producao("2025-08-20", 2, 1, 25.0))
            .unwrap();
        let resultado = commit::registrar(
            &conn,
            &store,
            &mut livro,
            &mut registro,
            TipoRascunho::Producao,
            data,
        )
        .unwrap();
        assert_eq!(resultado.linhas_gravadas, 1);

        let linhas: i64 = conn
            .query_row("SELECT COUNT(*) FROM producao", [], |row| row.get(0))
            .unwrap();
        assert_eq!(linhas, 2);

        let quantidade: i64 = conn
            .query_row(
                "SELECT quantidade FROM producao WHERE produto_id = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(quantidade, 3);
    }

    #[test]
    fn test_nada_para_registrar() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        let mut registro = RegistroDatas::default();

        let mut vazio = LivroRascunho::vazio(TipoRascunho::Producao);
        let erro = commit::registrar(
            &conn,
            &store,
            &mut vazio,
            &mut registro,
            TipoRascunho::Producao,
            dia("2025-08-20"),
        )
        .unwrap_err();
        assert!(matches!(erro, ErroRegistro::NadaParaRegistrar));
        assert!(erro.eh_aviso());

        // A draft for another date counts as nothing for this one
        vazio
            .adicionar(&store, item_producao("2025-08-21", 1, 3, 5.0))
            .unwrap();
        let erro = commit::registrar(
            &conn,
            &store,
            &mut vazio,
            &mut registro,
            TipoRascunho::Producao,
            dia("2025-08-20"),
        )
        .unwrap_err();
        assert!(matches!(erro, ErroRegistro::NadaParaRegistrar));
        assert_eq!(vazio.itens().len(), 1);
    }

    #[test]
    fn test_falha_remota_preserva_rascunho() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        let data = dia("2025-08-20");

        let mut livro = LivroRascunho::vazio(TipoRascunho::Producao);
        livro
            .adicionar(&store, item_producao("2025-08-20", 1, 3, 5.0))
            .unwrap();
        let mut registro = RegistroDatas::default();

        // Simulate the store rejecting the write
        conn.execute("DROP TABLE producao", []).unwrap();

        let erro = commit::registrar(
            &conn,
            &store,
            &mut livro,
            &mut registro,
            TipoRascunho::Producao,
            data,
        )
        .unwrap_err();

        assert!(matches!(erro, ErroRegistro::Remoto(_)));
        assert!(!erro.eh_aviso());

        // Nothing was thrown away and the failure is visible for the date
        assert_eq!(livro.itens().len(), 1);
        assert!(!registro.ja_registrada(data));
        assert_eq!(registro.status(data).unwrap().nivel, Nivel::Erro);
    }

    #[test]
    fn test_despesa_registrada_grava_total() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        let data = dia("2025-08-20");

        let mut livro = LivroRascunho::vazio(TipoRascunho::Despesa);
        livro
            .adicionar(&store, item_despesa("2025-08-20", "Farinha", 2, 30.0))
            .unwrap();
        let mut registro = RegistroDatas::default();
        commit::registrar(&conn, &store, &mut livro, &mut registro, TipoRascunho::Despesa, data)
            .unwrap();

        let (categoria, valor, total): (String, f64, f64) = conn
            .query_row(
                "SELECT categoria, valor, total FROM despesas WHERE produto = 'Farinha'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(categoria, "Insumos");
        assert_eq!(valor, 30.0);
        assert_eq!(total, 60.0);
    }

    #[test]
    fn test_sobra_registrada_grava_valor_total() {
        let conn = setup_test_db();
        let (_dir, store) = setup_store();
        seed_produtos(&conn);
        let data = dia("2025-08-20");

        let mut livro = LivroRascunho::vazio(TipoRascunho::Sobra);
        livro
            .adicionar(&store, item_sobra("2025-08-20", 7, 1, 2, 0.75))
            .unwrap();
        let mut registro = RegistroDatas::default();
        commit::registrar(&conn, &store, &mut livro, &mut registro, TipoRascunho::Sobra, data)
            .unwrap();

        let (quantidade, valor_total): (i64, f64) = conn
            .query_row(
                "SELECT quantidade_vendida, valor_total FROM sobras WHERE produto_id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(quantidade, 2);
        assert_eq!(valor_total, 1.5);
    }

    // ===== SALES TESTS =====

    #[test]
    fn test_registrar_vendas_copia_producao() {
        let conn = setup_test_db();
        seed_produtos(&conn);
        conn.execute(
            "INSERT INTO producao (produto_id, quantidade, preco_unitario, data_venda) VALUES (1, 3, 5.0, '2025-08-20')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO producao (produto_id, quantidade, preco_unitario, data_venda) VALUES (2, 1, 25.0, '2025-08-20')",
            [],
        )
        .unwrap();

        let copiadas = commit::copiar_producao_para_vendas(&conn, "2025-08-20").unwrap();
        assert_eq!(copiadas, 2);

        let (linhas, total): (i64, f64) = conn
            .query_row(
                "SELECT COUNT(*), SUM(quantidade * preco_unitario) FROM vendas WHERE data_venda = '2025-08-20'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(linhas, 2);
        assert_eq!(total, 40.0);

        // A date with no production copies nothing
        let copiadas = commit::copiar_producao_para_vendas(&conn, "2025-08-21").unwrap();
        assert_eq!(copiadas, 0);
    }

    // ===== PERIOD AND BALANCE TESTS =====

    #[test]
    fn test_intervalo_periodos() {
        // 2025-08-20 was a Wednesday
        let hoje = dia("2025-08-20");

        assert_eq!(period::intervalo(Periodo::Hoje, hoje), (hoje, hoje));
        assert_eq!(
            period::intervalo(Periodo::EstaSemana, hoje),
            (dia("2025-08-17"), hoje)
        );
        assert_eq!(
            period::intervalo(Periodo::EsteMes, hoje),
            (dia("2025-08-01"), hoje)
        );
        assert_eq!(
            period::intervalo(Periodo::EsteAno, hoje),
            (dia("2025-01-01"), hoje)
        );

        // On a Sunday the week starts today
        let domingo = dia("2025-08-17");
        assert_eq!(
            period::intervalo(Periodo::EstaSemana, domingo),
            (domingo, domingo)
        );
    }

    #[test]
    fn test_computar_totais() {
        let vendas = [
            VendaPeriodo { quantidade: 2.0, preco_unitario: 10.0 },
            VendaPeriodo { quantidade: 1.0, preco_unitario: 5.0 },
        ];
        let despesas = [DespesaPeriodo { total: 7.0 }];
        let sobras = [SobraPeriodo { valor_total: 3.0 }];

        let totais = period::computar_totais(&vendas, &despesas, &sobras);
        assert_eq!(totais.total_vendas, 25.0);
        assert_eq!(totais.total_despesas, 7.0);
        assert_eq!(totais.total_sobras, 3.0);
        assert_eq!(totais.lucro, 15.0);
        assert_eq!(totais.margem_lucro, 60.0);
    }

    #[test]
    fn test_valor_invalido_soma_zero() {
        // One poisoned row zeroes itself instead of the whole total
        let vendas = [
            VendaPeriodo { quantidade: 2.0, preco_unitario: 10.0 },
            VendaPeriodo { quantidade: 1.0, preco_unitario: f64::NAN },
        ];
        let totais = period::computar_totais(&vendas, &[], &[]);
        assert_eq!(totais.total_vendas, 20.0);
        assert_eq!(totais.lucro, 20.0);
    }

    #[test]
    fn test_margem_zero_sem_vendas() {
        let despesas = [DespesaPeriodo { total: 10.0 }];
        let totais = period::computar_totais(&[], &despesas, &[]);
        assert_eq!(totais.lucro, -10.0);
        assert_eq!(totais.margem_lucro, 0.0);
    }

    #[test]
    fn test_numero_ou_zero() {
        assert_eq!(period::numero_ou_zero(&Value::Integer(3)), 3.0);
        assert_eq!(period::numero_ou_zero(&Value::Real(2.5)), 2.5);
        assert_eq!(period::numero_ou_zero(&Value::Real(f64::NAN)), 0.0);
        assert_eq!(period::numero_ou_zero(&Value::Text(" 4.5 ".to_string())), 4.5);
        assert_eq!(period::numero_ou_zero(&Value::Text("abc".to_string())), 0.0);
        assert_eq!(period::numero_ou_zero(&Value::Null), 0.0);
    }

    #[test]
    fn test_crescimento_placeholder() {
        assert_eq!(period::crescimento(150.0), "+5%");
        assert_eq!(period::crescimento(0.0), "0%");
        assert_eq!(period::crescimento(-3.0), "0%");
    }

    #[test]
    fn test_formatar_data() {
        assert_eq!(commit::formatar_data(dia("2025-08-05")), "05/08/2025");
    }
}
