use thiserror::Error;

/// Failures of the staging layer. `Storage` is special: the in-memory
/// mutation has already been applied when it is returned, only the local
/// persistence failed, so callers downgrade it to a transient warning.
#[derive(Debug, Error)]
pub enum ErroRascunho {
    #[error("Erro: {0}")]
    Validacao(String),

    #[error("Não é possível misturar datas diferentes. Registre os itens atuais antes de alterar a data.")]
    ConflitoDeData,

    #[error("item {0} não encontrado no rascunho")]
    ItemNaoEncontrado(i64),

    #[error("Erro ao salvar itens temporários: {0}")]
    Storage(String),
}

/// Failures of the reconciliation commit. The first two are soft: they
/// reach the user as warnings and leave every piece of state untouched.
#[derive(Debug, Error)]
pub enum ErroRegistro {
    #[error("Nenhum item para registrar")]
    NadaParaRegistrar,

    #[error("Já existem registros idênticos para {0}. Nada foi enviado.")]
    SemAlteracoes(String),

    #[error("Outro registro está em andamento para esta tela")]
    RegistroEmAndamento,

    #[error("Erro ao registrar: {0}")]
    Remoto(#[from] rusqlite::Error),

    #[error(transparent)]
    Rascunho(#[from] ErroRascunho),
}

impl ErroRegistro {
    /// Soft failures are reported as warnings, without an error status.
    pub fn eh_aviso(&self) -> bool {
        matches!(
            self,
            ErroRegistro::NadaParaRegistrar
                | ErroRegistro::SemAlteracoes(_)
                | ErroRegistro::RegistroEmAndamento
        )
    }
}
