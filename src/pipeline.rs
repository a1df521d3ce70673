//! Cálculo puro de KPIs e filtros sobre clientes já escopados ao usuário.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Client, PipelineStatus};

/// Indicadores exibidos no topo do dashboard.
#[derive(Debug, PartialEq)]
pub struct Kpis {
    /// Soma de `value` de todos os clientes no recorte.
    pub volume: f64,
    /// Soma de `value` dos clientes com status Fechado.
    pub fechado: f64,
    /// Quantidade de clientes com status diferente de Fechado.
    pub ativos: usize,
    /// Valor médio por negócio fechado (0 quando não há fechados).
    pub ticket_medio: f64,
    /// Percentual de fechados sobre o total, truncado para inteiro.
    pub conversao: i64,
}

impl Kpis {
    pub fn from_clients(clients: &[Client]) -> Self {
        let volume: f64 = clients.iter().map(|c| c.value).sum();

        let fechados: Vec<&Client> = clients
            .iter()
            .filter(|c| c.status == PipelineStatus::Fechado)
            .collect();
        let fechado: f64 = fechados.iter().map(|c| c.value).sum();
        let count_fechado = fechados.len();

        let ativos = clients.len() - count_fechado;

        let ticket_medio = if count_fechado > 0 {
            fechado / count_fechado as f64
        } else {
            0.0
        };

        let conversao = if clients.is_empty() {
            0
        } else {
            (count_fechado as f64 / clients.len() as f64 * 100.0) as i64
        };

        Kpis {
            volume,
            fechado,
            ativos,
            ticket_medio,
            conversao,
        }
    }
}

/// Linha da visão "oportunidades": soma e contagem por etapa.
#[derive(Debug, PartialEq)]
pub struct ResumoStatus {
    pub status: PipelineStatus,
    pub total: f64,
    pub quantidade: usize,
}

/// Uma entrada por etapa, na ordem do funil, mesmo quando vazia.
pub fn resumo_por_status(clients: &[Client]) -> Vec<ResumoStatus> {
    PipelineStatus::ALL
        .into_iter()
        .map(|status| {
            let do_status = clients.iter().filter(|c| c.status == status);
            let (total, quantidade) = do_status.fold((0.0, 0), |(soma, n), c| (soma + c.value, n + 1));
            ResumoStatus {
                status,
                total,
                quantidade,
            }
        })
        .collect()
}

/// Intervalo inclusivo `[data_inicio, data_fim]` sobre `created_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodoFiltro {
    inicio: NaiveDateTime,
    fim: NaiveDateTime,
}

impl PeriodoFiltro {
    /// Exige as duas datas em formato `YYYY-MM-DD`. Entrada ausente ou
    /// inválida desliga o filtro silenciosamente (retorna None). O fim
    /// é estendido para 23:59:59 para incluir o dia inteiro.
    pub fn parse(data_inicio: Option<&str>, data_fim: Option<&str>) -> Option<Self> {
        let inicio = NaiveDate::parse_from_str(data_inicio?, "%Y-%m-%d").ok()?;
        let fim = NaiveDate::parse_from_str(data_fim?, "%Y-%m-%d").ok()?;

        Some(PeriodoFiltro {
            inicio: inicio.and_hms_opt(0, 0, 0)?,
            fim: fim.and_hms_opt(23, 59, 59)?,
        })
    }

    pub fn contem(&self, momento: NaiveDateTime) -> bool {
        self.inicio <= momento && momento <= self.fim
    }
}

/// Grupos aceitos no parâmetro `filtro` de /clientes.
#[derive(Debug, PartialEq)]
pub enum FiltroClientes {
    Todos,
    /// As quatro etapas não fechadas.
    Ativos,
    Fechados,
    /// Uma etapa exata do pipeline.
    Status(PipelineStatus),
    /// Texto que não corresponde a nenhuma etapa: não casa com nada,
    /// reproduzindo a lista vazia do comportamento anterior.
    Desconhecido,
}

impl FiltroClientes {
    pub fn parse(filtro: Option<&str>) -> Self {
        match filtro {
            None | Some("Todos") => FiltroClientes::Todos,
            Some("Ativos") => FiltroClientes::Ativos,
            Some("Fechados") => FiltroClientes::Fechados,
            Some(outro) => match PipelineStatus::parse(outro) {
                Some(status) => FiltroClientes::Status(status),
                None => FiltroClientes::Desconhecido,
            },
        }
    }

    pub fn aceita(&self, status: PipelineStatus) -> bool {
        match self {
            FiltroClientes::Todos => true,
            FiltroClientes::Ativos => status != PipelineStatus::Fechado,
            FiltroClientes::Fechados => status == PipelineStatus::Fechado,
            FiltroClientes::Status(exato) => status == *exato,
            FiltroClientes::Desconhecido => false,
        }
    }
}
