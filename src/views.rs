//! Renderização das páginas HTML.
//!
//! As páginas são montadas com `format!` sobre um layout comum. Tudo que
//! vem do banco passa por `escape` antes de entrar no HTML.

use crate::models::{Client, PipelineStatus};
use crate::pipeline::{Kpis, ResumoStatus};

const ESTILO: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: 'Segoe UI', Arial, sans-serif; background: #f0f2f5; color: #333; }
nav { background: #1a252f; color: #fff; padding: 12px 24px; display: flex; align-items: center; gap: 20px; }
nav .marca { font-weight: bold; font-size: 1.1em; margin-right: 12px; }
nav a { color: #cfd8e3; text-decoration: none; }
nav a:hover { color: #fff; }
nav .usuario { margin-left: auto; color: #8fa3b8; font-size: .85em; }
main { max-width: 1200px; margin: 24px auto; padding: 0 16px; }
.flash { background: #d4edda; border: 1px solid #c3e6cb; color: #155724; padding: 10px 16px; border-radius: 6px; margin-bottom: 16px; }
.cartoes { display: flex; gap: 16px; flex-wrap: wrap; margin-bottom: 24px; }
.cartao { background: #fff; border-radius: 8px; padding: 16px 20px; flex: 1; min-width: 160px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.cartao h3 { font-size: .8em; text-transform: uppercase; color: #888; margin-bottom: 6px; }
.cartao p { font-size: 1.4em; font-weight: bold; }
form.filtro, form.novo-cliente { background: #fff; border-radius: 8px; padding: 16px; margin-bottom: 24px; display: flex; gap: 12px; flex-wrap: wrap; align-items: end; }
form label { display: block; font-size: .8em; color: #666; margin-bottom: 4px; }
form input { padding: 8px; border: 1px solid #ccc; border-radius: 4px; }
form button { padding: 8px 16px; background: #2c7be5; color: #fff; border: none; border-radius: 4px; cursor: pointer; }
form button:hover { background: #1a68d1; }
.kanban { display: grid; grid-template-columns: repeat(5, 1fr); gap: 12px; }
.coluna { background: #e9ecef; border-radius: 8px; padding: 10px; min-height: 200px; }
.coluna h2 { font-size: .9em; margin-bottom: 10px; padding-bottom: 6px; border-bottom: 2px solid #1a252f; }
.card { background: #fff; border-radius: 6px; padding: 10px; margin-bottom: 8px; box-shadow: 0 1px 2px rgba(0,0,0,.15); cursor: grab; }
.card strong { display: block; margin-bottom: 4px; }
.card span { font-size: .85em; color: #666; display: block; }
.card .valor { color: #2c7be5; font-weight: bold; }
table { width: 100%; background: #fff; border-radius: 8px; border-collapse: collapse; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
th, td { padding: 10px 14px; text-align: left; border-bottom: 1px solid #eee; }
th { background: #1a252f; color: #fff; font-size: .85em; }
.filtros { margin-bottom: 16px; }
.filtros a { display: inline-block; margin-right: 8px; padding: 6px 12px; background: #fff; border-radius: 16px; text-decoration: none; color: #333; font-size: .85em; }
.filtros a.ativo { background: #2c7be5; color: #fff; }
.acoes a { font-size: .8em; margin-right: 6px; color: #2c7be5; text-decoration: none; }
.entrada { max-width: 380px; margin: 80px auto; background: #fff; border-radius: 8px; padding: 28px; box-shadow: 0 2px 8px rgba(0,0,0,.1); }
.entrada h1 { margin-bottom: 18px; font-size: 1.3em; }
.entrada form { display: flex; flex-direction: column; gap: 12px; }
.entrada input { width: 100%; }
.entrada p { margin-top: 14px; font-size: .9em; }
.entrada a { color: #2c7be5; }
"#;

const SCRIPT_KANBAN: &str = r#"
document.querySelectorAll('.card').forEach(function (card) {
    card.addEventListener('dragstart', function (e) {
        e.dataTransfer.setData('text/plain', card.dataset.id);
    });
});
document.querySelectorAll('.coluna').forEach(function (coluna) {
    coluna.addEventListener('dragover', function (e) { e.preventDefault(); });
    coluna.addEventListener('drop', function (e) {
        e.preventDefault();
        var id = parseInt(e.dataTransfer.getData('text/plain'), 10);
        fetch('/api/update_kanban', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ client_id: id, new_status: coluna.dataset.status })
        }).then(function (resp) {
            if (resp.ok) { window.location.reload(); }
        });
    });
});
"#;

/// Escapa texto para inserção segura em HTML.
pub fn escape(texto: &str) -> String {
    let mut saida = String::with_capacity(texto.len());
    for c in texto.chars() {
        match c {
            '&' => saida.push_str("&amp;"),
            '<' => saida.push_str("&lt;"),
            '>' => saida.push_str("&gt;"),
            '"' => saida.push_str("&quot;"),
            '\'' => saida.push_str("&#39;"),
            _ => saida.push(c),
        }
    }
    saida
}

/// Formata um valor monetário com milhares separados por vírgula e duas
/// casas decimais: 1234.5 -> "1,234.50". Mesmo formato exibido desde a
/// primeira versão do painel.
pub fn formata_valor(valor: f64) -> String {
    let bruto = format!("{:.2}", valor);
    let (inteiro, decimais) = match bruto.split_once('.') {
        Some((i, d)) => (i.to_string(), d.to_string()),
        None => (bruto, "00".to_string()),
    };
    let (sinal, digitos) = match inteiro.strip_prefix('-') {
        Some(resto) => ("-", resto.to_string()),
        None => ("", inteiro),
    };
    let mut agrupado = String::new();
    for (i, c) in digitos.chars().enumerate() {
        if i > 0 && (digitos.len() - i) % 3 == 0 {
            agrupado.push(',');
        }
        agrupado.push(c);
    }
    format!("{sinal}{agrupado}.{decimais}")
}

fn layout(titulo: &str, usuario: Option<&str>, flash: Option<&str>, conteudo: &str) -> String {
    let nav = match usuario {
        Some(email) => format!(
            r#"<nav>
  <span class="marca">CRM Vendas</span>
  <a href="/dashboard">Dashboard</a>
  <a href="/oportunidades">Oportunidades</a>
  <a href="/clientes">Clientes</a>
  <span class="usuario">{email}</span>
  <a href="/logout">Sair</a>
</nav>"#,
            email = escape(email),
        ),
        None => String::new(),
    };
    let banner = match flash {
        Some(mensagem) => format!(r#"<div class="flash">{}</div>"#, escape(mensagem)),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{titulo} - CRM Vendas</title>
<style>{estilo}</style>
</head>
<body>
{nav}
<main>
{banner}
{conteudo}
</main>
</body>
</html>"#,
        titulo = escape(titulo),
        estilo = ESTILO,
        nav = nav,
        banner = banner,
        conteudo = conteudo,
    )
}

pub fn login_page(flash: Option<&str>) -> String {
    let conteudo = r#"<div class="entrada">
  <h1>Entrar no CRM</h1>
  <form method="post" action="/login">
    <div><label for="email">Email</label>
    <input type="email" id="email" name="email" required></div>
    <div><label for="password">Senha</label>
    <input type="password" id="password" name="password" required></div>
    <button type="submit">Entrar</button>
  </form>
  <p>Não tem conta? <a href="/register">Cadastre-se</a></p>
</div>"#;
    layout("Login", None, flash, conteudo)
}

pub fn register_page(flash: Option<&str>) -> String {
    let conteudo = r#"<div class="entrada">
  <h1>Criar conta</h1>
  <form method="post" action="/register">
    <div><label for="email">Email</label>
    <input type="email" id="email" name="email" required></div>
    <div><label for="password">Senha</label>
    <input type="password" id="password" name="password" required></div>
    <button type="submit">Registrar</button>
  </form>
  <p>Já tem conta? <a href="/login">Entrar</a></p>
</div>"#;
    layout("Registro", None, flash, conteudo)
}

fn card_cliente(cliente: &Client) -> String {
    format!(
        r#"<div class="card" draggable="true" data-id="{id}">
  <strong>{nome}</strong>
  <span>{telefone}</span>
  <span class="valor">R$ {valor}</span>
</div>"#,
        id = cliente.id,
        nome = escape(&cliente.name),
        telefone = escape(&cliente.phone),
        valor = formata_valor(cliente.value),
    )
}

fn coluna_kanban(status: PipelineStatus, clientes: &[Client]) -> String {
    let cards: String = clientes
        .iter()
        .filter(|c| c.status == status)
        .map(card_cliente)
        .collect();
    let quantidade = clientes.iter().filter(|c| c.status == status).count();
    format!(
        r#"<div class="coluna" data-status="{status}">
  <h2>{status} ({quantidade})</h2>
{cards}
</div>"#,
        status = status.as_str(),
        quantidade = quantidade,
        cards = cards,
    )
}

pub fn dashboard_page(
    usuario: &str,
    clientes: &[Client],
    kpis: &Kpis,
    data_inicio: &str,
    data_fim: &str,
    flash: Option<&str>,
) -> String {
    let cartoes = format!(
        r#"<div class="cartoes">
  <div class="cartao"><h3>Volume Total</h3><p>R$ {volume}</p></div>
  <div class="cartao"><h3>Fechado</h3><p>R$ {fechado}</p></div>
  <div class="cartao"><h3>Clientes Ativos</h3><p>{ativos}</p></div>
  <div class="cartao"><h3>Ticket Médio</h3><p>R$ {ticket}</p></div>
  <div class="cartao"><h3>Conversão</h3><p>{conversao}%</p></div>
</div>"#,
        volume = formata_valor(kpis.volume),
        fechado = formata_valor(kpis.fechado),
        ativos = kpis.ativos,
        ticket = formata_valor(kpis.ticket_medio),
        conversao = kpis.conversao,
    );
    let filtro = format!(
        r#"<form class="filtro" method="get" action="/dashboard">
  <div><label for="data_inicio">De</label>
  <input type="date" id="data_inicio" name="data_inicio" value="{inicio}"></div>
  <div><label for="data_fim">Até</label>
  <input type="date" id="data_fim" name="data_fim" value="{fim}"></div>
  <button type="submit">Filtrar</button>
</form>"#,
        inicio = escape(data_inicio),
        fim = escape(data_fim),
    );
    let novo = r#"<form class="novo-cliente" method="post" action="/dashboard">
  <div><label for="name">Nome</label>
  <input type="text" id="name" name="name" placeholder="Nome do cliente"></div>
  <div><label for="phone">Telefone</label>
  <input type="text" id="phone" name="phone" placeholder="(00) 00000-0000"></div>
  <div><label for="value">Valor (R$)</label>
  <input type="text" id="value" name="value" placeholder="0,00"></div>
  <button type="submit">Adicionar Cliente</button>
</form>"#;
    let colunas: String = PipelineStatus::ALL
        .into_iter()
        .map(|status| coluna_kanban(status, clientes))
        .collect();
    let conteudo = format!(
        r#"<h1>Dashboard</h1>
{cartoes}
{filtro}
{novo}
<div class="kanban">
{colunas}
</div>
<script>{script}</script>"#,
        cartoes = cartoes,
        filtro = filtro,
        novo = novo,
        colunas = colunas,
        script = SCRIPT_KANBAN,
    );
    layout("Dashboard", Some(usuario), flash, &conteudo)
}

pub fn oportunidades_page(usuario: &str, resumo: &[ResumoStatus], flash: Option<&str>) -> String {
    let linhas: String = resumo
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{status}</td><td>R$ {total}</td><td>{quantidade}</td></tr>\n",
                status = r.status.as_str(),
                total = formata_valor(r.total),
                quantidade = r.quantidade,
            )
        })
        .collect();
    let conteudo = format!(
        r#"<h1>Oportunidades por Status</h1>
<table>
  <thead><tr><th>Status</th><th>Valor Total</th><th>Quantidade</th></tr></thead>
  <tbody>
{linhas}
  </tbody>
</table>"#,
        linhas = linhas,
    );
    layout("Oportunidades", Some(usuario), flash, &conteudo)
}

fn link_filtro(rotulo: &str, valor: &str, atual: &str) -> String {
    let classe = if valor == atual { " class=\"ativo\"" } else { "" };
    format!(
        r#"<a href="/clientes?filtro={valor}"{classe}>{rotulo}</a>"#,
        valor = valor,
        classe = classe,
        rotulo = escape(rotulo),
    )
}

fn linha_cliente(cliente: &Client) -> String {
    let acoes: String = PipelineStatus::ALL
        .into_iter()
        .filter(|s| *s != cliente.status)
        .map(|s| {
            format!(
                r#"<a href="/update_status/{id}/{status}">{status}</a>"#,
                id = cliente.id,
                status = s.as_str(),
            )
        })
        .collect();
    format!(
        r#"<tr>
  <td>{nome}</td>
  <td>{telefone}</td>
  <td>R$ {valor}</td>
  <td>{status}</td>
  <td>{criado}</td>
  <td class="acoes">{acoes}</td>
</tr>
"#,
        nome = escape(&cliente.name),
        telefone = escape(&cliente.phone),
        valor = formata_valor(cliente.value),
        status = cliente.status.as_str(),
        criado = cliente.created_at.format("%d/%m/%Y"),
        acoes = acoes,
    )
}

pub fn clientes_page(
    usuario: &str,
    clientes: &[Client],
    filtro: &str,
    flash: Option<&str>,
) -> String {
    let mut links = vec![
        link_filtro("Todos", "Todos", filtro),
        link_filtro("Ativos", "Ativos", filtro),
        link_filtro("Fechados", "Fechados", filtro),
    ];
    for status in PipelineStatus::ALL {
        links.push(link_filtro(status.as_str(), status.as_str(), filtro));
    }
    let linhas: String = clientes.iter().map(linha_cliente).collect();
    let conteudo = format!(
        r#"<h1>Clientes</h1>
<div class="filtros">{links}</div>
<table>
  <thead><tr><th>Nome</th><th>Telefone</th><th>Valor</th><th>Status</th><th>Cadastro</th><th>Mover para</th></tr></thead>
  <tbody>
{linhas}
  </tbody>
</table>"#,
        links = links.join(" "),
        linhas = linhas,
    );
    layout("Clientes", Some(usuario), flash, &conteudo)
}
