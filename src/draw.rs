use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::dialog::ConfirmDialog;
use crate::state::form::CreateForm;
use crate::state::list_page::ListPage;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::toast::ToastLevel;
use crate::ui::layout::{LayoutAreas, centered};
use arena_api::{EntityKind, Record};

const HELP_TEXT: &str = "\
1-9 / h l / Tab    trocar de lista
j k / ↑ ↓          mover seleção
n                  novo registro
d / Del            excluir selecionado
r                  recarregar lista
f                  tela cheia
\"                  painel de logs
?                  ajuda (Esc volta)
q / Ctrl-C         sair

No formulário: Tab/↑/↓ muda de campo, Enter envia, Esc cancela.
Na confirmação: Enter/s confirma, Esc/n cancela.";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::List(kind) => draw_list_page(f, layout.main, app.state.page(kind)),
            MenuItem::Help => draw_help(f, layout.main, &app.state.backend),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        if let Some(form) = app.state.form.as_ref() {
            draw_form(f, layout.main, form);
        } else if let Some(dialog) = app.state.dialog.as_ref().filter(|d| d.open) {
            draw_dialog(f, layout.main, dialog);
        }

        draw_toasts(f, layout.main, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let titles: Vec<Line> = EntityKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| Line::from(format!("{} {}", i + 1, kind.config().plural)))
        .collect();

    let mut tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .style(style);
    if let Some(kind) = app.active_kind() {
        tabs = tabs.select(kind.index());
    }
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Ajuda: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_list_page(f: &mut Frame, area: Rect, page: &ListPage) {
    let config = page.kind.config();
    let title = if page.kind == EntityKind::Match && page.live_count() > 0 {
        format!(" {} ({} ao vivo) ", config.plural, page.live_count())
    } else {
        format!(" {} ", config.plural)
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [key_legend, content, status] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1), Constraint::Length(1)])
            .areas(inner);

    let legend = if page.kind.is_creatable() {
        "Teclas: j/k=mover  n=novo  d=excluir  r=recarregar  ?=ajuda  q=sair"
    } else {
        "Teclas: j/k=mover  d=excluir  r=recarregar  ?=ajuda  q=sair"
    };
    f.render_widget(
        Paragraph::new(legend).style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    if page.records.is_empty() {
        let msg = match (&page.last_error, page.loaded) {
            (Some(err), _) => format!("Falha ao carregar {}:\n{err}", config.plural.to_lowercase()),
            (None, false) => "Carregando...".to_string(),
            (None, true) => "Nenhum registro encontrado".to_string(),
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            content,
        );
    } else {
        draw_table(f, content, page);
    }

    let status_line = match &page.last_error {
        Some(err) if !page.records.is_empty() => {
            Line::from(Span::styled(format!("Última atualização falhou: {err}"), Style::default().fg(Color::Red)))
        }
        _ => Line::from(Span::styled(
            format!("{} registro(s)", page.records.len()),
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(status_line), status);
}

fn draw_table(f: &mut Frame, area: Rect, page: &ListPage) {
    let columns = page.kind.columns();
    let header = Row::new(columns.iter().copied())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows = page.records.iter().map(|record| {
        let style = match record {
            Record::Match(m) if m.is_live() => Style::default().fg(Color::Green),
            _ => Style::default(),
        };
        Row::new(record.cells()).style(style)
    });
    let widths = vec![Constraint::Fill(1); columns.len()];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = TableState::default().with_selected(Some(page.selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_form(f: &mut Frame, area: Rect, form: &CreateForm) {
    // Two lines per field (input + error), plus borders and footer.
    let height = form.fields.len() as u16 * 2 + 4;
    let popup = centered(area, 64, height);
    f.render_widget(Clear, popup);

    let title = format!(" Novo {} ", form.kind);
    let block = default_border(if form.pending { Color::DarkGray } else { Color::Yellow }).title(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut lines = Vec::with_capacity(form.fields.len() * 2 + 1);
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focus;
        let marker = if focused { '>' } else { ' ' };
        let value = if field.value.is_empty() && !field.hint().is_empty() {
            Span::styled(field.hint(), Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(field.value.clone())
        };
        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {}: ", field.field.label), label_style),
            value,
            Span::raw(if focused && !form.pending { "▏" } else { "" }),
        ]));
        lines.push(match &field.error {
            Some(err) => Line::from(Span::styled(format!("    {err}"), Style::default().fg(Color::Red))),
            None => Line::default(),
        });
    }
    let footer = if form.pending {
        "Enviando..."
    } else {
        "Enter=salvar  Tab=próximo campo  Esc=cancelar"
    };
    lines.push(Line::from(Span::styled(footer, Style::default().fg(Color::DarkGray))));

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_dialog(f: &mut Frame, area: Rect, dialog: &ConfirmDialog) {
    let popup = centered(area, 56, 7);
    f.render_widget(Clear, popup);

    let block = default_border(Color::Red).title(" Confirmar exclusão ");
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [prompt, actions] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(
        Paragraph::new(dialog.prompt()).wrap(Wrap { trim: true }),
        prompt,
    );

    // The confirm action is disabled while the delete is in flight.
    let confirm = if dialog.pending {
        Span::styled("Excluindo...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled("[Enter] Excluir", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    };
    let cancel_style = if dialog.pending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![confirm, Span::raw("   "), Span::styled("[Esc] Cancelar", cancel_style)]))
            .alignment(Alignment::Center),
        actions,
    );
}

fn draw_toasts(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.min(48);
    let mut y = area.y + 1;
    for toast in app.state.toasts.iter() {
        if y + 3 > area.y + area.height {
            break;
        }
        let color = match toast.level {
            ToastLevel::Success => Color::Green,
            ToastLevel::Failure => Color::Red,
        };
        let rect = Rect::new(area.x + area.width - width, y, width, 3);
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(toast.message.as_str())
                .style(Style::default().fg(color))
                .block(default_border(color)),
            rect,
        );
        y += 3;
    }
}

fn draw_help(f: &mut Frame, area: Rect, backend: &str) {
    let block = default_border(Color::DarkGray).title(" Ajuda ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    let text = format!("{HELP_TEXT}\n\nBackend: {backend}");
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Gray)), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default().block(default_border(Color::DarkGray).title(" Logs "));
    f.render_widget(widget, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
