use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use task_console_core::api::{ellipsize, Field, NoticeLevel, TaskRow, EMPTY_PLACEHOLDER};

use super::app::{InputMode, TuiApp};

const COMMAND_MAX: usize = 40;
const NOTICE_WIDTH: u16 = 48;

pub fn draw(f: &mut Frame<'_>, app: &TuiApp) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    draw_header(f, chunks[0], app);
    draw_table(f, chunks[1], app);
    draw_footer(f, chunks[2], app);

    match app.input_mode() {
        InputMode::Form => draw_form(f, size, app),
        InputMode::Result => draw_result(f, size, app),
        InputMode::Normal | InputMode::Search => {}
    }
    draw_notices(f, size, app);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let p = &app.palette;
    let bar = Style::default().bg(p.header_bg).fg(p.header_fg);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(36)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        app.theme.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .style(bar)
    .block(Block::default().borders(Borders::NONE))
    .alignment(Alignment::Left);
    f.render_widget(title, chunks[0]);

    let searching = app.input_mode() == InputMode::Search;
    let query = if app.state.query.is_empty() && !searching {
        Span::styled("Search by name", Style::default().fg(p.muted))
    } else {
        Span::raw(app.state.query.clone())
    };
    let mut search_block = Block::default().borders(Borders::ALL).title(" / ");
    if searching {
        search_block = search_block.border_style(Style::default().fg(p.primary));
    }
    let search = Paragraph::new(Line::from(query))
        .style(bar)
        .block(search_block);
    f.render_widget(search, chunks[1]);

    if searching {
        let inner = chunks[1];
        let col = app.state.query.chars().count() as u16;
        let x = (inner.x + 1 + col).min(inner.x + inner.width.saturating_sub(2));
        f.set_cursor_position((x, inner.y + 1));
    }
}

fn draw_table(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let p = &app.palette;
    let rows = app.state.visible_rows();
    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Owner"),
        Cell::from("Command"),
        Cell::from(app.theme.executions_label.clone()),
        Cell::from("Actions"),
    ])
    .style(
        Style::default()
            .bg(p.table_header_bg)
            .fg(p.on_light)
            .add_modifier(Modifier::BOLD),
    );

    let selected = app.state.selected();
    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| table_row(row, idx == selected, app))
        .collect();

    let widths = [
        Constraint::Length(app.theme.id_width),
        Constraint::Percentage(14),
        Constraint::Percentage(12),
        Constraint::Min(16),
        Constraint::Percentage(30),
        Constraint::Length(16),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if !rows.is_empty() {
        state.select(Some(selected));
    }
    f.render_stateful_widget(table, area, &mut state);

    if rows.is_empty() && !app.state.is_loading() {
        let inner = Rect {
            x: area.x + 1,
            y: area.y + 2,
            width: area.width.saturating_sub(2),
            height: 1.min(area.height.saturating_sub(3)),
        };
        let empty = Paragraph::new(Span::styled("No tasks", Style::default().fg(p.muted)))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
    }
}

fn table_row<'a>(row: &'a TaskRow, selected: bool, app: &TuiApp) -> Row<'a> {
    let p = &app.palette;
    let recent = if row.recent.is_empty() {
        Line::from(Span::styled(EMPTY_PLACEHOLDER, Style::default().fg(p.muted)))
    } else {
        let mut spans = Vec::with_capacity(row.recent.len() * 2);
        for tag in &row.recent {
            spans.push(Span::styled(
                format!("[{}]", tag.label),
                Style::default().fg(p.tag),
            ));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    };
    let actions = if selected {
        Span::styled("r Run  d Delete", Style::default().fg(p.primary))
    } else {
        Span::raw("")
    };
    Row::new(vec![
        Cell::from(row.id_label().to_string()),
        Cell::from(row.name.as_str()),
        Cell::from(row.owner.as_str()),
        Cell::from(ellipsize(&row.command, COMMAND_MAX)),
        Cell::from(recent),
        Cell::from(actions),
    ])
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let p = &app.palette;
    let page = app.state.page();
    let mut parts = vec![Span::styled(
        format!("Page {}", page.label()),
        Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
    )];
    if app.state.is_loading() {
        parts.push(Span::raw("  "));
        parts.push(Span::styled("Loading…", Style::default().fg(p.tag)));
    }
    parts.push(Span::raw("  "));
    parts.push(Span::styled(hint(app.input_mode()), Style::default().fg(p.muted)));
    let footer = Paragraph::new(Line::from(parts)).block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

fn hint(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Normal => {
            "q:quit  /:search  n:new  r:run  d:delete  j/k:select  [/]:page  g:reload"
        }
        InputMode::Search => "Enter:search  Esc:done",
        InputMode::Form => "Enter:save  Tab:next field  Esc:cancel",
        InputMode::Result => "j/k:scroll  PgUp/PgDn:page  g/G:top/end  Esc:close",
    }
}

fn draw_form(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let p = &app.palette;
    let form = &app.state.form;
    let rect = centered_fixed(64, 15, area);
    f.render_widget(Clear, rect);

    let block = Block::default()
        .title(" New Task ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.primary));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(inner);

    for (slot, field) in Field::ALL.into_iter().enumerate() {
        let focused = form.focus == field;
        let area = chunks[slot];
        let value = form.value(field);
        let text = if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(p.muted))
        } else {
            Span::raw(value.to_string())
        };
        let mut input = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", field.label()));
        if focused {
            input = input.border_style(Style::default().fg(p.primary));
        }
        let input_area = Rect {
            height: area.height.min(3),
            ..area
        };
        f.render_widget(Paragraph::new(Line::from(text)).block(input), input_area);

        if let Some(err) = form.error(field) {
            let err_area = Rect {
                y: area.y + input_area.height,
                height: area.height.saturating_sub(input_area.height),
                ..area
            };
            f.render_widget(
                Paragraph::new(Span::styled(err.to_string(), Style::default().fg(p.error))),
                err_area,
            );
        }

        if focused {
            let col = value.chars().count() as u16;
            let max_x = input_area.x + input_area.width.saturating_sub(2);
            f.set_cursor_position(((input_area.x + 1 + col).min(max_x), input_area.y + 1));
        }
    }

    let help = Paragraph::new(Span::styled(hint(InputMode::Form), Style::default().fg(p.muted)))
        .alignment(Alignment::Right);
    f.render_widget(help, chunks[3]);
}

fn draw_result(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let Some(result) = app.state.result.as_ref() else {
        return;
    };
    let p = &app.palette;
    let rect = centered_rect(80, 80, area);
    f.render_widget(Clear, rect);

    let title = match result.task.name.as_str() {
        "" => " Execution Result ".to_string(),
        name => format!(" Execution Result: {} ", ellipsize(name, 32)),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.primary));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    // JSON and output share one scrolled body so j/k reach every line of both.
    let json_style = Style::default().bg(p.json_bg).fg(p.on_light);
    let output_style = Style::default().bg(p.output_bg).fg(p.on_light);
    let mut lines = vec![Line::styled(
        " Task JSON ",
        json_style.add_modifier(Modifier::BOLD),
    )];
    lines.extend(
        result
            .json
            .lines()
            .map(|l| Line::styled(l.to_string(), json_style)),
    );
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "── Latest Execution Output ──",
        Style::default()
            .fg(p.output_border)
            .add_modifier(Modifier::BOLD),
    ));
    match result.latest_output.as_deref() {
        Some(out) => {
            lines.extend(out.lines().map(|l| Line::styled(l.to_string(), output_style)))
        }
        None => lines.push(Line::styled(
            EMPTY_PLACEHOLDER,
            Style::default().fg(p.muted),
        )),
    }

    let body_area = chunks[0];
    let limit = wrapped_height(&lines, body_area.width).saturating_sub(body_area.height);
    app.set_result_scroll_limit(limit);
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll.min(limit), 0));
    f.render_widget(body, body_area);

    let help = Paragraph::new(Span::styled(hint(InputMode::Result), Style::default().fg(p.muted)))
        .alignment(Alignment::Right);
    f.render_widget(help, chunks[1]);
}

/// Rows `lines` occupy once wrapped to `width`. Word wrapping can push a
/// word onto the next row early, so long lines get one spare row.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| match line.width() {
            0 => 1,
            w if w <= width => 1,
            w => w.div_ceil(width) + 1,
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn draw_notices(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let p = &app.palette;
    let width = NOTICE_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    let mut y = area.y + 1;
    for notice in app.state.notices.iter() {
        if y + 3 > area.y + area.height {
            break;
        }
        let rect = Rect {
            x,
            y,
            width,
            height: 3,
        };
        let color = match notice.level {
            NoticeLevel::Success => p.primary,
            NoticeLevel::Error => p.error,
        };
        f.render_widget(Clear, rect);
        let widget = Paragraph::new(ellipsize(&notice.text, width.saturating_sub(2) as usize))
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(widget, rect);
        y += 3;
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::collections::BTreeSet;
    use task_console_core::api::{
        Action, ExecutionResult, Notice, Outcome, Task, TasksChange, Theme, TuiConfig,
    };

    fn task(id: &str, outputs: &[&str]) -> Task {
        let runs: Vec<_> = outputs
            .iter()
            .enumerate()
            .map(|(i, out)| {
                serde_json::json!({
                    "startTime": format!("2024-05-01T10:00:0{i}"),
                    "endTime": format!("2024-05-01T10:00:0{i}"),
                    "output": out,
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("task {id}"),
            "owner": "John Smith",
            "command": "echo Hello World!",
            "taskExecutions": runs,
        }))
        .unwrap()
    }

    fn app_with(tasks: Vec<Task>, theme: Theme) -> TuiApp {
        let mut app = TuiApp::new(&TuiConfig::default(), theme);
        app.state.begin(&Action::LoadAll);
        app.state.apply(Outcome {
            tasks: Some(TasksChange::Replace(tasks)),
            ..Default::default()
        });
        app
    }

    fn render(app: &TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        render_on(&mut terminal, app)
    }

    fn render_on(terminal: &mut Terminal<TestBackend>, app: &TuiApp) -> String {
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_theme_drives_title_and_column() {
        let amber = render(&app_with(vec![task("1", &[])], Theme::amber()));
        assert!(amber.contains("Task Management System"));
        assert!(amber.contains("Recent Runs"));

        let classic = render(&app_with(vec![task("1", &[])], Theme::classic()));
        assert!(classic.contains("Kaiburr Tasks"));
        assert!(classic.contains("Executions"));
    }

    #[test]
    fn test_rows_show_placeholder_and_page_label() {
        let tasks = (0..10).map(|i| task(&i.to_string(), &[])).collect();
        let screen = render(&app_with(tasks, Theme::amber()));
        assert!(screen.contains("task 0"));
        assert!(screen.contains("task 7"));
        assert!(!screen.contains("task 8"));
        assert!(screen.contains(EMPTY_PLACEHOLDER));
        assert!(screen.contains("Page 1/2"));
    }

    #[test]
    fn test_result_modal_shows_latest_output() {
        let mut app = app_with(vec![task("1", &[])], Theme::amber());
        app.state.begin(&Action::Run("1".into()));
        let ran = task("1", &["Hello World!"]);
        app.state.apply(Outcome {
            result: Some(ExecutionResult::from_task(ran.clone())),
            tasks: Some(TasksChange::Patch(ran)),
            ..Default::default()
        });
        let screen = render(&app);
        assert!(screen.contains("Latest Execution Output"));
        assert!(screen.contains("Hello World!"));
        assert!(screen.contains("\"taskExecutions\""));
    }

    #[test]
    fn test_long_output_scrolls_into_view() {
        let output = (1..=30)
            .map(|n| format!("line{n:02}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut app = app_with(vec![task("1", &[])], Theme::amber());
        app.state.begin(&Action::Run("1".into()));
        let ran = task("1", &[output.as_str()]);
        app.apply_outcome(Outcome {
            result: Some(ExecutionResult::from_task(ran.clone())),
            tasks: Some(TasksChange::Patch(ran)),
            ..Default::default()
        });

        // Output rows start right after the modal border; the escaped copy
        // inside the JSON never does.
        let output_row = |n: usize| format!("│line{n:02} ");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let first = render_on(&mut terminal, &app);
        assert!(!first.contains(&output_row(30)));

        let mut seen = BTreeSet::new();
        for _ in 0..60 {
            let screen = render_on(&mut terminal, &app);
            seen.extend((1..=30).filter(|n| screen.contains(&output_row(*n))));
            app.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        }
        assert_eq!(seen.len(), 30);

        // Scrolling stops at the end instead of running into blank space.
        let stopped = app.result_scroll;
        app.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        assert_eq!(app.result_scroll, stopped);
        assert!(render_on(&mut terminal, &app).contains(&output_row(30)));
    }

    #[test]
    fn test_form_shows_placeholders_and_errors() {
        let mut app = app_with(Vec::new(), Theme::classic());
        app.state.open_form();
        let screen = render(&app);
        assert!(screen.contains("New Task"));
        assert!(screen.contains("Print Hello"));
        assert!(screen.contains("echo Hello World!"));

        assert!(app.state.submit_form().is_none());
        let screen = render(&app);
        assert!(screen.contains("'Name' is required"));
    }

    #[test]
    fn test_notices_render() {
        let mut app = app_with(Vec::new(), Theme::amber());
        app.state.notices.push(Notice::error("boom"));
        let screen = render(&app);
        assert!(screen.contains("boom"));
    }
}
