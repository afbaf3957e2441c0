//! Live TUI dashboard for a followed service
//!
//! One event loop owns the terminal and the `LiveState`: it draws,
//! polls the keyboard with a tick-derived timeout, and re-fetches the
//! followed service's telemetry once per refresh interval. Quitting
//! (q / Esc / Ctrl-C) exits the loop; the terminal is restored before
//! returning on every path, including a fatal tick error.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame, Terminal,
};

use cpx_common::{HealthStatus, RowSet};

use crate::client::Inventory;
use crate::live::LiveState;

/// How often the followed service is re-fetched.
const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Keyboard poll timeout; keeps quit handling responsive between ticks.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Run the dashboard until the user quits. The first refresh happens
/// one interval after entry; the table starts from the first pass.
pub async fn run<C>(client: Arc<C>, mut state: LiveState) -> Result<()>
where
    C: Inventory + ?Sized,
{
    enable_raw_mode().context("could not enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("could not enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, client, &mut state).await;

    // Restore the terminal on success and on a fatal tick error alike.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: Arc<C>,
    state: &mut LiveState,
) -> Result<()>
where
    C: Inventory + ?Sized,
{
    let mut last_refresh = Instant::now();

    loop {
        terminal.draw(|f| draw(f, state))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_refresh.elapsed() >= REFRESH_INTERVAL {
            // A failed tick is fatal, like everywhere else.
            state
                .refresh(client.as_ref())
                .await
                .with_context(|| format!("live refresh of {} failed", state.service))?;
            last_refresh = Instant::now();
        }
    }
}

fn draw(f: &mut Frame, state: &LiveState) {
    let merged = matches!(state.rows, RowSet::Merged(_));

    let constraints: Vec<Constraint> = if merged {
        vec![
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(3),
        ]
    } else {
        vec![Constraint::Min(5), Constraint::Length(3)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.size());

    draw_table(f, chunks[0], state);
    if merged {
        draw_sparkline(
            f,
            chunks[1],
            &format!(" CPU Average for {} ", state.service),
            state.cpu_history.slots(),
        );
        draw_sparkline(
            f,
            chunks[2],
            &format!(" Memory Average for {} ", state.service),
            state.mem_history.slots(),
        );
    }
    draw_footer(f, chunks[chunks.len() - 1]);
}

fn draw_table(f: &mut Frame, area: Rect, state: &LiveState) {
    let (header, rows): (Vec<&str>, Vec<Row>) = match &state.rows {
        RowSet::Default(default_rows) => (
            vec!["IP", "Service", "Cpu", "Memory", "Status"],
            default_rows
                .iter()
                .map(|r| {
                    let style = if r.status == HealthStatus::Unhealthy {
                        Style::default().fg(Color::Black).bg(Color::Red)
                    } else {
                        Style::default()
                    };
                    Row::new(vec![
                        Cell::from(r.address.clone()),
                        Cell::from(r.service.clone()),
                        Cell::from(format!("{}%", r.cpu_pct)),
                        Cell::from(format!("{}%", r.mem_pct)),
                        Cell::from(r.status.to_string()),
                    ])
                    .style(style)
                })
                .collect(),
        ),
        RowSet::Merged(row) => (
            vec!["IPs", "Service", "Cpu_Avg", "Memory_Avg", "Replicas"],
            vec![Row::new(vec![
                Cell::from(row.addresses.join(", ")),
                Cell::from(row.service.clone()),
                Cell::from(format!("{}%", row.cpu_avg)),
                Cell::from(format!("{}%", row.mem_avg)),
                Cell::from(row.replica_count.to_string()),
            ])],
        ),
    };

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(25),
        Constraint::Percentage(13),
        Constraint::Percentage(13),
        Constraint::Percentage(14),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(header.into_iter().map(Cell::from).collect::<Vec<_>>())
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", state.service)),
        );

    f.render_widget(table, area);
}

fn draw_sparkline(f: &mut Frame, area: Rect, title: &str, data: &[u64]) {
    let sparkline = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .data(data)
        .max(100)
        .style(Style::default().fg(Color::Green));
    f.render_widget(sparkline, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(" q/Esc quit   refresh: 1s")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
