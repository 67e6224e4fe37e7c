// ============================================
// src/ui.rs
// UI描画 (カード表示 / 新規カードフォーム / ステータス行)
// ============================================

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{AppState, FormFocus, Mode};

const EMPTY_DECK_MESSAGE: &str = "No cards in deck!";
const CONTROLS: &str = "→: Reveal/Next Card  |  n: New Card  |  q: Quit";

pub fn draw(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // [0] カード or フォーム
            Constraint::Length(1), // [1] ステータス行
        ])
        .split(f.area());

    match state.mode {
        Mode::Browsing => draw_card(f, centered(chunks[0], 2), state),
        Mode::Editing => draw_form(f, centered(chunks[0], 1), state),
    }
    draw_status(f, chunks[1], state);
}

/// 中央に配置した領域を返す (横は 1:2:1、縦は 1:`weight`:1)
fn centered(area: Rect, weight: u16) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Fill(weight),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ])
        .split(rows[1])[1]
}

// --------------------------------------------------
// カード表示
// --------------------------------------------------

fn draw_card(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Chinese Learning Cards ")
        .title_alignment(Alignment::Center);

    f.render_widget(
        Paragraph::new(card_text(state))
            .block(block)
            .centered()
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// カード表示の中身
///
/// 答え (漢字・ピンイン) は `revealed` のときだけ含める。
/// デッキが空ならインデックスには触れずにメッセージだけを返す。
pub fn card_text(state: &AppState) -> Text<'_> {
    let mut lines = vec![Line::default()];

    let Some(card) = state.current_card() else {
        lines.push(Line::from(EMPTY_DECK_MESSAGE).bold());
        lines.extend(controls());
        return Text::from(lines);
    };

    lines.push(Line::from(format!(
        "Card {}/{} (ID: {})",
        state.index + 1,
        state.deck.len(),
        card.id
    )));
    lines.push(Line::default());

    lines.push(Line::from("English:").bold());
    lines.push(Line::from(Span::styled(
        card.english.as_str(),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::default());

    if state.revealed {
        lines.push(Line::from("Chinese:").bold());
        lines.push(Line::from(Span::styled(
            card.chinese.as_str(),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::default());
        lines.push(Line::from("Pinyin:").bold());
        lines.push(Line::from(Span::styled(
            card.pinyin.as_str(),
            Style::default().fg(Color::Green),
        )));
    }

    lines.extend(controls());
    Text::from(lines)
}

fn controls() -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from("─────────────────────────").fg(Color::DarkGray),
        Line::from("Controls:"),
        Line::from(CONTROLS).fg(Color::Gray),
    ]
}

// --------------------------------------------------
// 新規カードフォーム
// --------------------------------------------------

fn draw_form(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add New Card ")
        .title_alignment(Alignment::Center);

    let focused = Style::default().fg(Color::Black).bg(Color::White);
    let normal = Style::default().fg(Color::White).bg(Color::DarkGray);
    let style_for = |focus: FormFocus| if state.focus == focus { focused } else { normal };

    // カーソルは Hide しているので、入力欄の末尾にブロックを描く
    let cursor = if state.focus == FormFocus::Input && !state.submitting { "█" } else { "" };
    let input = Line::from(vec![
        Span::styled("English: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("{}{}", state.input_text, cursor), Style::default().fg(Color::Cyan)),
    ]);

    let buttons = Line::from(vec![
        Span::styled(" Save ", style_for(FormFocus::Save)),
        Span::raw("  "),
        Span::styled(" Cancel ", style_for(FormFocus::Cancel)),
    ]);

    let mut lines = vec![Line::default(), input, Line::default(), buttons];
    if state.submitting {
        lines.push(Line::default());
        lines.push(Line::from("Translating…").fg(Color::Yellow));
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// --------------------------------------------------
// ステータス行
// --------------------------------------------------

fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    if let Some(flash) = &state.flash_message {
        let style = if flash.is_error {
            Style::default().bg(Color::Red).fg(Color::White)
        } else {
            Style::default().bg(Color::Green).fg(Color::Black)
        };
        f.render_widget(Paragraph::new(format!(" {}", flash.text)).style(style), area);
        return;
    }

    let hints = match state.mode {
        Mode::Browsing => " →/Space: reveal/next  n: new card  q: quit ",
        Mode::Editing => " Enter: save  Tab: next field  Esc: cancel ",
    };
    f.render_widget(
        Paragraph::new(hints).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        area,
    );
}
