// ============================================
// src/app.rs
// セッション状態とキー入力の処理
// ============================================

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, info};

use crate::card::Card;
use crate::deck_file::DeckFile;
use crate::error::SubmitError;
use crate::translator::Translate;

// --------------------------------------------------
// データ構造
// --------------------------------------------------

/// 画面のモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// カード表示中
    Browsing,
    /// 新規カードのフォーム入力中
    Editing,
}

/// フォーム内でフォーカスしている項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Input,
    Save,
    Cancel,
}

impl FormFocus {
    fn next(self) -> Self {
        match self {
            FormFocus::Input => FormFocus::Save,
            FormFocus::Save => FormFocus::Cancel,
            FormFocus::Cancel => FormFocus::Input,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormFocus::Input => FormFocus::Cancel,
            FormFocus::Save => FormFocus::Input,
            FormFocus::Cancel => FormFocus::Save,
        }
    }
}

/// ステータス行に一時的に出すメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: String,
    pub is_error: bool,
}

impl Flash {
    fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// アプリ全体の状態を管理する
pub struct AppState {
    /// デッキ (ファイル順)
    pub deck: Vec<Card>,
    /// 今何枚目か (デッキが空でなければ常に 0 <= index < deck.len())
    pub index: usize,
    /// 答え (漢字・ピンイン) を表示中か
    pub revealed: bool,

    pub mode: Mode,
    /// フォームの入力テキスト
    pub input_text: String,
    pub focus: FormFocus,
    /// 確定済みで、翻訳の呼び出し待ち
    pub submitting: bool,

    pub flash_message: Option<Flash>,
    pub quit: bool,

    deck_file: DeckFile,
}

impl AppState {
    /// AppState の初期化
    pub fn new(deck: Vec<Card>, deck_file: DeckFile) -> Self {
        Self {
            deck,
            index: 0,
            revealed: false,
            mode: Mode::Browsing,
            input_text: String::new(),
            focus: FormFocus::Input,
            submitting: false,
            flash_message: None,
            quit: false,
            deck_file,
        }
    }

    /// 表示中のカード (デッキが空なら None)
    pub fn current_card(&self) -> Option<&Card> {
        self.deck.get(self.index)
    }

    /// 答えを表示 → 次のカードへ (最後のカードの次は最初に戻る)
    pub fn advance(&mut self) {
        if self.deck.is_empty() {
            return;
        }
        if !self.revealed {
            self.revealed = true;
        } else {
            self.revealed = false;
            self.index = (self.index + 1) % self.deck.len();
        }
    }

    /// 新規カードのフォームを開く
    pub fn open_editor(&mut self) {
        self.mode = Mode::Editing;
        self.input_text.clear();
        self.focus = FormFocus::Input;
        self.submitting = false;
    }

    /// フォームを閉じる (翻訳は呼ばない)
    pub fn cancel(&mut self) {
        self.mode = Mode::Browsing;
        self.input_text.clear();
        self.submitting = false;
    }

    /// MARK:キー入力の処理
    pub fn handle_key(&mut self, key: KeyEvent) {
        // 何かキーが押されたらメッセージは消す
        self.flash_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        // フォーム入力中はグローバルなキー操作を無視する
        match self.mode {
            Mode::Editing => self.handle_form_key(key),
            Mode::Browsing => self.handle_browse_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Char(' ') => self.advance(),
            KeyCode::Char('n') => self.open_editor(),
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        // 翻訳待ちの間は入力を受け付けない
        if self.submitting {
            return;
        }

        match key.code {
            KeyCode::Esc => self.cancel(),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Enter => match self.focus {
                FormFocus::Input | FormFocus::Save => self.confirm(),
                FormFocus::Cancel => self.cancel(),
            },
            KeyCode::Backspace if self.focus == FormFocus::Input => {
                self.input_text.pop();
            }
            // Ctrl/Alt 付きの文字は入力しない
            KeyCode::Char(c)
                if self.focus == FormFocus::Input
                    && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input_text.push(c);
            }
            _ => {}
        }
    }

    /// 入力を確定する (実際の翻訳は次の描画の後に `submit` で行う)
    fn confirm(&mut self) {
        if self.input_text.trim().is_empty() {
            self.flash_message = Some(Flash::error("Enter an English sentence first"));
            self.focus = FormFocus::Input;
            return;
        }
        self.submitting = true;
    }

    /// MARK:翻訳してカードを追加する
    ///
    /// 成功・失敗どちらでもカード表示に戻る。失敗時はデッキもファイルも
    /// 変更せず、エラーをステータス行に出す。
    pub fn submit<T: Translate + ?Sized>(&mut self, translator: &T) -> Result<(), SubmitError> {
        let english = self.input_text.trim().to_string();
        let result = self.add_card(translator, english);

        self.cancel();
        self.revealed = false;

        match &result {
            Ok(()) => {
                let id = self.deck.last().map(|c| c.id).unwrap_or_default();
                info!("added card #{id}");
                self.flash_message = Some(Flash::info(format!("Added card #{id}")));
            }
            Err(e) => {
                error!("{e}");
                self.flash_message = Some(Flash::error(e.to_string()));
            }
        }
        result
    }

    fn add_card<T: Translate + ?Sized>(
        &mut self,
        translator: &T,
        english: String,
    ) -> Result<(), SubmitError> {
        let translation = translator.translate(&english)?;
        let card = Card::new(self.deck.len(), english, translation.chinese, translation.pinyin);

        // ファイルに書けたものだけをメモリにも追加する
        self.deck_file.append(&card)?;
        self.deck.push(card);
        Ok(())
    }
}
