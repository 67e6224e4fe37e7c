// ============================================
// src/deck_file.rs
// デッキファイル (JSONL) の読み込みと追記
// ============================================

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::card::Card;
use crate::error::StoreError;

/// 1行1カードの JSON ファイル
///
/// 既存の行は書き換えず、末尾への追記のみ行う。
/// 書き込みは単一プロセスからの利用を前提とし、ロックはしない。
#[derive(Debug, Clone)]
pub struct DeckFile {
    path: PathBuf,
}

impl DeckFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// MARK:ファイルから全カードを読み込む (ファイル順)
    ///
    /// 1行でも壊れていれば全体を失敗とする (部分的なデッキは返さない)。
    pub fn load(&self) -> Result<Vec<Card>, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;

        let mut cards = Vec::new();
        // 空行や余分な空白は読み飛ばす
        for record in serde_json::Deserializer::from_str(&text).into_iter::<Card>() {
            let card = record.map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                line: source.line(),
                source,
            })?;
            cards.push(card);
        }

        info!("loaded {} cards from {}", cards.len(), self.path.display());
        Ok(cards)
    }

    /// MARK:カードを1行追記する (ファイルがなければ作成)
    pub fn append(&self, card: &Card) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(card)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        // 最終行が改行で終わっていなければ、先に改行を足す
        if !ends_with_newline(&mut file).map_err(|e| self.io_error(e))? {
            line.insert(0, '\n');
        }

        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| self.io_error(e))?;

        debug!("appended card #{} to {}", card.id, self.path.display());
        Ok(())
    }
}

/// 空ファイルは改行で終わっているものとみなす
fn ends_with_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn card(id: i64, en: &str) -> Card {
        Card {
            id,
            english: en.to_string(),
            chinese: format!("zh-{en}"),
            pinyin: format!("py-{en}"),
        }
    }

    fn deck_in(dir: &TempDir, contents: &str) -> DeckFile {
        let path = dir.path().join("flashcards.jsonl");
        fs::write(&path, contents).unwrap();
        DeckFile::new(path)
    }

    #[test]
    fn load_keeps_file_order() {
        let dir = TempDir::new().unwrap();
        let deck = deck_in(
            &dir,
            concat!(
                r#"{"id": 1, "en": "Cat", "zh": "猫", "pinyin": "māo"}"#, "\n",
                r#"{"id": 2, "en": "Dog", "zh": "狗", "pinyin": "gǒu"}"#, "\n",
                r#"{"id": 3, "en": "Sky", "zh": "天空", "pinyin": "tiānkōng"}"#, "\n",
            ),
        );

        let cards = deck.load().unwrap();
        assert_eq!(cards.len(), 3);
        let english: Vec<_> = cards.iter().map(|c| c.english.as_str()).collect();
        assert_eq!(english, ["Cat", "Dog", "Sky"]);
    }

    #[test]
    fn load_empty_file_gives_empty_deck() {
        let dir = TempDir::new().unwrap();
        let deck = deck_in(&dir, "");
        assert!(deck.load().unwrap().is_empty());
    }

    #[test]
    fn load_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let deck = deck_in(
            &dir,
            "\n{\"id\":1,\"en\":\"a\",\"zh\":\"b\",\"pinyin\":\"c\"}\n\n",
        );
        assert_eq!(deck.load().unwrap().len(), 1);
    }

    #[test]
    fn one_malformed_line_fails_the_whole_load() {
        let dir = TempDir::new().unwrap();
        let deck = deck_in(
            &dir,
            concat!(
                r#"{"id":1,"en":"a","zh":"b","pinyin":"c"}"#, "\n",
                r#"{"id":2,"en":"broken""#, "\n",
                r#"{"id":3,"en":"d","zh":"e","pinyin":"f"}"#, "\n",
            ),
        );

        match deck.load() {
            Err(StoreError::Decode { line, .. }) => assert!(line >= 2),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn load_accepts_any_integer_id() {
        let dir = TempDir::new().unwrap();
        let deck = deck_in(
            &dir,
            concat!(
                r#"{"id":1,"en":"a","zh":"b","pinyin":"c"}"#, "\n",
                r#"{"id":-1,"en":"d","zh":"e","pinyin":"f"}"#, "\n",
                r#"{"id":0,"en":"g","zh":"h","pinyin":"i"}"#, "\n",
            ),
        );

        let ids: Vec<_> = deck.load().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, -1, 0]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let deck = DeckFile::new(dir.path().join("nope.jsonl"));
        assert!(matches!(deck.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn append_adds_exactly_one_line_and_keeps_existing_ones() {
        let dir = TempDir::new().unwrap();
        let existing = concat!(
            r#"{"id": 1, "en": "Cat", "zh": "猫", "pinyin": "māo"}"#, "\n",
            r#"{"id": 2, "en": "Dog", "zh": "狗", "pinyin": "gǒu"}"#, "\n",
        );
        let deck = deck_in(&dir, existing);

        deck.append(&card(3, "Sky")).unwrap();

        let after = fs::read_to_string(deck.path()).unwrap();
        assert!(after.starts_with(existing));
        assert_eq!(after.lines().count(), 3);
        assert_eq!(deck.load().unwrap()[2], card(3, "Sky"));
    }

    #[test]
    fn append_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let deck = DeckFile::new(dir.path().join("new.jsonl"));

        deck.append(&card(1, "Hello")).unwrap();

        let cards = deck.load().unwrap();
        assert_eq!(cards, vec![card(1, "Hello")]);
    }

    #[test]
    fn append_after_unterminated_last_line_starts_a_new_line() {
        let dir = TempDir::new().unwrap();
        let deck = deck_in(&dir, r#"{"id":1,"en":"a","zh":"b","pinyin":"c"}"#);

        deck.append(&card(2, "Tea")).unwrap();

        let after = fs::read_to_string(deck.path()).unwrap();
        assert_eq!(after.lines().count(), 2);
        assert!(after.ends_with('\n'));
    }
}
