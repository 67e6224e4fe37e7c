/*
 * src/card.rs
 * フラッシュカード1枚分のデータ
 */

use serde::{Deserialize, Serialize};

/// デッキファイルの1行に対応するカード
///
/// フィールド名はファイル形式で固定 (`id`, `en`, `zh`, `pinyin`)。
/// 作成後は変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    #[serde(rename = "en")]
    pub english: String, // 表示用 (問題)
    #[serde(rename = "zh")]
    pub chinese: String, // 答え (漢字)
    pub pinyin: String,  // 答え (発音)
}

impl Card {
    /// 新しいカードを作成 (id はデッキの枚数 + 1)
    pub fn new(deck_len: usize, english: String, chinese: String, pinyin: String) -> Self {
        Self {
            id: deck_len as i64 + 1,
            english,
            chinese,
            pinyin,
        }
    }
}
