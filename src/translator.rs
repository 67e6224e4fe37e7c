// ============================================
// src/translator.rs
// 翻訳サービス (Chat Completions API) の呼び出し
// ============================================

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::TranslationError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str =
    "Translate the provided English sentence into Chinese, including pinyin and Chinese characters.";

// お手本の1往復 (few-shot)
const EXAMPLE_INPUT: &str = "I'll probably have time next week. Is that okay?";
const EXAMPLE_OUTPUT: &str = r#"{
  "zh": "我下周可能有时间，可以吗？",
  "pinyin": "Wǒ xià zhōu kěnéng yǒu shíjiān, kěyǐ ma?"
}"#;

/// 翻訳結果 (漢字 + ピンイン)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub chinese: String,
    pub pinyin: String,
}

/// 英文を翻訳するもの
///
/// 呼び出しは同期的で、結果が返るまで呼び出し元のスレッドをブロックする。
pub trait Translate {
    fn translate(&self, sentence: &str) -> Result<Translation, TranslationError>;
}

// --------------------------------------------------
// 送受信データ
// --------------------------------------------------

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsParams<'a> {
    messages: Vec<Message<'a>>,
    model: &'a str,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResult {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// 返答の content に埋め込まれている JSON
#[derive(Debug, Deserialize)]
struct TranslationReply {
    #[serde(default)]
    zh: String,
    #[serde(default)]
    pinyin: String,
}

/// 返答を `zh` と `pinyin` の2つだけを持つオブジェクトに制限するスキーマ
fn translation_schema() -> serde_json::Value {
    json!({
        "name": "translation",
        "strict": true,
        "schema": {
            "type": "object",
            "properties": {
                "zh": { "type": "string" },
                "pinyin": { "type": "string" }
            },
            "required": ["zh", "pinyin"],
            "additionalProperties": false
        }
    })
}

/// システム指示 → お手本 → 本番の入力、の順で会話を組み立てる
fn build_request<'a>(sentence: &'a str, model: &'a str) -> ChatCompletionsParams<'a> {
    ChatCompletionsParams {
        messages: vec![
            Message { role: "system", content: SYSTEM_PROMPT },
            Message { role: "user", content: EXAMPLE_INPUT },
            Message { role: "assistant", content: EXAMPLE_OUTPUT },
            Message { role: "user", content: sentence },
        ],
        model,
        response_format: ResponseFormat {
            kind: "json_schema",
            json_schema: translation_schema(),
        },
    }
}

/// MARK:返答本文から翻訳結果を取り出す
pub fn parse_completion(body: &str) -> Result<Translation, TranslationError> {
    let result: ChatCompletionsResult = serde_json::from_str(body)?;

    let choice = result
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TranslationError::EmptyResponse {
            body: body.to_string(),
        })?;

    let content = choice.message.content.unwrap_or_default();
    let reply: TranslationReply = serde_json::from_str(&content)?;

    if reply.zh.trim().is_empty() || reply.pinyin.trim().is_empty() {
        return Err(TranslationError::MissingFields);
    }

    Ok(Translation {
        chinese: reply.zh,
        pinyin: reply.pinyin,
    })
}

// --------------------------------------------------
// OpenAI クライアント
// --------------------------------------------------

/// Chat Completions API を1回だけ呼ぶ翻訳クライアント (リトライなし)
pub struct OpenAiTranslator {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiTranslator {
    /// `timeout` が `None` ならタイムアウトなし
    pub fn new(
        api_key: String,
        model: String,
        endpoint: String,
        timeout: Option<Duration>,
    ) -> Result<Self, TranslationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            endpoint,
        })
    }
}

impl Translate for OpenAiTranslator {
    fn translate(&self, sentence: &str) -> Result<Translation, TranslationError> {
        debug!("requesting translation from {} with model {}", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&build_request(sentence, &self.model))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            // エラー本文には choices がないので、そのまま EmptyResponse になる
            warn!("translation service returned {status}");
        }

        parse_completion(&body)
    }
}
