// ============================================
// src/error.rs
// エラー型の定義
// ============================================

use std::path::PathBuf;

use thiserror::Error;

/// デッキファイルの読み書きエラー
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed card in {path} at line {line}: {source}")]
    Decode {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode card: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 翻訳サービス呼び出しのエラー
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("request to translation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no response from translation service: {body}")]
    EmptyResponse { body: String },

    #[error("cannot parse translation reply: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("no translation found")]
    MissingFields,
}

/// 起動時の設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Please provide an API key (--api-key or OPENAI_API_KEY)")]
    MissingApiKey,
}

/// 新規カード追加 (submit) のエラー
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Error translating text: {0}")]
    Translation(#[from] TranslationError),

    #[error("Error saving card: {0}")]
    Store(#[from] StoreError),
}
