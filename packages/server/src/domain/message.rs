//! リレーされるメッセージ
//!
//! ペイロードは不透明なバイト列として扱い、テキスト/バイナリのフレーム種別だけを保持します。
//! スキーマ・シーケンス番号・送信者情報は持ちません。

use std::sync::Arc;

use bytes::Bytes;

/// リレー対象のメッセージ
///
/// ファンアウト時に受信者ごとに clone されるため、ペイロードは共有します。
/// バイナリは `Bytes` のままソケットに書き込まれ、コピーされません。
/// テキストは書き込み時にフレームへ 1 回コピーされます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// テキストフレーム
    Text(Arc<str>),
    /// バイナリフレーム
    Binary(Bytes),
}

impl RelayMessage {
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        Self::Text(text.into())
    }

    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self::Binary(data.into())
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// ペイロードのバイト長
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
