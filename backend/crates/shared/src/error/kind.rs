//! Error Kind - Classification of errors
//!
//! Defines the closed [`ErrorKind`] taxonomy and its mapping to HTTP status
//! codes and fixed user-facing messages.

use serde::Serialize;

/// エラー種別の列挙体
///
/// ドメインエラーの閉じた分類です。各バリアントは HTTP ステータスコードと
/// 固定のユーザー向けメッセージに対応します。`Internal` は分類外の
/// すべてのエラー（500）を表します。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::EntityNotFound;
/// assert_eq!(kind.status_code(), 404);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 400 - 宣言的バリデーションに失敗した入力
    NotValid,
    /// 401 - トークンが無い・不正・期限切れ
    Unauthorized,
    /// 401 - パスワードの照合に失敗
    WrongPassword,
    /// 402 - 未払いの注文に対するダウンロード
    OrderNotPaid,
    /// 403 - 認証済みだが権限が無い
    Forbidden,
    /// 404 - 該当する行が存在しない
    EntityNotFound,
    /// 409 - 一意制約違反
    DuplicateKey,
    /// 500 - 上記以外のすべて
    Internal,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::NotValid.status_code(), 400);
    /// assert_eq!(ErrorKind::OrderNotPaid.status_code(), 402);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotValid => 400,
            ErrorKind::Unauthorized | ErrorKind::WrongPassword => 401,
            ErrorKind::OrderNotPaid => 402,
            ErrorKind::Forbidden => 403,
            ErrorKind::EntityNotFound => 404,
            ErrorKind::DuplicateKey => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// 種別の識別子（ログ用）
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotValid => "not_valid",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::WrongPassword => "wrong_password",
            ErrorKind::OrderNotPaid => "order_not_paid",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::EntityNotFound => "entity_not_found",
            ErrorKind::DuplicateKey => "duplicate_key",
            ErrorKind::Internal => "internal",
        }
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// 5xx系のエラーは `true` を返します。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント側のエラーかどうかを判定
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::NotValid.status_code(), 400);
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::WrongPassword.status_code(), 401);
        assert_eq!(ErrorKind::OrderNotPaid.status_code(), 402);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::EntityNotFound.status_code(), 404);
        assert_eq!(ErrorKind::DuplicateKey.status_code(), 409);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ErrorKind::NotValid.is_server_error());
        assert!(!ErrorKind::EntityNotFound.is_server_error());
        assert!(ErrorKind::Internal.is_server_error());
    }

    #[test]
    fn test_is_client_error() {
        assert!(ErrorKind::OrderNotPaid.is_client_error());
        assert!(ErrorKind::DuplicateKey.is_client_error());
        assert!(!ErrorKind::Internal.is_client_error());
    }
}
