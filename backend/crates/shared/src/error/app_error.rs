//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// プロジェクト全体で使用する標準エラー型です。発生箇所で生成され、
/// エラーミドルウェアまでそのまま伝播します。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `subject` - 対象の名前（入力スキーマ名・キー名・エンティティ名）
/// * `cause` - 原因または理由
/// * `details` - 追加の詳細（バリデーション違反の一覧など）
/// * `source` - 元のエラー（ログ専用、クライアントには返さない）
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::entity_not_found("Book", "no row for id");
/// assert_eq!(err.to_string(), "Book could not be found: no row for id");
///
/// let err = AppError::duplicate_key("email", "users_email_key");
/// assert_eq!(err.public_message(), "this email is already being used");
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// 対象の名前
    subject: Cow<'static, str>,
    /// 原因・理由
    cause: Cow<'static, str>,
    /// 追加の詳細
    details: Vec<String>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::{AppError, AppResult};
///
/// fn find_user(id: u32) -> AppResult<String> {
///     if id == 0 {
///         return Err(AppError::entity_not_found("User", "id 0"));
///     }
///     Ok("Ada".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    fn build(
        kind: ErrorKind,
        subject: impl Into<Cow<'static, str>>,
        cause: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            cause: cause.into(),
            details: Vec::new(),
            source: None,
        }
    }

    /// 入力がバリデーションに失敗した
    ///
    /// ## Arguments
    /// * `input` - 入力スキーマ名（例: `RegisterRequest`）
    /// * `cause` - 失敗の内容
    #[inline]
    pub fn not_valid(
        input: impl Into<Cow<'static, str>>,
        cause: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::build(ErrorKind::NotValid, input, cause)
    }

    /// 一意制約違反
    #[inline]
    pub fn duplicate_key(
        key: impl Into<Cow<'static, str>>,
        cause: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::build(ErrorKind::DuplicateKey, key, cause)
    }

    /// 検索結果が存在しない
    #[inline]
    pub fn entity_not_found(
        entity: impl Into<Cow<'static, str>>,
        cause: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::build(ErrorKind::EntityNotFound, entity, cause)
    }

    /// パスワード不一致
    #[inline]
    pub fn wrong_password(cause: impl Into<Cow<'static, str>>) -> Self {
        Self::build(ErrorKind::WrongPassword, "", cause)
    }

    /// 未払い注文のダウンロード
    #[inline]
    pub fn order_not_paid(cause: impl Into<Cow<'static, str>>) -> Self {
        Self::build(ErrorKind::OrderNotPaid, "", cause)
    }

    /// 認証失敗
    #[inline]
    pub fn unauthorized(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::build(ErrorKind::Unauthorized, "", reason)
    }

    /// 権限不足
    #[inline]
    pub fn forbidden(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::build(ErrorKind::Forbidden, "", reason)
    }

    /// 分類外のエラー（500）
    #[inline]
    pub fn internal(cause: impl Into<Cow<'static, str>>) -> Self {
        Self::build(ErrorKind::Internal, "", cause)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// 詳細を追加
    ///
    /// 詳細が一つ以上ある場合、エンベロープの `details` は配列になります。
    #[inline]
    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    /// 元のエラーを設定（デバッグ用）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn read_config() -> AppResult<String> {
    ///     std::fs::read_to_string("config.json")
    ///         .map_err(|e| AppError::internal("failed to read config").with_source(e))
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// 対象の名前（入力・キー・エンティティ）
    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// 原因・理由
    #[inline]
    pub fn cause(&self) -> &str {
        &self.cause
    }

    /// 追加の詳細
    #[inline]
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// サーバーエラーかどうか
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// ユーザー向けの固定メッセージ
    pub fn public_message(&self) -> String {
        match self.kind {
            ErrorKind::NotValid => "The provided payload is not valid".to_string(),
            ErrorKind::Unauthorized => "You are not authorized.".to_string(),
            ErrorKind::WrongPassword => "the provided password is invalid".to_string(),
            ErrorKind::OrderNotPaid => {
                "you are not allowed to download unpaid orders".to_string()
            }
            ErrorKind::Forbidden => "You are not allowed to perform this action".to_string(),
            ErrorKind::EntityNotFound => format!(
                "{} with the provided parameters could not be found",
                self.subject
            ),
            ErrorKind::DuplicateKey => format!("this {} is already being used", self.subject),
            ErrorKind::Internal => "Some unexpected error happened".to_string(),
        }
    }

    /// ソースチェーン全体を `: ` で連結（ログ用）
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut current = self.source();
        while let Some(err) = current {
            out.push_str(": ");
            out.push_str(&err.to_string());
            current = err.source();
        }
        out
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        if !self.subject.is_empty() {
            builder.field("subject", &self.subject);
        }
        builder.field("cause", &self.cause);
        if !self.details.is_empty() {
            builder.field("details", &self.details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::NotValid => write!(f, "{} not valid: {}", self.subject, self.cause),
            ErrorKind::DuplicateKey => write!(f, "{} violation: {}", self.subject, self.cause),
            ErrorKind::EntityNotFound => {
                write!(f, "{} could not be found: {}", self.subject, self.cause)
            }
            ErrorKind::WrongPassword => write!(f, "wrong password: {}", self.cause),
            ErrorKind::OrderNotPaid => write!(f, "order not paid: {}", self.cause),
            ErrorKind::Unauthorized => write!(f, "unauthorized: {}", self.cause),
            ErrorKind::Forbidden => write!(f, "forbidden: {}", self.cause),
            ErrorKind::Internal => write!(f, "internal error: {}", self.cause),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// `Result<T, E>` を `AppResult<T>` に変換するための拡張トレイト
pub trait ResultExt<T, E> {
    /// エラーを 500 の `AppError` にラップ
    fn or_internal(self, cause: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn or_internal(self, cause: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::internal(cause).with_source(e))
    }
}

/// `Option<T>` を `AppResult<T>` に変換するための拡張トレイト
pub trait OptionExt<T> {
    /// `None` の場合に 404 EntityNotFound を返す
    fn ok_or_not_found(
        self,
        entity: impl Into<Cow<'static, str>>,
        cause: impl Into<Cow<'static, str>>,
    ) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(
        self,
        entity: impl Into<Cow<'static, str>>,
        cause: impl Into<Cow<'static, str>>,
    ) -> AppResult<T> {
        self.ok_or_else(|| AppError::entity_not_found(entity, cause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(
            AppError::not_valid("RegisterRequest", "password too short").to_string(),
            "RegisterRequest not valid: password too short"
        );
        assert_eq!(
            AppError::duplicate_key("email", "users_email_key").to_string(),
            "email violation: users_email_key"
        );
        assert_eq!(
            AppError::entity_not_found("User", "no row").to_string(),
            "User could not be found: no row"
        );
        assert_eq!(
            AppError::wrong_password("mismatch").to_string(),
            "wrong password: mismatch"
        );
        assert_eq!(
            AppError::order_not_paid("status PENDING").to_string(),
            "order not paid: status PENDING"
        );
        assert_eq!(
            AppError::unauthorized("header missing").to_string(),
            "unauthorized: header missing"
        );
        assert_eq!(
            AppError::forbidden("admin only").to_string(),
            "forbidden: admin only"
        );
    }

    #[test]
    fn test_public_messages() {
        assert_eq!(
            AppError::entity_not_found("Book", "x").public_message(),
            "Book with the provided parameters could not be found"
        );
        assert_eq!(
            AppError::duplicate_key("email", "x").public_message(),
            "this email is already being used"
        );
        assert_eq!(
            AppError::wrong_password("x").public_message(),
            "the provided password is invalid"
        );
        assert_eq!(
            AppError::internal("boom").public_message(),
            "Some unexpected error happened"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_valid("a", "b").status_code(), 400);
        assert_eq!(AppError::unauthorized("a").status_code(), 401);
        assert_eq!(AppError::order_not_paid("a").status_code(), 402);
        assert_eq!(AppError::forbidden("a").status_code(), 403);
        assert_eq!(AppError::entity_not_found("a", "b").status_code(), 404);
        assert_eq!(AppError::duplicate_key("a", "b").status_code(), 409);
        assert_eq!(AppError::internal("a").status_code(), 500);
    }

    #[test]
    fn test_with_source_and_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = AppError::internal("failed to read file").with_source(io_err);
        assert!(err.source().is_some());
        assert_eq!(err.chain(), "internal error: failed to read file: disk on fire");
        // source is never part of the display form
        assert!(!err.to_string().contains("disk"));
    }

    #[test]
    fn test_with_details() {
        let err = AppError::not_valid("RegisterRequest", "2 violations")
            .with_details(["email is invalid", "password too short"]);
        assert_eq!(err.details().len(), 2);
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"));
        let app_result = result.or_internal("lookup failed");
        assert_eq!(app_result.unwrap_err().status_code(), 500);
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_not_found("Order", "unknown id");
        assert_eq!(result.unwrap_err().status_code(), 404);

        let some: Option<i32> = Some(42);
        assert_eq!(some.ok_or_not_found("Order", "unknown id").unwrap(), 42);
    }
}
