//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum, the client-side error taxonomy.

use serde::Serialize;

/// クライアントエラー種別の列挙体
///
/// コンソールが扱うエラーの分類を定義します。
/// 分類ごとにユーザーへの表示方法と回復手段（再試行かサポート連絡か）が異なります。
///
/// ## Notes
/// * `Validation` はクライアント側でのみ発生し、サーバーには送信されません
/// * `Network` は到達不能とクライアント側タイムアウトの両方を含みます
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::from_status(429);
/// assert_eq!(kind, ErrorKind::RateLimited);
/// assert_eq!(kind.as_str(), "Rate Limited");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// フォームの入力エラー（サーバーには送信しない）
    Validation,
    /// 認証エラー: 資格情報の誤り、無効なアカウント、OTP / リセットトークンの期限切れ、無効なセッション
    Auth,
    /// 429 - レート制限超過
    RateLimited,
    /// 404 - リソースが見つからない
    NotFound,
    /// その他の 4xx - サーバーがリクエストを拒否
    BadRequest,
    /// 5xx または不正なレスポンス
    Server,
    /// 到達不能またはタイムアウト
    Network,
}

impl ErrorKind {
    /// HTTP ステータスコードから分類を決定
    ///
    /// ## Arguments
    /// * `status` - レスポンスの HTTP ステータスコード
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::from_status(401), ErrorKind::Auth);
    /// assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
    /// ```
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 | 410 => ErrorKind::Auth,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::Network,
            429 => ErrorKind::RateLimited,
            400..=499 => ErrorKind::BadRequest,
            _ => ErrorKind::Server,
        }
    }

    /// 分類名を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation Error",
            ErrorKind::Auth => "Auth Error",
            ErrorKind::RateLimited => "Rate Limited",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Server => "Server Error",
            ErrorKind::Network => "Network Error",
        }
    }

    /// サーバーからメッセージが得られない場合の汎用メッセージ
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert!(ErrorKind::Network.fallback_message().contains("reach"));
    /// ```
    pub const fn fallback_message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Please check the highlighted fields.",
            ErrorKind::Auth => "You are not authorized to perform this action.",
            ErrorKind::RateLimited => "Too many requests. Please wait a moment.",
            ErrorKind::NotFound => "The requested item could not be found.",
            ErrorKind::BadRequest => "The request was rejected by the server.",
            ErrorKind::Server => "The server encountered an unexpected error.",
            ErrorKind::Network => "Unable to reach the server.",
        }
    }

    /// ユーザーが取るべき回復手段
    ///
    /// ネットワークエラーは再試行、サーバーエラーはサポートへの連絡を案内します。
    pub const fn recovery(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Correct the highlighted fields and submit again",
            ErrorKind::Auth => "Sign in again or check your credentials",
            ErrorKind::RateLimited => "Wait a moment before trying again",
            ErrorKind::NotFound => "Refresh the page to load current data",
            ErrorKind::BadRequest => "Review your input and try again",
            ErrorKind::Server => "Contact support if the problem persists",
            ErrorKind::Network => "Check your connection and try again",
        }
    }

    /// 再試行で解決する可能性があるかどうか
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::RateLimited)
    }

    /// クライアント側のみで完結するエラーかどうか
    #[inline]
    pub const fn is_local(&self) -> bool {
        matches!(self, ErrorKind::Validation)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
