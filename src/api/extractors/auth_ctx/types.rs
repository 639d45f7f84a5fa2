/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - request gate が token を検証して request extensions に格納し、handler はこの型だけを受け取る
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` は user store 上の uid (token の `sub`)
/// - `role` は coarse-grained な権限情報 (`user` / `organizer` など)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: String,
    pub role: String,
}

impl AuthCtx {
    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
        }
    }
}
