/*
 * Responsibility
 * - handler から呼ばれる service 層 (token, user store, mailer)
 * - 外部 collaborator は trait で切り出し、AppState 経由で注入する
 */
pub mod auth;
pub mod mailer;
pub mod users;
