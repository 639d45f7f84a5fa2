/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (request gate), cors, http (trace / request-id / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
