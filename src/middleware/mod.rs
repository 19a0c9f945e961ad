/*
 * Responsibility
 * - Router-level middleware: cors, http (request id / trace / limits), security headers
 */
pub mod cors;
pub mod http;
pub mod security_headers;
