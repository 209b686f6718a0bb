//! Solis Language Server Protocol (LSP) implementation.
//!
//! Provides diagnostics (parse and type errors), hover (type of the binding
//! under the cursor), and goto-definition for top-level declarations. The
//! server communicates over stdin/stdout via JSON-RPC, powered by `tower-lsp`.

pub mod analysis;
pub mod server;

use tower_lsp::{LspService, Server};

use server::SolisBackend;

/// Runs the Solis LSP server on stdin/stdout until the client disconnects.
///
/// This is the entry point called by `solisc lsp`.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(SolisBackend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
