//! `tower-lsp` backend implementation for the Solis language server.
//!
//! Supports `textDocument/didOpen`, `didChange`, `didClose` (diagnostics),
//! `hover` (type of the binding under the cursor), and `definition`
//! (jump to a top-level function or type declaration).

use std::collections::HashMap;
use std::sync::Mutex;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::analysis::{self, AnalysisResult};

struct DocumentState {
    source: String,
    analysis: AnalysisResult,
}

/// Holds the LSP client handle (for notifications like `publishDiagnostics`)
/// and an in-memory document store keyed by URI.
pub struct SolisBackend {
    client: Client,
    documents: Mutex<HashMap<String, DocumentState>>,
}

impl SolisBackend {
    pub fn new(client: Client) -> Self {
        SolisBackend { client, documents: Mutex::new(HashMap::new()) }
    }

    async fn analyze_and_publish(&self, uri: Url, source: String) {
        let uri_str = uri.to_string();
        let result = analysis::analyze_document(&source);
        let diagnostics = result.diagnostics.clone();

        {
            let mut docs = self.documents.lock().unwrap();
            docs.insert(uri_str, DocumentState { source, analysis: result });
        }

        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for SolisBackend {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client.log_message(MessageType::INFO, "Solis LSP server initialized").await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.analyze_and_publish(params.text_document.uri, params.text_document.text).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(change) = params.content_changes.into_iter().next() {
            self.analyze_and_publish(uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri_str = params.text_document.uri.to_string();
        {
            let mut docs = self.documents.lock().unwrap();
            docs.remove(&uri_str);
        }
        self.client.publish_diagnostics(params.text_document.uri, vec![], None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri_str = params.text_document_position_params.text_document.uri.to_string();
        let position = params.text_document_position_params.position;

        let docs = self.documents.lock().unwrap();
        let Some(doc) = docs.get(&uri_str) else { return Ok(None) };
        let Some(offset) = analysis::position_to_offset(&doc.source, &position) else { return Ok(None) };
        let Some((word, _)) = analysis::word_at_offset(&doc.source, offset) else { return Ok(None) };
        let Some(scheme) = doc.analysis.env.lookup(&word) else { return Ok(None) };

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: format!("```solis\n{word} : {}\n```", scheme.ty),
            }),
            range: None,
        }))
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri.clone();
        let uri_str = uri.to_string();
        let position = params.text_document_position_params.position;

        let docs = self.documents.lock().unwrap();
        let Some(doc) = docs.get(&uri_str) else { return Ok(None) };
        let Some(offset) = analysis::position_to_offset(&doc.source, &position) else { return Ok(None) };
        let Some((word, _)) = analysis::word_at_offset(&doc.source, offset) else { return Ok(None) };
        let Some(span) = analysis::find_definition(&doc.analysis.module, &word) else { return Ok(None) };

        let location = doc.analysis.line_index.location(span);
        let start = Position::new(location.line.saturating_sub(1), location.column.saturating_sub(1));
        let end = Position::new(location.end_line.saturating_sub(1), location.end_column.saturating_sub(1));

        Ok(Some(GotoDefinitionResponse::Scalar(Location { uri, range: Range::new(start, end) })))
    }
}
