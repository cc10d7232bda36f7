//! hxcheck LSP server
//!
//! Language Server Protocol front end for the hxcheck engine. Wires editor
//! save/open events into the check session and publishes diagnostics keyed
//! by file.

mod conversion;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use hxcheck_core::{CheckOutcome, CheckSettings};

use crate::conversion::to_lsp_diagnostic;
use crate::state::{BackendState, SharedState};

/// The LSP backend for hxcheck.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the given client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new()),
        }
    }

    /// Extracts hxcheck settings from an editor-provided JSON blob.
    ///
    /// Accepts either a `{"hxcheck": {...}}` section (the shape of
    /// `workspace/didChangeConfiguration`) or the flat settings object
    /// itself (common for `initializationOptions`).
    fn settings_from_options(value: serde_json::Value) -> CheckSettings {
        let section = match value {
            serde_json::Value::Object(mut map) => match map.remove("hxcheck") {
                Some(section) => section,
                None => serde_json::Value::Object(map),
            },
            other => other,
        };
        CheckSettings::from_value(section)
    }

    /// Runs a check for a document and publishes the resulting diagnostics.
    ///
    /// The check runs on a blocking thread; the session lock serializes
    /// invocations so shared state is never mutated concurrently.
    async fn validate_document(&self, uri: &Url, text: Option<String>, version: Option<i32>) {
        debug!("Validating document: {}", uri);

        let path = match uri.to_file_path() {
            Ok(p) => p,
            Err(_) => {
                debug!("Skipping validation for non-file URI: {}", uri);
                return;
            }
        };

        let state = self.state.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let mut session = match state.session.lock() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    error!("Session lock poisoned: {}", poisoned);
                    return None;
                }
            };

            Some(match text {
                Some(text) => session.check_content(&path, &text),
                None => session.check_file(&path),
            })
        })
        .await
        .unwrap_or(None);

        match outcome {
            Some(CheckOutcome::Checked(diagnostics)) => {
                let lsp_diagnostics: Vec<Diagnostic> =
                    diagnostics.iter().map(to_lsp_diagnostic).collect();
                self.client
                    .publish_diagnostics(uri.clone(), lsp_diagnostics, version)
                    .await;
            }
            Some(CheckOutcome::Skipped(reason)) => {
                // Out-of-scope and rootless files are skipped silently.
                debug!("Check skipped for {}: {:?}", uri, reason);
            }
            None => {}
        }
    }

    fn apply_workspace_roots(&self, roots: Vec<PathBuf>) {
        match self.state.session.lock() {
            Ok(mut session) => session.set_workspace_roots(roots),
            Err(e) => error!("Session lock poisoned: {}", e),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("hxcheck LSP server initializing...");

        let mut roots: Vec<PathBuf> = params
            .workspace_folders
            .unwrap_or_default()
            .into_iter()
            .filter_map(|folder| folder.uri.to_file_path().ok())
            .collect();
        if roots.is_empty()
            && let Some(path) = params.root_uri.and_then(|u| u.to_file_path().ok())
        {
            roots.push(path);
        }

        let settings = params
            .initialization_options
            .map(Self::settings_from_options)
            .unwrap_or_default();

        match self.state.workspace_roots.lock() {
            Ok(mut guard) => *guard = roots.clone(),
            Err(e) => error!("Workspace roots lock poisoned: {}", e),
        }
        match self.state.session.lock() {
            Ok(mut session) => {
                session.set_workspace_roots(roots);
                session.update_settings(settings);
            }
            Err(e) => error!("Session lock poisoned: {}", e),
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::NONE),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                workspace: Some(WorkspaceServerCapabilities {
                    workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                        supported: Some(true),
                        change_notifications: Some(OneOf::Left(true)),
                    }),
                    file_operations: None,
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "hxcheck-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "hxcheck LSP server initialized!")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("hxcheck LSP server shutting down...");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);

        self.validate_document(
            &params.text_document.uri,
            Some(params.text_document.text),
            Some(params.text_document.version),
        )
        .await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);

        // Without included text the saved content is read from disk.
        self.validate_document(&params.text_document.uri, params.text, None)
            .await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);

        if let Ok(path) = params.text_document.uri.to_file_path() {
            match self.state.session.lock() {
                Ok(mut session) => session.clear_diagnostics(&path),
                Err(e) => error!("Session lock poisoned: {}", e),
            }
        }

        // Clear diagnostics
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        debug!("Configuration changed");

        let settings = Self::settings_from_options(params.settings);
        match self.state.session.lock() {
            Ok(mut session) => session.update_settings(settings),
            Err(e) => error!("Session lock poisoned: {}", e),
        }
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        debug!("Workspace folders changed");

        let mut roots = {
            match self.state.workspace_roots.lock() {
                Ok(guard) => guard.clone(),
                Err(e) => {
                    error!("Workspace roots lock poisoned: {}", e);
                    return;
                }
            }
        };

        for removed in &params.event.removed {
            if let Ok(path) = removed.uri.to_file_path() {
                roots.retain(|root| *root != path);
            }
        }
        for added in &params.event.added {
            if let Ok(path) = added.uri.to_file_path() {
                roots.push(path);
            }
        }

        match self.state.workspace_roots.lock() {
            Ok(mut guard) => *guard = roots.clone(),
            Err(e) => error!("Workspace roots lock poisoned: {}", e),
        }
        self.apply_workspace_roots(roots);
    }
}

/// Starts the LSP server.
///
/// This function does not return unless an error occurs or the server shuts
/// down.
pub async fn run() {
    info!("hxcheck LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
