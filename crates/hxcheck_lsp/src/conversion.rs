//! Conversion from core diagnostics to LSP diagnostics.

use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range,
};

use hxcheck_core::{Diagnostic as CheckDiagnostic, Severity};

/// Converts a core diagnostic to an LSP diagnostic.
///
/// Core lines are 1-based, LSP lines 0-based; columns are 0-based on both
/// sides.
pub(crate) fn to_lsp_diagnostic(diag: &CheckDiagnostic) -> Diagnostic {
    let line = diag.line.saturating_sub(1);
    let position = Position::new(line, diag.column);

    let severity = match diag.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    };

    Diagnostic {
        range: Range::new(position, position),
        severity: Some(severity),
        code: Some(NumberOrString::String(diag.check.clone())),
        source: Some("hxcheck".to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}
