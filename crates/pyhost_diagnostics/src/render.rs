use crate::Diagnostic;

pub fn render_diagnostic(diag: &Diagnostic) -> String {
    let mut out = String::new();
    let code_str = diag.code.map(|c| format!(" [{c}]")).unwrap_or_default();
    match &diag.origin {
        Some(origin) => out.push_str(&format!(
            "{:?}{}: {}: {}",
            diag.severity, code_str, origin, diag.message
        )),
        None => out.push_str(&format!("{:?}{}: {}", diag.severity, code_str, diag.message)),
    }
    if let Some(h) = &diag.help {
        out.push('\n');
        out.push_str("  = help: ");
        out.push_str(h);
    }
    out
}

pub fn render_diagnostics(diags: &[Diagnostic]) -> String {
    let mut out = String::new();
    for (i, d) in diags.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render_diagnostic(d));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagnosticKind, codes};

    #[test]
    fn renders_code_origin_and_help() {
        let d = Diagnostic::warning_kind(DiagnosticKind::BadAritySuffix("List`x".into()))
            .with_code(codes::BAD_ARITY_SUFFIX)
            .with_origin("shapes.nlib")
            .with_help("generic names end in `<digits>");
        let s = render_diagnostic(&d);
        assert!(s.starts_with("Warning [W0102]: shapes.nlib: "), "{s}");
        assert!(s.contains("List`x"), "{s}");
        assert!(s.ends_with("  = help: generic names end in `<digits>"), "{s}");
    }

    #[test]
    fn joins_multiple_lines() {
        let ds = vec![Diagnostic::error("a"), Diagnostic::warning("b")];
        assert_eq!(render_diagnostics(&ds), "Error: a\nWarning: b");
    }
}
