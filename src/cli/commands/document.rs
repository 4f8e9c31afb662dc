use std::path::PathBuf;

use crate::cli::commands::usage_error;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::export::SUMMARY_LABEL;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write the entries as a PDF table",
            "export <file.pdf>",
            cmd_export,
        ),
        CommandEntry::new(
            "convert",
            "Render each page of a PDF to JPEG",
            "convert <file.pdf> <output-dir>",
            cmd_convert,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(usage_error("export <file.pdf>"));
    };
    if context.session.ledger().is_empty() {
        context.print_warning("The ledger is empty; exporting the header and total only.");
    }

    let path = context.resolve_document_path(target);
    let summary = context.session.export(&path)?;
    io::print_success(format!(
        "Exported {} row(s) on {} page(s) to {}.",
        summary.rows,
        summary.pages,
        summary.path.display()
    ));
    io::print_info(format!("{SUMMARY_LABEL}: {}", summary.total));
    Ok(())
}

fn cmd_convert(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [source, output_dir] = args else {
        return Err(usage_error("convert <file.pdf> <output-dir>"));
    };
    let source = context.resolve_document_path(source);
    let output_dir = PathBuf::from(*output_dir);

    let report = context.session.convert(&source, &output_dir)?;
    for failure in &report.failures {
        context.print_warning(&format!(
            "Page {} could not be written to {}: {}",
            failure.page,
            failure.path.display(),
            failure.error
        ));
    }
    if report.is_complete() {
        io::print_success(format!(
            "Wrote {} page image(s) to {}.",
            report.written.len(),
            output_dir.display()
        ));
    } else {
        io::print_warning(format!(
            "Wrote {} of {} page image(s) to {}.",
            report.written.len(),
            report.page_count,
            output_dir.display()
        ));
    }
    Ok(())
}
