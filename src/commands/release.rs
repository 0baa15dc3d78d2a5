//! Release command implementation
//!
//! Wires the real capabilities (system git, the configured build command, the HTTP
//! ledger, PDF metadata) into the orchestrator and prints a summary.

use crate::core::build::CommandBuilder;
use crate::core::context::ProjectContext;
use crate::core::error::FolioResult;
use crate::core::vcs::SystemGit;
use crate::ledger::NotionLedger;
use crate::metadata::PdfMetadata;
use crate::release::{
  Capabilities, DocType, Orchestrator, ReleaseMessage, ReleaseOutcome, ReleaseReport, ReleaseRequest,
};
use chrono::{Local, Timelike};

/// Run `folio release`
pub fn run_release(ctx: &ProjectContext, doc_type: DocType, message: Option<String>, force: bool) -> FolioResult<()> {
  let target = ctx.target(doc_type)?;
  let now = Local::now().naive_local();
  let now = now.with_nanosecond(0).unwrap_or(now);

  let request = ReleaseRequest {
    doc_type,
    message: ReleaseMessage::from_arg(message, doc_type, now),
    force,
  };

  let git = SystemGit::open(&ctx.root)?;
  let builder = CommandBuilder::new(&ctx.config.build.command, &ctx.root)?;
  let ledger = NotionLedger::from_config(&ctx.config)?;
  let metadata = PdfMetadata;

  println!("🚀 Releasing {}...", doc_type);
  let mut orchestrator = Orchestrator::new(Capabilities {
    vcs: &git,
    builder: &builder,
    ledger: &ledger,
    metadata: &metadata,
  });

  match orchestrator.run(&request, &target, now)? {
    ReleaseOutcome::NoChanges => {}
    ReleaseOutcome::Released(report) => print_report(doc_type, &report),
  }

  Ok(())
}

fn print_report(doc_type: DocType, report: &ReleaseReport) {
  println!();
  println!("✅ Released {} {}", doc_type, report.version);
  println!();
  println!("   Output:   {} (sha256 {})", report.output_path.display(), report.digest);
  match &report.archive_path {
    Some(path) => println!("   Archive:  {}", path.display()),
    None => println!("   Archive:  skipped"),
  }
  match &report.record_id {
    Some(id) => println!("   Ledger:   {}", id),
    None => println!("   Ledger:   skipped"),
  }
  if report.committed {
    println!("   Commit:   created");
  } else {
    println!("   Commit:   nothing to commit");
  }

  if !report.warnings.is_empty() {
    println!();
    println!("⚠️  Completed with warnings:");
    for warning in &report.warnings {
      println!("   • {}", warning);
    }
  }
}
