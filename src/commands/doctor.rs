//! Health check command for diagnosing setup issues

use std::path::Path;

use crate::checks::{CheckContext, Severity, create_default_runner};
use crate::core::error::{ExitCode, FolioResult};

/// Run every health check and report
///
/// Exits with [`ExitCode::Validation`] when any check reports an error.
pub fn run_doctor(project_root: &Path, thorough: bool, json: bool) -> FolioResult<()> {
  let ctx = CheckContext {
    project_root: project_root.to_path_buf(),
    thorough,
  };

  let runner = create_default_runner();
  if !json {
    println!("🏥 Running health checks...\n");

    println!("📋 Registered checks:");
    for check in runner.checks() {
      let note = if check.is_expensive() && !thorough {
        " (skipped, use --thorough)"
      } else {
        ""
      };
      println!("   • {}: {}{}", check.name(), check.description(), note);
    }
    println!();
  }

  let results = runner.run_all(&ctx);
  let has_errors = results.iter().any(|r| r.is_error());

  if json {
    let json_output = serde_json::to_string_pretty(&results)?;
    println!("{}", json_output);
  } else {
    let mut has_warnings = false;

    for result in &results {
      let icon = match (result.passed, result.severity) {
        (true, _) => "✅",
        (false, Severity::Warning) => "⚠️ ",
        (false, _) => "❌",
      };
      println!("{} {}: {}", icon, result.check_name, result.message);

      if !result.passed {
        if let Some(ref fix) = result.fix {
          println!("   💡 Fix: {}", fix);
        }
        if result.severity == Severity::Warning {
          has_warnings = true;
        }
      }
      println!();
    }

    let passed_count = results.iter().filter(|r| r.passed).count();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Summary: {}/{} checks passed", passed_count, results.len());

    if has_errors {
      println!("\n⚠️  Critical issues found. Please fix errors before releasing.");
    } else if has_warnings {
      println!("\n⚠️  Some warnings found. Consider addressing them.");
    } else {
      println!("\n✨ All checks passed! Ready to release.");
    }
  }

  if has_errors {
    std::process::exit(ExitCode::Validation.as_i32());
  }

  Ok(())
}
