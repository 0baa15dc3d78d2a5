//! Print the version label of the currently published artifact

use crate::core::context::ProjectContext;
use crate::core::error::{FolioError, FolioResult};
use crate::metadata::{MetadataStore, PdfMetadata, resolve_version};
use crate::release::DocType;

/// Run `folio version`
///
/// A readable artifact without version metadata is not an error.
pub fn run_version(ctx: &ProjectContext, doc_type: DocType) -> FolioResult<()> {
  let output = ctx.target(doc_type)?.output_path();
  if !output.is_file() {
    return Err(FolioError::with_help(
      format!("No published {} found at {}", doc_type, output.display()),
      format!("Run `folio release --type {}` first.", doc_type),
    ));
  }

  let info = PdfMetadata.read(&output)?;
  match resolve_version(&info) {
    Some(version) => println!("{}", version),
    None => println!("⚠️  No version metadata found."),
  }

  Ok(())
}
