//! PDF document information dictionary via `lopdf`

use super::{DocumentInfo, MetadataStore, SUBJECT_PREFIX};
use crate::core::error::{FolioError, FolioResult, ResultExt};
use crate::release::VersionName;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and writes the trailer's `/Info` dictionary
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfMetadata;

enum InfoSlot {
  Indirect(ObjectId),
  Inline,
  Missing,
}

impl MetadataStore for PdfMetadata {
  fn read(&self, path: &Path) -> FolioResult<DocumentInfo> {
    let doc = Document::load(path).with_context(|| format!("Failed to read PDF metadata from {}", path.display()))?;

    let Some(dict) = info_dict(&doc) else {
      return Ok(DocumentInfo::default());
    };

    Ok(DocumentInfo {
      version: text_field(dict, b"Version"),
      subject: text_field(dict, b"Subject"),
      title: text_field(dict, b"Title"),
    })
  }

  fn write_version(&self, path: &Path, version: &VersionName) -> FolioResult<()> {
    let mut doc = Document::load(path).with_context(|| format!("Failed to open PDF {}", path.display()))?;

    let info = info_dict_mut(&mut doc)?;
    info.set("Version", Object::string_literal(version.as_str()));
    info.set(
      "Subject",
      Object::string_literal(format!("{}{}", SUBJECT_PREFIX, version.as_str())),
    );

    let mut bytes = Vec::new();
    doc
      .save_to(&mut bytes)
      .map_err(|e| FolioError::message(format!("Failed to serialize PDF {}: {}", path.display(), e)))?;

    // Replace the output in one rename so a failed write never truncates it
    let staging = staging_path(path);
    fs::write(&staging, &bytes).with_context(|| format!("Failed to write {}", staging.display()))?;
    if let Err(e) = fs::rename(&staging, path) {
      let _ = fs::remove_file(&staging);
      return Err(FolioError::from(e).context(format!("Failed to replace {}", path.display())));
    }

    tracing::debug!(path = %path.display(), version = %version, "wrote version metadata");
    Ok(())
  }
}

fn staging_path(path: &Path) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(".folio-tmp");
  PathBuf::from(name)
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
  match doc.trailer.get(b"Info").ok()? {
    Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
    Object::Dictionary(dict) => Some(dict),
    _ => None,
  }
}

fn info_dict_mut(doc: &mut Document) -> FolioResult<&mut Dictionary> {
  let slot = match doc.trailer.get(b"Info") {
    Ok(Object::Reference(id)) => InfoSlot::Indirect(*id),
    Ok(Object::Dictionary(_)) => InfoSlot::Inline,
    _ => InfoSlot::Missing,
  };

  let dict = match slot {
    InfoSlot::Indirect(id) => doc.get_object_mut(id)?.as_dict_mut()?,
    InfoSlot::Inline => doc.trailer.get_mut(b"Info")?.as_dict_mut()?,
    InfoSlot::Missing => {
      let id = doc.add_object(Dictionary::new());
      doc.trailer.set("Info", id);
      doc.get_object_mut(id)?.as_dict_mut()?
    }
  };

  Ok(dict)
}

fn text_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
  match dict.get(key).ok()? {
    Object::String(bytes, _) => Some(decode_text(bytes)),
    Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    _ => None,
  }
}

/// PDF text strings are UTF-16BE with a BOM, or a single-byte encoding
fn decode_text(bytes: &[u8]) -> String {
  if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
    let units: Vec<u16> = rest
      .chunks_exact(2)
      .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
      .collect();
    return String::from_utf16_lossy(&units);
  }

  match std::str::from_utf8(bytes) {
    Ok(text) => text.to_string(),
    Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
  }
}
