//! Text-to-hex wrapper around an external assembler.
//!
//! Takes assembly text, prepends a fixed directive header, hands it to the
//! system assembler, extracts the flat code bytes from the object file with
//! `objcopy`, and renders them as hex. A developer convenience for eyeballing
//! instruction encodings; unrelated to the counter demo but part of the
//! toolbox.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Directive header prepended to every input.
const HEADER: &str = ".text\n";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Failure of the assemble-to-hex pipeline.
#[derive(Debug, Error)]
pub enum AsmHexError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("assembler '{assembler}' failed ({status}):\n{stderr}")]
    Assembler {
        assembler: String,
        status: String,
        stderr: String,
    },

    #[error("objcopy '{objcopy}' failed ({status}):\n{stderr}")]
    Objcopy {
        objcopy: String,
        status: String,
        stderr: String,
    },

    #[error("assembler produced no code bytes")]
    Empty,
}

/// Wrap raw assembly text with the fixed directive header.
#[must_use]
pub fn wrap_source(source: &str) -> String {
    let mut wrapped = String::with_capacity(HEADER.len() + source.len() + 1);
    wrapped.push_str(HEADER);
    wrapped.push_str(source);
    if !source.ends_with('\n') {
        wrapped.push('\n');
    }
    wrapped
}

/// Render code bytes as space-separated lowercase hex pairs.
#[must_use]
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

fn temp_path(suffix: &str) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!(
        "tlsprobe_asmhex_{}_{}.{}",
        std::process::id(),
        seq,
        suffix
    ));
    path
}

/// Assemble `source` and return the hex rendering of the flat code bytes.
///
/// `assembler` and `objcopy` name the external tools (`as` / `objcopy` by
/// default at the CLI). Temp files are removed on every path.
pub fn assemble_hex(source: &str, assembler: &str, objcopy: &str) -> Result<String, AsmHexError> {
    let asm_path = temp_path("s");
    let obj_path = temp_path("o");
    let bin_path = temp_path("bin");

    let result = run_pipeline(source, assembler, objcopy, &asm_path, &obj_path, &bin_path);

    for path in [&asm_path, &obj_path, &bin_path] {
        let _ = std::fs::remove_file(path);
    }
    result
}

fn run_pipeline(
    source: &str,
    assembler: &str,
    objcopy: &str,
    asm_path: &Path,
    obj_path: &Path,
    bin_path: &Path,
) -> Result<String, AsmHexError> {
    std::fs::write(asm_path, wrap_source(source))?;

    let assembled = Command::new(assembler)
        .arg("-o")
        .arg(obj_path)
        .arg(asm_path)
        .output()?;
    if !assembled.status.success() {
        return Err(AsmHexError::Assembler {
            assembler: assembler.to_string(),
            status: assembled.status.to_string(),
            stderr: String::from_utf8_lossy(&assembled.stderr).into_owned(),
        });
    }

    let copied = Command::new(objcopy)
        .args(["-O", "binary", "--only-section", ".text"])
        .arg(obj_path)
        .arg(bin_path)
        .output()?;
    if !copied.status.success() {
        return Err(AsmHexError::Objcopy {
            objcopy: objcopy.to_string(),
            status: copied.status.to_string(),
            stderr: String::from_utf8_lossy(&copied.stderr).into_owned(),
        });
    }

    let bytes = std::fs::read(bin_path)?;
    if bytes.is_empty() {
        return Err(AsmHexError::Empty);
    }
    Ok(format_hex(&bytes))
}
