//! Purpose: Write the `CheckSecp.kt` scratch stub.
//! Exports: `STUB_FILE_NAME`, `STUB_TEMPLATE`, `write_stub`.
//! Role: Placeholder generator only; the stub is never compiled or run here.
//! Invariants: Output bytes equal `STUB_TEMPLATE` exactly on every run.
//! Invariants: An existing file with the same name is overwritten without prompting.
//! Notes: The stub lists `Secp256k1` methods reflectively and only works with the
//! secp256k1-kmp JVM binding on the classpath, which this crate never provides.
use crate::core::error::{Error, ErrorKind};
use std::io;
use std::path::{Path, PathBuf};

pub const STUB_FILE_NAME: &str = "CheckSecp.kt";

pub const STUB_TEMPLATE: &str = r#"
import fr.acinq.secp256k1.Secp256k1

fun main() {
    println("Methods:")
    Secp256k1::class.java.methods.forEach { println(it.name) }
}
"#;

/// Writes the stub into `dir` and returns the path written.
pub fn write_stub(dir: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let path = dir.as_ref().join(STUB_FILE_NAME);
    std::fs::write(&path, STUB_TEMPLATE).map_err(|err| {
        Error::new(map_io_error_kind(&err))
            .with_message("failed to write stub file")
            .with_path(&path)
            .with_source(err)
    })?;
    tracing::info!(path = %path.display(), bytes = STUB_TEMPLATE.len(), "wrote stub");
    Ok(path)
}

fn map_io_error_kind(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    }
}

#[cfg(test)]
mod tests {
    use super::{STUB_FILE_NAME, STUB_TEMPLATE, map_io_error_kind, write_stub};
    use crate::core::error::ErrorKind;
    use std::io;

    #[test]
    fn permission_denied_maps_to_permission() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only mount");
        assert_eq!(map_io_error_kind(&err), ErrorKind::Permission);
    }

    #[test]
    fn other_io_failures_map_to_io() {
        for kind in [
            io::ErrorKind::NotFound,
            io::ErrorKind::AlreadyExists,
            io::ErrorKind::StorageFull,
            io::ErrorKind::Other,
        ] {
            assert_eq!(map_io_error_kind(&io::Error::from(kind)), ErrorKind::Io, "{kind:?}");
        }
    }

    #[test]
    fn template_bytes_are_fixed() {
        let expected = "\nimport fr.acinq.secp256k1.Secp256k1\n\nfun main() {\n    println(\"Methods:\")\n    Secp256k1::class.java.methods.forEach { println(it.name) }\n}\n";
        assert_eq!(STUB_TEMPLATE, expected);
    }

    #[test]
    fn overwrites_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join(STUB_FILE_NAME);
        std::fs::write(&target, "stale content that is much longer than the template itself\n".repeat(8))
            .expect("seed");

        let path = write_stub(temp.path()).expect("write");
        assert_eq!(path, target);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), STUB_TEMPLATE);
    }

    #[test]
    fn missing_dir_is_io_error_with_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("nope");
        let err = write_stub(&missing).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.path(), Some(missing.join(STUB_FILE_NAME).as_path()));
    }
}
