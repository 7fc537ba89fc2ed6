use std::fs;
use std::path::Path;

/// Extensions the viewer accepts. Matching is exact, so `photo.PNG` is rejected.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "bmp", "tga", "jpg", "qoi"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    Invalid,
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Decide what the command line argument points at.
pub fn classify(path: &Path) -> PathKind {
    let Ok(meta) = fs::metadata(path) else {
        log::debug!("stat failed for {:?}", path);
        return PathKind::Invalid;
    };

    if meta.is_dir() {
        PathKind::Directory
    } else if meta.is_file() && is_image_file(path) {
        PathKind::File
    } else {
        PathKind::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("liv-files-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn supported_extensions_are_files() {
        let dir = scratch_dir("supported");
        for ext in IMAGE_EXTENSIONS {
            let p = dir.join(format!("photo.{}", ext));
            fs::write(&p, b"not really pixels").unwrap();
            assert_eq!(classify(&p), PathKind::File, "{}", ext);
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unsupported_or_upper_case_extension_is_invalid() {
        let dir = scratch_dir("unsupported");
        for name in ["notanimage.txt", "photo.PNG", "photo.jpeg", "README"] {
            let p = dir.join(name);
            fs::write(&p, b"x").unwrap();
            assert_eq!(classify(&p), PathKind::Invalid, "{}", name);
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn directories_win_regardless_of_name() {
        let dir = scratch_dir("dirs");
        let odd = dir.join("album.png");
        fs::create_dir(&odd).unwrap();
        assert_eq!(classify(&dir), PathKind::Directory);
        assert_eq!(classify(&odd), PathKind::Directory);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_path_is_invalid() {
        let dir = scratch_dir("missing");
        assert_eq!(classify(&dir.join("gone.png")), PathKind::Invalid);
        fs::remove_dir_all(&dir).unwrap();
    }
}
