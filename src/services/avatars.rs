use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "avif"];

fn is_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Image files under `root`, grouped by their subdirectory, as public URLs
/// `/avatars/{category}/{file}` sorted by file name. A `root` that is missing
/// or not a directory yields an empty map.
pub async fn list_avatars(root: &Path) -> std::io::Result<BTreeMap<String, Vec<String>>> {
    let mut avatars = BTreeMap::new();

    match fs::metadata(root).await {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Ok(avatars),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(avatars),
        Err(e) => return Err(e),
    }
    let mut categories = fs::read_dir(root).await?;

    while let Some(category) = categories.next_entry().await? {
        if !category.file_type().await?.is_dir() {
            continue;
        }
        let Some(category_name) = category.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let mut files = Vec::new();
        let mut entries = fs::read_dir(category.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str().filter(|name| is_image(name)) {
                files.push(name.to_string());
            }
        }
        files.sort();

        let urls = files
            .into_iter()
            .map(|file| format!("/avatars/{}/{}", category_name, file))
            .collect();
        avatars.insert(category_name, urls);
    }

    Ok(avatars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recognises_image_extensions() {
        assert!(is_image("cat.PNG"));
        assert!(is_image("logo.svg"));
        assert!(!is_image("notes.txt"));
        assert!(!is_image("README"));
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let avatars = list_avatars(&dir.path().join("nope")).await.unwrap();
        assert!(avatars.is_empty());
    }

    #[tokio::test]
    async fn regular_file_root_is_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let avatars = list_avatars(file.path()).await.unwrap();
        assert!(avatars.is_empty());
    }

    #[tokio::test]
    async fn groups_by_category_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let animals = dir.path().join("animals");
        std::fs::create_dir(&animals).unwrap();
        for name in ["owl.webp", "cat.png", "notes.txt"] {
            std::fs::write(animals.join(name), b"x").unwrap();
        }
        std::fs::write(dir.path().join("stray.png"), b"x").unwrap();

        let avatars = list_avatars(dir.path()).await.unwrap();
        assert_eq!(
            avatars.get("animals").cloned().unwrap(),
            vec!["/avatars/animals/cat.png", "/avatars/animals/owl.webp"]
        );
        assert_eq!(avatars.len(), 1);
    }
}
