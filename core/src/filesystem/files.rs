use super::error::FileSystemError;
use common::files::Hashes;
use log::error;
use md5::{Digest, Md5};
use sha1::Sha1;
use sha2::Sha256;
use std::{
    fs::{metadata, read, File},
    io::Read,
    path::Path,
};

/// Check if path is a file
pub(crate) fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}

/// Get the filename from a path. Returns an empty string if there is none
pub(crate) fn get_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Read a file that is less than 2GB in size
pub(crate) fn read_file(path: &str) -> Result<Vec<u8>, FileSystemError> {
    // Verify provided path is a file
    if !is_file(path) {
        return Err(FileSystemError::NotFile);
    }
    if file_too_large(path) {
        return Err(FileSystemError::LargeFile);
    }

    match read(path) {
        Ok(result) => Ok(result),
        Err(err) => {
            error!("[forenscope] Failed to read file {path}: {err:?}");
            Err(FileSystemError::ReadFile)
        }
    }
}

/// Check if a file is larger than 2GB
fn file_too_large(path: &str) -> bool {
    let max_size = 2147483648;
    match metadata(path) {
        Ok(result) => result.len() > max_size,
        Err(_) => false,
    }
}

/// Read a file in chunks and hash its contents. Returns MD5, SHA1, and/or SHA256 hashes
pub(crate) fn hash_file(
    hashes: &Hashes,
    path: &str,
) -> Result<(String, String, String), FileSystemError> {
    let mut md5_string = String::new();
    let mut sha1_string = String::new();
    let mut sha256_string = String::new();

    // Verify provided path is a file
    if !is_file(path) {
        return Err(FileSystemError::NotFile);
    }

    let mut md5 = Md5::new();
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut file = match File::open(path) {
        Ok(result) => result,
        Err(err) => {
            error!("[forenscope] Failed to hash file {path}: {err:?}");
            return Err(FileSystemError::OpenFile);
        }
    };

    // Read file in chunks so we do not read large files all into memory
    let temp_buff_size = 65536;
    let mut temp_buff: Vec<u8> = vec![0u8; temp_buff_size];
    loop {
        let bytes = match file.read(&mut temp_buff) {
            Ok(result) => result,
            Err(err) => {
                error!("[forenscope] Failed to read file {path}: {err:?}");
                return Err(FileSystemError::ReadFile);
            }
        };
        let finished = 0;
        if bytes == finished {
            break;
        }

        let chunk = &temp_buff[0..bytes];
        if hashes.md5 {
            md5.update(chunk);
        }
        if hashes.sha1 {
            sha1.update(chunk);
        }
        if hashes.sha256 {
            sha256.update(chunk);
        }
    }

    if hashes.md5 {
        let hash = md5.finalize();
        md5_string = format!("{hash:x}");
    }
    if hashes.sha1 {
        let hash = sha1.finalize();
        sha1_string = format!("{hash:x}");
    }
    if hashes.sha256 {
        let hash = sha256.finalize();
        sha256_string = format!("{hash:x}");
    }

    Ok((md5_string, sha1_string, sha256_string))
}
