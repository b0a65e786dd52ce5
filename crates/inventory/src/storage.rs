//! 키-값 저장소
//!
//! 문서 하나는 키 하나에 JSON 문자열로 저장됩니다. 버전 관리나 마이그레이션은 없습니다.
//!
//! - [`FileStorage`]: `<data_dir>/<key>.json` 파일
//! - [`MemoryStorage`]: 프로세스 메모리 (테스트용, 쓰기 실패 주입 가능)

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use junkyard_core::error::StorageError;

/// 키-값 저장소 trait
///
/// 쓰기는 문서 전체를 교체합니다. 부분 갱신은 지원하지 않습니다.
pub trait KeyValueStorage: Send + Sync {
    /// 키의 문서를 읽습니다. 없으면 `None`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 키의 문서를 교체합니다.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// 파일 기반 저장소
///
/// 쓰기는 임시 파일에 기록한 뒤 이름을 바꿉니다. 데이터 디렉토리는 첫 쓰기 때 생성됩니다.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// 데이터 디렉토리
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 키의 파일 경로
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_owned(),
                reason: format!("{}: {e}", path.display()),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |reason: String| StorageError::Write {
            key: key.to_owned(),
            reason,
        };

        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| write_err(format!("{}: {e}", self.data_dir.display())))?;

        let path = self.path_for(key);
        let tmp = self.data_dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(|e| write_err(format!("{}: {e}", tmp.display())))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                warn!(key, path = %tmp.display(), error = %cleanup, "temp file left behind");
            }
            return Err(write_err(format!("{}: {e}", path.display())));
        }

        debug!(key, path = %path.display(), bytes = value.len(), "document written");
        Ok(())
    }
}

/// 메모리 저장소
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 쓰기 실패를 주입합니다.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 성공한 쓰기 횟수
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// 저장된 원시 문서
    pub fn raw(&self, key: &str) -> Option<String> {
        self.documents
            .lock()
            .ok()
            .and_then(|docs| docs.get(key).cloned())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let docs = self.documents.lock().map_err(|e| StorageError::Read {
            key: key.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(docs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                key: key.to_owned(),
                reason: "write failure injected".to_owned(),
            });
        }
        let mut docs = self.documents.lock().map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: e.to_string(),
        })?;
        docs.insert(key.to_owned(), value.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
